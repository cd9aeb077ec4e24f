pub mod dds;
