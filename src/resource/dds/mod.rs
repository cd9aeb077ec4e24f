use anyhow::Result;

pub mod file;

/// Fetches the complete bytes of a DDS container before decoding starts.
pub trait DdsSource {
    fn load_bytes(&self) -> Result<Vec<u8>>;
}
