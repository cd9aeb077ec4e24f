use std::path::PathBuf;

pub struct Args {
    pub command: Command,
}

#[derive(Clone)]
pub enum Command {
    Inspect {
        path: PathBuf,
    },
    Upload {
        path: PathBuf,
        force_software: bool,
    },
    Decode {
        path: PathBuf,
        output: PathBuf,
        level: u32,
    },
}
