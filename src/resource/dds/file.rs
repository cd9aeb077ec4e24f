use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::resource::dds::DdsSource;

pub struct FileSystemDdsSource {
    pub path: PathBuf,
}

impl FileSystemDdsSource {
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("The given path is not a file: {}", path.display()),
            )
            .into());
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Texture label derived from the file stem.
    pub fn name(&self) -> String {
        match self.path.file_stem().and_then(|stem| stem.to_str()) {
            Some(stem) => stem.to_uppercase(),
            None => String::from("<UNNAMED>"),
        }
    }
}

impl DdsSource for FileSystemDdsSource {
    fn load_bytes(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path)
            .with_context(|| format!("Failed to read DDS file: {}", self.path.display()))
    }
}
