use crate::dds::codec::DxtCodec;
use crate::dds::decode::DecodeError;
use crate::dds::header::FourCC;

/// Failures detected while validating the container header, before any
/// backend object exists.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("The given buffer is too short to hold a DDS header: {length} bytes")]
    TruncatedHeader { length: usize },

    #[error("The given buffer does not start with the DDS magic number (expected={expected:#010x}): {actual:#010x}")]
    InvalidMagic { expected: u32, actual: u32 },

    #[error("The given pixel format is not a four-character-code compressed format (flags={flags:#x})")]
    UnsupportedPixelLayout { flags: u32 },

    #[error("The given compression format is not supported: {0}")]
    UnknownCodec(FourCC),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Failed to decode {codec} data for mip level {level}")]
    DecodeFailure {
        codec: DxtCodec,
        level: u32,
        #[source]
        source: DecodeError,
    },

    #[error("Mip level {level} reads {length} bytes at offset {offset}, but the buffer holds {available} bytes")]
    BufferOutOfRange {
        level: u32,
        offset: usize,
        length: usize,
        available: usize,
    },

    #[error("The texture backend rejected the load")]
    Backend(#[source] anyhow::Error),
}
