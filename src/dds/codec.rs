use crate::dds::decode::PixelLayout;
use crate::dds::header::FourCC;
use crate::dds::error::FormatError;
use crate::dds::TextureBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DxtCodec {
    Dxt1,
    Dxt3,
    Dxt5,
}

impl DxtCodec {
    pub fn from_four_cc(four_cc: FourCC) -> Result<Self, FormatError> {
        match four_cc {
            FourCC::DXT1 => Ok(Self::Dxt1),
            FourCC::DXT3 => Ok(Self::Dxt3),
            FourCC::DXT5 => Ok(Self::Dxt5),
            _ => Err(FormatError::UnknownCodec(four_cc)),
        }
    }

    pub fn four_cc(&self) -> FourCC {
        match self {
            Self::Dxt1 => FourCC::DXT1,
            Self::Dxt3 => FourCC::DXT3,
            Self::Dxt5 => FourCC::DXT5,
        }
    }

    /// Bytes per 4x4 block.
    pub fn block_size(&self) -> usize {
        match self {
            Self::Dxt1 => 8,
            Self::Dxt3 | Self::Dxt5 => 16,
        }
    }

    /// The block-compressed texture format a backend would need to accept
    /// this codec's data as-is.
    pub fn native_format(&self) -> wgpu::TextureFormat {
        match self {
            Self::Dxt1 => wgpu::TextureFormat::Bc1RgbaUnorm,
            Self::Dxt3 => wgpu::TextureFormat::Bc2RgbaUnorm,
            Self::Dxt5 => wgpu::TextureFormat::Bc3RgbaUnorm,
        }
    }

    /// Layout produced by the software decoder for this codec.
    pub fn pixel_layout(&self) -> PixelLayout {
        match self {
            Self::Dxt1 => PixelLayout::Rgb565,
            Self::Dxt3 | Self::Dxt5 => PixelLayout::Rgba8,
        }
    }
}

impl std::fmt::Display for DxtCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.four_cc())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecDescriptor {
    pub codec: DxtCodec,
    pub block_size: usize,
    /// `None` when the backend cannot take the blocks directly.
    pub native_format: Option<wgpu::TextureFormat>,
}

impl CodecDescriptor {
    pub fn select(four_cc: FourCC, backend: &impl TextureBackend) -> Result<Self, FormatError> {
        let codec = DxtCodec::from_four_cc(four_cc)?;

        Ok(Self {
            codec,
            block_size: codec.block_size(),
            native_format: backend.compressed_format(codec),
        })
    }
}
