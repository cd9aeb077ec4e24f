use anyhow::Result;

use crate::dds::codec::DxtCodec;
use crate::dds::decode::{DecodedImage, PixelLayout};
use crate::dds::mip::MipLevel;

pub mod codec;
pub mod decode;
pub mod error;
pub mod header;
pub mod loader;
pub mod mip;

pub use crate::dds::error::{Error, FormatError};
pub use crate::dds::loader::DdsTextureLoader;

#[cfg(test)]
mod fixture;

/// The graphics side of a load: capability query, texture creation, level
/// uploads and sampler state.
pub trait TextureBackend {
    type Texture;

    /// The native block-compressed format for `codec`, if the backend can
    /// sample it directly.
    fn compressed_format(&self, codec: DxtCodec) -> Option<wgpu::TextureFormat>;

    fn create_texture(&self, allocation: &TextureAllocation) -> Result<Self::Texture>;

    fn write_compressed_level(
        &self,
        texture: &mut Self::Texture,
        level: &MipLevel,
        format: wgpu::TextureFormat,
        data: &[u8],
    ) -> Result<()>;

    fn write_pixel_level(
        &self,
        texture: &mut Self::Texture,
        level: &MipLevel,
        image: &DecodedImage,
    ) -> Result<()>;

    fn set_sampling(&self, texture: &mut Self::Texture, sampling: &SamplingParameters);
}

/// How level data reaches the backend, decided once per load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPath {
    Hardware { format: wgpu::TextureFormat },
    Software { layout: PixelLayout },
}

impl UploadPath {
    pub fn choose(codec: DxtCodec, native_format: Option<wgpu::TextureFormat>) -> Self {
        match native_format {
            Some(format) => Self::Hardware { format },
            None => Self::Software {
                layout: codec.pixel_layout(),
            },
        }
    }

    pub fn is_hardware(&self) -> bool {
        matches!(self, Self::Hardware { .. })
    }
}

#[derive(Debug, Clone)]
pub struct TextureAllocation<'a> {
    pub label: &'a str,
    pub width: u32,
    pub height: u32,
    pub mip_level_count: u32,
    pub path: UploadPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinFilter {
    Linear,
    LinearMipmapLinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingParameters {
    pub address_mode_u: wgpu::AddressMode,
    pub address_mode_v: wgpu::AddressMode,
    pub mag_filter: wgpu::FilterMode,
    pub min_filter: MinFilter,
}

impl SamplingParameters {
    pub fn for_level_count(level_count: u32) -> Self {
        Self {
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: if level_count > 1 {
                MinFilter::LinearMipmapLinear
            } else {
                MinFilter::Linear
            },
        }
    }
}

/// A fully loaded texture together with what the load decided about it.
#[derive(Debug)]
pub struct TextureResource<T> {
    pub texture: T,
    pub width: u32,
    pub height: u32,
    pub codec: DxtCodec,
    pub path: UploadPath,
    pub mip_level_count: u32,
    pub sampling: SamplingParameters,
}
