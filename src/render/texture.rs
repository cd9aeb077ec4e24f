use anyhow::Result;

use crate::dds::codec::DxtCodec;
use crate::dds::decode::DecodedImage;
use crate::dds::mip::MipLevel;
use crate::dds::{SamplingParameters, TextureAllocation, TextureBackend, UploadPath};
use crate::error::Error;
use crate::render::sampler::Sampler;

pub struct Texture2DPackage {
    pub label: String,
    pub gpu_texture: wgpu::Texture,
    pub sampler: Option<Sampler>,
}

/// Uploads DDS mip chains into `wgpu` textures.
///
/// Software-decoded levels are stored as `Rgba8Unorm`; RGB565 output is
/// widened on the way in since `wgpu` has no 16-bit colour format.
pub struct WgpuTextureBackend<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
}

impl<'a> WgpuTextureBackend<'a> {
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue) -> Self {
        Self { device, queue }
    }

    fn level_extent(texture: &Texture2DPackage, level: &MipLevel) -> Result<wgpu::Extent3d> {
        let mip_level_count = texture.gpu_texture.mip_level_count();

        match mip_extent(texture.gpu_texture.size(), mip_level_count, level.index) {
            Some(extent) => Ok(extent),
            None => Err(Error::new(format!(
                "The texture {} does not have a mip level that matches the specified index \
                 (levels={mip_level_count}): {}",
                texture.label, level.index,
            ))
            .into()),
        }
    }
}

impl<'a> TextureBackend for WgpuTextureBackend<'a> {
    type Texture = Texture2DPackage;

    fn compressed_format(&self, codec: DxtCodec) -> Option<wgpu::TextureFormat> {
        self.device
            .features()
            .contains(wgpu::Features::TEXTURE_COMPRESSION_BC)
            .then(|| codec.native_format())
    }

    fn create_texture(&self, allocation: &TextureAllocation) -> Result<Self::Texture> {
        if allocation.width == 0 || allocation.height == 0 {
            return Err(Error::new(format!(
                "Cannot create a texture with a zero dimension: {}x{}",
                allocation.width, allocation.height,
            ))
            .into());
        }

        let (format, texture_size) = match allocation.path {
            // Block-compressed textures must cover whole blocks at level 0.
            UploadPath::Hardware { format } => (
                format,
                wgpu::Extent3d {
                    width: allocation.width.div_ceil(4) * 4,
                    height: allocation.height.div_ceil(4) * 4,
                    depth_or_array_layers: 1,
                },
            ),
            UploadPath::Software { .. } => (
                wgpu::TextureFormat::Rgba8Unorm,
                wgpu::Extent3d {
                    width: allocation.width,
                    height: allocation.height,
                    depth_or_array_layers: 1,
                },
            ),
        };

        let max_mip_level_count = texture_size.max_mips(wgpu::TextureDimension::D2);
        if allocation.mip_level_count > max_mip_level_count {
            log::warn!(
                "Texture {} declares {} mip levels, only {} fit its size",
                allocation.label,
                allocation.mip_level_count,
                max_mip_level_count,
            );
        }

        let label = format!("{}_TEXTURE", allocation.label);
        let gpu_texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&label),
            size: texture_size,
            mip_level_count: allocation.mip_level_count.min(max_mip_level_count),
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        Ok(Texture2DPackage {
            label: allocation.label.to_string(),
            gpu_texture,
            sampler: None,
        })
    }

    fn write_compressed_level(
        &self,
        texture: &mut Self::Texture,
        level: &MipLevel,
        format: wgpu::TextureFormat,
        data: &[u8],
    ) -> Result<()> {
        let extent = Self::level_extent(texture, level)?.physical_size(format);
        let block_size = compressed_block_size(format)?;

        let (bytes_per_row, rows_per_image) = block_rows(level, extent)
            .map(|(blocks_wide, blocks_high)| (blocks_wide * block_size, blocks_high))
            .ok_or_else(|| {
                Error::new(format!(
                    "Mip level {} of {} does not cover a {}x{} image (blocks={}x{})",
                    level.index,
                    texture.label,
                    extent.width,
                    extent.height,
                    level.blocks_wide,
                    level.blocks_high,
                ))
            })?;

        let required = bytes_per_row as usize * rows_per_image as usize;
        if data.len() < required {
            return Err(Error::new(format!(
                "Mip level {} of {} is too small for a {}x{} {format:?} image \
                 (required={required}): {}",
                level.index,
                texture.label,
                extent.width,
                extent.height,
                data.len(),
            ))
            .into());
        }

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture.gpu_texture,
                mip_level: level.index,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &data[..required],
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(rows_per_image),
            },
            extent,
        );

        Ok(())
    }

    fn write_pixel_level(
        &self,
        texture: &mut Self::Texture,
        level: &MipLevel,
        image: &DecodedImage,
    ) -> Result<()> {
        let extent = Self::level_extent(texture, level)?;

        if extent.width != image.width || extent.height != image.height {
            return Err(Error::new(format!(
                "Mip level {} of {} does not match the base size (expected={}x{}): {}x{}",
                level.index, texture.label, extent.width, extent.height, image.width, image.height,
            ))
            .into());
        }

        let pixels = image.to_rgba8();

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture.gpu_texture,
                mip_level: level.index,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            extent,
        );

        Ok(())
    }

    fn set_sampling(&self, texture: &mut Self::Texture, sampling: &SamplingParameters) {
        texture.sampler = Some(Sampler::from_parameters(sampling, &texture.label, self.device));
    }
}

fn mip_extent(size: wgpu::Extent3d, mip_level_count: u32, index: u32) -> Option<wgpu::Extent3d> {
    (index < mip_level_count).then(|| size.mip_level_size(index, wgpu::TextureDimension::D2))
}

/// Row layout of a stored level in blocks. The container keeps the padded
/// block grid, which can be wider than the texture's own mip extent.
fn block_rows(level: &MipLevel, physical_extent: wgpu::Extent3d) -> Option<(u32, u32)> {
    let covers = |blocks: u32, texels: u32| u64::from(blocks) * 4 >= u64::from(texels);

    (covers(level.blocks_wide, physical_extent.width)
        && covers(level.blocks_high, physical_extent.height))
    .then_some((level.blocks_wide, level.blocks_high))
}

fn compressed_block_size(format: wgpu::TextureFormat) -> Result<u32> {
    match format {
        wgpu::TextureFormat::Bc1RgbaUnorm | wgpu::TextureFormat::Bc1RgbaUnormSrgb => Ok(8),
        wgpu::TextureFormat::Bc2RgbaUnorm
        | wgpu::TextureFormat::Bc2RgbaUnormSrgb
        | wgpu::TextureFormat::Bc3RgbaUnorm
        | wgpu::TextureFormat::Bc3RgbaUnormSrgb => Ok(16),
        _ => Err(Error::new(format!(
            "The given texture format is not a DXT block format: {format:?}"
        ))
        .into()),
    }
}
