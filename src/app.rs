use std::path::Path;

use anyhow::Result;

use crate::args::{Args, Command};
use crate::dds::codec::DxtCodec;
use crate::dds::decode::SoftwareBlockDecoder;
use crate::dds::header::DdsHeader;
use crate::dds::loader::decode_level;
use crate::dds::mip::MipChain;
use crate::error::Error;
use crate::render::RenderSystem;
use crate::resource::dds::file::FileSystemDdsSource;
use crate::resource::dds::DdsSource;

pub struct App {
    args: Args,
}

impl App {
    pub fn new(args: Args) -> Self {
        App { args }
    }

    pub fn run(&self) -> Result<()> {
        match &self.args.command {
            Command::Inspect { path } => App::inspect(path),
            Command::Upload {
                path,
                force_software,
            } => App::upload(path, *force_software),
            Command::Decode {
                path,
                output,
                level,
            } => App::decode(path, output, *level),
        }
    }

    fn inspect(path: &Path) -> Result<()> {
        let data = FileSystemDdsSource::from_path(path)?.load_bytes()?;
        let header = DdsHeader::parse(&data)?;
        let codec = DxtCodec::from_four_cc(header.four_cc)?;

        println!(
            "{}: {}x{} {codec}, {} mip level(s), pitch/linear size {}, {} bytes",
            path.display(),
            header.width,
            header.height,
            header.mip_level_count,
            header.pitch_or_linear_size,
            data.len(),
        );

        let mip_chain = MipChain::new(
            header.width,
            header.height,
            header.mip_level_count,
            header.data_offset,
            codec.block_size(),
        );

        for level in mip_chain {
            let status = match level.offset.checked_add(level.length) {
                Some(end) if end <= data.len() => "",
                _ => " (out of range)",
            };

            println!(
                "  level {:>2}: {:>5}x{:<5} offset={:<10} length={}{status}",
                level.index, level.width, level.height, level.offset, level.length,
            );
        }

        Ok(())
    }

    fn upload(path: &Path, force_software: bool) -> Result<()> {
        let source = FileSystemDdsSource::from_path(path)?;
        let render_system = pollster::block_on(RenderSystem::headless(force_software))?;

        log::info!(
            "Render system created: {:?}",
            render_system.adapter_info().backend
        );

        let texture = render_system.load_dds_texture(&source, &source.name())?;

        println!(
            "{}: uploaded {}x{} {} with {} mip level(s) through the {} path ({:?})",
            path.display(),
            texture.width,
            texture.height,
            texture.codec,
            texture.mip_level_count,
            if texture.path.is_hardware() {
                "hardware"
            } else {
                "software"
            },
            texture.sampling.min_filter,
        );

        Ok(())
    }

    fn decode(path: &Path, output: &Path, level: u32) -> Result<()> {
        let data = FileSystemDdsSource::from_path(path)?.load_bytes()?;

        let decoded = match decode_level(&data, level, &SoftwareBlockDecoder)? {
            Some(decoded) => decoded,
            None => {
                return Err(Error::new(format!(
                    "The given texture does not have a mip level that matches the specified \
                     index: {level}"
                ))
                .into())
            }
        };

        let pixels = decoded.to_rgba8();
        let image = match image::RgbaImage::from_raw(decoded.width, decoded.height, pixels) {
            Some(image) => image,
            None => {
                return Err(Error::new(format!(
                    "Decoded pixel buffer does not match its dimensions: {}x{}",
                    decoded.width, decoded.height,
                ))
                .into())
            }
        };

        image.save_with_format(output, image::ImageFormat::Png)?;

        log::info!(
            "Wrote mip level {level} ({}x{}) to {}",
            decoded.width,
            decoded.height,
            output.display(),
        );

        Ok(())
    }
}
