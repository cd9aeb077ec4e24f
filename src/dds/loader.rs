use crate::dds::codec::{CodecDescriptor, DxtCodec};
use crate::dds::decode::{BlockDecoder, DecodedImage, SoftwareBlockDecoder};
use crate::dds::error::Error;
use crate::dds::header::DdsHeader;
use crate::dds::mip::{MipChain, MipLevel};
use crate::dds::{
    SamplingParameters, TextureAllocation, TextureBackend, TextureResource, UploadPath,
};

/// Parses a DDS buffer and drives its mip chain into a backend texture.
///
/// Validation happens before the backend is asked for a texture, so a
/// malformed header never leaves GPU state behind. A failure while uploading
/// drops the partially written texture.
pub struct DdsTextureLoader<'a, B: TextureBackend, D: BlockDecoder> {
    backend: &'a B,
    decoder: &'a D,
}

impl<'a, B: TextureBackend> DdsTextureLoader<'a, B, SoftwareBlockDecoder> {
    pub fn new(backend: &'a B) -> Self {
        Self {
            backend,
            decoder: &SoftwareBlockDecoder,
        }
    }
}

impl<'a, B: TextureBackend, D: BlockDecoder> DdsTextureLoader<'a, B, D> {
    pub fn with_decoder(backend: &'a B, decoder: &'a D) -> Self {
        Self { backend, decoder }
    }

    pub fn load(&self, buffer: &[u8], name: &str) -> Result<TextureResource<B::Texture>, Error> {
        let header = DdsHeader::parse(buffer)?;
        let descriptor = CodecDescriptor::select(header.four_cc, self.backend)?;
        let path = UploadPath::choose(descriptor.codec, descriptor.native_format);

        log::debug!(
            "Loading DDS texture: {name} - {}x{} {} with {} mip level(s), {:?}",
            header.width,
            header.height,
            descriptor.codec,
            header.mip_level_count,
            path,
        );

        let mut texture = self
            .backend
            .create_texture(&TextureAllocation {
                label: name,
                width: header.width,
                height: header.height,
                mip_level_count: header.mip_level_count,
                path,
            })
            .map_err(Error::Backend)?;

        let mip_chain = MipChain::new(
            header.width,
            header.height,
            header.mip_level_count,
            header.data_offset,
            descriptor.block_size,
        );

        let mut uploaded_levels = 0;
        for level in mip_chain {
            let data = level_data(buffer, &level)?;

            log::trace!(
                "Uploading mip level {} ({}x{}, {} bytes at {})",
                level.index,
                level.width,
                level.height,
                level.length,
                level.offset,
            );

            match path {
                UploadPath::Hardware { format } => self
                    .backend
                    .write_compressed_level(&mut texture, &level, format, data)
                    .map_err(Error::Backend)?,
                UploadPath::Software { .. } => {
                    let image = decode_with(self.decoder, descriptor.codec, &level, data)?;
                    self.backend
                        .write_pixel_level(&mut texture, &level, &image)
                        .map_err(Error::Backend)?;
                }
            }

            uploaded_levels += 1;
        }

        let sampling = SamplingParameters::for_level_count(uploaded_levels);
        self.backend.set_sampling(&mut texture, &sampling);

        Ok(TextureResource {
            texture,
            width: header.width,
            height: header.height,
            codec: descriptor.codec,
            path,
            mip_level_count: uploaded_levels,
            sampling,
        })
    }
}

/// Decodes a single level on the CPU without involving a backend.
pub fn decode_level(
    buffer: &[u8],
    level_index: u32,
    decoder: &impl BlockDecoder,
) -> Result<Option<DecodedImage>, Error> {
    let header = DdsHeader::parse(buffer)?;
    let codec = DxtCodec::from_four_cc(header.four_cc)?;

    let level = MipChain::new(
        header.width,
        header.height,
        header.mip_level_count,
        header.data_offset,
        codec.block_size(),
    )
    .nth(level_index as usize);

    let level = match level {
        Some(level) => level,
        None => return Ok(None),
    };

    let data = level_data(buffer, &level)?;

    decode_with(decoder, codec, &level, data).map(Some)
}

/// Decodes the full stored block grid, then crops it to the level's texels.
/// The stored row width of a non-power-of-two level can exceed
/// `ceil(width / 4)` blocks.
fn decode_with(
    decoder: &impl BlockDecoder,
    codec: DxtCodec,
    level: &MipLevel,
    data: &[u8],
) -> Result<DecodedImage, Error> {
    let width = level.blocks_wide.saturating_mul(4);
    let height = level.blocks_high.saturating_mul(4);

    let decoded = match codec {
        DxtCodec::Dxt1 => decoder.decode_dxt1(data, width, height),
        DxtCodec::Dxt3 => decoder.decode_dxt3(data, width, height),
        DxtCodec::Dxt5 => decoder.decode_dxt5(data, width, height),
    };

    decoded
        .map(|image| image.crop(level.width, level.height))
        .map_err(|source| Error::DecodeFailure {
            codec,
            level: level.index,
            source,
        })
}

fn level_data<'b>(buffer: &'b [u8], level: &MipLevel) -> Result<&'b [u8], Error> {
    let out_of_range = || Error::BufferOutOfRange {
        level: level.index,
        offset: level.offset,
        length: level.length,
        available: buffer.len(),
    };

    let end = level.offset.checked_add(level.length).ok_or_else(out_of_range)?;

    buffer.get(level.offset..end).ok_or_else(out_of_range)
}
