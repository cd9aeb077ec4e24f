//! CPU decompression of DXT blocks for backends that cannot sample them.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    /// 16-bit packed red/green/blue, little-endian, no alpha.
    Rgb565,
    /// 8 bits per channel, red first.
    Rgba8,
}

impl PixelLayout {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Rgb565 => 2,
            Self::Rgba8 => 4,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Block data is truncated (expected={expected} bytes): {actual} bytes")]
    Truncated { expected: usize, actual: usize },

    #[error("Cannot decode an image with a zero dimension: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("The block decoder rejected the data: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub layout: PixelLayout,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl DecodedImage {
    /// Expands the pixels to RGBA8. RGB565 pixels become opaque.
    pub fn to_rgba8(&self) -> Vec<u8> {
        match self.layout {
            PixelLayout::Rgba8 => self.data.clone(),
            PixelLayout::Rgb565 => self
                .data
                .chunks_exact(2)
                .flat_map(|pixel| {
                    let [r, g, b] =
                        rgb565_to_rgb888(u16::from_le_bytes([pixel[0], pixel[1]]));
                    [r, g, b, 255]
                })
                .collect(),
        }
    }

    /// Keeps the top-left `width` x `height` pixels.
    pub fn crop(self, width: u32, height: u32) -> Self {
        if width >= self.width && height >= self.height {
            return self;
        }

        let width = width.min(self.width);
        let height = height.min(self.height);
        let bytes_per_pixel = self.layout.bytes_per_pixel();
        let source_row = self.width as usize * bytes_per_pixel;
        let target_row = width as usize * bytes_per_pixel;

        let data = self
            .data
            .chunks_exact(source_row)
            .take(height as usize)
            .flat_map(|row| row[..target_row].iter().copied())
            .collect();

        Self {
            layout: self.layout,
            width,
            height,
            data,
        }
    }
}

/// Turns the compressed blocks of one mip level into a pixel buffer, one
/// method per supported codec.
pub trait BlockDecoder {
    fn decode_dxt1(
        &self,
        blocks: &[u8],
        width: u32,
        height: u32,
    ) -> Result<DecodedImage, DecodeError>;

    fn decode_dxt3(
        &self,
        blocks: &[u8],
        width: u32,
        height: u32,
    ) -> Result<DecodedImage, DecodeError>;

    fn decode_dxt5(
        &self,
        blocks: &[u8],
        width: u32,
        height: u32,
    ) -> Result<DecodedImage, DecodeError>;
}

/// [`BlockDecoder`] backed by `texture2ddecoder` (DXT1 = BC1, DXT3 = BC2,
/// DXT5 = BC3).
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareBlockDecoder;

impl BlockDecoder for SoftwareBlockDecoder {
    fn decode_dxt1(
        &self,
        blocks: &[u8],
        width: u32,
        height: u32,
    ) -> Result<DecodedImage, DecodeError> {
        decode_image(
            blocks,
            width,
            height,
            8,
            PixelLayout::Rgb565,
            texture2ddecoder::decode_bc1,
        )
    }

    fn decode_dxt3(
        &self,
        blocks: &[u8],
        width: u32,
        height: u32,
    ) -> Result<DecodedImage, DecodeError> {
        decode_image(
            blocks,
            width,
            height,
            16,
            PixelLayout::Rgba8,
            texture2ddecoder::decode_bc2,
        )
    }

    fn decode_dxt5(
        &self,
        blocks: &[u8],
        width: u32,
        height: u32,
    ) -> Result<DecodedImage, DecodeError> {
        decode_image(
            blocks,
            width,
            height,
            16,
            PixelLayout::Rgba8,
            texture2ddecoder::decode_bc3,
        )
    }
}

fn decode_image<E: std::fmt::Debug>(
    blocks: &[u8],
    width: u32,
    height: u32,
    block_size: usize,
    layout: PixelLayout,
    decode: impl Fn(&[u8], usize, usize, &mut [u32]) -> Result<(), E>,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyImage { width, height });
    }

    let expected = width.div_ceil(4) as usize * height.div_ceil(4) as usize * block_size;
    if blocks.len() < expected {
        return Err(DecodeError::Truncated {
            expected,
            actual: blocks.len(),
        });
    }

    let mut pixels = vec![0u32; width as usize * height as usize];
    decode(
        &blocks[..expected],
        width as usize,
        height as usize,
        &mut pixels,
    )
    .map_err(|error| DecodeError::Rejected(format!("{error:?}")))?;

    // texture2ddecoder packs each pixel as BGRA in a little-endian u32.
    let data = match layout {
        PixelLayout::Rgba8 => pixels
            .iter()
            .flat_map(|&pixel| {
                let [b, g, r, a] = pixel.to_le_bytes();
                [r, g, b, a]
            })
            .collect(),
        PixelLayout::Rgb565 => pixels
            .iter()
            .flat_map(|&pixel| {
                let [b, g, r, _] = pixel.to_le_bytes();
                rgb888_to_rgb565(r, g, b).to_le_bytes()
            })
            .collect(),
    };

    Ok(DecodedImage {
        layout,
        width,
        height,
        data,
    })
}

fn rgb565_to_rgb888(color: u16) -> [u8; 3] {
    let r = ((color >> 11) & 0x1f) as u8;
    let g = ((color >> 5) & 0x3f) as u8;
    let b = (color & 0x1f) as u8;

    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}

fn rgb888_to_rgb565(r: u8, g: u8, b: u8) -> u16 {
    (u16::from(r >> 3) << 11) | (u16::from(g >> 2) << 5) | u16::from(b >> 3)
}
