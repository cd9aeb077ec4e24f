use crate::dds::error::FormatError;

/// `"DDS "` read as a little-endian word.
pub const DDS_MAGIC: u32 = 0x2053_4444;
/// Header flag signalling that the mipmap count field is meaningful.
pub const DDSD_MIPMAPCOUNT: u32 = 0x2_0000;
/// Pixel-format flag signalling a four-character-code compressed format.
pub const DDPF_FOURCC: u32 = 0x4;

/// Size in bytes of the header record, magic included.
pub const HEADER_LENGTH: usize = std::mem::size_of::<RawHeader>();

/// A four-character code stored as a little-endian word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub u32);

impl FourCC {
    pub const DXT1: FourCC = FourCC(0x3154_5844);
    pub const DXT3: FourCC = FourCC(0x3354_5844);
    pub const DXT5: FourCC = FourCC(0x3554_5844);

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }

    pub fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

impl std::fmt::Display for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in self.to_bytes() {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02x}")?;
            }
        }

        Ok(())
    }
}

#[allow(dead_code)]
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct RawPixelFormat {
    size: u32,
    flags: u32,
    four_cc: u32,
    rgb_bit_count: u32,
    r_bit_mask: u32,
    g_bit_mask: u32,
    b_bit_mask: u32,
    a_bit_mask: u32,
}

#[allow(dead_code)]
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct RawHeader {
    magic: u32,
    size: u32,
    flags: u32,
    height: u32,
    width: u32,
    pitch_or_linear_size: u32,
    depth: u32,
    mip_map_count: u32,
    reserved: [u32; 11],
    pixel_format: RawPixelFormat,
    caps: [u32; 4],
}

/// The parts of a DDS header needed to walk and upload a DXT mip chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DdsHeader {
    pub width: u32,
    pub height: u32,
    /// Byte offset of the first mip level. The header size field does not
    /// count the magic word, hence the extra 4 bytes.
    pub data_offset: usize,
    pub mip_level_count: u32,
    pub four_cc: FourCC,
    pub pitch_or_linear_size: u32,
}

impl DdsHeader {
    pub fn parse(buffer: &[u8]) -> Result<Self, FormatError> {
        if buffer.len() < std::mem::size_of::<u32>() {
            return Err(FormatError::TruncatedHeader {
                length: buffer.len(),
            });
        }

        let magic = bytemuck::pod_read_unaligned::<u32>(&buffer[..4]);
        if magic != DDS_MAGIC {
            return Err(FormatError::InvalidMagic {
                expected: DDS_MAGIC,
                actual: magic,
            });
        }

        if buffer.len() < HEADER_LENGTH {
            return Err(FormatError::TruncatedHeader {
                length: buffer.len(),
            });
        }

        let raw = bytemuck::pod_read_unaligned::<RawHeader>(&buffer[..HEADER_LENGTH]);

        if raw.pixel_format.flags & DDPF_FOURCC == 0 {
            return Err(FormatError::UnsupportedPixelLayout {
                flags: raw.pixel_format.flags,
            });
        }

        let mip_level_count = if raw.flags & DDSD_MIPMAPCOUNT != 0 {
            raw.mip_map_count.max(1)
        } else {
            1
        };

        Ok(Self {
            width: raw.width,
            height: raw.height,
            data_offset: raw.size as usize + 4,
            mip_level_count,
            four_cc: FourCC(raw.pixel_format.four_cc),
            pitch_or_linear_size: raw.pitch_or_linear_size,
        })
    }
}
