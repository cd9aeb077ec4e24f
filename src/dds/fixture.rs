//! Synthetic containers and recording collaborators shared by the unit tests.

use std::cell::{Cell, RefCell};

use anyhow::Result;

use crate::dds::codec::DxtCodec;
use crate::dds::decode::{
    BlockDecoder, DecodeError, DecodedImage, PixelLayout, SoftwareBlockDecoder,
};
use crate::dds::header::{FourCC, DDPF_FOURCC, DDSD_MIPMAPCOUNT, DDS_MAGIC};
use crate::dds::mip::{MipChain, MipLevel};
use crate::dds::{SamplingParameters, TextureAllocation, TextureBackend, UploadPath};
use crate::error::Error;

pub struct DdsFixture {
    four_cc: FourCC,
    width: u32,
    height: u32,
    flags: u32,
    mip_map_count: u32,
    pixel_format_flags: u32,
    truncate: usize,
}

impl DdsFixture {
    pub fn new(four_cc: FourCC, width: u32, height: u32) -> Self {
        Self {
            four_cc,
            width,
            height,
            flags: 0x1007,
            mip_map_count: 0,
            pixel_format_flags: DDPF_FOURCC,
            truncate: 0,
        }
    }

    pub fn mip_levels(self, count: u32) -> Self {
        self.raw_mip_count(count, true)
    }

    pub fn raw_mip_count(mut self, count: u32, flagged: bool) -> Self {
        self.mip_map_count = count;
        if flagged {
            self.flags |= DDSD_MIPMAPCOUNT;
        } else {
            self.flags &= !DDSD_MIPMAPCOUNT;
        }
        self
    }

    pub fn pixel_format_flags(mut self, flags: u32) -> Self {
        self.pixel_format_flags = flags;
        self
    }

    /// Drops `bytes` from the end of the payload.
    pub fn truncate_payload(mut self, bytes: usize) -> Self {
        self.truncate = bytes;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut words = [0u32; 31];
        words[0] = DDS_MAGIC;
        words[1] = 124;
        words[2] = self.flags;
        words[3] = self.height;
        words[4] = self.width;
        words[7] = self.mip_map_count;
        words[19] = 32;
        words[20] = self.pixel_format_flags;
        words[21] = self.four_cc.0;
        words[27] = 0x1000;

        let mut data: Vec<u8> = words.iter().flat_map(|word| word.to_le_bytes()).collect();
        data.extend_from_slice(&[0u8; 4]);

        let level_count = if self.flags & DDSD_MIPMAPCOUNT != 0 {
            self.mip_map_count.max(1)
        } else {
            1
        };
        let block_size = if self.four_cc == FourCC::DXT1 { 8 } else { 16 };
        let payload_length = MipChain::new(self.width, self.height, level_count, 0, block_size)
            .map(|level| level.length)
            .sum::<usize>()
            .saturating_sub(self.truncate);

        data.extend((0..payload_length).map(|index| (index * 37 + 11) as u8));
        data
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Create {
        width: u32,
        height: u32,
        mip_level_count: u32,
        path: UploadPath,
    },
    Compressed {
        level: u32,
        width: u32,
        height: u32,
        data: Vec<u8>,
    },
    Pixels {
        level: u32,
        width: u32,
        height: u32,
        layout: PixelLayout,
        length: usize,
    },
    Sampling(SamplingParameters),
}

#[derive(Debug, Default)]
pub struct RecordedTexture {
    pub sampling: Option<SamplingParameters>,
}

pub struct RecordingBackend {
    native: bool,
    rejected_level: Option<u32>,
    calls: RefCell<Vec<BackendCall>>,
}

impl RecordingBackend {
    pub fn with_native_support() -> Self {
        Self {
            native: true,
            rejected_level: None,
            calls: RefCell::new(vec![]),
        }
    }

    pub fn without_native_support() -> Self {
        Self {
            native: false,
            ..Self::with_native_support()
        }
    }

    pub fn rejecting_level(mut self, level: u32) -> Self {
        self.rejected_level = Some(level);
        self
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.borrow().clone()
    }

    pub fn compressed_writes(&self) -> usize {
        self.count(|call| matches!(call, BackendCall::Compressed { .. }))
    }

    pub fn pixel_writes(&self) -> usize {
        self.count(|call| matches!(call, BackendCall::Pixels { .. }))
    }

    fn count(&self, predicate: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| predicate(call)).count()
    }

    fn check_level(&self, level: &MipLevel) -> Result<()> {
        if self.rejected_level == Some(level.index) {
            return Err(Error::new(format!("Rejected mip level: {}", level.index)).into());
        }

        Ok(())
    }
}

impl TextureBackend for RecordingBackend {
    type Texture = RecordedTexture;

    fn compressed_format(&self, codec: DxtCodec) -> Option<wgpu::TextureFormat> {
        self.native.then(|| codec.native_format())
    }

    fn create_texture(&self, allocation: &TextureAllocation) -> Result<Self::Texture> {
        self.calls.borrow_mut().push(BackendCall::Create {
            width: allocation.width,
            height: allocation.height,
            mip_level_count: allocation.mip_level_count,
            path: allocation.path,
        });

        Ok(RecordedTexture::default())
    }

    fn write_compressed_level(
        &self,
        _texture: &mut Self::Texture,
        level: &MipLevel,
        _format: wgpu::TextureFormat,
        data: &[u8],
    ) -> Result<()> {
        self.check_level(level)?;
        self.calls.borrow_mut().push(BackendCall::Compressed {
            level: level.index,
            width: level.width,
            height: level.height,
            data: data.to_vec(),
        });

        Ok(())
    }

    fn write_pixel_level(
        &self,
        _texture: &mut Self::Texture,
        level: &MipLevel,
        image: &DecodedImage,
    ) -> Result<()> {
        self.check_level(level)?;
        self.calls.borrow_mut().push(BackendCall::Pixels {
            level: level.index,
            width: image.width,
            height: image.height,
            layout: image.layout,
            length: image.data.len(),
        });

        Ok(())
    }

    fn set_sampling(&self, texture: &mut Self::Texture, sampling: &SamplingParameters) {
        texture.sampling = Some(*sampling);
        self.calls.borrow_mut().push(BackendCall::Sampling(*sampling));
    }
}

/// Delegates to the software decoder, counting invocations and optionally
/// failing the n-th one.
#[derive(Default)]
pub struct CountingDecoder {
    calls: Cell<usize>,
    fail_at: Option<usize>,
}

impl CountingDecoder {
    pub fn failing_at(call: usize) -> Self {
        Self {
            calls: Cell::new(0),
            fail_at: Some(call),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn record(
        &self,
        blocks: &[u8],
        decode: impl FnOnce(&[u8]) -> Result<DecodedImage, DecodeError>,
    ) -> Result<DecodedImage, DecodeError> {
        let call = self.calls.get();
        self.calls.set(call + 1);

        if self.fail_at == Some(call) {
            return Err(DecodeError::Truncated {
                expected: blocks.len() + 1,
                actual: blocks.len(),
            });
        }

        decode(blocks)
    }
}

impl BlockDecoder for CountingDecoder {
    fn decode_dxt1(
        &self,
        blocks: &[u8],
        width: u32,
        height: u32,
    ) -> Result<DecodedImage, DecodeError> {
        self.record(blocks, |blocks| {
            SoftwareBlockDecoder.decode_dxt1(blocks, width, height)
        })
    }

    fn decode_dxt3(
        &self,
        blocks: &[u8],
        width: u32,
        height: u32,
    ) -> Result<DecodedImage, DecodeError> {
        self.record(blocks, |blocks| {
            SoftwareBlockDecoder.decode_dxt3(blocks, width, height)
        })
    }

    fn decode_dxt5(
        &self,
        blocks: &[u8],
        width: u32,
        height: u32,
    ) -> Result<DecodedImage, DecodeError> {
        self.record(blocks, |blocks| {
            SoftwareBlockDecoder.decode_dxt5(blocks, width, height)
        })
    }
}
