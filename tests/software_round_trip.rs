use std::cell::RefCell;

use anyhow::Result;

use dds_loader::dds::codec::DxtCodec;
use dds_loader::dds::decode::{DecodedImage, PixelLayout};
use dds_loader::dds::header::FourCC;
use dds_loader::dds::mip::MipLevel;
use dds_loader::dds::{
    DdsTextureLoader, Error, MinFilter, SamplingParameters, TextureAllocation, TextureBackend,
    UploadPath,
};

const RED_565: u16 = 0xf800;
const BLUE_565: u16 = 0x001f;

fn container(four_cc: FourCC, width: u32, height: u32, block: &[u8]) -> Vec<u8> {
    let mut words = [0u32; 31];
    words[0] = 0x2053_4444;
    words[1] = 124;
    words[2] = 0x1007;
    words[3] = height;
    words[4] = width;
    words[19] = 32;
    words[20] = 0x4;
    words[21] = four_cc.0;

    let mut data: Vec<u8> = words.iter().flat_map(|word| word.to_le_bytes()).collect();
    data.extend_from_slice(&[0u8; 4]);

    let block_count = (width.div_ceil(4) * height.div_ceil(4)) as usize;
    for _ in 0..block_count {
        data.extend_from_slice(block);
    }

    data
}

fn red_color_block() -> Vec<u8> {
    let mut block = Vec::new();
    block.extend_from_slice(&RED_565.to_le_bytes());
    block.extend_from_slice(&BLUE_565.to_le_bytes());
    block.extend_from_slice(&0u32.to_le_bytes());
    block
}

#[derive(Default)]
struct CapturingBackend {
    native: bool,
    images: RefCell<Vec<DecodedImage>>,
    compressed: RefCell<Vec<(u32, usize)>>,
}

impl TextureBackend for CapturingBackend {
    type Texture = Option<SamplingParameters>;

    fn compressed_format(&self, codec: DxtCodec) -> Option<wgpu::TextureFormat> {
        self.native.then(|| codec.native_format())
    }

    fn create_texture(&self, _allocation: &TextureAllocation) -> Result<Self::Texture> {
        Ok(None)
    }

    fn write_compressed_level(
        &self,
        _texture: &mut Self::Texture,
        level: &MipLevel,
        _format: wgpu::TextureFormat,
        data: &[u8],
    ) -> Result<()> {
        self.compressed.borrow_mut().push((level.index, data.len()));
        Ok(())
    }

    fn write_pixel_level(
        &self,
        _texture: &mut Self::Texture,
        _level: &MipLevel,
        image: &DecodedImage,
    ) -> Result<()> {
        self.images.borrow_mut().push(image.clone());
        Ok(())
    }

    fn set_sampling(&self, texture: &mut Self::Texture, sampling: &SamplingParameters) {
        *texture = Some(*sampling);
    }
}

#[test]
fn dxt1_software_round_trip_yields_rgb565() {
    let data = container(FourCC::DXT1, 64, 64, &red_color_block());
    let backend = CapturingBackend::default();

    let resource = DdsTextureLoader::new(&backend).load(&data, "DXT1").unwrap();

    assert_eq!(
        resource.path,
        UploadPath::Software {
            layout: PixelLayout::Rgb565
        }
    );
    assert_eq!(resource.texture.map(|sampling| sampling.min_filter), Some(MinFilter::Linear));

    let images = backend.images.borrow();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].data.len(), 64 * 64 * 2);
    assert!(images[0]
        .data
        .chunks_exact(2)
        .all(|pixel| u16::from_le_bytes([pixel[0], pixel[1]]) == RED_565));
}

#[test]
fn dxt5_software_round_trip_is_deterministic() {
    let mut block = vec![0x80, 0x80, 0, 0, 0, 0, 0, 0];
    block.extend_from_slice(&red_color_block());
    let data = container(FourCC::DXT5, 64, 64, &block);

    let first = CapturingBackend::default();
    DdsTextureLoader::new(&first).load(&data, "DXT5").unwrap();
    let second = CapturingBackend::default();
    DdsTextureLoader::new(&second).load(&data, "DXT5").unwrap();

    let first = first.images.borrow();
    let second = second.images.borrow();
    assert_eq!(first[0].layout, PixelLayout::Rgba8);
    assert_eq!(first[0].data.len(), 64 * 64 * 4);
    assert_eq!(first[0], second[0]);
    assert!(first[0]
        .data
        .chunks_exact(4)
        .all(|pixel| pixel == [255, 0, 0, 0x80]));
}

#[test]
fn hardware_path_skips_decoding() {
    let data = container(FourCC::DXT3, 64, 64, &[0x11; 16]);
    let backend = CapturingBackend {
        native: true,
        ..Default::default()
    };

    let resource = DdsTextureLoader::new(&backend).load(&data, "DXT3").unwrap();

    assert!(resource.path.is_hardware());
    assert_eq!(*backend.compressed.borrow(), vec![(0, 16 * 16 * 16)]);
    assert!(backend.images.borrow().is_empty());
}

#[test]
fn missing_payload_is_out_of_range() {
    let mut data = container(FourCC::DXT1, 64, 64, &red_color_block());
    data.truncate(128 + 100);
    let backend = CapturingBackend::default();

    let error = DdsTextureLoader::new(&backend).load(&data, "SHORT").unwrap_err();

    assert!(matches!(
        error,
        Error::BufferOutOfRange {
            level: 0,
            offset: 128,
            length: 2048,
            available: 228,
        }
    ));
    assert!(backend.images.borrow().is_empty());
}
