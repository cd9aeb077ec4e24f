use anyhow::Result;

use crate::dds::loader::DdsTextureLoader;
use crate::dds::TextureResource;
use crate::render::state::RenderSystemState;
use crate::render::texture::{Texture2DPackage, WgpuTextureBackend};
use crate::resource::dds::DdsSource;

pub mod sampler;
mod state;
pub mod texture;

pub struct RenderSystem {
    state: RenderSystemState,
}

impl RenderSystem {
    pub async fn headless(force_software: bool) -> Result<Self> {
        let state = RenderSystemState::headless(force_software).await?;

        Ok(Self { state })
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.state.adapter.get_info()
    }

    pub fn load_dds_texture(
        &self,
        source: &impl DdsSource,
        name: &str,
    ) -> Result<TextureResource<Texture2DPackage>> {
        let data = source.load_bytes()?;
        let backend = WgpuTextureBackend::new(&self.state.device, &self.state.queue);

        let texture = DdsTextureLoader::new(&backend).load(&data, name)?;
        self.state.device.poll(wgpu::Maintain::Wait);

        Ok(texture)
    }
}
