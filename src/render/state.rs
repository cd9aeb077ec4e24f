use anyhow::Result;

use crate::error::Error;

pub struct RenderSystemState {
    #[allow(dead_code)]
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl RenderSystemState {
    /// Opens a device without a surface. `force_software` leaves BC texture
    /// compression disabled even when the adapter offers it.
    pub async fn headless(force_software: bool) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY | wgpu::Backends::GL,
            ..Default::default()
        });

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
        {
            Some(adapter) => adapter,
            None => return Err(Error::new(String::from("Failed to retrieve adapter.")).into()),
        };

        let adapter_supports_bc = adapter
            .features()
            .contains(wgpu::Features::TEXTURE_COMPRESSION_BC);

        let required_features = if adapter_supports_bc && !force_software {
            wgpu::Features::TEXTURE_COMPRESSION_BC
        } else {
            wgpu::Features::empty()
        };

        log::info!(
            "Using adapter {:?} (BC compression: available={adapter_supports_bc}, enabled={})",
            adapter.get_info().name,
            required_features.contains(wgpu::Features::TEXTURE_COMPRESSION_BC),
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features,
                    required_limits: wgpu::Limits::downlevel_defaults()
                        .using_resolution(adapter.limits()),
                    label: Some("DDS_LOADER_DEVICE"),
                    ..Default::default()
                },
                None,
            )
            .await?;

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }
}
