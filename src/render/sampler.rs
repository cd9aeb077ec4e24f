use crate::dds::{MinFilter, SamplingParameters};

pub struct Sampler {
    pub gpu_sampler: wgpu::Sampler,
}

impl Sampler {
    pub fn from_parameters(
        parameters: &SamplingParameters,
        name: &str,
        device: &wgpu::Device,
    ) -> Self {
        let mipmap_filter = match parameters.min_filter {
            MinFilter::Linear => wgpu::FilterMode::Nearest,
            MinFilter::LinearMipmapLinear => wgpu::FilterMode::Linear,
        };

        let gpu_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{name}_SAMPLER")),
            address_mode_u: parameters.address_mode_u,
            address_mode_v: parameters.address_mode_v,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: parameters.mag_filter,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter,
            ..Default::default()
        });

        Self { gpu_sampler }
    }
}
