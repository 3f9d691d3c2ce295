use std::sync::RwLock;

use wgpu::SurfaceConfiguration;
use winit::dpi::PhysicalSize;

use crate::config::ViewerConfig;
use crate::rendering::texture::ShadowMap;

/// Resources shared by every pass: the surface configuration, the uniform
/// buffers the passes bind, and the fixed-size shadow map.
pub struct RenderCommon {
    pub output_surface_config: RwLock<SurfaceConfiguration>,
    pub camera_uniform_buffer: wgpu::Buffer,
    pub light_uniform_buffer: wgpu::Buffer,
    pub shadow_map: ShadowMap,
    pub msaa_samples: u32,
}

impl RenderCommon {
    pub fn new(
        device: &wgpu::Device,
        adapter: &wgpu::Adapter,
        surface: &wgpu::Surface,
        size: PhysicalSize<u32>,
        camera_uniform_buffer: wgpu::Buffer,
        light_uniform_buffer: wgpu::Buffer,
        config: &ViewerConfig,
    ) -> Self {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let output_surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(device, &output_surface_config);

        let shadow_map = ShadowMap::new(device, config.shadow_map_size);

        Self {
            output_surface_config: RwLock::new(output_surface_config),
            camera_uniform_buffer,
            light_uniform_buffer,
            shadow_map,
            msaa_samples: config.msaa_samples,
        }
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.output_surface_config.read().unwrap().format
    }
}
