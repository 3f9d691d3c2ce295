use std::sync::Arc;

use anyhow::Context;
use id_arena::Arena;
use wgpu::CommandEncoderDescriptor;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    camera::CameraUniform,
    lighting::LightUniform,
    model::{draw_model_instances, RenderModel},
    rendering::{
        common::RenderCommon,
        imgui_renderer::ImguiRenderer,
        instance::gather_instances,
        passes::{
            background_pass::{BackgroundPass, BackgroundPassTextureViews},
            model_pass::{ModelPass, ModelPassTextureViews},
            pass::Pass,
            shadow_pass::{ShadowPass, ShadowPassTextureViews},
        },
        shader_loader::{PipelineCacheBuilder, ShaderLoader},
        texture::{CubemapTexture, DepthTexture, MsaaTexture},
    },
    scene_graph::scene::Scene,
    viewer::Viewer,
};

pub struct Renderer {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,

    common: Arc<RenderCommon>,
    depth_texture: DepthTexture,
    msaa_texture: Option<MsaaTexture>,

    camera_uniform: CameraUniform,
    light_uniform: LightUniform,

    render_models: Arena<RenderModel>,

    shader_loader: ShaderLoader,

    shadow_pass: ShadowPass,
    background_pass: BackgroundPass,
    model_pass: ModelPass,

    imgui_renderer: ImguiRenderer,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        viewer: &Viewer,
        imgui_context: &mut imgui::Context,
    ) -> anyhow::Result<Renderer> {
        let size = window.inner_size();
        let config = &viewer.config;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable graphics adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to create device")?;

        let camera_uniform = CameraUniform::new(&viewer.camera);
        let camera_uniform_buffer = camera_uniform.create_buffer(&device);

        let light_uniform = LightUniform::new(&viewer.light);
        let light_uniform_buffer = light_uniform.create_buffer(&device);

        let common = Arc::new(RenderCommon::new(
            &device,
            &adapter,
            &surface,
            size,
            camera_uniform_buffer,
            light_uniform_buffer,
            config,
        ));

        let (depth_texture, msaa_texture) = {
            let surface_config = common.output_surface_config.read().unwrap();
            let depth = DepthTexture::new(
                &device,
                &surface_config,
                config.msaa_samples,
                "Depth Texture",
            );
            let msaa = (config.msaa_samples > 1)
                .then(|| MsaaTexture::new(&device, &surface_config, config.msaa_samples));
            (depth, msaa)
        };

        let mut cache_builder = PipelineCacheBuilder::new();

        let shadow_pass = ShadowPass::create(&device, common.clone(), &mut cache_builder)?;
        let background_pass = BackgroundPass::create(&device, common.clone(), &mut cache_builder)?;
        let model_pass = ModelPass::create(&device, common.clone(), &mut cache_builder)?;

        let shader_loader = ShaderLoader::new(device.clone(), cache_builder)?;

        let imgui_renderer =
            ImguiRenderer::new(&device, &queue, common.surface_format(), imgui_context);

        Ok(Self {
            window,
            size,
            surface,
            device,
            queue,
            common,
            depth_texture,
            msaa_texture,
            camera_uniform,
            light_uniform,
            render_models: Arena::new(),
            shader_loader,
            shadow_pass,
            background_pass,
            model_pass,
            imgui_renderer,
        })
    }

    /// Creates GPU buffers for scene models that do not have them yet and
    /// links the handles back into the scene.
    pub fn upload_scene_models(&mut self, scene: &mut Scene) {
        for (_, scene_model) in scene.models.iter_mut() {
            if scene_model.render_model.is_none() {
                let render_model = RenderModel::from_model(&self.device, &scene_model.model);
                scene_model.render_model = Some(self.render_models.alloc(render_model));
            }
        }
    }

    /// Uploads the decoded cubemap and points the background pass at it.
    pub fn set_background_cubemap(&mut self, faces: &crate::assets::CubemapFaces) {
        let cubemap = CubemapTexture::new(&self.device, &self.queue, faces);
        self.background_pass.set_cubemap(&self.device, &cubemap);
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.size = new_size;

        let mut surface_config = self.common.output_surface_config.write().unwrap();
        surface_config.width = new_size.width;
        surface_config.height = new_size.height;

        self.surface.configure(&self.device, &surface_config);
        self.depth_texture.resize(&self.device, &surface_config);
        if let Some(msaa) = &mut self.msaa_texture {
            msaa.resize(&self.device, &surface_config);
        }
    }

    pub fn render(
        &mut self,
        viewer: &Viewer,
        imgui_context: &mut imgui::Context,
    ) -> Result<(), wgpu::SurfaceError> {
        self.shader_loader.load_pending_shaders();

        self.camera_uniform.update(&viewer.camera);
        self.camera_uniform
            .update_buffer(&self.queue, &self.common.camera_uniform_buffer);
        self.light_uniform.update(&viewer.light);
        self.light_uniform
            .update_buffer(&self.queue, &self.common.light_uniform_buffer);

        gather_instances(&viewer.scene, &mut self.render_models);
        for (_, model) in self.render_models.iter() {
            if model.instances.should_render() {
                model.instances.write_to_buffer(&self.queue, &model.instance_buffer);
            }
        }

        let output = self.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let pipeline_cache = &self.shader_loader.cache;

        let cast_shadows = viewer.light.cast_shadows;
        self.shadow_pass.render(
            &ShadowPassTextureViews {
                shadow: self.common.shadow_map.view.clone(),
            },
            &mut encoder,
            pipeline_cache,
            |render_pass| {
                if !cast_shadows {
                    return;
                }

                for (_, model) in self.render_models.iter() {
                    if model.instances.should_render() {
                        draw_model_instances(render_pass, model);
                    }
                }
            },
        );

        // With multisampling the passes draw into the MSAA target and the
        // model pass resolves into the surface at the end.
        let (color_view, resolve_target) = match &self.msaa_texture {
            Some(msaa) => (msaa.view().clone(), Some(surface_view.clone())),
            None => (surface_view.clone(), None),
        };

        self.background_pass.render(
            &BackgroundPassTextureViews {
                color: color_view.clone(),
                resolve_target: None,
            },
            &mut encoder,
            pipeline_cache,
            |render_pass| {
                render_pass.draw(0..3, 0..1);
            },
        );

        self.model_pass.render(
            &ModelPassTextureViews {
                color: color_view,
                resolve_target,
                depth: self.depth_texture.view().clone(),
            },
            &mut encoder,
            pipeline_cache,
            |render_pass| {
                for (_, model) in self.render_models.iter() {
                    if model.instances.should_render() {
                        draw_model_instances(render_pass, model);
                    }
                }
            },
        );

        let draw_data = imgui_context.render();
        self.imgui_renderer.render(
            draw_data,
            &surface_view,
            &self.device,
            &self.queue,
            &mut encoder,
        );

        self.queue.submit([encoder.finish()]);

        output.present();

        Ok(())
    }
}
