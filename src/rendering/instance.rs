use id_arena::Arena;
use wgpu::BufferUsages;

use crate::model::{Instance, RenderModel};
use crate::scene_graph::scene::Scene;

/// Per-frame instance list for one model, rebuilt from the scene before
/// each render.
pub struct Instances {
    instances: Vec<Instance>,
}

impl Instances {
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
        }
    }

    pub fn add(&mut self, instance: Instance) {
        self.instances.push(instance);
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn write_to_buffer(&self, queue: &wgpu::Queue, instance_buffer: &InstanceBuffer) {
        queue.write_buffer(
            instance_buffer.buffer(),
            0,
            bytemuck::cast_slice(&self.instances),
        );
    }

    pub fn should_render(&self) -> bool {
        !self.instances.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }
}

pub struct InstanceBuffer(wgpu::Buffer);

impl InstanceBuffer {
    const MAX_INSTANCES: u64 = 128;

    pub fn new(device: &wgpu::Device, name: &str) -> Self {
        let label = format!("Instance buffer ({})", name);

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&label),
            size: std::mem::size_of::<Instance>() as u64 * Self::MAX_INSTANCES,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self(buffer)
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.0
    }

    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(1, self.buffer().slice(..));
    }
}

/// Rebuilds every render model's instance list from the scene objects that
/// reference it, carrying each object's world matrices and current color.
/// Models the renderer has not uploaded yet are skipped.
pub fn gather_instances(scene: &Scene, render_models: &mut Arena<RenderModel>) {
    for (_, model) in render_models.iter_mut() {
        model.instances.clear();
    }

    for (_, object) in scene.objects.iter() {
        let Some(model_id) = object.model_id else {
            continue;
        };
        let Some(render_model_id) = scene.get_model(model_id).and_then(|model| model.render_model)
        else {
            continue;
        };

        if let Some(render_model) = render_models.get_mut(render_model_id) {
            render_model.instances.add(Instance {
                model: object.world_matrix,
                normal: object.normal_matrix,
                color: object.color,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    #[test]
    fn instances_report_renderability() {
        let mut instances = Instances::new();
        assert!(!instances.should_render());

        instances.add(Instance {
            model: glam::Mat4::IDENTITY,
            normal: glam::Mat4::IDENTITY,
            color: Vec4::ONE,
        });
        assert!(instances.should_render());
        assert_eq!(instances.len(), 1);

        instances.clear();
        assert!(!instances.should_render());
    }
}
