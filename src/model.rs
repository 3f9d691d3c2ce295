use std::mem::offset_of;

use anyhow::Context;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use gltf::buffer;
use id_arena::Id;
use itertools::izip;
use wgpu::util::DeviceExt;

use crate::rendering::instance::{InstanceBuffer, Instances};

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    position: Vec3,
    normal: Vec3,
}

pub struct ModelPrimitive {
    pub index: usize,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

pub struct Model {
    pub name: String,
    pub primitives: Vec<ModelPrimitive>,
    /// Base color factor of the first primitive's material. The color
    /// panels overwrite this per object once the scene is spawned.
    pub base_color: Vec4,
}

pub type Buffers<'a> = &'a [buffer::Data];

impl Model {
    pub fn from_gltf(
        name: impl Into<String>,
        mesh: gltf::Mesh,
        buffers: Buffers,
    ) -> anyhow::Result<Model> {
        let mut model = Model {
            name: name.into(),
            primitives: Vec::new(),
            base_color: Vec4::ONE,
        };

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                return Err(anyhow::anyhow!(
                    "Unsupported primitive mode: {:?}",
                    primitive.mode()
                ));
            }

            if model.primitives.is_empty() {
                let factor = primitive
                    .material()
                    .pbr_metallic_roughness()
                    .base_color_factor();
                model.base_color = Vec4::from_array(factor);
            }

            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let position_reader = reader
                .read_positions()
                .context("Mesh primitive has no positions")?;
            let normal_reader = reader
                .read_normals()
                .context("Mesh primitive has no normals")?;

            let vertices = izip!(position_reader, normal_reader)
                .map(|(position, normal)| Vertex {
                    position: Vec3::from(position),
                    normal: Vec3::from(normal),
                })
                .collect::<Vec<Vertex>>();

            let index_reader = reader
                .read_indices()
                .context("Mesh primitive has no indices")?;
            let indices = index_reader.into_u32().collect::<Vec<u32>>();

            model.primitives.push(ModelPrimitive {
                index: primitive.index(),
                vertices,
                indices,
            });
        }

        if model.primitives.is_empty() {
            return Err(anyhow::anyhow!("Mesh without primitives: {}", model.name));
        }

        Ok(model)
    }
}

pub type RenderModelId = Id<RenderModel>;

pub struct RenderPrimitive {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
}

impl RenderPrimitive {
    fn from_primitive(device: &wgpu::Device, model: &Model, primitive: &ModelPrimitive) -> Self {
        let vertex_buffer_name = format!(
            "Vertex buffer ({}, primitive {})",
            model.name, primitive.index
        );
        let index_buffer_name = format!(
            "Index buffer ({}, primitive {})",
            model.name, primitive.index
        );

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&vertex_buffer_name),
            contents: bytemuck::cast_slice(&primitive.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&index_buffer_name),
            contents: bytemuck::cast_slice(&primitive.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: primitive.indices.len() as u32,
        }
    }
}

pub struct RenderModel {
    pub primitives: Vec<RenderPrimitive>,
    pub instance_buffer: InstanceBuffer,
    pub instances: Instances,
}

impl RenderModel {
    pub fn from_model(device: &wgpu::Device, model: &Model) -> Self {
        let primitives = model
            .primitives
            .iter()
            .map(|primitive| RenderPrimitive::from_primitive(device, model, primitive))
            .collect();
        let instance_buffer = InstanceBuffer::new(device, &model.name);

        RenderModel {
            primitives,
            instance_buffer,
            instances: Instances::new(),
        }
    }
}

/// Issues the draw calls for one model's gathered instances. The instance
/// buffer must already hold this frame's data.
pub fn draw_model_instances(render_pass: &mut wgpu::RenderPass<'_>, model: &RenderModel) {
    model.instance_buffer.bind(render_pass);

    for primitive in &model.primitives {
        render_pass.set_vertex_buffer(0, primitive.vertex_buffer.slice(..));
        render_pass.set_index_buffer(primitive.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..primitive.num_indices, 0, 0..model.instances.len() as u32);
    }
}

pub const MODEL_VBL: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, position) as wgpu::BufferAddress,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, normal) as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
    ],
};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Instance {
    pub model: Mat4,
    pub normal: Mat4,
    pub color: Vec4,
}

impl Instance {
    pub fn descriptor() -> wgpu::VertexBufferLayout<'static> {
        const MAT4_COLUMN: u64 = size_of::<[f32; 4]>() as u64;

        wgpu::VertexBufferLayout {
            array_stride: size_of::<Instance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // Model matrix columns
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: MAT4_COLUMN,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: MAT4_COLUMN * 2,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: MAT4_COLUMN * 3,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // Normal matrix columns
                wgpu::VertexAttribute {
                    offset: MAT4_COLUMN * 4,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: MAT4_COLUMN * 5,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: MAT4_COLUMN * 6,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: MAT4_COLUMN * 7,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: MAT4_COLUMN * 8,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_matches_the_struct() {
        assert_eq!(MODEL_VBL.array_stride, 24);
        assert_eq!(MODEL_VBL.attributes[0].offset, 0);
        assert_eq!(MODEL_VBL.attributes[1].offset, 12);
    }

    #[test]
    fn instance_attributes_cover_the_whole_stride() {
        let layout = Instance::descriptor();
        assert_eq!(layout.array_stride, 144);
        assert_eq!(layout.attributes.len(), 9);

        let last = layout.attributes.last().unwrap();
        assert_eq!(last.offset + 16, layout.array_stride);
        assert_eq!(last.shader_location, 10);
    }
}
