use glam::{Mat4, Vec4};
use id_arena::Id;

use crate::scene_graph::scene_model::SceneModelId;
use crate::scene_graph::transform::Transform;

pub type ObjectId = Id<Object3D>;

pub struct Object3D {
    pub name: String,
    pub transform: Transform,
    pub model_id: Option<SceneModelId>,
    /// Base color the object's mesh is drawn with. Starts at the glTF
    /// material color and is overwritten by the color panels.
    pub color: Vec4,
    pub parent_id: Option<ObjectId>,
    pub child_ids: Vec<ObjectId>,
    pub world_matrix: Mat4,
    pub normal_matrix: Mat4,
}

impl Object3D {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Default for Object3D {
    fn default() -> Self {
        Self {
            name: String::new(),
            transform: Transform::IDENTITY,
            model_id: None,
            color: Vec4::ONE,
            parent_id: None,
            child_ids: Vec::new(),
            world_matrix: Mat4::IDENTITY,
            normal_matrix: Mat4::IDENTITY,
        }
    }
}
