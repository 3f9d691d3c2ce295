use std::collections::HashMap;

use anyhow::Context;
use glam::{Mat4, Quat};
use id_arena::Arena;

use crate::model::{Buffers, Model};
use crate::scene_graph::object3d::{Object3D, ObjectId};
use crate::scene_graph::scene_model::{SceneModel, SceneModelId};

pub struct Scene {
    pub objects: Arena<Object3D>,
    pub models: Arena<SceneModel>,
    gltf_mesh_to_model: HashMap<usize, SceneModelId>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            models: Arena::new(),
            gltf_mesh_to_model: HashMap::new(),
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_object_mut(&mut self, id: ObjectId) -> Option<&mut Object3D> {
        self.objects.get_mut(id)
    }

    pub fn add_model(&mut self, model: SceneModel) -> SceneModelId {
        self.models.alloc(model)
    }

    pub fn get_model(&self, id: SceneModelId) -> Option<&SceneModel> {
        self.models.get(id)
    }

    /// Spawns every node of a glTF scene, optionally under an existing
    /// parent object. Returns the id of the last root node spawned.
    pub fn spawn_gltf_scene(
        &mut self,
        buffers: Buffers,
        scene: &gltf::Scene,
        parent: Option<ObjectId>,
    ) -> anyhow::Result<Option<ObjectId>> {
        let mut last_object_id = None;

        for node in scene.nodes() {
            last_object_id = Some(self.spawn_gltf_node(buffers, &node, parent)?);
        }

        Ok(last_object_id)
    }

    fn spawn_gltf_node(
        &mut self,
        buffers: Buffers,
        node: &gltf::Node,
        parent: Option<ObjectId>,
    ) -> anyhow::Result<ObjectId> {
        let mut object = Object3D::default();
        let node_name = node.name().unwrap_or("Unnamed").to_string();
        object.name = node_name.clone();

        let (translation, rotation, scale) = node.transform().decomposed();
        object.transform.translation = translation.into();
        object.transform.rotation = Quat::from_array(rotation);
        // Assume uniform scale for simplicity
        object.transform.scale = scale[0];

        if let Some(mesh) = node.mesh() {
            let mesh_index = mesh.index();

            let model_id = match self.gltf_mesh_to_model.get(&mesh_index).copied() {
                Some(model_id) => model_id,
                None => {
                    let mesh_name = mesh
                        .name()
                        .map(String::from)
                        .unwrap_or_else(|| format!("{} (Mesh)", node_name));

                    let model = Model::from_gltf(mesh_name.clone(), mesh, buffers)
                        .with_context(|| format!("Failed to load mesh {}", mesh_name))?;
                    let model_id = self.add_model(SceneModel::new(model));
                    self.gltf_mesh_to_model.insert(mesh_index, model_id);

                    model_id
                }
            };

            if let Some(scene_model) = self.models.get(model_id) {
                object.color = scene_model.model.base_color;
            }
            object.model_id = Some(model_id);
        }

        let object_id = self.add_object(object);

        if let Some(parent_id) = parent {
            self.set_object_parent(object_id, Some(parent_id));
        }

        for child in node.children() {
            self.spawn_gltf_node(buffers, &child, Some(object_id))?;
        }

        Ok(object_id)
    }

    /// Sets the parent of an object and updates child relationships
    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        if let Some(child) = self.objects.get(child_id) {
            if let Some(old_parent_id) = child.parent_id {
                if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                    old_parent.child_ids.retain(|&id| id != child_id);
                }
            }
        }

        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;

            if let Some(new_parent_id) = new_parent_id {
                if let Some(new_parent) = self.objects.get_mut(new_parent_id) {
                    new_parent.child_ids.push(child_id);
                }
            }
        }
    }

    /// Recomputes world and normal matrices for every object, parents
    /// before children.
    pub fn update_world_transforms(&mut self) {
        let roots: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|(_, object)| object.parent_id.is_none())
            .map(|(id, _)| id)
            .collect();

        for root_id in roots {
            self.update_world_recursive(root_id, Mat4::IDENTITY);
        }
    }

    fn update_world_recursive(&mut self, object_id: ObjectId, parent_world: Mat4) {
        let world = match self.objects.get_mut(object_id) {
            Some(object) => {
                let world = parent_world * object.transform.local_matrix();
                object.world_matrix = world;
                object.normal_matrix = world.inverse().transpose();
                world
            }
            None => return,
        };

        let child_ids = self
            .objects
            .get(object_id)
            .map(|object| object.child_ids.clone())
            .unwrap_or_default();

        for child_id in child_ids {
            self.update_world_recursive(child_id, world);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::scene_graph::transform::Transform;

    fn child_of(scene: &mut Scene, parent: ObjectId, name: &str) -> ObjectId {
        let id = scene.add_object(Object3D::named(name));
        scene.set_object_parent(id, Some(parent));
        id
    }

    #[test]
    fn world_transforms_compose_down_the_hierarchy() {
        let mut scene = Scene::new();
        let root = scene.add_object(Object3D::named("root"));
        let child = child_of(&mut scene, root, "child");

        scene.get_object_mut(root).unwrap().transform =
            Transform::from_translation(Vec3::new(1.0, 0.0, 0.0));
        scene.get_object_mut(child).unwrap().transform =
            Transform::from_translation(Vec3::new(0.0, 2.0, 0.0));

        scene.update_world_transforms();

        let world = scene.get_object(child).unwrap().world_matrix;
        let origin = world.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn root_scale_reaches_every_descendant() {
        let mut scene = Scene::new();
        let root = scene.add_object(Object3D::named("root"));
        let inner = child_of(&mut scene, root, "inner");
        let leaf = child_of(&mut scene, inner, "leaf");

        scene.get_object_mut(leaf).unwrap().transform =
            Transform::from_translation(Vec3::new(1.0, 0.0, 0.0));

        for scale in [0.5, 1.5] {
            scene.get_object_mut(root).unwrap().transform.scale = scale;
            scene.update_world_transforms();

            let world = scene.get_object(leaf).unwrap().world_matrix;
            let origin = world.transform_point3(Vec3::ZERO);
            assert!((origin - Vec3::new(scale, 0.0, 0.0)).length() < 1e-6);
        }
    }

    #[test]
    fn rotation_on_the_root_spins_children_around_it() {
        let mut scene = Scene::new();
        let root = scene.add_object(Object3D::named("root"));
        let child = child_of(&mut scene, root, "child");

        scene.get_object_mut(child).unwrap().transform =
            Transform::from_translation(Vec3::new(1.0, 0.0, 0.0));
        scene.get_object_mut(root).unwrap().transform.rotation =
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);

        scene.update_world_transforms();

        let world = scene.get_object(child).unwrap().world_matrix;
        let origin = world.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn reparenting_updates_both_child_lists() {
        let mut scene = Scene::new();
        let first = scene.add_object(Object3D::named("first"));
        let second = scene.add_object(Object3D::named("second"));
        let child = child_of(&mut scene, first, "child");

        scene.set_object_parent(child, Some(second));

        assert!(scene.get_object(first).unwrap().child_ids.is_empty());
        assert_eq!(scene.get_object(second).unwrap().child_ids, vec![child]);
        assert_eq!(scene.get_object(child).unwrap().parent_id, Some(second));
    }
}
