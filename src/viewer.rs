use anyhow::Context;
use glam::Quat;
use log::{error, info, warn};

use crate::{
    assets::{AssetEvent, AssetLoader, LoadedModel},
    camera::Camera,
    config::ViewerConfig,
    lighting::DirectionalLight,
    parts::{ColorControls, PartMap, PART_NAMES},
    rendering::renderer::Renderer,
    scene_graph::object3d::{Object3D, ObjectId},
    scene_graph::scene::Scene,
    settings::ModelSettings,
};

/// Name of the wrapper object the glTF scene is spawned under. The spin
/// and scale controls drive this object's transform.
const MODEL_ROOT: &'static str = "shoe_root";

pub struct Viewer {
    pub config: ViewerConfig,
    pub camera: Camera,
    pub light: DirectionalLight,
    pub settings: ModelSettings,
    pub scene: Scene,
    pub root_id: Option<ObjectId>,
    pub parts: Option<PartMap>,
    pub controls: Option<ColorControls>,
    assets: AssetLoader,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        let assets = AssetLoader::spawn(&config);

        Self {
            config,
            camera: Camera::new(),
            light: DirectionalLight::default(),
            settings: ModelSettings::default(),
            scene: Scene::new(),
            root_id: None,
            parts: None,
            controls: None,
            assets,
        }
    }

    /// Per-frame update: installs finished assets, advances the spin and
    /// recomputes world matrices.
    pub fn update(&mut self, renderer: &mut Renderer) {
        while let Some(event) = self.assets.poll() {
            match event {
                AssetEvent::Model(model) => match self.install_model(model) {
                    Ok(()) => renderer.upload_scene_models(&mut self.scene),
                    Err(err) => error!("Failed to install model: {:#}", err),
                },
                AssetEvent::Cubemap(faces) => renderer.set_background_cubemap(&faces),
            }
        }

        self.advance_frame();
    }

    pub(crate) fn advance_frame(&mut self) {
        self.settings.tick();

        if let Some(root_id) = self.root_id {
            if let Some(root) = self.scene.get_object_mut(root_id) {
                root.transform.rotation = Quat::from_rotation_y(self.settings.yaw);
                root.transform.scale = self.settings.scale;
            }
        }

        self.scene.update_world_transforms();
    }

    fn install_model(&mut self, model: LoadedModel) -> anyhow::Result<()> {
        let document_scene = model
            .document
            .scenes()
            .next()
            .context("glTF file has no scenes")?;

        let root_id = self.scene.add_object(Object3D::named(MODEL_ROOT));
        self.scene
            .spawn_gltf_scene(&model.buffers, &document_scene, Some(root_id))?;

        let parts = PartMap::locate(&self.scene, root_id);
        let (controls, missing) = ColorControls::build(&parts);
        for name in missing {
            warn!("Object with name \"{}\" not found in the model", name);
        }

        info!(
            "Model loaded; {} of {} recolorable parts located",
            parts.len(),
            PART_NAMES.len()
        );

        self.controls = Some(controls);
        self.parts = Some(parts);
        self.root_id = Some(root_id);

        Ok(())
    }

    pub fn toggle_rotation(&mut self) {
        self.settings.toggle_rotation();
    }

    /// Pushes one color group's current selection into the scene.
    pub fn apply_color(&mut self, group_index: usize) {
        if let (Some(controls), Some(parts)) = (&self.controls, &self.parts) {
            controls.apply(group_index, parts, &mut self.scene);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::settings::{MAX_SCALE, MIN_SCALE, ROTATION_STEP};

    fn viewer_with_root() -> (Viewer, ObjectId) {
        let mut viewer = Viewer::new(ViewerConfig::default());
        let root_id = viewer.scene.add_object(Object3D::named(MODEL_ROOT));
        viewer.root_id = Some(root_id);
        (viewer, root_id)
    }

    #[test]
    fn spinning_root_accumulates_yaw() {
        let (mut viewer, root_id) = viewer_with_root();

        for _ in 0..3 {
            viewer.advance_frame();
        }

        assert!((viewer.settings.yaw - 3.0 * ROTATION_STEP).abs() < 1e-7);
        let rotation = viewer.scene.get_object(root_id).unwrap().transform.rotation;
        assert_eq!(rotation, Quat::from_rotation_y(viewer.settings.yaw));
    }

    #[test]
    fn paused_root_keeps_its_yaw() {
        let (mut viewer, root_id) = viewer_with_root();

        viewer.advance_frame();
        viewer.toggle_rotation();
        let paused = viewer.scene.get_object(root_id).unwrap().transform.rotation;

        for _ in 0..5 {
            viewer.advance_frame();
        }

        assert!((viewer.settings.yaw - ROTATION_STEP).abs() < 1e-7);
        let rotation = viewer.scene.get_object(root_id).unwrap().transform.rotation;
        assert_eq!(rotation, paused);
    }

    #[test]
    fn resuming_continues_from_the_paused_angle() {
        let (mut viewer, root_id) = viewer_with_root();

        viewer.advance_frame();
        viewer.toggle_rotation();
        viewer.advance_frame();
        viewer.toggle_rotation();
        viewer.advance_frame();

        assert!((viewer.settings.yaw - 2.0 * ROTATION_STEP).abs() < 1e-7);
        let rotation = viewer.scene.get_object(root_id).unwrap().transform.rotation;
        assert_eq!(rotation, Quat::from_rotation_y(viewer.settings.yaw));
    }

    #[test]
    fn panel_scale_reaches_the_root_world_matrix() {
        let (mut viewer, root_id) = viewer_with_root();

        viewer.settings.scale = 1.5;
        viewer.advance_frame();

        let world = viewer.scene.get_object(root_id).unwrap().world_matrix;
        let scaled = world.transform_vector3(Vec3::X);
        assert!((scaled.length() - 1.5).abs() < 1e-5);
    }

    #[test]
    fn scale_endpoints_store_exactly_in_either_order() {
        let (mut viewer, root_id) = viewer_with_root();

        for scale in [MIN_SCALE, MAX_SCALE, MIN_SCALE] {
            viewer.settings.scale = scale;
            viewer.advance_frame();
            let stored = viewer.scene.get_object(root_id).unwrap().transform.scale;
            assert_eq!(stored, scale);
        }
    }

    #[test]
    fn a_gltf_without_scenes_leaves_the_arena_empty() {
        let mut viewer = Viewer::new(ViewerConfig::default());
        let gltf = gltf::Gltf::from_slice(br#"{"asset":{"version":"2.0"}}"#).unwrap();
        let model = LoadedModel {
            document: gltf.document,
            buffers: Vec::new(),
        };

        assert!(viewer.install_model(model).is_err());
        assert_eq!(viewer.scene.objects.len(), 0);
        assert!(viewer.root_id.is_none());
    }
}
