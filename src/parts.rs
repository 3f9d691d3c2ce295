use std::collections::HashMap;

use crate::palette::{swatch_color, DEFAULT_SWATCH};
use crate::scene_graph::object3d::ObjectId;
use crate::scene_graph::scene::Scene;

/// Node names the configurator knows how to recolor, in panel order.
pub const PART_NAMES: [&'static str; 8] = [
    "shoe",
    "inside",
    "laces",
    "outside_1",
    "outside_2",
    "outside_3",
    "sole_bottom",
    "sole_top",
];

/// Display labels, index-aligned with [`PART_NAMES`]. The two outer halves
/// deliberately share one label; they are presented as a single panel.
pub const PART_LABELS: [&'static str; 8] = [
    "SHOE",
    "INSIDE",
    "LACES",
    "OUTSIDE 1",
    "OUTSIDE 2",
    "OUTSIDE 2",
    "SOLE 1",
    "SOLE 2",
];

const OUTSIDE_HALVES: [&'static str; 2] = ["outside_2", "outside_3"];

/// Recolorable scene objects, looked up by their glTF node names.
pub struct PartMap {
    parts: HashMap<&'static str, ObjectId>,
}

impl PartMap {
    /// Walks the subtree under `root` once and records every mesh-bearing
    /// object whose name is on the part list. A later node with a name
    /// already recorded replaces the earlier one.
    pub fn locate(scene: &Scene, root: ObjectId) -> Self {
        let mut parts = HashMap::new();
        let mut pending = vec![root];

        while let Some(id) = pending.pop() {
            let Some(object) = scene.get_object(id) else {
                continue;
            };
            pending.extend(object.child_ids.iter().copied());

            if object.model_id.is_none() {
                continue;
            }

            if let Some(name) = PART_NAMES.iter().find(|&&name| name == object.name) {
                parts.insert(*name, id);
            }
        }

        Self { parts }
    }

    pub fn get(&self, name: &str) -> Option<ObjectId> {
        self.parts.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }
}

/// One color panel: a label, the parts it recolors and the palette entry
/// its selector currently shows.
pub struct ColorGroup {
    pub label: &'static str,
    targets: Vec<&'static str>,
    pub selected: usize,
}

/// The color panel set, in display order. Built once per loaded model.
pub struct ColorControls {
    pub groups: Vec<ColorGroup>,
}

impl ColorControls {
    /// Builds the panels for the parts that were found, and returns the
    /// part names the model turned out not to have so the caller can
    /// report them. The outer-half pair always gets its combined panel,
    /// even when both halves are missing; every other panel exists only
    /// for a located part. Selectors start on the default swatch without
    /// writing it to the scene, so the model keeps its material colors
    /// until the user picks something.
    pub fn build(parts: &PartMap) -> (Self, Vec<&'static str>) {
        let missing = PART_NAMES
            .into_iter()
            .filter(|name| parts.get(name).is_none())
            .collect();

        let mut groups = Vec::new();

        if parts.get("outside_1").is_some() {
            groups.push(ColorGroup {
                label: "OUTSIDE 1",
                targets: vec!["outside_1"],
                selected: DEFAULT_SWATCH,
            });
        }

        groups.push(ColorGroup {
            label: "OUTSIDE 2",
            targets: OUTSIDE_HALVES.to_vec(),
            selected: DEFAULT_SWATCH,
        });

        for (name, label) in PART_NAMES.into_iter().zip(PART_LABELS) {
            if name.starts_with("outside_") {
                continue;
            }

            if parts.get(name).is_some() {
                groups.push(ColorGroup {
                    label,
                    targets: vec![name],
                    selected: DEFAULT_SWATCH,
                });
            }
        }

        (Self { groups }, missing)
    }

    /// Writes a group's selected palette color to every target it has in
    /// the scene. Targets missing from the model are skipped, so the
    /// combined outer panel recolors whichever halves exist.
    pub fn apply(&self, group_index: usize, parts: &PartMap, scene: &mut Scene) {
        let Some(group) = self.groups.get(group_index) else {
            return;
        };

        let color = swatch_color(group.selected).extend(1.0);

        for target in &group.targets {
            if let Some(id) = parts.get(target) {
                if let Some(object) = scene.get_object_mut(id) {
                    object.color = color;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;
    use crate::model::Model;
    use crate::palette::{swatch_labels, PALETTE};
    use crate::scene_graph::object3d::Object3D;
    use crate::scene_graph::scene_model::SceneModel;

    fn renderable(scene: &mut Scene, name: &str) -> ObjectId {
        let model_id = scene.add_model(SceneModel::new(Model {
            name: name.to_string(),
            primitives: Vec::new(),
            base_color: Vec4::ONE,
        }));
        let mut object = Object3D::named(name);
        object.model_id = Some(model_id);
        scene.add_object(object)
    }

    fn scene_with(names: &[&str]) -> (Scene, ObjectId) {
        let mut scene = Scene::new();
        let root = scene.add_object(Object3D::named("root"));
        for name in names {
            let id = renderable(&mut scene, name);
            scene.set_object_parent(id, Some(root));
        }
        (scene, root)
    }

    fn labels(controls: &ColorControls) -> Vec<&'static str> {
        controls.groups.iter().map(|group| group.label).collect()
    }

    #[test]
    fn locate_keeps_only_listed_names() {
        let (scene, root) = scene_with(&["laces", "tongue", "sole_top"]);
        let parts = PartMap::locate(&scene, root);

        assert_eq!(parts.len(), 2);
        assert!(parts.get("laces").is_some());
        assert!(parts.get("sole_top").is_some());
        assert!(parts.get("tongue").is_none());
    }

    #[test]
    fn locate_ignores_nodes_without_meshes() {
        let (mut scene, root) = scene_with(&["shoe"]);
        let group = scene.add_object(Object3D::named("laces"));
        scene.set_object_parent(group, Some(root));

        let parts = PartMap::locate(&scene, root);

        assert_eq!(parts.len(), 1);
        assert!(parts.get("laces").is_none());
    }

    #[test]
    fn locate_ignores_objects_outside_the_subtree() {
        let (mut scene, root) = scene_with(&["shoe"]);
        // A well-named mesh that is not part of the loaded model.
        renderable(&mut scene, "laces");

        let parts = PartMap::locate(&scene, root);

        assert_eq!(parts.len(), 1);
        assert!(parts.get("laces").is_none());
    }

    #[test]
    fn locate_collapses_duplicate_names_into_one_entry() {
        let (mut scene, root) = scene_with(&["laces"]);
        let twin = renderable(&mut scene, "laces");
        scene.set_object_parent(twin, Some(root));

        let parts = PartMap::locate(&scene, root);

        assert_eq!(parts.len(), 1);
        assert!(parts.get("laces").is_some());
    }

    #[test]
    fn full_model_maps_every_name_to_its_object() {
        let (scene, root) = scene_with(&PART_NAMES);
        let parts = PartMap::locate(&scene, root);

        assert_eq!(parts.len(), PART_NAMES.len());
        for name in PART_NAMES {
            let id = parts.get(name).unwrap();
            assert_eq!(scene.get_object(id).unwrap().name, name);
        }
    }

    #[test]
    fn full_model_builds_panels_in_display_order() {
        let (scene, root) = scene_with(&PART_NAMES);
        let parts = PartMap::locate(&scene, root);
        let (controls, missing) = ColorControls::build(&parts);

        assert!(missing.is_empty());
        assert_eq!(
            labels(&controls),
            vec![
                "OUTSIDE 1",
                "OUTSIDE 2",
                "SHOE",
                "INSIDE",
                "LACES",
                "SOLE 1",
                "SOLE 2"
            ]
        );
    }

    #[test]
    fn missing_outside_1_drops_its_panel_but_keeps_the_pair_panel() {
        let (scene, root) = scene_with(&["shoe", "outside_2"]);
        let parts = PartMap::locate(&scene, root);
        let (controls, missing) = ColorControls::build(&parts);

        assert_eq!(labels(&controls), vec!["OUTSIDE 2", "SHOE"]);
        assert_eq!(
            missing,
            vec!["inside", "laces", "outside_1", "outside_3", "sole_bottom", "sole_top"]
        );
    }

    #[test]
    fn empty_model_still_gets_the_pair_panel() {
        let (scene, root) = scene_with(&[]);
        let parts = PartMap::locate(&scene, root);
        let (controls, missing) = ColorControls::build(&parts);

        assert_eq!(labels(&controls), vec!["OUTSIDE 2"]);
        assert_eq!(missing, PART_NAMES.to_vec());
    }

    #[test]
    fn outer_halves_share_a_label_with_the_pair_panel() {
        assert_eq!(PART_LABELS[4], "OUTSIDE 2");
        assert_eq!(PART_LABELS[5], "OUTSIDE 2");
    }

    #[test]
    fn building_panels_does_not_touch_scene_colors() {
        let (mut scene, root) = scene_with(&PART_NAMES);
        let gltf_color = Vec4::new(0.1, 0.2, 0.3, 1.0);
        for (_, object) in scene.objects.iter_mut() {
            object.color = gltf_color;
        }

        let parts = PartMap::locate(&scene, root);
        let (controls, _) = ColorControls::build(&parts);

        assert!(controls
            .groups
            .iter()
            .all(|group| swatch_labels()[group.selected] == "White"));
        assert!(scene.objects.iter().all(|(_, obj)| obj.color == gltf_color));
    }

    #[test]
    fn applying_a_group_recolors_only_its_target() {
        let (mut scene, root) = scene_with(&PART_NAMES);
        let parts = PartMap::locate(&scene, root);
        let (mut controls, _) = ColorControls::build(&parts);

        // Group 2 is SHOE on a full model; pick Red.
        controls.groups[2].selected = 0;
        controls.apply(2, &parts, &mut scene);

        let shoe = parts.get("shoe").unwrap();
        let expected = swatch_color(0).extend(1.0);
        assert_eq!(scene.get_object(shoe).unwrap().color, expected);

        let laces = parts.get("laces").unwrap();
        assert_eq!(scene.get_object(laces).unwrap().color, Vec4::ONE);
    }

    #[test]
    fn pair_panel_recolors_both_halves() {
        let (mut scene, root) = scene_with(&PART_NAMES);
        let parts = PartMap::locate(&scene, root);
        let (mut controls, _) = ColorControls::build(&parts);

        controls.groups[1].selected = 2;
        controls.apply(1, &parts, &mut scene);

        let expected = swatch_color(2).extend(1.0);
        for name in ["outside_2", "outside_3"] {
            let id = parts.get(name).unwrap();
            assert_eq!(scene.get_object(id).unwrap().color, expected);
        }
    }

    #[test]
    fn pair_panel_tolerates_a_missing_half() {
        let (mut scene, root) = scene_with(&["outside_2"]);
        let parts = PartMap::locate(&scene, root);
        let (mut controls, _) = ColorControls::build(&parts);

        controls.groups[0].selected = 8;
        controls.apply(0, &parts, &mut scene);

        let id = parts.get("outside_2").unwrap();
        assert_eq!(
            scene.get_object(id).unwrap().color,
            swatch_color(8).extend(1.0)
        );
    }

    #[test]
    fn applying_an_out_of_range_group_is_a_no_op() {
        let (mut scene, root) = scene_with(&PART_NAMES);
        let parts = PartMap::locate(&scene, root);
        let (controls, _) = ColorControls::build(&parts);

        controls.apply(PALETTE.len() + 10, &parts, &mut scene);
    }
}
