use imgui::{Condition, TreeNodeFlags, Ui};

use crate::palette::swatch_labels;
use crate::settings::{MAX_SCALE, MIN_SCALE};
use crate::viewer::Viewer;

/// Builds the three panels: part colors on the left, model controls at the
/// bottom and the light panel in the corner. The color and model panels
/// only appear once the model has loaded, the light panel is always up.
pub fn draw(ui: &Ui, viewer: &mut Viewer) {
    let display_size = ui.io().display_size;

    draw_light_panel(ui, viewer);

    if viewer.controls.is_some() {
        draw_color_panel(ui, viewer, display_size);
        draw_model_panel(ui, viewer, display_size);
    }
}

fn draw_color_panel(ui: &Ui, viewer: &mut Viewer, display_size: [f32; 2]) {
    let labels = swatch_labels();
    let mut changed_groups = Vec::new();

    ui.window("Colors")
        .position([0.0, display_size[1] * 0.3], Condition::FirstUseEver)
        .size([230.0, 0.0], Condition::FirstUseEver)
        .build(|| {
            let Some(controls) = &mut viewer.controls else {
                return;
            };

            for (index, group) in controls.groups.iter_mut().enumerate() {
                let _id = ui.push_id_usize(index);

                if ui.collapsing_header(group.label, TreeNodeFlags::DEFAULT_OPEN) {
                    if ui.combo_simple_string("##color", &mut group.selected, &labels) {
                        changed_groups.push(index);
                    }
                }
            }
        });

    for index in changed_groups {
        viewer.apply_color(index);
    }
}

fn draw_model_panel(ui: &Ui, viewer: &mut Viewer, display_size: [f32; 2]) {
    let mut toggle = false;

    ui.window("Model")
        .position(
            [display_size[0] * 0.47, display_size[1] * 0.9],
            Condition::FirstUseEver,
        )
        .size([240.0, 0.0], Condition::FirstUseEver)
        .build(|| {
            ui.slider("##scale", MIN_SCALE, MAX_SCALE, &mut viewer.settings.scale);

            let label = if viewer.settings.rotating {
                "Stop rotation"
            } else {
                "Rotate"
            };
            if ui.button(label) {
                toggle = true;
            }
        });

    if toggle {
        viewer.toggle_rotation();
    }
}

fn draw_light_panel(ui: &Ui, viewer: &mut Viewer) {
    ui.window("Settings")
        .position([10.0, 10.0], Condition::FirstUseEver)
        .size([250.0, 0.0], Condition::FirstUseEver)
        .build(|| {
            if ui.collapsing_header("LIGHT", TreeNodeFlags::DEFAULT_OPEN) {
                let light = &mut viewer.light;

                ui.slider("X", -10.0, 10.0, &mut light.position.x);
                ui.slider("Y", -10.0, 10.0, &mut light.position.y);
                ui.slider("Z", -10.0, 10.0, &mut light.position.z);
                ui.slider("%", 0.0, 2.0, &mut light.intensity);
                ui.color_edit3("Color", &mut light.color);
                ui.checkbox("Shadows", &mut light.cast_shadows);
            }
        });
}
