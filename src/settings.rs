/// Yaw advance per rendered frame while rotation is on. Deliberately tied
/// to the display refresh rate rather than wall-clock time.
pub const ROTATION_STEP: f32 = 0.005;

pub const MIN_SCALE: f32 = 0.5;
pub const MAX_SCALE: f32 = 1.5;

/// Whole-model transform state driven by the model panel and the render
/// loop: a uniform scale, the spin flag, and the accumulated yaw.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub scale: f32,
    pub rotating: bool,
    pub yaw: f32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            // The shoe spins until the user toggles it off.
            rotating: true,
            yaw: 0.0,
        }
    }
}

impl ModelSettings {
    pub fn toggle_rotation(&mut self) {
        self.rotating = !self.rotating;
    }

    /// Advances the yaw by one frame's worth of rotation while the spin
    /// is enabled.
    pub fn tick(&mut self) {
        if self.rotating {
            self.yaw += ROTATION_STEP;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_restores_the_flag() {
        let mut settings = ModelSettings::default();
        let initial = settings.rotating;
        settings.toggle_rotation();
        assert_eq!(settings.rotating, !initial);
        settings.toggle_rotation();
        assert_eq!(settings.rotating, initial);
    }

    #[test]
    fn disabled_ticks_never_move_the_yaw() {
        let mut settings = ModelSettings::default();
        settings.rotating = false;
        let yaw = settings.yaw;
        for _ in 0..100 {
            settings.tick();
        }
        assert_eq!(settings.yaw, yaw);
    }

    #[test]
    fn each_enabled_tick_advances_by_the_fixed_step() {
        let mut settings = ModelSettings::default();
        settings.rotating = true;
        settings.tick();
        assert!((settings.yaw - ROTATION_STEP).abs() < 1e-7);
        settings.tick();
        assert!((settings.yaw - 2.0 * ROTATION_STEP).abs() < 1e-7);
    }

    #[test]
    fn defaults_match_the_panel() {
        let settings = ModelSettings::default();
        assert_eq!(settings.scale, 1.0);
        assert!(settings.rotating);
        assert_eq!(settings.yaw, 0.0);
    }
}
