use glam::{Mat4, Quat, Vec3};

/// Local translation-rotation-scale of a scene object. World matrices are
/// recomputed from these every frame; the scene is small enough that dirty
/// tracking would only add bookkeeping.
#[derive(Debug, Clone)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: 1.0,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation,
            self.translation,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_is_the_identity_matrix() {
        assert_eq!(Transform::IDENTITY.local_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn scale_applies_to_positions() {
        let transform = Transform {
            scale: 1.5,
            ..Transform::IDENTITY
        };
        let point = transform.local_matrix().transform_point3(Vec3::ONE);
        assert!((point - Vec3::splat(1.5)).length() < 1e-6);
    }

    #[test]
    fn translation_composes_after_scale() {
        let transform = Transform {
            translation: Vec3::new(1.0, 2.0, 3.0),
            scale: 0.5,
            ..Transform::IDENTITY
        };
        let point = transform.local_matrix().transform_point3(Vec3::ONE);
        assert!((point - Vec3::new(1.5, 2.5, 3.5)).length() < 1e-6);
    }
}
