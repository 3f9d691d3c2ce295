use glam::{Mat4, Vec3, Vec4};
use wgpu::util::DeviceExt;

// Shadow frustum extents. The shoe fits well inside a one-unit half-extent
// even at the maximum panel scale; the far plane covers the whole slider
// range of light positions.
const SHADOW_HALF_EXTENT: f32 = 1.0;
const SHADOW_NEAR: f32 = 0.1;
const SHADOW_FAR: f32 = 40.0;

/// The single directional light, aimed at the origin. All fields are
/// live-edited from the settings panel.
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub intensity: f32,
    pub color: [f32; 3],
    pub cast_shadows: bool,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(5.0, 5.0, 5.0),
            intensity: 1.0,
            color: [1.0, 1.0, 1.0],
            cast_shadows: true,
        }
    }
}

impl DirectionalLight {
    /// Direction the light shines in: from its position toward the origin.
    /// Degenerates to straight down if the panel parks the light on the
    /// target.
    pub fn direction(&self) -> Vec3 {
        (-self.position).try_normalize().unwrap_or(Vec3::NEG_Y)
    }

    /// World-to-light-clip matrix for the shadow pass: a view along the
    /// light direction with an orthographic frustum around the shoe. Goes
    /// through [`Self::direction`] so a light parked on the target still
    /// yields a usable matrix.
    pub fn view_proj(&self) -> Mat4 {
        let dir = self.direction();
        let up = if dir.y.abs() > 0.99 { Vec3::Z } else { Vec3::Y };
        let view = Mat4::look_to_rh(self.position, dir, up);
        let projection = Mat4::orthographic_rh(
            -SHADOW_HALF_EXTENT,
            SHADOW_HALF_EXTENT,
            -SHADOW_HALF_EXTENT,
            SHADOW_HALF_EXTENT,
            SHADOW_NEAR,
            SHADOW_FAR,
        );
        projection * view
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    view_proj: Mat4,
    direction: Vec4,
    /// rgb = color, w = intensity.
    color: Vec4,
}

impl LightUniform {
    pub fn new(light: &DirectionalLight) -> Self {
        Self {
            view_proj: light.view_proj(),
            direction: light.direction().extend(0.0),
            color: Vec4::new(light.color[0], light.color[1], light.color[2], light.intensity),
        }
    }

    pub fn update(&mut self, light: &DirectionalLight) {
        *self = Self::new(light);
    }

    pub fn create_buffer(&self, device: &wgpu::Device) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Uniform Buffer"),
            contents: bytemuck::cast_slice(&[*self]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    pub fn update_buffer(&self, queue: &wgpu::Queue, buffer: &wgpu::Buffer) {
        queue.write_buffer(buffer, 0, bytemuck::cast_slice(&[*self]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_points_at_the_origin() {
        let light = DirectionalLight::default();
        let dir = light.direction();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        // From (5,5,5) toward the origin every component is negative.
        assert!(dir.x < 0.0 && dir.y < 0.0 && dir.z < 0.0);
    }

    #[test]
    fn direction_survives_a_light_parked_on_the_target() {
        let light = DirectionalLight {
            position: Vec3::ZERO,
            ..Default::default()
        };
        let dir = light.direction();
        assert!(dir.is_finite());
        assert!((dir.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn shadow_matrix_is_finite() {
        let light = DirectionalLight::default();
        for value in light.view_proj().to_cols_array() {
            assert!(value.is_finite());
        }
    }

    #[test]
    fn shadow_matrix_handles_a_vertical_light() {
        let light = DirectionalLight {
            position: Vec3::new(0.0, 8.0, 0.0),
            ..Default::default()
        };
        for value in light.view_proj().to_cols_array() {
            assert!(value.is_finite());
        }
    }

    #[test]
    fn shadow_matrix_survives_a_light_parked_on_the_target() {
        let light = DirectionalLight {
            position: Vec3::ZERO,
            ..Default::default()
        };
        for value in light.view_proj().to_cols_array() {
            assert!(value.is_finite());
        }
    }

    #[test]
    fn default_rig_matches_the_panel() {
        let light = DirectionalLight::default();
        assert_eq!(light.position, Vec3::new(5.0, 5.0, 5.0));
        assert_eq!(light.intensity, 1.0);
        assert_eq!(light.color, [1.0, 1.0, 1.0]);
        assert!(light.cast_shadows);
    }

    #[test]
    fn uniform_packs_color_and_intensity() {
        let light = DirectionalLight {
            intensity: 1.5,
            color: [0.2, 0.4, 0.6],
            ..Default::default()
        };
        let uniform = LightUniform::new(&light);
        assert_eq!(uniform.color, Vec4::new(0.2, 0.4, 0.6, 1.5));
    }
}
