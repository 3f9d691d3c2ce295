use glam::{Mat4, Vec3, Vec4};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

/// The viewport camera. The eye sits close to the shoe; the slight
/// vertical offset was tuned by hand against the model.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.05, 0.4),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_deg: 75.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Recomputes the aspect ratio from the window size. Runs on every
    /// resize event, repeated identical sizes included. Zero-sized updates
    /// from a minimized window are ignored.
    pub fn set_aspect(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.aspect = size.width as f32 / size.height as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_proj: Mat4,
    // The skybox pass unprojects NDC directions through this.
    inv_view_proj: Mat4,
    eye: Vec4,
}

impl CameraUniform {
    pub fn new(camera: &Camera) -> Self {
        let view_proj = camera.view_proj();
        Self {
            view_proj,
            inv_view_proj: view_proj.inverse(),
            eye: camera.eye.extend(1.0),
        }
    }

    pub fn update(&mut self, camera: &Camera) {
        *self = Self::new(camera);
    }

    pub fn create_buffer(&self, device: &wgpu::Device) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Uniform Buffer"),
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
    fn aspect_tracks_the_window_exactly() {
        let mut camera = Camera::new();
        camera.set_aspect(PhysicalSize::new(1920, 1080));
        assert_eq!(camera.aspect, 1920.0 / 1080.0);
        camera.set_aspect(PhysicalSize::new(640, 480));
        assert_eq!(camera.aspect, 640.0 / 480.0);
    }

    #[test]
    fn repeated_identical_resizes_are_harmless() {
        let mut camera = Camera::new();
        for _ in 0..3 {
            camera.set_aspect(PhysicalSize::new(800, 600));
            assert_eq!(camera.aspect, 800.0 / 600.0);
        }
    }

    #[test]
    fn minimized_sizes_keep_the_last_aspect() {
        let mut camera = Camera::new();
        camera.set_aspect(PhysicalSize::new(800, 600));

        for size in [
            PhysicalSize::new(0, 0),
            PhysicalSize::new(0, 600),
            PhysicalSize::new(800, 0),
        ] {
            camera.set_aspect(size);
            assert_eq!(camera.aspect, 800.0 / 600.0);
        }
    }

    #[test]
    fn projection_uses_the_75_degree_fov() {
        let mut camera = Camera::new();
        camera.aspect = 1.0;
        let proj = camera.projection_matrix();
        let expected = 1.0 / (75.0f32.to_radians() / 2.0).tan();
        assert!((proj.y_axis.y - expected).abs() < 1e-5);
    }

    #[test]
    fn uniform_inverse_round_trips() {
        let camera = Camera::new();
        let uniform = CameraUniform::new(&camera);
        let round_trip = uniform.view_proj * uniform.inv_view_proj;
        for (a, b) in round_trip
            .to_cols_array()
            .iter()
            .zip(Mat4::IDENTITY.to_cols_array().iter())
        {
            assert!((a - b).abs() < 1e-4);
        }
    }
}
