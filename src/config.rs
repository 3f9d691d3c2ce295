use std::path::PathBuf;

/// Fixed viewer configuration. There is no CLI or environment surface;
/// everything the viewer opens or sizes comes from these defaults.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub window_title: String,
    /// The single model asset loaded at startup.
    pub model_path: PathBuf,
    /// Directory holding the six cubemap faces (px/nx/py/ny/pz/nz).
    pub cubemap_dir: PathBuf,
    /// Color target sample count; 1 disables multisampling.
    pub msaa_samples: u32,
    /// Square shadow map resolution.
    pub shadow_map_size: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: "cobbler".to_string(),
            model_path: PathBuf::from("assets/models/shoe.glb"),
            cubemap_dir: PathBuf::from("assets/textures/cubemap"),
            msaa_samples: 4,
            shadow_map_size: 2048,
        }
    }
}
