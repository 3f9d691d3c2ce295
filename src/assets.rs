use std::{
    path::{Path, PathBuf},
    sync::mpsc::{self, channel},
    thread,
};

use anyhow::Context;
use log::{error, warn};

use crate::config::ViewerConfig;

/// Cubemap face files in wgpu array-layer order (+X -X +Y -Y +Z -Z).
pub const CUBEMAP_FACE_FILES: [&'static str; 6] =
    ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"];

/// Parsed glTF, ready to be spawned into the scene on the main thread.
pub struct LoadedModel {
    pub document: gltf::Document,
    pub buffers: Vec<gltf::buffer::Data>,
}

/// Decoded cubemap: six square RGBA8 faces concatenated in layer order.
pub struct CubemapFaces {
    pub size: u32,
    pub texels: Vec<u8>,
}

pub enum AssetEvent {
    Model(LoadedModel),
    Cubemap(CubemapFaces),
}

/// Loads the model and the environment cubemap on worker threads while the
/// window is already up. Results arrive through [`AssetLoader::poll`]; a
/// failed load is logged by the worker and the viewer keeps running
/// without that asset.
pub struct AssetLoader {
    receiver: mpsc::Receiver<AssetEvent>,
}

impl AssetLoader {
    pub fn spawn(config: &ViewerConfig) -> Self {
        let (sender, receiver) = channel();

        let model_path = config.model_path.clone();
        let model_sender = sender.clone();
        thread::spawn(move || match load_model(&model_path) {
            Ok(model) => {
                let _ = model_sender.send(AssetEvent::Model(model));
            }
            Err(error) => error!("Failed to load {}: {:#}", model_path.display(), error),
        });

        let cubemap_dir = config.cubemap_dir.clone();
        thread::spawn(move || match load_cubemap(&cubemap_dir) {
            Ok(faces) => {
                let _ = sender.send(AssetEvent::Cubemap(faces));
            }
            Err(error) => warn!(
                "Failed to load cubemap from {}: {:#}",
                cubemap_dir.display(),
                error
            ),
        });

        Self { receiver }
    }

    /// Returns the next finished asset, if any. Called once per frame.
    pub fn poll(&self) -> Option<AssetEvent> {
        self.receiver.try_recv().ok()
    }
}

fn load_model(path: &PathBuf) -> anyhow::Result<LoadedModel> {
    let (document, buffers, _images) = gltf::import(path).context("Failed to import glTF")?;
    Ok(LoadedModel { document, buffers })
}

fn load_cubemap(dir: &Path) -> anyhow::Result<CubemapFaces> {
    let mut texels = Vec::new();
    let mut size: Option<u32> = None;

    for file in CUBEMAP_FACE_FILES {
        let path = dir.join(file);
        let face = image::open(&path)
            .with_context(|| format!("Failed to read cubemap face {}", path.display()))?
            .to_rgba8();
        let (width, height) = face.dimensions();

        if width != height {
            return Err(anyhow::anyhow!(
                "Cubemap face {} is {}x{}, expected a square image",
                file,
                width,
                height
            ));
        }

        match size {
            None => size = Some(width),
            Some(expected) if expected != width => {
                return Err(anyhow::anyhow!(
                    "Cubemap face {} is {}x{}, expected {}x{}",
                    file,
                    width,
                    height,
                    expected,
                    expected
                ));
            }
            Some(_) => {}
        }

        texels.extend_from_slice(face.as_raw());
    }

    Ok(CubemapFaces {
        size: size.context("Cubemap directory has no faces")?,
        texels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_files_follow_wgpu_layer_order() {
        assert_eq!(
            CUBEMAP_FACE_FILES,
            ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"]
        );
    }

    #[test]
    fn missing_model_reports_an_error() {
        let result = load_model(&PathBuf::from("does/not/exist.glb"));
        assert!(result.is_err());
    }

    #[test]
    fn missing_cubemap_reports_an_error() {
        let result = load_cubemap(Path::new("does/not/exist"));
        assert!(result.is_err());
    }
}
