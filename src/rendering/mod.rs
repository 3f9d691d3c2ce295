pub mod common;
pub mod imgui_renderer;
pub mod instance;
pub mod passes;
pub mod renderer;
pub mod shader_loader;
pub mod texture;
