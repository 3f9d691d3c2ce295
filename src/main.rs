use anyhow::Result;

mod assets;
mod camera;
mod config;
mod lighting;
mod model;
mod palette;
mod parts;
mod rendering;
mod scene_graph;
mod settings;
mod ui;
mod viewer;
mod window;

fn main() -> Result<()> {
    pretty_env_logger::init();

    pollster::block_on(window::run())?;

    Ok(())
}
