//! Triangle demo application
//!
//! Opens an 800x600 window and draws an orange triangle on a green
//! background until the window is closed or Escape is pressed.

use tri_engine::foundation::logging;
use tri_engine::{Engine, EngineConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    log::info!("Starting triangle demo");

    let engine = Engine::with_glfw(&EngineConfig::default()).map_err(|e| {
        log::error!("Failed to start: {e}");
        e
    })?;

    let frames = engine.run();
    log::info!("Exiting after {} frames", frames);
    Ok(())
}
