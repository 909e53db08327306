//! # Triangle Engine
//!
//! Opens an OpenGL 3.3 core window with GLFW and draws a single static
//! triangle every frame until the window is closed or Escape is pressed.
//!
//! ## Features
//!
//! - **Create-once resources**: the shader program, vertex array and buffer
//!   are built at startup, reused every frame and released on shutdown
//! - **Typed failures**: compile and link errors carry the driver's log and
//!   the caller decides whether they are fatal
//! - **Testable seams**: the window and the GL state machine sit behind
//!   traits, with headless implementations for unit tests
//! - **Configuration**: every setting has a default and can be loaded from
//!   TOML or RON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tri_engine::prelude::*;
//!
//! fn main() -> Result<(), EngineError> {
//!     tri_engine::foundation::logging::init();
//!     let engine = Engine::with_glfw(&EngineConfig::default())?;
//!     engine.run();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

// Core engine modules
pub mod config;
pub mod core;
pub mod foundation;
pub mod input;
pub mod render;

mod engine;

pub use crate::core::config::EngineConfig;
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{ContextConfig, RendererConfig, ShaderFailurePolicy, WindowConfig},
        config::Config,
        foundation::time::Timer,
        input::{InputState, KeyCode, KeyState},
        render::{
            GlfwWindow, GraphicsApi, NativeGl, ShaderError, ShaderProgram, ShaderSources,
            TriangleRenderer, WindowBackend, WindowError, WindowEvent,
        },
        Engine, EngineConfig, EngineError,
    };
}
