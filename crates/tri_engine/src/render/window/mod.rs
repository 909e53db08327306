//! Window management subsystem
//!
//! The OS/windowing collaborator of the engine. Applications and the frame
//! loop talk to the [`WindowBackend`] trait; [`GlfwWindow`] is the production
//! implementation and the headless `HeadlessWindow` stands in for it in
//! unit tests.
//!
//! # Module Organization
//!
//! - **`backend`**: The trait and the events it reports
//! - **`glfw_window`**: GLFW window with a current OpenGL context

pub mod backend;
pub mod glfw_window;

pub use backend::{WindowBackend, WindowEvent};
pub use glfw_window::GlfwWindow;

use thiserror::Error;

/// Window management errors
///
/// Every variant is fatal: the engine cannot run without a window and a
/// loaded OpenGL context.
#[derive(Error, Debug)]
pub enum WindowError {
    /// The windowing library itself could not start
    #[error("GLFW initialization failed: {0}")]
    InitializationFailed(String),

    /// No window or no context matching the requested attributes
    #[error("Failed to create a {width}x{height} window \"{title}\" with an OpenGL {major}.{minor} context")]
    ContextCreation {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Requested title
        title: String,
        /// Requested major version
        major: u32,
        /// Requested minor version
        minor: u32,
    },

    /// OpenGL function pointers could not be loaded
    #[error("Failed to load OpenGL function pointers: {0}")]
    Loader(String),
}

/// Result alias for window operations
pub type WindowResult<T> = Result<T, WindowError>;
