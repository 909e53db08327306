//! # Rendering System
//!
//! Draws one static triangle through OpenGL 3.3 core.
//!
//! ## Architecture
//!
//! - **`gl`**: [`GraphicsApi`], the seam over the GL state machine, and
//!   [`NativeGl`], its implementation over the `gl` crate
//! - **`window`**: [`WindowBackend`] and the GLFW window owning the context
//! - **`shader`**: compiling and linking the program
//! - **`mesh`**: the triangle's vertex array and buffer
//! - **`renderer`**: [`TriangleRenderer`], owner of all of the above
//! - **`headless`**: display-free backends for unit tests (test builds only)
//!
//! GL objects are created once when the renderer is built and released
//! when it drops. The context must still be current at that point.

pub mod gl;
#[cfg(test)]
pub mod headless;
pub mod mesh;
pub mod renderer;
pub mod shader;
pub mod window;

pub use self::gl::{GraphicsApi, NativeGl};
pub use mesh::{TriangleMesh, TRIANGLE};
pub use renderer::TriangleRenderer;
pub use shader::{ShaderError, ShaderProgram, ShaderSources};
pub use window::{GlfwWindow, WindowBackend, WindowError, WindowEvent};
