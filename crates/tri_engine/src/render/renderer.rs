//! Triangle renderer
//!
//! Owns the graphics API together with the one program and one mesh it
//! draws. Everything is created in [`TriangleRenderer::new`], reused every
//! frame and deleted when the renderer is dropped, so the renderer must be
//! dropped while its context is still current.

use crate::core::config::{RendererConfig, ShaderFailurePolicy};
use crate::render::gl::GraphicsApi;
use crate::render::mesh::{TriangleMesh, TRIANGLE};
use crate::render::shader::{ShaderError, ShaderProgram};

/// Upper bound on errors drained per frame; `glGetError` can report the
/// same error forever once the context is lost.
const MAX_ERRORS_PER_FRAME: usize = 16;

/// Renders a single static triangle
pub struct TriangleRenderer<G: GraphicsApi> {
    gl: G,
    program: ShaderProgram,
    mesh: Option<TriangleMesh>,
    clear_color: [f32; 4],
    check_gl_errors: bool,
    viewport: (i32, i32, i32, i32),
    frames: u64,
}

impl<G: GraphicsApi> TriangleRenderer<G> {
    /// Build the program and upload the triangle
    ///
    /// Under [`ShaderFailurePolicy::Continue`] a failed build is logged and
    /// frames are rendered with the zero program.
    ///
    /// # Errors
    /// The [`ShaderError`] from compiling or linking, under
    /// [`ShaderFailurePolicy::Abort`]. It is not logged here; reporting it
    /// is up to the caller.
    pub fn new(mut gl: G, config: &RendererConfig) -> Result<Self, ShaderError> {
        let program = match ShaderProgram::build(&mut gl, &config.shaders) {
            Ok(program) => program,
            Err(e) => match config.shader_failure {
                ShaderFailurePolicy::Abort => return Err(e),
                ShaderFailurePolicy::Continue => {
                    log::error!("{e} (continuing without a shader program)");
                    ShaderProgram::invalid()
                }
            },
        };

        let mesh = TriangleMesh::upload(&mut gl, &TRIANGLE);

        Ok(Self {
            gl,
            program,
            mesh: Some(mesh),
            clear_color: config.clear_color,
            check_gl_errors: config.check_gl_errors,
            viewport: (0, 0, 0, 0),
            frames: 0,
        })
    }

    /// Clear the color buffer, then draw the triangle
    pub fn render_frame(&mut self) {
        self.gl.set_clear_color(self.clear_color);
        self.gl.clear_color_buffer();

        // An invalid program binds zero, which turns the draw into a no-op.
        if let Some(mesh) = &self.mesh {
            self.program.bind(&mut self.gl);
            mesh.bind(&mut self.gl);
            mesh.draw(&mut self.gl);
        }

        if self.check_gl_errors {
            for code in self.drain_errors() {
                log::warn!("GL error 0x{code:04X} in frame {}", self.frames);
            }
        }

        self.frames += 1;
    }

    /// Match the viewport to a new framebuffer size
    ///
    /// Negative sizes are clamped to zero; a minimized window reports 0x0.
    pub fn resize(&mut self, width: i32, height: i32) {
        let (width, height) = (width.max(0), height.max(0));
        self.gl.set_viewport(0, 0, width, height);
        self.viewport = (0, 0, width, height);
        log::debug!("Viewport set to {}x{}", width, height);
    }

    /// Pending GL errors, oldest first
    pub fn drain_errors(&mut self) -> Vec<u32> {
        std::iter::from_fn(|| self.gl.poll_error())
            .take(MAX_ERRORS_PER_FRAME)
            .collect()
    }

    /// Viewport as (x, y, width, height)
    pub fn viewport(&self) -> (i32, i32, i32, i32) {
        self.viewport
    }

    /// The program drawn with; invalid if the build failed
    pub fn program(&self) -> ShaderProgram {
        self.program
    }

    /// The uploaded mesh
    pub fn mesh(&self) -> Option<&TriangleMesh> {
        self.mesh.as_ref()
    }

    /// Frames rendered so far
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }
}

impl<G: GraphicsApi> Drop for TriangleRenderer<G> {
    fn drop(&mut self) {
        if let Some(mesh) = self.mesh.take() {
            mesh.release(&mut self.gl);
        }
        std::mem::replace(&mut self.program, ShaderProgram::invalid()).release(&mut self.gl);
        log::debug!("Released renderer resources after {} frames", self.frames);
    }
}
