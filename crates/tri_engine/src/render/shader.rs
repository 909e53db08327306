//! Shader compilation and program linking
//!
//! Compiles the vertex and fragment stages independently, links them into a
//! single program and deletes the intermediate stage objects. Failures are
//! returned as [`ShaderError`] carrying the driver's diagnostic text (at most
//! [`INFO_LOG_CAPACITY`] bytes); whether that is fatal is the caller's call.

use std::ffi::{CString, NulError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::gl::{GraphicsApi, ProgramHandle, ShaderHandle, ShaderStage, INFO_LOG_CAPACITY};

/// Pass-through vertex shader: attribute 0 is the clip-space position
pub const VERTEX_SHADER_SOURCE: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
void main()
{
   gl_Position = vec4(aPos.x, aPos.y, aPos.z, 1.0);
}
";

/// Solid orange fragment shader
pub const FRAGMENT_SHADER_SOURCE: &str = "#version 330 core
out vec4 FragColor;
void main()
{
   FragColor = vec4(1.0f, 0.5f, 0.2f, 1.0f);
}
";

/// Shader errors
#[derive(Error, Debug)]
pub enum ShaderError {
    /// A stage failed to compile
    #[error("{stage} shader compilation failed: {log}")]
    Compilation {
        /// Stage that failed
        stage: ShaderStage,
        /// Compiler info log
        log: String,
    },

    /// The program failed to link
    #[error("shader program linking failed: {log}")]
    Linking {
        /// Linker info log
        log: String,
    },

    /// Source text contained an interior NUL byte
    #[error("shader source contains a NUL byte: {0}")]
    InvalidSource(#[from] NulError),
}

impl ShaderError {
    /// Driver diagnostic text, if the driver produced the error
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Compilation { log, .. } | Self::Linking { log } => Some(log),
            Self::InvalidSource(_) => None,
        }
    }
}

/// GLSL source text for both stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderSources {
    /// Vertex stage source
    pub vertex: String,
    /// Fragment stage source
    pub fragment: String,
}

impl ShaderSources {
    /// Create from custom sources
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self::new(VERTEX_SHADER_SOURCE, FRAGMENT_SHADER_SOURCE)
    }
}

/// Compile a single stage
///
/// On failure the stage object is deleted before the error is returned.
///
/// # Errors
/// [`ShaderError::Compilation`] with the compiler log, or
/// [`ShaderError::InvalidSource`] if `source` contains a NUL byte.
pub fn compile_stage<G: GraphicsApi + ?Sized>(
    gl: &mut G,
    stage: ShaderStage,
    source: &str,
) -> Result<ShaderHandle, ShaderError> {
    let source = CString::new(source)?;

    let shader = gl.create_shader(stage);
    gl.shader_source(shader, &source);
    gl.compile_shader(shader);

    if !gl.shader_compiled(shader) {
        let log = gl.shader_info_log(shader, INFO_LOG_CAPACITY);
        gl.delete_shader(shader);
        return Err(ShaderError::Compilation { stage, log });
    }

    log::debug!("Compiled {} shader {:?}", stage, shader);
    Ok(shader)
}

/// Linked vertex + fragment program
///
/// A plain handle: the owner (normally [`crate::render::TriangleRenderer`])
/// deletes it through [`ShaderProgram::release`] while the context is still
/// current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderProgram {
    handle: ProgramHandle,
}

impl ShaderProgram {
    /// Compile both stages and link them
    ///
    /// Stage objects are deleted once linking has been attempted, whatever
    /// the outcome. A program that fails to link is deleted as well, so an
    /// `Err` never leaks GL objects.
    ///
    /// # Errors
    /// The first [`ShaderError`] encountered, in stage order.
    pub fn build<G: GraphicsApi + ?Sized>(
        gl: &mut G,
        sources: &ShaderSources,
    ) -> Result<Self, ShaderError> {
        let vertex = compile_stage(gl, ShaderStage::Vertex, &sources.vertex)?;
        let fragment = match compile_stage(gl, ShaderStage::Fragment, &sources.fragment) {
            Ok(fragment) => fragment,
            Err(e) => {
                gl.delete_shader(vertex);
                return Err(e);
            }
        };

        let program = gl.create_program();
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);

        gl.delete_shader(vertex);
        gl.delete_shader(fragment);

        if !gl.program_linked(program) {
            let log = gl.program_info_log(program, INFO_LOG_CAPACITY);
            gl.delete_program(program);
            return Err(ShaderError::Linking { log });
        }

        log::info!("Linked shader program {:?}", program);
        Ok(Self { handle: program })
    }

    /// Placeholder used when a failed build is tolerated
    pub fn invalid() -> Self {
        Self { handle: ProgramHandle::NONE }
    }

    /// Underlying program handle
    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    /// Whether the program linked successfully
    pub fn is_valid(&self) -> bool {
        self.handle.is_valid()
    }

    /// Make this the current program
    pub fn bind<G: GraphicsApi + ?Sized>(&self, gl: &mut G) {
        gl.use_program(self.handle);
    }

    /// Delete the program object
    pub fn release<G: GraphicsApi + ?Sized>(self, gl: &mut G) {
        if self.is_valid() {
            gl.delete_program(self.handle);
        }
    }
}
