//! Graphics-context abstraction
//!
//! OpenGL is a global state machine: the current program, the bound buffer
//! and the viewport are implicitly mutated by nearly every call. This module
//! names the exact subset of entry points the renderer needs as the
//! [`GraphicsApi`] trait so the call order can be driven (and verified) from
//! safe Rust.
//!
//! - [`NativeGl`] forwards to the driver through the `gl` crate.
//! - The headless `RecordingGl` records calls for unit tests.
//!
//! # Preconditions
//!
//! Every method assumes the context that created the objects is current on
//! the calling thread. Handles from one implementation must not be passed to
//! another.

pub mod native;

pub use native::{load_gl, NativeGl};

use std::ffi::CStr;

/// Maximum number of bytes read from a shader or program info log
pub const INFO_LOG_CAPACITY: usize = 512;

/// Compiled shader stage object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u32);

/// Linked program object
///
/// [`ProgramHandle::NONE`] is the zero name; using it unbinds any program and
/// turns draw calls into no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

impl ProgramHandle {
    /// The zero program
    pub const NONE: Self = Self(0);

    /// Whether this is a real program object
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Buffer object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

/// Vertex array object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub u32);

/// Programmable pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex stage
    Vertex,
    /// Fragment stage
    Fragment,
}

impl ShaderStage {
    /// Lowercase stage name for diagnostics
    pub fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Buffer usage hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Written once, drawn many times
    StaticDraw,
}

/// Component type of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    /// 32-bit float
    Float,
}

impl AttributeType {
    /// Size of one component in bytes
    pub fn size(self) -> usize {
        match self {
            Self::Float => std::mem::size_of::<f32>(),
        }
    }
}

/// Description of one vertex attribute inside the bound array buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Attribute slot (`layout (location = N)`)
    pub location: u32,
    /// Components per vertex (1-4)
    pub components: i32,
    /// Component type
    pub kind: AttributeType,
    /// Normalize fixed-point values
    pub normalized: bool,
    /// Bytes between consecutive vertices
    pub stride: i32,
    /// Byte offset of the first component
    pub offset: usize,
}

/// The OpenGL entry points used by the renderer
///
/// Method names follow the GL functions they wrap. Query methods take
/// `&self`; everything that mutates context state takes `&mut self`.
pub trait GraphicsApi {
    /// `glCreateShader`
    fn create_shader(&mut self, stage: ShaderStage) -> ShaderHandle;
    /// `glShaderSource` with a single NUL-terminated string
    fn shader_source(&mut self, shader: ShaderHandle, source: &CStr);
    /// `glCompileShader`
    fn compile_shader(&mut self, shader: ShaderHandle);
    /// `GL_COMPILE_STATUS`
    fn shader_compiled(&self, shader: ShaderHandle) -> bool;
    /// `glGetShaderInfoLog`, truncated to `capacity` bytes
    fn shader_info_log(&self, shader: ShaderHandle, capacity: usize) -> String;
    /// `glDeleteShader`
    fn delete_shader(&mut self, shader: ShaderHandle);

    /// `glCreateProgram`
    fn create_program(&mut self) -> ProgramHandle;
    /// `glAttachShader`
    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle);
    /// `glLinkProgram`
    fn link_program(&mut self, program: ProgramHandle);
    /// `GL_LINK_STATUS`
    fn program_linked(&self, program: ProgramHandle) -> bool;
    /// `glGetProgramInfoLog`, truncated to `capacity` bytes
    fn program_info_log(&self, program: ProgramHandle, capacity: usize) -> String;
    /// `glUseProgram`
    fn use_program(&mut self, program: ProgramHandle);
    /// `glDeleteProgram`
    fn delete_program(&mut self, program: ProgramHandle);

    /// `glGenVertexArrays` for a single name
    fn create_vertex_array(&mut self) -> VertexArrayHandle;
    /// `glBindVertexArray`
    fn bind_vertex_array(&mut self, vertex_array: VertexArrayHandle);
    /// `glDeleteVertexArrays` for a single name
    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle);

    /// `glGenBuffers` for a single name
    fn create_buffer(&mut self) -> BufferHandle;
    /// `glBindBuffer(GL_ARRAY_BUFFER, ..)`
    fn bind_array_buffer(&mut self, buffer: BufferHandle);
    /// `glBufferData(GL_ARRAY_BUFFER, ..)` on the bound buffer
    fn upload_array_buffer(&mut self, data: &[u8], usage: BufferUsage);
    /// `glDeleteBuffers` for a single name
    fn delete_buffer(&mut self, buffer: BufferHandle);

    /// `glVertexAttribPointer` against the bound array buffer
    fn vertex_attrib_pointer(&mut self, attribute: &VertexAttribute);
    /// `glEnableVertexAttribArray`
    fn enable_vertex_attrib_array(&mut self, location: u32);

    /// `glClearColor`
    fn set_clear_color(&mut self, rgba: [f32; 4]);
    /// `glClear(GL_COLOR_BUFFER_BIT)`
    fn clear_color_buffer(&mut self);
    /// `glDrawArrays(GL_TRIANGLES, first, count)`
    fn draw_triangles(&mut self, first: i32, count: i32);
    /// `glViewport`
    fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32);

    /// `glGetError`; `None` once the error queue is empty
    fn poll_error(&mut self) -> Option<u32>;
}
