//! OpenGL implementation of [`GraphicsApi`] over the `gl` crate
//!
//! All `unsafe` FFI in the renderer is confined to this file. The calls are
//! sound as long as the context that `load_gl` ran against is current on the
//! calling thread, which [`crate::render::window::GlfwWindow`] guarantees for
//! the lifetime of the engine.

#![allow(unsafe_code)]
#![allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]

use std::ffi::{c_void, CStr};
use std::ptr;

use gl::types::{GLchar, GLenum, GLint, GLsizei, GLsizeiptr, GLuint};

use super::{
    AttributeType, BufferHandle, BufferUsage, GraphicsApi, ProgramHandle, ShaderHandle,
    ShaderStage, VertexArrayHandle, VertexAttribute,
};
use crate::render::window::WindowError;

/// Entry points that must resolve for the renderer to work at all
const REQUIRED_ENTRY_POINTS: &[(&str, fn() -> bool)] = &[
    ("glCreateShader", gl::CreateShader::is_loaded),
    ("glCompileShader", gl::CompileShader::is_loaded),
    ("glCreateProgram", gl::CreateProgram::is_loaded),
    ("glLinkProgram", gl::LinkProgram::is_loaded),
    ("glGenVertexArrays", gl::GenVertexArrays::is_loaded),
    ("glGenBuffers", gl::GenBuffers::is_loaded),
    ("glBufferData", gl::BufferData::is_loaded),
    ("glVertexAttribPointer", gl::VertexAttribPointer::is_loaded),
    ("glDrawArrays", gl::DrawArrays::is_loaded),
    ("glClear", gl::Clear::is_loaded),
    ("glViewport", gl::Viewport::is_loaded),
];

/// Load OpenGL function pointers through `loader`
///
/// `loader` is the windowing system's `GetProcAddress`. It must be called
/// with the target context current.
///
/// # Errors
/// Returns [`WindowError::Loader`] naming every required entry point that
/// failed to resolve.
pub fn load_gl<F>(loader: F) -> Result<NativeGl, WindowError>
where
    F: FnMut(&'static str) -> *const c_void,
{
    gl::load_with(loader);

    let missing: Vec<&str> = REQUIRED_ENTRY_POINTS
        .iter()
        .filter(|(_, is_loaded)| !is_loaded())
        .map(|(name, _)| *name)
        .collect();

    if !missing.is_empty() {
        return Err(WindowError::Loader(format!(
            "unresolved entry points: {}",
            missing.join(", ")
        )));
    }

    log::debug!("Loaded {} required OpenGL entry points", REQUIRED_ENTRY_POINTS.len());
    Ok(NativeGl { _loaded: () })
}

/// Driver-backed [`GraphicsApi`]
///
/// Only obtainable from [`load_gl`], so holding one implies the function
/// pointers are loaded.
#[derive(Debug)]
pub struct NativeGl {
    _loaded: (),
}

impl NativeGl {
    /// `GL_VERSION` of the current context, if the driver reports one
    pub fn version_string(&self) -> Option<String> {
        let raw = unsafe { gl::GetString(gl::VERSION) };
        if raw.is_null() {
            return None;
        }
        let version = unsafe { CStr::from_ptr(raw.cast()) };
        Some(version.to_string_lossy().into_owned())
    }
}

fn stage_enum(stage: ShaderStage) -> GLenum {
    match stage {
        ShaderStage::Vertex => gl::VERTEX_SHADER,
        ShaderStage::Fragment => gl::FRAGMENT_SHADER,
    }
}

fn usage_enum(usage: BufferUsage) -> GLenum {
    match usage {
        BufferUsage::StaticDraw => gl::STATIC_DRAW,
    }
}

fn attribute_enum(kind: AttributeType) -> GLenum {
    match kind {
        AttributeType::Float => gl::FLOAT,
    }
}

/// Read an info log into a fixed-capacity buffer
fn read_info_log<F>(capacity: usize, read: F) -> String
where
    F: FnOnce(GLsizei, *mut GLsizei, *mut GLchar),
{
    let mut buffer = vec![0u8; capacity];
    let mut written: GLsizei = 0;
    read(capacity as GLsizei, &mut written, buffer.as_mut_ptr().cast());
    buffer.truncate(usize::try_from(written).unwrap_or(0).min(capacity));
    String::from_utf8_lossy(&buffer).trim_end().to_string()
}

impl GraphicsApi for NativeGl {
    fn create_shader(&mut self, stage: ShaderStage) -> ShaderHandle {
        ShaderHandle(unsafe { gl::CreateShader(stage_enum(stage)) })
    }

    fn shader_source(&mut self, shader: ShaderHandle, source: &CStr) {
        let pointer = source.as_ptr();
        unsafe { gl::ShaderSource(shader.0, 1, &pointer, ptr::null()) };
    }

    fn compile_shader(&mut self, shader: ShaderHandle) {
        unsafe { gl::CompileShader(shader.0) };
    }

    fn shader_compiled(&self, shader: ShaderHandle) -> bool {
        let mut status: GLint = 0;
        unsafe { gl::GetShaderiv(shader.0, gl::COMPILE_STATUS, &mut status) };
        status == GLint::from(gl::TRUE)
    }

    fn shader_info_log(&self, shader: ShaderHandle, capacity: usize) -> String {
        read_info_log(capacity, |len, written, buffer| unsafe {
            gl::GetShaderInfoLog(shader.0, len, written, buffer);
        })
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        unsafe { gl::DeleteShader(shader.0) };
    }

    fn create_program(&mut self) -> ProgramHandle {
        ProgramHandle(unsafe { gl::CreateProgram() })
    }

    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        unsafe { gl::AttachShader(program.0, shader.0) };
    }

    fn link_program(&mut self, program: ProgramHandle) {
        unsafe { gl::LinkProgram(program.0) };
    }

    fn program_linked(&self, program: ProgramHandle) -> bool {
        let mut status: GLint = 0;
        unsafe { gl::GetProgramiv(program.0, gl::LINK_STATUS, &mut status) };
        status == GLint::from(gl::TRUE)
    }

    fn program_info_log(&self, program: ProgramHandle, capacity: usize) -> String {
        read_info_log(capacity, |len, written, buffer| unsafe {
            gl::GetProgramInfoLog(program.0, len, written, buffer);
        })
    }

    fn use_program(&mut self, program: ProgramHandle) {
        unsafe { gl::UseProgram(program.0) };
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        unsafe { gl::DeleteProgram(program.0) };
    }

    fn create_vertex_array(&mut self) -> VertexArrayHandle {
        let mut name: GLuint = 0;
        unsafe { gl::GenVertexArrays(1, &mut name) };
        VertexArrayHandle(name)
    }

    fn bind_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        unsafe { gl::BindVertexArray(vertex_array.0) };
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        unsafe { gl::DeleteVertexArrays(1, &vertex_array.0) };
    }

    fn create_buffer(&mut self) -> BufferHandle {
        let mut name: GLuint = 0;
        unsafe { gl::GenBuffers(1, &mut name) };
        BufferHandle(name)
    }

    fn bind_array_buffer(&mut self, buffer: BufferHandle) {
        unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, buffer.0) };
    }

    fn upload_array_buffer(&mut self, data: &[u8], usage: BufferUsage) {
        unsafe {
            gl::BufferData(
                gl::ARRAY_BUFFER,
                data.len() as GLsizeiptr,
                data.as_ptr().cast(),
                usage_enum(usage),
            );
        }
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        unsafe { gl::DeleteBuffers(1, &buffer.0) };
    }

    fn vertex_attrib_pointer(&mut self, attribute: &VertexAttribute) {
        let normalized = if attribute.normalized { gl::TRUE } else { gl::FALSE };
        unsafe {
            gl::VertexAttribPointer(
                attribute.location,
                attribute.components,
                attribute_enum(attribute.kind),
                normalized,
                attribute.stride,
                attribute.offset as *const c_void,
            );
        }
    }

    fn enable_vertex_attrib_array(&mut self, location: u32) {
        unsafe { gl::EnableVertexAttribArray(location) };
    }

    fn set_clear_color(&mut self, rgba: [f32; 4]) {
        let [r, g, b, a] = rgba;
        unsafe { gl::ClearColor(r, g, b, a) };
    }

    fn clear_color_buffer(&mut self) {
        unsafe { gl::Clear(gl::COLOR_BUFFER_BIT) };
    }

    fn draw_triangles(&mut self, first: i32, count: i32) {
        unsafe { gl::DrawArrays(gl::TRIANGLES, first, count) };
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { gl::Viewport(x, y, width, height) };
    }

    fn poll_error(&mut self) -> Option<u32> {
        let code = unsafe { gl::GetError() };
        (code != gl::NO_ERROR).then_some(code)
    }
}
