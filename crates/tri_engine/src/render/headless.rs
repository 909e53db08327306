//! Headless backends
//!
//! [`HeadlessWindow`] and [`RecordingGl`] implement the window and graphics
//! traits without a display or a GL driver. They keep their state behind a
//! shared handle, so a clone kept by the caller can script input and inspect
//! results after the originals have been moved into an [`crate::Engine`].

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::ffi::CStr;
use std::rc::Rc;

use crate::input::{KeyCode, KeyState};
use crate::render::gl::{
    BufferHandle, BufferUsage, GraphicsApi, ProgramHandle, ShaderHandle, ShaderStage,
    VertexArrayHandle, VertexAttribute,
};
use crate::render::window::{WindowBackend, WindowEvent};

/// `GL_INVALID_OPERATION`
pub const GL_INVALID_OPERATION: u32 = 0x0502;

/// A state-mutating call observed by [`RecordingGl`]
///
/// Queries (`shader_compiled`, info logs, `poll_error`) are not recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    /// `glCreateShader`
    CreateShader(ShaderStage, ShaderHandle),
    /// `glShaderSource`
    ShaderSource(ShaderHandle),
    /// `glCompileShader`
    CompileShader(ShaderHandle),
    /// `glDeleteShader`
    DeleteShader(ShaderHandle),
    /// `glCreateProgram`
    CreateProgram(ProgramHandle),
    /// `glAttachShader`
    AttachShader(ProgramHandle, ShaderHandle),
    /// `glLinkProgram`
    LinkProgram(ProgramHandle),
    /// `glUseProgram`
    UseProgram(ProgramHandle),
    /// `glDeleteProgram`
    DeleteProgram(ProgramHandle),
    /// `glGenVertexArrays`
    CreateVertexArray(VertexArrayHandle),
    /// `glBindVertexArray`
    BindVertexArray(VertexArrayHandle),
    /// `glDeleteVertexArrays`
    DeleteVertexArray(VertexArrayHandle),
    /// `glGenBuffers`
    CreateBuffer(BufferHandle),
    /// `glBindBuffer(GL_ARRAY_BUFFER)`
    BindArrayBuffer(BufferHandle),
    /// `glBufferData(GL_ARRAY_BUFFER)`
    UploadArrayBuffer {
        /// Size of the upload in bytes
        bytes: usize,
        /// Usage hint
        usage: BufferUsage,
    },
    /// `glDeleteBuffers`
    DeleteBuffer(BufferHandle),
    /// `glVertexAttribPointer`
    VertexAttribPointer(VertexAttribute),
    /// `glEnableVertexAttribArray`
    EnableVertexAttribArray(u32),
    /// `glClearColor`
    ClearColor([f32; 4]),
    /// `glClear(GL_COLOR_BUFFER_BIT)`
    Clear,
    /// `glDrawArrays(GL_TRIANGLES)` with the state it ran against
    DrawTriangles {
        /// First vertex
        first: i32,
        /// Vertex count
        count: i32,
        /// Program current at draw time
        program: ProgramHandle,
        /// Vertex array bound at draw time
        vertex_array: VertexArrayHandle,
    },
    /// `glViewport`
    Viewport {
        /// Left edge
        x: i32,
        /// Bottom edge
        y: i32,
        /// Width in pixels
        width: i32,
        /// Height in pixels
        height: i32,
    },
}

#[derive(Debug)]
struct ShaderObject {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct ProgramObject {
    attached: Vec<u32>,
    linked: bool,
    log: String,
}

#[derive(Debug, Default)]
struct BufferObject {
    contents: Option<Vec<u8>>,
    usage: Option<BufferUsage>,
}

#[derive(Debug, Default)]
struct GlState {
    next_name: u32,
    calls: Vec<GlCall>,
    shaders: HashMap<u32, ShaderObject>,
    programs: HashMap<u32, ProgramObject>,
    buffers: HashMap<u32, BufferObject>,
    vertex_arrays: HashSet<u32>,
    bound_buffer: u32,
    bound_vertex_array: u32,
    current_program: u32,
    viewport: (i32, i32, i32, i32),
    compile_failures: HashMap<ShaderStage, String>,
    link_failure: Option<String>,
    errors: VecDeque<u32>,
}

impl GlState {
    fn gen_name(&mut self) -> u32 {
        self.next_name += 1;
        self.next_name
    }
}

/// Copy at most `capacity - 1` bytes, as GL reserves one for the terminator
fn truncate_log(log: &str, capacity: usize) -> String {
    let mut end = capacity.saturating_sub(1).min(log.len());
    while !log.is_char_boundary(end) {
        end -= 1;
    }
    log[..end].to_string()
}

/// [`GraphicsApi`] that records calls and simulates object state
///
/// Compilation succeeds unless the source has no `main` entry point or the
/// stage was scripted to fail with [`RecordingGl::fail_compile`]. Linking
/// succeeds when exactly one compiled vertex and one compiled fragment stage
/// are attached, unless scripted with [`RecordingGl::fail_link`]. Drawing
/// without a bound vertex array raises `GL_INVALID_OPERATION`, as a core
/// profile context would.
#[derive(Debug, Clone, Default)]
pub struct RecordingGl {
    state: Rc<RefCell<GlState>>,
}

impl RecordingGl {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later compile of `stage` fail with `log`
    pub fn fail_compile(&mut self, stage: ShaderStage, log: &str) {
        self.state.borrow_mut().compile_failures.insert(stage, log.to_string());
    }

    /// Make every later link fail with `log`
    pub fn fail_link(&mut self, log: &str) {
        self.state.borrow_mut().link_failure = Some(log.to_string());
    }

    /// Queue an error code for [`GraphicsApi::poll_error`]
    pub fn push_error(&mut self, code: u32) {
        self.state.borrow_mut().errors.push_back(code);
    }

    /// All recorded calls, oldest first
    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    /// Forget recorded calls (object state is kept)
    pub fn clear_calls(&mut self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Number of draw calls issued
    pub fn draw_count(&self) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| matches!(call, GlCall::DrawTriangles { .. }))
            .count()
    }

    /// Bytes last uploaded into `buffer`
    pub fn buffer_contents(&self, buffer: BufferHandle) -> Option<Vec<u8>> {
        self.state
            .borrow()
            .buffers
            .get(&buffer.0)
            .and_then(|object| object.contents.clone())
    }

    /// Usage hint of the last upload into `buffer`
    pub fn buffer_usage(&self, buffer: BufferHandle) -> Option<BufferUsage> {
        self.state.borrow().buffers.get(&buffer.0).and_then(|object| object.usage)
    }

    /// Current viewport as (x, y, width, height)
    pub fn viewport(&self) -> (i32, i32, i32, i32) {
        self.state.borrow().viewport
    }

    /// Program made current by the last `use_program`
    pub fn current_program(&self) -> ProgramHandle {
        ProgramHandle(self.state.borrow().current_program)
    }

    /// Shader objects not yet deleted
    pub fn live_shader_count(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    /// Program objects not yet deleted
    pub fn live_program_count(&self) -> usize {
        self.state.borrow().programs.len()
    }

    /// Buffer objects not yet deleted
    pub fn live_buffer_count(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    /// Vertex array objects not yet deleted
    pub fn live_vertex_array_count(&self) -> usize {
        self.state.borrow().vertex_arrays.len()
    }

    fn record(&self, call: GlCall) {
        log::trace!("gl: {:?}", call);
        self.state.borrow_mut().calls.push(call);
    }
}

impl GraphicsApi for RecordingGl {
    fn create_shader(&mut self, stage: ShaderStage) -> ShaderHandle {
        let name = {
            let mut state = self.state.borrow_mut();
            let name = state.gen_name();
            state.shaders.insert(
                name,
                ShaderObject { stage, source: String::new(), compiled: false, log: String::new() },
            );
            name
        };
        self.record(GlCall::CreateShader(stage, ShaderHandle(name)));
        ShaderHandle(name)
    }

    fn shader_source(&mut self, shader: ShaderHandle, source: &CStr) {
        if let Some(object) = self.state.borrow_mut().shaders.get_mut(&shader.0) {
            object.source = source.to_string_lossy().into_owned();
        }
        self.record(GlCall::ShaderSource(shader));
    }

    fn compile_shader(&mut self, shader: ShaderHandle) {
        {
            let mut state = self.state.borrow_mut();
            let scripted = state
                .shaders
                .get(&shader.0)
                .and_then(|object| state.compile_failures.get(&object.stage).cloned());

            if let Some(object) = state.shaders.get_mut(&shader.0) {
                let (compiled, log) = match scripted {
                    Some(log) => (false, log),
                    None if object.source.contains("void main") => (true, String::new()),
                    None => (false, "0:1(1): error: function `main' is not defined".to_string()),
                };
                object.compiled = compiled;
                object.log = log;
            }
        }
        self.record(GlCall::CompileShader(shader));
    }

    fn shader_compiled(&self, shader: ShaderHandle) -> bool {
        self.state.borrow().shaders.get(&shader.0).is_some_and(|object| object.compiled)
    }

    fn shader_info_log(&self, shader: ShaderHandle, capacity: usize) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader.0)
            .map(|object| truncate_log(&object.log, capacity))
            .unwrap_or_default()
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        self.state.borrow_mut().shaders.remove(&shader.0);
        self.record(GlCall::DeleteShader(shader));
    }

    fn create_program(&mut self) -> ProgramHandle {
        let name = {
            let mut state = self.state.borrow_mut();
            let name = state.gen_name();
            state.programs.insert(name, ProgramObject::default());
            name
        };
        self.record(GlCall::CreateProgram(ProgramHandle(name)));
        ProgramHandle(name)
    }

    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        if let Some(object) = self.state.borrow_mut().programs.get_mut(&program.0) {
            object.attached.push(shader.0);
        }
        self.record(GlCall::AttachShader(program, shader));
    }

    fn link_program(&mut self, program: ProgramHandle) {
        {
            let mut state = self.state.borrow_mut();
            let scripted = state.link_failure.clone();
            let attached = state
                .programs
                .get(&program.0)
                .map(|object| object.attached.clone())
                .unwrap_or_default();

            let stages: Vec<(ShaderStage, bool)> = attached
                .iter()
                .filter_map(|name| state.shaders.get(name))
                .map(|object| (object.stage, object.compiled))
                .collect();
            let complete = stages.len() == 2
                && stages.iter().all(|(_, compiled)| *compiled)
                && stages.iter().any(|(stage, _)| *stage == ShaderStage::Vertex)
                && stages.iter().any(|(stage, _)| *stage == ShaderStage::Fragment);

            if let Some(object) = state.programs.get_mut(&program.0) {
                let (linked, log) = match scripted {
                    Some(log) => (false, log),
                    None if complete => (true, String::new()),
                    None => (
                        false,
                        "error: program needs one compiled vertex and one compiled fragment shader"
                            .to_string(),
                    ),
                };
                object.linked = linked;
                object.log = log;
            }
        }
        self.record(GlCall::LinkProgram(program));
    }

    fn program_linked(&self, program: ProgramHandle) -> bool {
        self.state.borrow().programs.get(&program.0).is_some_and(|object| object.linked)
    }

    fn program_info_log(&self, program: ProgramHandle, capacity: usize) -> String {
        self.state
            .borrow()
            .programs
            .get(&program.0)
            .map(|object| truncate_log(&object.log, capacity))
            .unwrap_or_default()
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.state.borrow_mut().current_program = program.0;
        self.record(GlCall::UseProgram(program));
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        {
            let mut state = self.state.borrow_mut();
            state.programs.remove(&program.0);
            if state.current_program == program.0 {
                state.current_program = 0;
            }
        }
        self.record(GlCall::DeleteProgram(program));
    }

    fn create_vertex_array(&mut self) -> VertexArrayHandle {
        let name = {
            let mut state = self.state.borrow_mut();
            let name = state.gen_name();
            state.vertex_arrays.insert(name);
            name
        };
        self.record(GlCall::CreateVertexArray(VertexArrayHandle(name)));
        VertexArrayHandle(name)
    }

    fn bind_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.state.borrow_mut().bound_vertex_array = vertex_array.0;
        self.record(GlCall::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        {
            let mut state = self.state.borrow_mut();
            state.vertex_arrays.remove(&vertex_array.0);
            if state.bound_vertex_array == vertex_array.0 {
                state.bound_vertex_array = 0;
            }
        }
        self.record(GlCall::DeleteVertexArray(vertex_array));
    }

    fn create_buffer(&mut self) -> BufferHandle {
        let name = {
            let mut state = self.state.borrow_mut();
            let name = state.gen_name();
            state.buffers.insert(name, BufferObject::default());
            name
        };
        self.record(GlCall::CreateBuffer(BufferHandle(name)));
        BufferHandle(name)
    }

    fn bind_array_buffer(&mut self, buffer: BufferHandle) {
        self.state.borrow_mut().bound_buffer = buffer.0;
        self.record(GlCall::BindArrayBuffer(buffer));
    }

    fn upload_array_buffer(&mut self, data: &[u8], usage: BufferUsage) {
        {
            let mut state = self.state.borrow_mut();
            let bound = state.bound_buffer;
            match state.buffers.get_mut(&bound) {
                Some(object) => {
                    object.contents = Some(data.to_vec());
                    object.usage = Some(usage);
                }
                None => state.errors.push_back(GL_INVALID_OPERATION),
            }
        }
        self.record(GlCall::UploadArrayBuffer { bytes: data.len(), usage });
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        {
            let mut state = self.state.borrow_mut();
            state.buffers.remove(&buffer.0);
            if state.bound_buffer == buffer.0 {
                state.bound_buffer = 0;
            }
        }
        self.record(GlCall::DeleteBuffer(buffer));
    }

    fn vertex_attrib_pointer(&mut self, attribute: &VertexAttribute) {
        {
            let mut state = self.state.borrow_mut();
            if state.bound_vertex_array == 0 || state.bound_buffer == 0 {
                state.errors.push_back(GL_INVALID_OPERATION);
            }
        }
        self.record(GlCall::VertexAttribPointer(*attribute));
    }

    fn enable_vertex_attrib_array(&mut self, location: u32) {
        self.record(GlCall::EnableVertexAttribArray(location));
    }

    fn set_clear_color(&mut self, rgba: [f32; 4]) {
        self.record(GlCall::ClearColor(rgba));
    }

    fn clear_color_buffer(&mut self) {
        self.record(GlCall::Clear);
    }

    fn draw_triangles(&mut self, first: i32, count: i32) {
        let (program, vertex_array) = {
            let mut state = self.state.borrow_mut();
            if state.bound_vertex_array == 0 {
                state.errors.push_back(GL_INVALID_OPERATION);
            }
            (ProgramHandle(state.current_program), VertexArrayHandle(state.bound_vertex_array))
        };
        self.record(GlCall::DrawTriangles { first, count, program, vertex_array });
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.state.borrow_mut().viewport = (x, y, width, height);
        self.record(GlCall::Viewport { x, y, width, height });
    }

    fn poll_error(&mut self) -> Option<u32> {
        self.state.borrow_mut().errors.pop_front()
    }
}

#[derive(Debug)]
struct WindowState {
    should_close: bool,
    framebuffer: (i32, i32),
    pressed: HashSet<KeyCode>,
    queued: VecDeque<WindowEvent>,
    delivered: Vec<WindowEvent>,
    close_after_swaps: Option<u64>,
    polls: u64,
    swaps: u64,
}

/// Scriptable [`WindowBackend`]
///
/// Events queued with [`HeadlessWindow::queue_event`] are delivered by the
/// next [`WindowBackend::poll_events`]. Delivery updates the simulated
/// framebuffer size and, for [`WindowEvent::CloseRequested`], the close flag,
/// as GLFW does.
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    state: Rc<RefCell<WindowState>>,
}

impl HeadlessWindow {
    /// Create a window with the given framebuffer size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            state: Rc::new(RefCell::new(WindowState {
                should_close: false,
                framebuffer: (width, height),
                pressed: HashSet::new(),
                queued: VecDeque::new(),
                delivered: Vec::new(),
                close_after_swaps: None,
                polls: 0,
                swaps: 0,
            })),
        }
    }

    /// Hold `key` down until [`HeadlessWindow::release_key`]
    pub fn press_key(&mut self, key: KeyCode) {
        self.state.borrow_mut().pressed.insert(key);
    }

    /// Release `key`
    pub fn release_key(&mut self, key: KeyCode) {
        self.state.borrow_mut().pressed.remove(&key);
    }

    /// Deliver `event` on the next poll
    pub fn queue_event(&mut self, event: WindowEvent) {
        self.state.borrow_mut().queued.push_back(event);
    }

    /// Simulate the user resizing the window
    pub fn resize(&mut self, width: i32, height: i32) {
        self.queue_event(WindowEvent::FramebufferResized { width, height });
    }

    /// Set the close flag once `swaps` frames have been presented
    pub fn close_after_frames(&mut self, swaps: u64) {
        self.state.borrow_mut().close_after_swaps = Some(swaps);
    }

    /// Number of `poll_events` calls
    pub fn poll_count(&self) -> u64 {
        self.state.borrow().polls
    }

    /// Number of `swap_buffers` calls
    pub fn swap_count(&self) -> u64 {
        self.state.borrow().swaps
    }
}

impl WindowBackend for HeadlessWindow {
    fn should_close(&self) -> bool {
        self.state.borrow().should_close
    }

    fn set_should_close(&mut self, should_close: bool) {
        self.state.borrow_mut().should_close = should_close;
    }

    fn poll_events(&mut self) {
        let mut state = self.state.borrow_mut();
        state.polls += 1;
        while let Some(event) = state.queued.pop_front() {
            match event {
                WindowEvent::FramebufferResized { width, height } => {
                    state.framebuffer = (width, height);
                }
                WindowEvent::CloseRequested => state.should_close = true,
            }
            state.delivered.push(event);
        }
    }

    fn drain_events(&mut self) -> Vec<WindowEvent> {
        std::mem::take(&mut self.state.borrow_mut().delivered)
    }

    fn swap_buffers(&mut self) {
        let mut state = self.state.borrow_mut();
        state.swaps += 1;
        if state.close_after_swaps.is_some_and(|limit| state.swaps >= limit) {
            state.should_close = true;
        }
    }

    fn key_state(&self, key: KeyCode) -> KeyState {
        if self.state.borrow().pressed.contains(&key) {
            KeyState::Pressed
        } else {
            KeyState::Released
        }
    }

    fn framebuffer_size(&self) -> (i32, i32) {
        self.state.borrow().framebuffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let mut window = HeadlessWindow::new(800, 600);
        let observer = window.clone();

        window.set_should_close(true);
        assert!(observer.should_close());
    }

    #[test]
    fn test_events_delivered_on_poll() {
        let mut window = HeadlessWindow::new(800, 600);
        window.resize(1024, 768);

        assert!(window.drain_events().is_empty());
        assert_eq!(window.framebuffer_size(), (800, 600));

        window.poll_events();
        assert_eq!(window.framebuffer_size(), (1024, 768));
        assert_eq!(
            window.drain_events(),
            vec![WindowEvent::FramebufferResized { width: 1024, height: 768 }]
        );
        assert!(window.drain_events().is_empty());
    }

    #[test]
    fn test_close_request_sets_flag() {
        let mut window = HeadlessWindow::new(800, 600);
        window.queue_event(WindowEvent::CloseRequested);
        window.poll_events();
        assert!(window.should_close());
    }

    #[test]
    fn test_draw_without_vertex_array_raises_error() {
        let mut gl = RecordingGl::new();
        gl.draw_triangles(0, 3);
        assert_eq!(gl.poll_error(), Some(GL_INVALID_OPERATION));
        assert_eq!(gl.poll_error(), None);
    }

    #[test]
    fn test_truncate_log_respects_char_boundaries() {
        assert_eq!(truncate_log("abcdef", 4), "abc");
        assert_eq!(truncate_log("ab", 512), "ab");
        assert_eq!(truncate_log("é", 2), "");
    }
}
