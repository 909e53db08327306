//! Core engine implementation
//!
//! The frame loop. One iteration samples input, renders, polls window events
//! and presents, in that order, until the window's close flag is set.

use crate::{
    core::config::EngineConfig,
    config::ConfigError,
    foundation::time::Timer,
    input::InputState,
    render::{
        GlfwWindow, GraphicsApi, NativeGl, ShaderError, TriangleRenderer, WindowBackend,
        WindowError, WindowEvent,
    },
};
use thiserror::Error;

/// Main engine struct
///
/// Fields drop in declaration order: the renderer deletes its GL objects
/// before the window destroys the context they live in.
pub struct Engine<W: WindowBackend, G: GraphicsApi> {
    /// Program, mesh and the graphics API
    renderer: TriangleRenderer<G>,

    /// Escape-to-close handling
    input: InputState,

    /// Frame timing
    timer: Timer,

    /// Window and context; must outlive the renderer
    window: W,
}

impl Engine<GlfwWindow, NativeGl> {
    /// Open a GLFW window and build the engine on it
    ///
    /// # Errors
    /// [`EngineError::Config`] for a rejected configuration,
    /// [`EngineError::Window`] if no window or context could be created and
    /// [`EngineError::Shader`] under [`crate::core::ShaderFailurePolicy::Abort`].
    pub fn with_glfw(config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let (window, gl) = GlfwWindow::open(&config.window, &config.context)?;
        Self::new(window, gl, config)
    }
}

impl<W: WindowBackend, G: GraphicsApi> Engine<W, G> {
    /// Build the engine over an existing window and graphics API
    ///
    /// The viewport starts out matching the window's framebuffer, which may
    /// differ from the requested window size on high-DPI displays.
    ///
    /// # Errors
    /// [`EngineError::Config`] or [`EngineError::Shader`].
    pub fn new(window: W, gl: G, config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let mut renderer = TriangleRenderer::new(gl, &config.renderer)?;
        let (width, height) = window.framebuffer_size();
        renderer.resize(width, height);

        log::info!("Engine ready ({}x{} framebuffer)", width, height);

        Ok(Self {
            renderer,
            input: InputState::new(),
            timer: Timer::new(),
            window,
        })
    }

    /// Run one loop iteration
    pub fn run_frame(&mut self) {
        self.input.process(&mut self.window);
        self.renderer.render_frame();

        self.window.poll_events();
        for event in self.window.drain_events() {
            match event {
                WindowEvent::FramebufferResized { width, height } => {
                    self.renderer.resize(width, height);
                }
                WindowEvent::CloseRequested => log::info!("Window close requested"),
            }
        }

        self.window.swap_buffers();
        self.timer.tick();
    }

    /// Loop until the window should close, then release everything
    ///
    /// Returns the number of frames rendered.
    pub fn run(mut self) -> u64 {
        log::info!("Starting main loop...");

        while !self.window.should_close() {
            self.run_frame();
        }

        let frames = self.timer.frame_count();
        log::info!(
            "Main loop finished: {} frames in {:.2?} ({:.1} fps average)",
            frames,
            self.timer.elapsed(),
            self.timer.average_fps()
        );

        frames
    }

    /// Whether the close flag is set
    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    /// The renderer
    pub fn renderer(&self) -> &TriangleRenderer<G> {
        &self.renderer
    }

}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Window or context creation failed
    #[error(transparent)]
    Window(#[from] WindowError),

    /// Shader program could not be built
    #[error(transparent)]
    Shader(#[from] ShaderError),
}
