//! Window management using GLFW
//!
//! Creates the single application window together with its OpenGL context,
//! makes the context current on the calling thread and loads the GL function
//! pointers.

use glfw::Context;

use super::{WindowBackend, WindowError, WindowEvent, WindowResult};
use crate::core::config::{ContextConfig, GlProfile, WindowConfig};
use crate::input::{KeyCode, KeyState};
use crate::render::gl::{load_gl, NativeGl};

/// GLFW window wrapper with proper resource management
///
/// Dropping it destroys the window (and with it the context), then releases
/// the GLFW library. Any GL objects must be deleted before that happens.
pub struct GlfwWindow {
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    glfw: glfw::Glfw,
    pending: Vec<WindowEvent>,
}

impl GlfwWindow {
    /// Open a window with a current OpenGL context
    ///
    /// Applies the context hints from `context`, creates the window, makes
    /// its context current, subscribes to framebuffer resize and close
    /// events, applies the swap interval and loads GL function pointers.
    ///
    /// # Errors
    /// - [`WindowError::InitializationFailed`] if GLFW cannot start
    /// - [`WindowError::ContextCreation`] if no window/context matches
    /// - [`WindowError::Loader`] if GL entry points cannot be resolved
    pub fn open(config: &WindowConfig, context: &ContextConfig) -> WindowResult<(Self, NativeGl)> {
        // Errors reported through the callback are logged; failures still
        // surface as the `Err`/`None` returns below.
        let mut glfw = glfw::init(glfw::log_errors)
            .map_err(|e| WindowError::InitializationFailed(format!("{e:?}")))?;

        glfw.window_hint(glfw::WindowHint::ContextVersion(context.major, context.minor));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(profile_hint(context.profile)));
        glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(context.forward_compatible));
        glfw.window_hint(glfw::WindowHint::Resizable(config.resizable));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or_else(|| WindowError::ContextCreation {
                width: config.width,
                height: config.height,
                title: config.title.clone(),
                major: context.major,
                minor: context.minor,
            })?;

        window.make_current();
        window.set_framebuffer_size_polling(true);
        window.set_close_polling(true);

        glfw.set_swap_interval(if config.vsync {
            glfw::SwapInterval::Sync(1)
        } else {
            glfw::SwapInterval::None
        });

        let gl = load_gl(|symbol| window.get_proc_address(symbol) as *const _)?;

        log::info!(
            "Created {}x{} window \"{}\" ({})",
            config.width,
            config.height,
            config.title,
            gl.version_string().unwrap_or_else(|| "unknown GL version".to_string())
        );

        Ok((
            Self {
                window,
                events,
                glfw,
                pending: Vec::new(),
            },
            gl,
        ))
    }
}

impl WindowBackend for GlfwWindow {
    fn should_close(&self) -> bool {
        self.window.should_close()
    }

    fn set_should_close(&mut self, should_close: bool) {
        self.window.set_should_close(should_close);
    }

    fn poll_events(&mut self) {
        self.glfw.poll_events();
        for (_, event) in glfw::flush_messages(&self.events) {
            match event {
                glfw::WindowEvent::FramebufferSize(width, height) => {
                    self.pending.push(WindowEvent::FramebufferResized { width, height });
                }
                glfw::WindowEvent::Close => self.pending.push(WindowEvent::CloseRequested),
                _ => {}
            }
        }
    }

    fn drain_events(&mut self) -> Vec<WindowEvent> {
        std::mem::take(&mut self.pending)
    }

    fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    fn key_state(&self, key: KeyCode) -> KeyState {
        match self.window.get_key(glfw_key(key)) {
            glfw::Action::Press | glfw::Action::Repeat => KeyState::Pressed,
            glfw::Action::Release => KeyState::Released,
        }
    }

    fn framebuffer_size(&self) -> (i32, i32) {
        self.window.get_framebuffer_size()
    }
}

fn profile_hint(profile: GlProfile) -> glfw::OpenGlProfileHint {
    match profile {
        GlProfile::Core => glfw::OpenGlProfileHint::Core,
        GlProfile::Compatibility => glfw::OpenGlProfileHint::Compat,
        GlProfile::Any => glfw::OpenGlProfileHint::Any,
    }
}

fn glfw_key(key: KeyCode) -> glfw::Key {
    use glfw::Key;

    match key {
        KeyCode::A => Key::A,
        KeyCode::D => Key::D,
        KeyCode::Q => Key::Q,
        KeyCode::S => Key::S,
        KeyCode::W => Key::W,
        KeyCode::Space => Key::Space,
        KeyCode::Enter => Key::Enter,
        KeyCode::Escape => Key::Escape,
    }
}
