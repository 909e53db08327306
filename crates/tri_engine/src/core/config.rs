//! # Unified Configuration System
//!
//! All configuration structures for the window, the OpenGL context and the
//! renderer live here. Every structure has a complete `Default`, so the
//! binary runs without any configuration file, and every field carries a
//! serde default so partial TOML/RON files are accepted.
//!
//! ## Configuration Categories
//!
//! - **Window Config**: Size, title and presentation settings
//! - **Context Config**: Requested OpenGL version and profile
//! - **Renderer Config**: Clear colour, shader sources and failure policy

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};
use crate::render::shader::ShaderSources;

/// # Window Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in screen coordinates
    pub width: u32,
    /// Window height in screen coordinates
    pub height: u32,
    /// Whether the user may resize the window
    pub resizable: bool,
    /// Synchronise buffer swaps with the display refresh
    pub vsync: bool,
}

impl WindowConfig {
    /// Create a window configuration with the given size and title
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Self::default()
        }
    }

    /// Enable or disable vsync
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Generic Window".to_string(),
            width: 800,
            height: 600,
            resizable: true,
            vsync: true,
        }
    }
}

/// OpenGL context profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlProfile {
    /// Core profile, deprecated functionality removed
    Core,
    /// Compatibility profile
    Compatibility,
    /// Let the driver decide
    Any,
}

/// # Context Configuration
///
/// The minimum OpenGL version and profile requested from the windowing
/// system. Forward compatibility is required for core contexts on macOS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Requested profile
    pub profile: GlProfile,
    /// Request a forward-compatible context
    pub forward_compatible: bool,
}

impl ContextConfig {
    /// Request a specific OpenGL version
    pub fn with_version(mut self, major: u32, minor: u32) -> Self {
        self.major = major;
        self.minor = minor;
        self
    }

    /// Request a specific profile
    pub fn with_profile(mut self, profile: GlProfile) -> Self {
        self.profile = profile;
        self
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            major: 3,
            minor: 3,
            profile: GlProfile::Core,
            forward_compatible: true,
        }
    }
}

/// What to do when the shader program fails to compile or link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShaderFailurePolicy {
    /// Treat the failure as fatal at startup
    Abort,
    /// Log the diagnostic and keep running with the zero program.
    /// Draw calls are still issued; with no program bound they produce
    /// nothing.
    Continue,
}

/// # Renderer Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Background clear color [R, G, B, A] (0.0-1.0 range)
    pub clear_color: [f32; 4],
    /// GLSL sources for the single program
    pub shaders: ShaderSources,
    /// Behaviour on compile or link failure
    pub shader_failure: ShaderFailurePolicy,
    /// Drain `glGetError` after every frame and log what it reports
    pub check_gl_errors: bool,
}

impl RendererConfig {
    /// Set background clear color [R, G, B, A] (0.0-1.0 range)
    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    /// Replace the shader sources
    pub fn with_shaders(mut self, shaders: ShaderSources) -> Self {
        self.shaders = shaders;
        self
    }

    /// Set the shader failure policy
    pub fn with_shader_failure(mut self, policy: ShaderFailurePolicy) -> Self {
        self.shader_failure = policy;
        self
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.5, 0.0, 1.0],
            shaders: ShaderSources::default(),
            shader_failure: ShaderFailurePolicy::Abort,
            check_gl_errors: cfg!(debug_assertions),
        }
    }
}

/// # Engine Configuration
///
/// Top-level configuration handed to [`crate::Engine`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window settings
    pub window: WindowConfig,
    /// OpenGL context settings
    pub context: ContextConfig,
    /// Renderer settings
    pub renderer: RendererConfig,
}

impl EngineConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        if self.context.profile == GlProfile::Core
            && (self.context.major, self.context.minor) < (3, 2)
        {
            return Err(ConfigError::Invalid(format!(
                "core profile requires OpenGL 3.2 or newer, got {}.{}",
                self.context.major, self.context.minor
            )));
        }

        if self.renderer.clear_color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(ConfigError::Invalid(format!(
                "clear color components must be within [0, 1], got {:?}",
                self.renderer.clear_color
            )));
        }

        Ok(())
    }
}

impl Config for EngineConfig {}
