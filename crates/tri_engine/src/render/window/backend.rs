//! Backend-agnostic window trait
//!
//! This module defines the contract the frame loop relies on. It mirrors the
//! handful of windowing calls a single-window OpenGL program needs and
//! nothing more.

use crate::input::{KeyCode, KeyState};

/// Window events the engine reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// The drawable area changed size, in pixels
    FramebufferResized {
        /// New framebuffer width
        width: i32,
        /// New framebuffer height
        height: i32,
    },

    /// The user asked the OS to close the window
    CloseRequested,
}

/// Window backend implementations
///
/// # Thread Safety
/// Not `Send`: GLFW windows and their contexts belong to the main thread.
pub trait WindowBackend {
    /// Check if the window should close
    ///
    /// Returns true once the user has closed the window through the OS or the
    /// application has called [`WindowBackend::set_should_close`].
    fn should_close(&self) -> bool;

    /// Set whether the window should close
    fn set_should_close(&mut self, should_close: bool);

    /// Process pending OS events
    ///
    /// Should be called once per frame. Events relevant to the engine are
    /// queued and returned by [`WindowBackend::drain_events`].
    fn poll_events(&mut self);

    /// Take the events queued by the last [`WindowBackend::poll_events`]
    fn drain_events(&mut self) -> Vec<WindowEvent>;

    /// Present the back buffer
    fn swap_buffers(&mut self);

    /// Current state of a keyboard key
    fn key_state(&self, key: KeyCode) -> KeyState;

    /// Current framebuffer size in pixels
    fn framebuffer_size(&self) -> (i32, i32);
}
