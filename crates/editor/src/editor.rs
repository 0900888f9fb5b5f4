//! Interactive scene editor built on the scene graph, canvas and tree view
//! crates.
//!
//! [`Editor`] owns the demo scene and turns pointer events in window pixels
//! into selection, dragging and tree view navigation. It draws through any
//! [`canvas::Renderer`]; the `scene-editor` binary drives it headlessly.

pub mod app;
pub mod config;
pub mod demo;
pub mod interaction;
pub mod logger;

pub use app::{ButtonAction, Editor, MouseButton};
pub use config::{ConfigError, EditorConfig, Palette, WindowConfig};
pub use interaction::DragController;
pub use logger::{log_section, EditorLogger};
