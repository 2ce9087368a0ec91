//! Terminal User Interface module.
//!
//! The UI is a projection of [`crate::nav::Nav`]: rendering reads the
//! navigation state and input handlers call its operations.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard and mouse input handling
//! - `render` - Layout and header
//! - `menu` - Slide-out category menu
//! - `cards` - Card column
//! - `status` - Status bar widget

mod cards;
mod input;
mod loop_runner;
mod menu;
mod render;
mod status;

pub use loop_runner::{run, Action};
