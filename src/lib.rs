//! shadow-reader: a terminal feed reader with a slide-out category menu.
//!
//! - [`backend`] - category tables and feed formats per source
//! - [`feed`] - entry type and HTTP fetching
//! - [`nav`] - the category navigation state machine
//! - [`history`] - navigation history
//! - [`app`] - wires the navigation core to fetch tasks and history
//! - [`config`] - optional TOML configuration
//! - [`ui`] - ratatui front-end

pub mod app;
pub mod backend;
pub mod config;
pub mod feed;
pub mod history;
pub mod nav;
pub mod ui;
pub mod util;
