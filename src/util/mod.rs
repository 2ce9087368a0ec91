//! Utility functions.
//!
//! - **Link validation**: checks feed-supplied links before opening them
//! - **Text processing**: Unicode-aware width, truncation, wrapping and
//!   sanitizing of feed text for the terminal

mod text;
mod url_validator;

pub use text::{
    display_width, strip_control_chars, strip_html_tags, truncate_to_width, wrap_to_width,
};
pub use url_validator::{validate_link, UrlValidationError};
