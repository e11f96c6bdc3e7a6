//! Filesystem and browser services behind the HTTP surface.

pub mod browser;
pub mod listing;
pub mod serve_root;
