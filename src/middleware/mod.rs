//! Request middleware for the static file service.

pub mod static_files;
