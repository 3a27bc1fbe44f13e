//! Low-level commands for inspecting the store

pub mod cat_blob;
