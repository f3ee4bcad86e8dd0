//! Core library components.
//!
//! The controller and the collaborator traits it depends on, plus the
//! file-backed implementations used by the binary.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod controller;
pub mod discovery;
pub mod domain;
pub mod items;
pub mod prompt;
pub mod settings;
pub mod store;
pub mod sync;
pub mod types;
