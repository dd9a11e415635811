// src/targets/mod.rs

//! Target registry and command-line dispatch.
//!
//! This module only maps names to actions and picks one to run. It knows
//! nothing about commands, files or change detection; see [`crate::exec`] for
//! the actions built from a build file.

pub mod action;
pub mod registry;

pub use action::RunAction;
pub use registry::{Dispatched, Registry};
