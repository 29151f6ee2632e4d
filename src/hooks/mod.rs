//! npm lifecycle hooks
//!
//! Runs the project's own scripts at fixed points of the release:
//! - preversion: before the version is written
//! - version: after the manifest is updated, before the commit
//! - postversion: after the commit and tag exist

pub mod executor;
pub mod lifecycle;

pub use executor::{NpmScriptRunner, ScriptRunner};
pub use lifecycle::{FailurePolicy, HookContext, HookType};
