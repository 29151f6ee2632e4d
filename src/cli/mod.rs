//! Command-line surface: arguments, the release workflow and subcommands

pub mod args;
pub mod commands;
pub mod orchestration;
pub mod pipeline;

pub use args::{Args, Command};
pub use commands::{changelog_command, validate_command, EXPECTED_FORMAT};
pub use orchestration::{run_release, ReleaseArgs, ReleaseOutcome};
pub use pipeline::{build_steps, run_pipeline, PipelineReport, ReleaseContext, Step};
