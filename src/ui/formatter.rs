//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! Functions here are pure (no I/O side effects beyond printing) and testable.

use console::style;

use crate::warning::ReleaseWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("✗ ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

pub fn display_info(message: &str) {
    println!("  {}", style(message).dim());
}

/// Display a release warning to the user.
pub fn display_warning(warning: &ReleaseWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Print an action that a dry run skips
pub fn display_dry_run(action: &str) {
    println!("{} {}", style("[DRY-RUN]").cyan(), action);
}

/// What a release is about to do, shown before the final confirmation
#[derive(Debug, Clone, PartialEq)]
pub struct ReleasePlan {
    pub package: Option<String>,
    pub previous: String,
    pub version: String,
    pub tag: String,
    pub release_type: String,
    pub commit_message: String,
    /// One line per pipeline step, in execution order
    pub steps: Vec<String>,
}

/// Render the plan without colors.
///
/// ```text
/// Release plan for my-app:
///   Version: 1.0.0 -> 1.1.0
///   Tag:     v1.1.0
///   Type:    production (minor)
///   Commit:  chore: release 1.1.0
///
/// Steps:
///   1. Update package.json
///   ...
/// ```
pub fn format_release_plan(plan: &ReleasePlan) -> String {
    let mut out = String::new();

    match &plan.package {
        Some(name) => out.push_str(&format!("Release plan for {}:\n", name)),
        None => out.push_str("Release plan:\n"),
    }
    out.push_str(&format!("  Version: {} -> {}\n", plan.previous, plan.version));
    out.push_str(&format!("  Tag:     {}\n", plan.tag));
    out.push_str(&format!("  Type:    {}\n", plan.release_type));
    out.push_str(&format!("  Commit:  {}\n", plan.commit_message));

    out.push_str("\nSteps:\n");
    for (i, step) in plan.steps.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, step));
    }

    out
}

/// Display the proposed version change and the steps that will run.
pub fn display_release_plan(plan: &ReleasePlan) {
    println!();
    match &plan.package {
        Some(name) => println!("{}", style(format!("Release plan for {}:", name)).bold()),
        None => println!("{}", style("Release plan:").bold()),
    }
    println!(
        "  Version: {} -> {}",
        style(&plan.previous).red(),
        style(&plan.version).green()
    );
    println!("  Tag:     {}", style(&plan.tag).green());
    println!("  Type:    {}", plan.release_type);
    println!("  Commit:  {}", style(&plan.commit_message).cyan());

    println!("\n{}", style("Steps:").underlined());
    for (i, step) in plan.steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
}

/// Display manual push instruction for a release that was not pushed.
///
/// # Arguments
/// * `remote` - The remote name (e.g., "origin")
/// * `branch` - The release branch
/// * `tag` - The tag that was created locally
pub fn display_manual_push_instruction(remote: &str, branch: &str, tag: &str) {
    println!(
        "\n{} To push this release later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} {} {}", remote, branch, tag)).cyan()
    );
}
