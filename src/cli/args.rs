use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bump-version",
    about = "Bump a package version, run its lifecycle hooks, then commit and tag the release"
)]
pub struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    pub config: Option<String>,

    #[arg(short = 'C', long = "dir", help = "Project directory (default: current directory)")]
    pub dir: Option<PathBuf>,

    #[arg(long, help = "Preview what would happen without making changes")]
    pub dry_run: bool,

    #[arg(long, help = "Print debug logs to stderr")]
    pub verbose: bool,

    #[arg(short, long, help = "Print version information")]
    pub version: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Check a version string and show its parts
    Validate {
        /// Version to check, e.g. 1.2.3-beta.1
        version: Option<String>,
    },
    /// Move the changelog's Unreleased entries under a dated release heading
    Changelog {
        /// Release version (default: the manifest's version)
        version: Option<String>,

        #[arg(long, help = "Show the change without writing it")]
        dry_run: bool,
    },
}

impl Args {
    pub fn project_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_flags() {
        let args = Args::parse_from(["bump-version", "--dry-run", "-C", "app", "--verbose"]);
        assert!(args.dry_run);
        assert!(args.verbose);
        assert_eq!(args.project_dir(), PathBuf::from("app"));
        assert!(args.command.is_none());
    }

    #[test]
    fn test_version_flag() {
        let args = Args::parse_from(["bump-version", "-v"]);
        assert!(args.version);
    }

    #[test]
    fn test_validate_subcommand() {
        let args = Args::parse_from(["bump-version", "validate", "1.0.0-rc.1"]);
        assert_eq!(
            args.command,
            Some(Command::Validate {
                version: Some("1.0.0-rc.1".to_string())
            })
        );

        let args = Args::parse_from(["bump-version", "validate"]);
        assert_eq!(args.command, Some(Command::Validate { version: None }));
    }

    #[test]
    fn test_changelog_subcommand() {
        let args = Args::parse_from(["bump-version", "changelog", "--dry-run"]);
        assert_eq!(
            args.command,
            Some(Command::Changelog {
                version: None,
                dry_run: true
            })
        );
    }
}
