use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::io;

use bump_version::cli::{self, Args, Command, ReleaseArgs};
use bump_version::config;
use bump_version::git::Git2Repository;
use bump_version::hooks::NpmScriptRunner;
use bump_version::ui::{self, Prompt, ScriptedPrompt, TerminalPrompt};
use bump_version::BumpError;

/// JSON object of prompt answers keyed by prompt name
const DEFAULTS_ENV: &str = "BUMP_VERSION_DEFAULTS";
/// Any non-empty value skips the push step
const SKIP_PUSH_ENV: &str = "BUMP_VERSION_SKIP_PUSH";

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let code = match run(args) {
        Ok(code) => code,
        Err(e) => match e.downcast_ref::<BumpError>() {
            Some(err) => report_error(err),
            None => {
                ui::display_error(&format!("{:#}", e));
                1
            }
        },
    };

    std::process::exit(code);
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<i32> {
    if args.version {
        println!("bump-version {}", env!("CARGO_PKG_VERSION"));
        return Ok(0);
    }

    let project_dir = args.project_dir();
    let project_dir = project_dir
        .canonicalize()
        .with_context(|| format!("Cannot open project directory {}", project_dir.display()))?;
    let config = config::load_config(args.config.as_deref(), &project_dir)?;

    match &args.command {
        Some(Command::Validate { version }) => {
            let tracks = config.track_order()?;
            let code = cli::validate_command(
                version.as_deref(),
                &tracks,
                &mut io::stdout(),
                &mut io::stderr(),
            )?;
            Ok(code)
        }
        Some(Command::Changelog { version, dry_run }) => {
            cli::changelog_command(
                &project_dir,
                &config,
                version.as_deref(),
                Local::now().date_naive(),
                *dry_run || args.dry_run,
                &mut io::stdout(),
            )?;
            Ok(0)
        }
        None => {
            let skip_push = std::env::var(SKIP_PUSH_ENV)
                .map(|value| !value.is_empty())
                .unwrap_or(false);

            let mut prompt = build_prompt()?;
            let repo = Git2Repository::open(&project_dir)?;
            let runner = NpmScriptRunner::new(&config.hooks.runner, &project_dir);

            let mut release_args = ReleaseArgs::new(&project_dir);
            release_args.dry_run = args.dry_run;
            release_args.push = !skip_push;

            let outcome =
                cli::run_release(&release_args, &config, &repo, &runner, prompt.as_mut())?;
            tracing::debug!(?outcome, "release finished");
            Ok(0)
        }
    }
}

/// Terminal prompts, answered first from `BUMP_VERSION_DEFAULTS` when set
fn build_prompt() -> Result<Box<dyn Prompt>> {
    let terminal: Box<dyn Prompt> = Box::new(TerminalPrompt::stdio());

    match std::env::var(DEFAULTS_ENV) {
        Ok(defaults) if !defaults.trim().is_empty() => {
            let scripted = ScriptedPrompt::from_json(&defaults)
                .with_context(|| format!("{} is not a valid JSON object", DEFAULTS_ENV))?;
            Ok(Box::new(scripted.with_fallback(terminal)))
        }
        _ => Ok(terminal),
    }
}

/// Print an error and return the exit code
fn report_error(err: &BumpError) -> i32 {
    match err {
        BumpError::DirtyWorkingTree { changes } => {
            ui::display_status("Working tree has uncommitted changes:");
            for change in changes {
                println!("  {}", change);
            }
            ui::display_status("Release cancelled: commit or stash your changes first");
        }
        BumpError::UserCancelled => ui::display_status("Release cancelled"),
        BumpError::InvalidVersionFormat(_) => {
            ui::display_error(&err.to_string());
            ui::display_info(&format!("Expected format: {}", cli::EXPECTED_FORMAT));
        }
        _ => ui::display_error(&err.to_string()),
    }

    err.exit_code()
}
