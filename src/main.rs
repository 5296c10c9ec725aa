use anyhow::{Context, Result};
use clap::Parser;
use prebuild_matrix::args::split_known_args;
use prebuild_matrix::command::ProcessRunner;
use prebuild_matrix::config::MatrixConfig;
use prebuild_matrix::matrix::{BuildQueue, Selector};
use prebuild_matrix::output;
use prebuild_matrix::runner::{plan_commands, run_matrix};
use std::process;

/// Build and package multiple architecture and Node.js version targets.
#[derive(Parser, Debug)]
#[command(
    name = "prebuild-matrix",
    version,
    about,
    override_usage = "prebuild-matrix [-h] [--target=TARGET] [--target_arch=TARGET_ARCH] [--dry-run] [OPTIONS...]",
    after_help = "Any other options are passed through to node-pre-gyp.\n\nExamples:\n  prebuild-matrix --target=all --target_arch=all\n  prebuild-matrix --target=8.0.0 --target_arch=x64 --debug\n  prebuild-matrix --target=all --dry-run",
    args_override_self = true
)]
struct Cli {
    /// Target Node.js version (>=4.0.0, or all).
    #[arg(long = "target", value_name = "TARGET")]
    target: Option<String>,

    /// Target architecture (ia32, x64, or all).
    #[arg(long = "target_arch", value_name = "TARGET_ARCH")]
    target_arch: Option<String>,

    /// Print the commands that would run without executing them.
    #[arg(long)]
    dry_run: bool,
}

/// Expand the matrix and run it. Returns the process exit code.
fn run(cli: Cli, passthrough: Vec<String>) -> Result<i32> {
    let cwd = std::env::current_dir().context("failed to determine working directory")?;
    let config = MatrixConfig::load(&cwd)?;

    let queue = BuildQueue::expand(
        &Selector::parse(cli.target_arch.as_deref()),
        &Selector::parse(cli.target.as_deref()),
        &config.axes(),
    );
    let plan = config.tool_plan(&cwd);

    if cli.dry_run {
        for cmd in plan_commands(&queue, &plan, &passthrough) {
            println!("{}", cmd.display());
        }
        return Ok(0);
    }

    let outcome = run_matrix(&queue, &plan, &passthrough, &mut ProcessRunner)?;
    Ok(outcome.exit_code())
}

fn main() {
    let split = split_known_args(std::env::args());
    let cli = Cli::parse_from(split.known);

    match run(cli, split.passthrough) {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(e) => {
            output::error(&e);
            process::exit(1);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
