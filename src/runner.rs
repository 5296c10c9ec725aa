//! Sequential execution of a build queue.

use crate::command::{BuildCommand, ToolPlan, ToolRunner};
use crate::matrix::BuildQueue;
use crate::output;
use anyhow::Result;

/// How a matrix run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every target built successfully.
    Completed { builds: usize },
    /// A target failed; nothing after it was attempted.
    Failed {
        arch: String,
        version: String,
        code: i32,
        /// Targets that succeeded before the failure.
        completed: usize,
    },
}

impl RunOutcome {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Completed { .. } => 0,
            RunOutcome::Failed { code, .. } => *code,
        }
    }
}

/// Every command the queue expands to, in execution order.
pub fn plan_commands(
    queue: &BuildQueue,
    plan: &ToolPlan,
    passthrough: &[String],
) -> Vec<BuildCommand> {
    queue
        .targets()
        .map(|t| BuildCommand::for_target(plan, t, passthrough))
        .collect()
}

/// Run every target in queue order, stopping at the first non-zero exit.
///
/// Spawn failures are returned as errors; a tool that ran and failed is a
/// [`RunOutcome::Failed`].
pub fn run_matrix(
    queue: &BuildQueue,
    plan: &ToolPlan,
    passthrough: &[String],
    runner: &mut dyn ToolRunner,
) -> Result<RunOutcome> {
    let total = queue.len();

    for (i, target) in queue.targets().enumerate() {
        let cmd = BuildCommand::for_target(plan, target, passthrough);
        output::action("Building", &format!("{target} ({}/{total})", i + 1));
        output::detail(&cmd.display());

        let code = runner.run(&cmd)?;
        if code != 0 {
            output::fail("Failed", &format!("{target} (exit code {code})"));
            return Ok(RunOutcome::Failed {
                arch: target.arch.to_string(),
                version: target.version.to_string(),
                code,
                completed: i,
            });
        }
    }

    let noun = if total == 1 { "build" } else { "builds" };
    output::success("Finished", &format!("{total} {noun}"));
    Ok(RunOutcome::Completed { builds: total })
}
