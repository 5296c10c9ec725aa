//! Packaging tool invocation.
//!
//! The tool is executed directly with an argument vector (no shell), with
//! stdio inherited so its output reaches the terminal unchanged.

use crate::matrix::BuildTarget;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

/// Subcommands issued to the tool for every target.
pub const BUILD_SUBCOMMANDS: &[&str] = &["configure", "build"];

/// Appended after [`BUILD_SUBCOMMANDS`] unless packaging is disabled.
pub const PACKAGE_SUBCOMMAND: &str = "package";

/// The resolved tool path plus the fixed subcommands to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPlan {
    pub program: PathBuf,
    pub subcommands: Vec<String>,
}

impl ToolPlan {
    pub fn new(program: PathBuf, package: bool) -> Self {
        let mut subcommands: Vec<String> =
            BUILD_SUBCOMMANDS.iter().map(|s| s.to_string()).collect();
        if package {
            subcommands.push(PACKAGE_SUBCOMMAND.to_string());
        }
        Self {
            program,
            subcommands,
        }
    }
}

/// One fully formed tool command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl BuildCommand {
    /// Build the command for one target.
    ///
    /// Argument order: subcommands, `--target=`, `--target_arch=`, then the
    /// pass-through arguments. Empty target components are left out.
    pub fn for_target(plan: &ToolPlan, target: BuildTarget<'_>, passthrough: &[String]) -> Self {
        let mut args = plan.subcommands.clone();
        if !target.version.is_empty() {
            args.push(format!("--target={}", target.version));
        }
        if !target.arch.is_empty() {
            args.push(format!("--target_arch={}", target.arch));
        }
        args.extend(passthrough.iter().cloned());
        Self {
            program: plan.program.clone(),
            args,
        }
    }

    /// Render as a single line for status output. Not shell-escaped beyond
    /// quoting arguments that contain whitespace.
    pub fn display(&self) -> String {
        let mut parts = vec![quote(&self.program.to_string_lossy())];
        parts.extend(self.args.iter().map(String::as_str).map(quote));
        parts.join(" ")
    }
}

fn quote(s: &str) -> String {
    if s.is_empty() || s.chars().any(char::is_whitespace) {
        format!("'{s}'")
    } else {
        s.to_string()
    }
}

/// Executes build commands. Returns the child's exit code.
pub trait ToolRunner {
    fn run(&mut self, cmd: &BuildCommand) -> Result<i32>;
}

/// Spawns the real tool and waits for it.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(&mut self, cmd: &BuildCommand) -> Result<i32> {
        let status = Command::new(&cmd.program)
            .args(&cmd.args)
            .status()
            .with_context(|| format!("failed to execute {}", cmd.program.display()))?;
        Ok(exit_code_of(status))
    }
}

/// Map a child's exit status to the code this process should exit with.
///
/// Signal deaths follow the shell convention of `128 + signal`.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> ToolPlan {
        ToolPlan::new(PathBuf::from("/proj/node_modules/.bin/node-pre-gyp"), true)
    }

    fn target<'a>(arch: &'a str, version: &'a str) -> BuildTarget<'a> {
        BuildTarget { arch, version }
    }

    #[test]
    fn plan_includes_package_by_default() {
        assert_eq!(plan().subcommands, vec!["configure", "build", "package"]);
    }

    #[test]
    fn plan_without_package() {
        let plan = ToolPlan::new(PathBuf::from("node-pre-gyp"), false);
        assert_eq!(plan.subcommands, vec!["configure", "build"]);
    }

    #[test]
    fn command_has_both_tokens() {
        let cmd = BuildCommand::for_target(&plan(), target("x64", "8.0.0"), &[]);
        assert_eq!(
            cmd.args,
            vec![
                "configure",
                "build",
                "package",
                "--target=8.0.0",
                "--target_arch=x64"
            ]
        );
        assert_eq!(
            cmd.program,
            PathBuf::from("/proj/node_modules/.bin/node-pre-gyp")
        );
    }

    #[test]
    fn empty_version_omits_target_token() {
        let cmd = BuildCommand::for_target(&plan(), target("ia32", ""), &[]);
        assert!(!cmd.args.iter().any(|a| a.starts_with("--target=")));
        assert!(cmd.args.contains(&"--target_arch=ia32".to_string()));
    }

    #[test]
    fn empty_arch_omits_target_arch_token() {
        let cmd = BuildCommand::for_target(&plan(), target("", "6.0.0"), &[]);
        assert!(!cmd.args.iter().any(|a| a.starts_with("--target_arch=")));
        assert!(cmd.args.contains(&"--target=6.0.0".to_string()));
    }

    #[test]
    fn passthrough_appended_verbatim_after_tokens() {
        let passthrough = vec![
            "--debug".to_string(),
            "--msvs_version=2015".to_string(),
            "two words".to_string(),
        ];
        let cmd = BuildCommand::for_target(&plan(), target("x64", "9.0.0"), &passthrough);
        assert_eq!(&cmd.args[5..], passthrough.as_slice());
    }

    #[test]
    fn display_quotes_whitespace() {
        let cmd = BuildCommand {
            program: PathBuf::from("tool"),
            args: vec!["build".into(), "a b".into()],
        };
        assert_eq!(cmd.display(), "tool build 'a b'");
    }

    #[cfg(unix)]
    #[test]
    fn exit_code_of_plain_exit() {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(exit_code_of(ExitStatus::from_raw(0)), 0);
        assert_eq!(exit_code_of(ExitStatus::from_raw(3 << 8)), 3);
    }

    #[cfg(unix)]
    #[test]
    fn exit_code_of_signal_death() {
        use std::os::unix::process::ExitStatusExt;
        // raw wait status 9 == killed by SIGKILL
        assert_eq!(exit_code_of(ExitStatus::from_raw(9)), 137);
    }

    #[test]
    fn process_runner_reports_missing_tool() {
        let cmd = BuildCommand {
            program: PathBuf::from("/nonexistent/prebuild-matrix-test/tool"),
            args: vec![],
        };
        let err = ProcessRunner.run(&cmd).unwrap_err();
        assert!(err.to_string().contains("failed to execute"));
    }
}
