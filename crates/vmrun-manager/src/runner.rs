use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, VmError};
use crate::types::ToolOutput;

/// One invocation of the control tool.
///
/// Arguments are passed to the process as-is, so paths containing spaces need no
/// quoting; the `Display` form quotes the program and any path argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    // Parallel to `args`; only the builders below push to either.
    quoted: Vec<bool>,
}

impl ToolCommand {
    fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            quoted: Vec::new(),
        }
    }

    fn arg(mut self, arg: &str) -> Self {
        self.args.push(arg.to_string());
        self.quoted.push(false);
        self
    }

    fn path_arg(mut self, path: &str) -> Self {
        self.args.push(path.to_string());
        self.quoted.push(true);
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// `<tool> list`
    pub fn list(program: impl Into<PathBuf>) -> Self {
        Self::new(program).arg("list")
    }

    /// `<tool> suspend "<vmPath>"`
    pub fn suspend(program: impl Into<PathBuf>, vm_path: &str) -> Self {
        Self::new(program).arg("suspend").path_arg(vm_path)
    }

    /// `<tool> start "<vmPath>" nogui`
    pub fn start(program: impl Into<PathBuf>, vm_path: &str) -> Self {
        Self::new(program).arg("start").path_arg(vm_path).arg("nogui")
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.program.display())?;
        for (arg, quoted) in self.args.iter().zip(&self.quoted) {
            if *quoted {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Executes control tool commands.
///
/// Implementations run one command at a time and return its captured output. A
/// non-zero exit status is not an error at this layer; only failing to run the
/// process at all is.
#[allow(async_fn_in_trait)]
pub trait ControlTool {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput>;
}

/// Runs the control tool as a child process and waits for it to exit.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ControlTool for ProcessRunner {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        debug!(command = %command, "running control tool");

        let output = tokio::process::Command::new(&command.program)
            .args(&command.args)
            .output()
            .await
            .map_err(|e| VmError::ToolSpawn {
                program: command.program.clone(),
                source: e,
            })?;

        let output = ToolOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            status = ?output.status,
            stdout = %output.stdout.trim_end(),
            stderr = %output.stderr.trim_end(),
            "control tool finished"
        );
        Ok(output)
    }
}
