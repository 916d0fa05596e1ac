use crate::types::{Outcome, RunningSet, ToolOutput, VmRecord};

/// Turns control tool output into running-VM lists and per-VM outcomes.
///
/// The orchestration code only talks to this trait, so a tool with different
/// output conventions needs a new implementation and nothing else.
pub trait OutputInterpreter {
    /// Descriptor paths of running VMs from the output of a `list` command.
    fn running_paths(&self, output: &ToolOutput) -> Vec<String>;

    /// Outcome of a `suspend` or `start` command.
    fn classify(&self, output: &ToolOutput) -> Outcome;
}

/// Conventions of VMware's `vmrun`: `list` prints a header line followed by one
/// path per line, and fatal messages go to stderr prefixed with `Error:`.
#[derive(Debug, Clone)]
pub struct VmrunInterpreter {
    marker: String,
}

impl VmrunInterpreter {
    pub const ERROR_MARKER: &'static str = "Error:";

    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different failure marker on stderr.
    pub fn with_marker(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl Default for VmrunInterpreter {
    fn default() -> Self {
        Self::with_marker(Self::ERROR_MARKER)
    }
}

impl OutputInterpreter for VmrunInterpreter {
    fn running_paths(&self, output: &ToolOutput) -> Vec<String> {
        // stderr with nothing on stdout means no VMs are running
        output
            .stdout
            .lines()
            .skip(1)
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn classify(&self, output: &ToolOutput) -> Outcome {
        let stderr = output.stderr.trim();

        if stderr.contains(self.marker.as_str()) {
            return Outcome::Failure {
                message: stderr.to_string(),
            };
        }

        if !output.success() {
            let status = match output.status {
                Some(code) => format!("exit code {code}"),
                None => "a signal".to_string(),
            };
            let message = if stderr.is_empty() {
                format!("control tool terminated with {status}")
            } else {
                format!("control tool terminated with {status}: {stderr}")
            };
            return Outcome::Failure { message };
        }

        Outcome::Success {
            note: (!stderr.is_empty()).then(|| stderr.to_string()),
        }
    }
}

/// Match running descriptor paths against the configured VMs by exact path equality.
pub fn match_running(paths: &[String], vms: &[VmRecord]) -> RunningSet {
    let mut set = RunningSet::default();
    for path in paths {
        match vms.iter().find(|vm| vm.path == *path) {
            Some(vm) => set.running.push(vm.clone()),
            None => set.unmatched.push(path.clone()),
        }
    }
    set
}
