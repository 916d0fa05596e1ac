use std::fmt;

/// A virtual machine entry from the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmRecord {
    /// Lookup key used on the command line. Case-sensitive.
    pub id: String,
    /// Display label.
    pub name: String,
    /// Path of the VM descriptor (`.vmx`) as understood by the control tool.
    pub path: String,
}

impl fmt::Display for VmRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Power action applied to one or more VMs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Suspend,
    Resume,
}

impl PowerAction {
    /// Progressive verb used in progress lines.
    pub fn progressive(self) -> &'static str {
        match self {
            PowerAction::Suspend => "Suspending",
            PowerAction::Resume => "Resuming",
        }
    }

    pub fn past(self) -> &'static str {
        match self {
            PowerAction::Suspend => "suspended",
            PowerAction::Resume => "resumed",
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerAction::Suspend => write!(f, "suspend"),
            PowerAction::Resume => write!(f, "resume"),
        }
    }
}

/// Which VMs an action applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The `-` sentinel.
    All,
    Id(String),
}

impl Target {
    pub const ALL_SENTINEL: &'static str = "-";

    pub fn from_arg(arg: &str) -> Self {
        if arg == Self::ALL_SENTINEL {
            Target::All
        } else {
            Target::Id(arg.to_string())
        }
    }
}

/// Raw result of one control tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Outcome of a single suspend/resume attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The tool accepted the command. `note` carries non-fatal stderr text.
    Success { note: Option<String> },
    Failure { message: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub vm: VmRecord,
    pub outcome: Outcome,
}

/// Per-VM results of a suspend/resume run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub results: Vec<ActionResult>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Result of a `list` query matched against the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunningSet {
    /// Configured VMs reported running, in the order the tool listed them.
    pub running: Vec<VmRecord>,
    /// Running descriptor paths that no configured VM refers to.
    pub unmatched: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(vm: &str, outcome: Outcome) -> ActionResult {
        ActionResult {
            vm: VmRecord {
                id: vm.into(),
                name: vm.into(),
                path: format!("/vms/{vm}.vmx"),
            },
            outcome,
        }
    }

    #[test]
    fn target_sentinel() {
        assert_eq!(Target::from_arg("-"), Target::All);
        assert_eq!(Target::from_arg("vm1"), Target::Id("vm1".into()));
        assert_eq!(Target::from_arg("--"), Target::Id("--".into()));
    }

    #[test]
    fn batch_counts() {
        let report = BatchReport {
            results: vec![
                result("a", Outcome::Success { note: None }),
                result(
                    "b",
                    Outcome::Failure {
                        message: "Error: nope".into(),
                    },
                ),
                result(
                    "c",
                    Outcome::Success {
                        note: Some("warning".into()),
                    },
                ),
            ],
        };
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_empty());
    }

    #[test]
    fn record_display() {
        let vm = VmRecord {
            id: "vm1".into(),
            name: "Alpha".into(),
            path: "/vms/a.vmx".into(),
        };
        assert_eq!(vm.to_string(), "Alpha (vm1)");
    }
}
