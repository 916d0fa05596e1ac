use std::io::Write;

use tracing::debug;

use crate::config::Config;
use crate::directory;
use crate::error::Result;
use crate::interpret::{OutputInterpreter, VmrunInterpreter, match_running};
use crate::report::Reporter;
use crate::runner::{ControlTool, ToolCommand};
use crate::types::{ActionResult, BatchReport, Outcome, PowerAction, RunningSet, Target, VmRecord};

/// Drives the control tool for the VMs in a configuration.
///
/// Every command is awaited before the next one is issued, in configuration order.
pub struct VmManager<T, I = VmrunInterpreter> {
    config: Config,
    tool: T,
    interpreter: I,
}

impl<T: ControlTool> VmManager<T, VmrunInterpreter> {
    pub fn new(config: Config, tool: T) -> Self {
        Self::with_interpreter(config, tool, VmrunInterpreter::new())
    }
}

impl<T: ControlTool, I: OutputInterpreter> VmManager<T, I> {
    pub fn with_interpreter(config: Config, tool: T, interpreter: I) -> Self {
        Self {
            config,
            tool,
            interpreter,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ask the control tool which VMs are running and match them against the configuration.
    pub async fn running(&self) -> Result<RunningSet> {
        let output = self
            .tool
            .run(&ToolCommand::list(&self.config.vmrun_path))
            .await?;
        if output.stdout.trim().is_empty() && !output.stderr.trim().is_empty() {
            debug!(
                stderr = %output.stderr.trim(),
                "list reported on stderr only; treating as none running"
            );
        }

        let paths = self.interpreter.running_paths(&output);
        let set = match_running(&paths, &self.config.virtual_machines);
        for path in &set.unmatched {
            debug!(path = %path, "running VM is not in the configuration");
        }
        Ok(set)
    }

    /// Report the configured VMs that are currently running.
    ///
    /// A `list` query that cannot be executed is reported as text and yields `None`;
    /// status never fails the invocation.
    pub async fn status<W: Write>(&self, reporter: &mut Reporter<W>) -> Option<RunningSet> {
        match self.running().await {
            Ok(set) => {
                reporter.running(&set);
                Some(set)
            }
            Err(e) => {
                let message = format!("{e}: {}", error_source(&e));
                debug!(error = %message, "list query failed");
                reporter.query_failed(&message);
                None
            }
        }
    }

    /// Suspend or resume the VMs selected by `target`.
    ///
    /// An unknown id fails before any command runs. Per-VM failures are recorded in
    /// the returned report and never stop the loop.
    pub async fn power<W: Write>(
        &self,
        action: PowerAction,
        target: &Target,
        reporter: &mut Reporter<W>,
    ) -> Result<BatchReport> {
        let vms: Vec<VmRecord> = match (target, action) {
            (Target::Id(id), _) => {
                vec![directory::find(&self.config.virtual_machines, id)?.clone()]
            }
            (Target::All, PowerAction::Resume) => self.config.virtual_machines.clone(),
            (Target::All, PowerAction::Suspend) => {
                let set = self.running().await?;
                reporter.unmatched(&set.unmatched);
                if set.running.is_empty() {
                    reporter.nothing_to_suspend();
                    return Ok(BatchReport::default());
                }
                set.running
            }
        };

        let mut report = BatchReport::default();
        for vm in vms {
            reporter.starting(action, &vm);
            let result = self.apply(action, vm).await;
            reporter.outcome(action, &result);
            report.results.push(result);
        }

        if *target == Target::All {
            reporter.summary(&report);
        }
        Ok(report)
    }

    async fn apply(&self, action: PowerAction, vm: VmRecord) -> ActionResult {
        let command = match action {
            PowerAction::Suspend => ToolCommand::suspend(&self.config.vmrun_path, &vm.path),
            PowerAction::Resume => ToolCommand::start(&self.config.vmrun_path, &vm.path),
        };
        debug!(vm = %vm.id, path = %vm.path, %action, "applying power action");

        let outcome = match self.tool.run(&command).await {
            Ok(output) => self.interpreter.classify(&output),
            Err(e) => Outcome::Failure {
                message: format!("{e}: {}", error_source(&e)),
            },
        };
        if let Outcome::Failure { message } = &outcome {
            debug!(vm = %vm.id, %action, error = %message, "power action failed");
        }

        ActionResult { vm, outcome }
    }
}

fn error_source(e: &(dyn std::error::Error + 'static)) -> String {
    e.source()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown error".to_string())
}
