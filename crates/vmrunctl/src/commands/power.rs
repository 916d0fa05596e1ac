use std::process::ExitCode;

use miette::Result;
use tracing::info;
use vmrun_manager::{ControlTool, PowerAction, Reporter, Target, VmManager};

pub async fn run<T: ControlTool>(
    mgr: &VmManager<T>,
    action: PowerAction,
    target: &Target,
    strict: bool,
) -> Result<ExitCode> {
    let mut reporter = Reporter::new(std::io::stdout());
    let report = mgr.power(action, target, &mut reporter).await?;

    if strict && report.failed() > 0 {
        info!(failed = report.failed(), "--strict: exiting with failure");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
