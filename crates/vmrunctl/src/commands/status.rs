use std::process::ExitCode;

use miette::Result;
use vmrun_manager::{ControlTool, Reporter, VmManager};

/// Always succeeds: a `list` query that cannot run is reported as text.
pub async fn run<T: ControlTool>(mgr: &VmManager<T>) -> Result<ExitCode> {
    let mut reporter = Reporter::new(std::io::stdout());
    mgr.status(&mut reporter).await;
    Ok(ExitCode::SUCCESS)
}
