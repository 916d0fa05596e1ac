pub mod power;
pub mod status;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use miette::Result;
use tracing::debug;
use vmrun_manager::{Config, Invocation, ProcessRunner, USAGE, VmManager, config};

#[derive(Parser)]
#[command(
    name = "vmrunctl",
    about = "Suspend, resume and list VMware virtual machines",
    version,
    override_usage = "vmrunctl [OPTIONS] <suspend|resume> <vm-id|->\n       vmrunctl [OPTIONS] status"
)]
pub struct Cli {
    /// Path to the JSON configuration file [default: config.json next to the executable]
    #[arg(long, env = "VMRUNCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Exit with status 1 if any suspend/resume action failed
    #[arg(long)]
    strict: bool,

    /// `status`, or `suspend`/`resume` followed by a VM id or `-` for all
    #[arg(value_name = "ACTION", allow_hyphen_values = true, trailing_var_arg = true)]
    args: Vec<String>,
}

impl Cli {
    /// Parse the process arguments. Anything clap rejects, other than `--help` and
    /// `--version`, ends in the usage banner on stdout and exit status 1.
    pub fn from_env() -> std::result::Result<Self, ExitCode> {
        match Cli::try_parse() {
            Ok(cli) => Ok(cli),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => {
                debug!(error = %e, "rejected command line");
                Err(usage())
            }
        }
    }

    pub async fn run(self) -> Result<ExitCode> {
        let invocation = match Invocation::parse(self.args.as_slice()) {
            Ok(invocation) => invocation,
            Err(e) => {
                debug!(error = %e, "rejected command line");
                return Ok(usage());
            }
        };

        let path = config::resolve_path(self.config.as_deref());
        let config = Config::load(&path).await?;
        let mgr = VmManager::new(config, ProcessRunner);

        match invocation {
            Invocation::Status => status::run(&mgr).await,
            Invocation::Power { action, target } => {
                power::run(&mgr, action, &target, self.strict).await
            }
        }
    }
}

fn usage() -> ExitCode {
    println!("{USAGE}");
    ExitCode::FAILURE
}
