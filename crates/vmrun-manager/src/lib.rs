//! Suspend, resume and list VMware virtual machines through the `vmrun` control tool.
//!
//! The VMs are described by a JSON configuration mapping short ids to `.vmx`
//! descriptor paths. [`VmManager`] runs the tool once per VM, strictly in order,
//! and [`Reporter`] prints what happened.

pub mod config;
pub mod directory;
pub mod error;
pub mod interpret;
pub mod invocation;
pub mod manager;
pub mod report;
pub mod runner;
pub mod types;

pub use config::Config;
pub use error::{Result, VmError};
pub use interpret::{OutputInterpreter, VmrunInterpreter};
pub use invocation::{Invocation, USAGE};
pub use manager::VmManager;
pub use report::Reporter;
pub use runner::{ControlTool, ProcessRunner, ToolCommand};
pub use types::{ActionResult, BatchReport, Outcome, PowerAction, RunningSet, Target, ToolOutput, VmRecord};
