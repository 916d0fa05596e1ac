use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VmError>;

#[derive(Debug, Error, Diagnostic)]
pub enum VmError {
    #[error("invalid arguments: {reason}")]
    #[diagnostic(code(vmrunctl::usage))]
    Usage { reason: String },

    #[error("failed to read configuration file {}", path.display())]
    #[diagnostic(
        code(vmrunctl::config::read),
        help("pass --config <PATH> or set VMRUNCTL_CONFIG to point at the configuration file")
    )]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {}: {detail}", path.display())]
    #[diagnostic(code(vmrunctl::config::parse))]
    ConfigParse { path: PathBuf, detail: String },

    #[error("configuration is missing a non-empty \"vmrunPath\"")]
    #[diagnostic(
        code(vmrunctl::config::vmrun_path),
        help("set \"vmrunPath\" to the absolute path of the vmrun executable")
    )]
    MissingVmrunPath,

    #[error("configuration field \"virtualMachines\" must be an array")]
    #[diagnostic(code(vmrunctl::config::virtual_machines))]
    VirtualMachinesNotArray,

    #[error("virtual machine entry #{index} has no valid \"{field}\"")]
    #[diagnostic(
        code(vmrunctl::config::record),
        help("every entry needs non-empty string \"id\" and \"path\" fields")
    )]
    InvalidVmRecord { index: usize, field: &'static str },

    #[error("virtual machine '{id}' not found in configuration")]
    #[diagnostic(code(vmrunctl::unknown_vm))]
    UnknownVm { id: String },

    #[error("failed to execute {}", program.display())]
    #[diagnostic(
        code(vmrunctl::tool::spawn),
        help("check that \"vmrunPath\" points at an existing executable")
    )]
    ToolSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
