use crate::error::{Result, VmError};
use crate::types::{PowerAction, Target};

/// Two-line banner printed on stdout for any malformed invocation.
pub const USAGE: &str = "Usage: vmrunctl <suspend|resume> <vm-id|->\n       vmrunctl status";

/// What the user asked for on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Status,
    Power { action: PowerAction, target: Target },
}

impl Invocation {
    /// Interpret the positional tokens following the program name.
    ///
    /// The action token is matched case-insensitively; the target is taken verbatim.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        let Some(first) = tokens.first() else {
            return Err(usage("no action given"));
        };

        let action = first.as_ref().to_lowercase();
        let power = match action.as_str() {
            "status" => {
                return match tokens.len() {
                    1 => Ok(Invocation::Status),
                    _ => Err(usage("status takes no arguments")),
                };
            }
            "suspend" => PowerAction::Suspend,
            "resume" => PowerAction::Resume,
            other => return Err(usage(format!("unknown action '{other}'"))),
        };

        match tokens {
            [_, target] => Ok(Invocation::Power {
                action: power,
                target: Target::from_arg(target.as_ref()),
            }),
            _ => Err(usage(format!("{power} takes exactly one target"))),
        }
    }
}

fn usage(reason: impl Into<String>) -> VmError {
    VmError::Usage {
        reason: reason.into(),
    }
}
