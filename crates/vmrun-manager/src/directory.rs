use crate::error::{Result, VmError};
use crate::types::VmRecord;

/// Find a configured VM by exact, case-sensitive id. The first match wins.
pub fn find<'a>(vms: &'a [VmRecord], id: &str) -> Result<&'a VmRecord> {
    vms.iter()
        .find(|vm| vm.id == id)
        .ok_or_else(|| VmError::UnknownVm { id: id.to_string() })
}
