use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, VmError};
use crate::types::VmRecord;

/// File name looked up next to the executable and in the user config directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Validated tool configuration. Loaded once per invocation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path of the `vmrun` control executable.
    pub vmrun_path: PathBuf,
    pub virtual_machines: Vec<VmRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    vmrun_path: Option<Value>,
    virtual_machines: Option<Value>,
}

impl Config {
    /// Read and validate the configuration file at `path`.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| VmError::ConfigRead {
                path: path.into(),
                source: e,
            })?;
        let config = Self::from_json(&text, path)?;
        debug!(
            path = %path.display(),
            vmrun = %config.vmrun_path.display(),
            vms = config.virtual_machines.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Parse and validate a configuration document. `origin` only feeds error messages.
    pub fn from_json(text: &str, origin: &Path) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(text).map_err(|e| VmError::ConfigParse {
            path: origin.into(),
            detail: e.to_string(),
        })?;

        let vmrun_path = raw
            .vmrun_path
            .as_ref()
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .ok_or(VmError::MissingVmrunPath)?;

        let entries = raw
            .virtual_machines
            .as_ref()
            .and_then(Value::as_array)
            .ok_or(VmError::VirtualMachinesNotArray)?;

        let virtual_machines = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| parse_record(index, entry))
            .collect::<Result<Vec<_>>>()?;

        let mut seen = HashSet::new();
        for vm in &virtual_machines {
            if !seen.insert(vm.id.as_str()) {
                warn!(vm = %vm.id, "duplicate virtual machine id; only the first entry is used");
            }
        }

        Ok(Self {
            vmrun_path,
            virtual_machines,
        })
    }
}

fn parse_record(index: usize, entry: &Value) -> Result<VmRecord> {
    let field = |name: &'static str| {
        entry
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let id = field("id").ok_or(VmError::InvalidVmRecord { index, field: "id" })?;
    let path = field("path").ok_or(VmError::InvalidVmRecord {
        index,
        field: "path",
    })?;
    let name = field("name").unwrap_or_else(|| id.clone());

    Ok(VmRecord { id, name, path })
}

/// Pick the configuration file to load.
///
/// An explicit path (from `--config` or `VMRUNCTL_CONFIG`) always wins. Otherwise
/// `config.json` next to the executable is used, falling back to
/// `{config_dir}/vmrunctl/config.json` when only that one exists.
pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    let sibling = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    choose_path(explicit, sibling, user_config_path())
}

fn choose_path(explicit: Option<&Path>, sibling: PathBuf, user: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if sibling.exists() {
        return sibling;
    }
    match user {
        Some(user) if user.exists() => user,
        _ => sibling,
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vmrunctl").join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Config> {
        Config::from_json(text, Path::new("test.json"))
    }

    #[test]
    fn parses_valid_config() {
        let config = parse(
            r#"{
                "vmrunPath": "/bin/vmrun",
                "virtualMachines": [
                    { "id": "vm1", "name": "Alpha", "path": "/vms/a.vmx" },
                    { "id": "vm2", "name": "Beta", "path": "/vms/b b.vmx" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.vmrun_path, PathBuf::from("/bin/vmrun"));
        assert_eq!(config.virtual_machines.len(), 2);
        assert_eq!(config.virtual_machines[1].name, "Beta");
        assert_eq!(config.virtual_machines[1].path, "/vms/b b.vmx");
    }

    #[test]
    fn empty_vm_list_is_valid() {
        let config = parse(r#"{"vmrunPath": "vmrun", "virtualMachines": []}"#).unwrap();
        assert!(config.virtual_machines.is_empty());
    }

    #[test]
    fn missing_vmrun_path() {
        let err = parse(r#"{"virtualMachines": []}"#).unwrap_err();
        assert!(matches!(err, VmError::MissingVmrunPath));

        let err = parse(r#"{"vmrunPath": "", "virtualMachines": []}"#).unwrap_err();
        assert!(matches!(err, VmError::MissingVmrunPath));

        let err = parse(r#"{"vmrunPath": 42, "virtualMachines": []}"#).unwrap_err();
        assert!(matches!(err, VmError::MissingVmrunPath));
    }

    #[test]
    fn virtual_machines_must_be_array() {
        let err = parse(r#"{"vmrunPath": "vmrun"}"#).unwrap_err();
        assert!(matches!(err, VmError::VirtualMachinesNotArray));

        let err = parse(r#"{"vmrunPath": "vmrun", "virtualMachines": {"id": "x"}}"#).unwrap_err();
        assert!(matches!(err, VmError::VirtualMachinesNotArray));
    }

    #[test]
    fn malformed_json() {
        let err = parse("{ not json").unwrap_err();
        assert!(matches!(err, VmError::ConfigParse { .. }));

        let err = parse("\"vmrun\"").unwrap_err();
        assert!(matches!(err, VmError::ConfigParse { .. }));
    }

    #[test]
    fn records_need_id_and_path() {
        let err = parse(
            r#"{"vmrunPath": "vmrun", "virtualMachines": [
                {"id": "vm1", "path": "/a.vmx"},
                {"name": "no id", "path": "/b.vmx"}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            VmError::InvalidVmRecord {
                index: 1,
                field: "id"
            }
        ));

        let err = parse(r#"{"vmrunPath": "vmrun", "virtualMachines": [{"id": "vm1"}]}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            VmError::InvalidVmRecord {
                index: 0,
                field: "path"
            }
        ));

        let err = parse(r#"{"vmrunPath": "vmrun", "virtualMachines": ["vm1"]}"#).unwrap_err();
        assert!(matches!(err, VmError::InvalidVmRecord { index: 0, .. }));
    }

    #[test]
    fn name_defaults_to_id() {
        let config =
            parse(r#"{"vmrunPath": "vmrun", "virtualMachines": [{"id": "vm1", "path": "/a.vmx"}]}"#)
                .unwrap();
        assert_eq!(config.virtual_machines[0].name, "vm1");
    }

    #[test]
    fn duplicate_ids_are_kept_in_order() {
        let config = parse(
            r#"{"vmrunPath": "vmrun", "virtualMachines": [
                {"id": "vm1", "name": "First", "path": "/a.vmx"},
                {"id": "vm1", "name": "Second", "path": "/b.vmx"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(config.virtual_machines.len(), 2);
        assert_eq!(config.virtual_machines[0].name, "First");
    }

    #[tokio::test]
    async fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        tokio::fs::write(
            &path,
            r#"{"vmrunPath": "/bin/vmrun", "virtualMachines": [{"id": "vm1", "name": "Alpha", "path": "/vms/a.vmx"}]}"#,
        )
        .await
        .unwrap();

        let config = Config::load(&path).await.unwrap();
        assert_eq!(config.virtual_machines[0].id, "vm1");
    }

    #[tokio::test]
    async fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = Config::load(&path).await.unwrap_err();
        match err {
            VmError::ConfigRead { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let sibling = dir.path().join("bin").join(CONFIG_FILE_NAME);
        std::fs::create_dir_all(sibling.parent().unwrap()).unwrap();
        std::fs::write(&sibling, "{}").unwrap();

        let explicit = Path::new("/etc/vmrunctl/custom.json");
        assert_eq!(choose_path(Some(explicit), sibling, None), explicit);
    }

    #[test]
    fn sibling_then_user_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let sibling = dir.path().join("bin").join(CONFIG_FILE_NAME);
        let user = dir.path().join("home").join("vmrunctl").join(CONFIG_FILE_NAME);
        for path in [&sibling, &user] {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        }

        // Neither exists: the sibling is reported so the read error names it.
        assert_eq!(
            choose_path(None, sibling.clone(), Some(user.clone())),
            sibling
        );

        std::fs::write(&user, "{}").unwrap();
        assert_eq!(choose_path(None, sibling.clone(), Some(user.clone())), user);

        std::fs::write(&sibling, "{}").unwrap();
        assert_eq!(choose_path(None, sibling.clone(), Some(user)), sibling);
    }

    #[test]
    fn missing_user_config_dir_falls_back_to_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let sibling = dir.path().join(CONFIG_FILE_NAME);
        assert_eq!(choose_path(None, sibling.clone(), None), sibling);
    }
}
