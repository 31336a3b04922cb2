//! Production implementations of the external collaborators: system
//! identity, provisioning, the three vendor stores and the adapter
//! controller.

pub mod powershell;
pub mod sysfs;

use crate::adapter::AdapterPower;
use crate::detect::Manufacturer;
use crate::error::Result;
use crate::shell::SystemRunner;
use crate::sysfs::SysfsRoot;
use crate::vendor::{InstrumentationStore, PropertyStore, Provisioned, SettingsCatalog};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything the evaluator needs from the machine it runs on.
pub trait Platform {
    /// Raw manufacturer string from the system identity query.
    fn manufacturer(&self) -> Result<String>;

    /// Make sure the vendor channel for `manufacturer` is usable,
    /// installing or loading it if missing.
    fn provision(&self, manufacturer: &Manufacturer) -> Result<Provisioned>;

    fn dell(&self) -> &dyn PropertyStore;
    fn hp(&self) -> &dyn SettingsCatalog;
    fn lenovo(&self) -> &dyn InstrumentationStore;
    fn adapters(&self) -> &dyn AdapterPower;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// PowerShell on Windows, sysfs elsewhere.
    #[default]
    Auto,
    /// Linux firmware-attributes class and /sys/class/net.
    Sysfs,
    /// Vendor PowerShell modules and WMI.
    Powershell,
}

impl BackendKind {
    fn for_host() -> Self {
        if cfg!(windows) {
            BackendKind::Powershell
        } else {
            BackendKind::Sysfs
        }
    }
}

/// Open the platform for `kind`. `root` redirects the sysfs backend to a
/// captured tree.
pub fn open(kind: BackendKind, root: Option<&Path>) -> Box<dyn Platform> {
    match kind {
        BackendKind::Auto => open(BackendKind::for_host(), root),
        BackendKind::Sysfs => {
            let sysfs = root.map(SysfsRoot::new).unwrap_or_else(SysfsRoot::system);
            tracing::debug!(root = %sysfs.path("").display(), "using sysfs backend");
            Box::new(sysfs::SysfsPlatform::new(sysfs, SystemRunner))
        }
        BackendKind::Powershell => {
            tracing::debug!("using powershell backend");
            Box::new(powershell::PowerShellPlatform::new(SystemRunner))
        }
    }
}
