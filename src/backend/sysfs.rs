//! Linux backend: `/sys/class/dmi`, `/sys/class/firmware-attributes` and
//! `/sys/class/net`.

use super::Platform;
use crate::adapter::{AdapterPower, NetworkAdapter};
use crate::detect::Manufacturer;
use crate::detect::dmi::DmiInfo;
use crate::error::{Error, Result};
use crate::shell::CommandRunner;
use crate::sysfs::SysfsRoot;
use crate::vendor::lenovo::label_matches;
use crate::vendor::{InstrumentationStore, PropertyStore, Provisioned, SettingsCatalog};

const FIRMWARE_ATTRIBUTES: &str = "sys/class/firmware-attributes";
const NET_BASE: &str = "sys/class/net";

/// A firmware-attributes class driver and the kernel module providing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Driver {
    pub class: &'static str,
    pub module: &'static str,
}

pub const DELL_SYSMAN: Driver = Driver {
    class: "dell-wmi-sysman",
    module: "dell_wmi_sysman",
};
pub const HP_BIOSCFG: Driver = Driver {
    class: "hp-bioscfg",
    module: "hp_bioscfg",
};
pub const THINKLMI: Driver = Driver {
    class: "thinklmi",
    module: "think_lmi",
};

pub fn driver_for(manufacturer: &Manufacturer) -> Option<Driver> {
    match manufacturer {
        Manufacturer::Dell => Some(DELL_SYSMAN),
        Manufacturer::Hp => Some(HP_BIOSCFG),
        Manufacturer::Lenovo => Some(THINKLMI),
        Manufacturer::Unsupported(_) => None,
    }
}

/// One `/sys/class/firmware-attributes/<class>` directory.
#[derive(Debug, Clone)]
pub struct FirmwareAttributes {
    sysfs: SysfsRoot,
    driver: Driver,
}

impl FirmwareAttributes {
    pub fn new(sysfs: SysfsRoot, driver: Driver) -> Self {
        Self { sysfs, driver }
    }

    fn base(&self) -> String {
        format!("{}/{}", FIRMWARE_ATTRIBUTES, self.driver.class)
    }

    fn attributes_dir(&self) -> String {
        format!("{}/attributes", self.base())
    }

    fn attribute_file(&self, name: &str, file: &str) -> String {
        format!("{}/{}/{}", self.attributes_dir(), name, file)
    }

    pub fn is_present(&self) -> bool {
        self.sysfs.exists(self.base())
    }

    /// Attribute directories; `save_settings` and friends are plain files
    /// and get filtered out by requiring `current_value`.
    fn attribute_names(&self) -> Result<Vec<String>> {
        let names = self.sysfs.list_dir(self.attributes_dir()).map_err(|e| {
            Error::FirmwareRead {
                setting: self.driver.class.to_string(),
                detail: e.to_string(),
            }
        })?;
        Ok(names
            .into_iter()
            .filter(|n| self.sysfs.exists(self.attribute_file(n, "current_value")))
            .collect())
    }

    fn display_name(&self, name: &str) -> String {
        self.sysfs
            .read_optional(self.attribute_file(name, "display_name"))
            .ok()
            .flatten()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| name.to_string())
    }

    /// Match `value` against `possible_values` ignoring case, so the kernel
    /// receives the spelling it advertises.
    fn canonical_value(&self, name: &str, value: &str) -> String {
        let possible = self
            .sysfs
            .read_optional(self.attribute_file(name, "possible_values"))
            .ok()
            .flatten();
        possible
            .as_deref()
            .and_then(|p| {
                p.split(';')
                    .map(str::trim)
                    .find(|candidate| candidate.eq_ignore_ascii_case(value))
            })
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string())
    }

    fn read_value(&self, name: &str) -> Result<String> {
        self.sysfs
            .read(self.attribute_file(name, "current_value"))
            .map_err(|e| Error::FirmwareRead {
                setting: name.to_string(),
                detail: e.to_string(),
            })
    }

    fn write_value(&self, name: &str, value: &str) -> Result<()> {
        let value = self.canonical_value(name, value);
        tracing::debug!(driver = self.driver.class, name, %value, "writing firmware attribute");
        self.sysfs
            .write(self.attribute_file(name, "current_value"), &value)
            .map_err(|e| Error::FirmwareWrite {
                setting: name.to_string(),
                detail: e.to_string(),
            })
    }
}

impl PropertyStore for FirmwareAttributes {
    fn get(&self, name: &str) -> Result<String> {
        self.read_value(name)
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        self.write_value(name, value)
    }
}

impl SettingsCatalog for FirmwareAttributes {
    fn find(&self, needle: &str) -> Result<Vec<String>> {
        let needle = needle.to_ascii_lowercase();
        Ok(self
            .attribute_names()?
            .into_iter()
            .filter(|n| self.display_name(n).to_ascii_lowercase().contains(&needle))
            .collect())
    }

    fn get(&self, name: &str) -> Result<String> {
        self.read_value(name)
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        self.write_value(name, value)
    }
}

impl InstrumentationStore for FirmwareAttributes {
    fn current_settings(&self) -> Result<Vec<String>> {
        let mut entries = Vec::new();
        for name in self.attribute_names()? {
            match self.read_value(&name) {
                Ok(value) => entries.push(format!("{},{}", name, value)),
                Err(e) => tracing::debug!(error = %e, "skipping unreadable attribute"),
            }
        }
        Ok(entries)
    }

    fn set_setting(&self, assignment: &str) -> Result<()> {
        let (label, value) = assignment.split_once(',').ok_or_else(|| Error::FirmwareWrite {
            setting: assignment.to_string(),
            detail: "expected Label,Value".to_string(),
        })?;
        let name = self
            .attribute_names()?
            .into_iter()
            .find(|n| label_matches(n, label) || label_matches(&self.display_name(n), label))
            .ok_or_else(|| Error::FirmwareWrite {
                setting: label.to_string(),
                detail: "no such attribute".to_string(),
            })?;
        self.write_value(&name, value)
    }

    /// thinklmi commits immediately in `single` mode; `bulk` mode needs an
    /// explicit `save`.
    fn save_settings(&self) -> Result<()> {
        let path = format!("{}/save_settings", self.attributes_dir());
        match self.sysfs.read_optional(&path)? {
            Some(mode) if mode == "bulk" => {
                self.sysfs
                    .write(&path, "save")
                    .map_err(|e| Error::FirmwareWrite {
                        setting: "save_settings".to_string(),
                        detail: e.to_string(),
                    })
            }
            _ => Ok(()),
        }
    }
}

/// Network interfaces whose device exposes `power/wakeup`.
#[derive(Debug, Clone)]
pub struct NetAdapters {
    sysfs: SysfsRoot,
}

impl NetAdapters {
    pub fn new(sysfs: SysfsRoot) -> Self {
        Self { sysfs }
    }

    fn wakeup_path(iface: &str) -> String {
        format!("{}/{}/device/power/wakeup", NET_BASE, iface)
    }
}

impl AdapterPower for NetAdapters {
    fn list_adapters(&self) -> Result<Vec<NetworkAdapter>> {
        let ifaces = self
            .sysfs
            .list_dir(NET_BASE)
            .map_err(|e| Error::AdapterEnumeration(e.to_string()))?;

        let mut adapters = Vec::new();
        for iface in ifaces {
            // Virtual interfaces have no device/ and are never wake sources
            let Ok(Some(state)) = self.sysfs.read_optional(Self::wakeup_path(&iface)) else {
                continue;
            };
            adapters.push(NetworkAdapter {
                wake_enabled: state == "enabled",
                id: iface,
            });
        }
        Ok(adapters)
    }

    fn enable_wake(&self, adapter: &NetworkAdapter) -> Result<()> {
        self.sysfs
            .write(Self::wakeup_path(&adapter.id), "enabled")
            .map_err(|e| Error::AdapterSet {
                adapter: adapter.id.clone(),
                detail: e.to_string(),
            })
    }
}

pub struct SysfsPlatform<R> {
    sysfs: SysfsRoot,
    runner: R,
    dell: FirmwareAttributes,
    hp: FirmwareAttributes,
    lenovo: FirmwareAttributes,
    adapters: NetAdapters,
}

impl<R: CommandRunner> SysfsPlatform<R> {
    pub fn new(sysfs: SysfsRoot, runner: R) -> Self {
        Self {
            dell: FirmwareAttributes::new(sysfs.clone(), DELL_SYSMAN),
            hp: FirmwareAttributes::new(sysfs.clone(), HP_BIOSCFG),
            lenovo: FirmwareAttributes::new(sysfs.clone(), THINKLMI),
            adapters: NetAdapters::new(sysfs.clone()),
            sysfs,
            runner,
        }
    }
}

impl<R: CommandRunner> Platform for SysfsPlatform<R> {
    fn manufacturer(&self) -> Result<String> {
        let dmi = DmiInfo::detect(&self.sysfs);
        dmi.manufacturer()
            .map(str::to_string)
            .ok_or_else(|| Error::Other("no DMI vendor information".to_string()))
    }

    fn provision(&self, manufacturer: &Manufacturer) -> Result<Provisioned> {
        let driver = driver_for(manufacturer)
            .ok_or_else(|| Error::UnsupportedManufacturer(manufacturer.to_string()))?;
        let attributes = FirmwareAttributes::new(self.sysfs.clone(), driver);
        let requirement = driver.module.to_string();

        if attributes.is_present() {
            return Ok(Provisioned::Ready { requirement });
        }

        tracing::info!(module = driver.module, "firmware-attributes class missing, loading module");
        self.runner
            .run("modprobe", &[driver.module])
            .map_err(|e| Error::Provisioning {
                requirement: requirement.clone(),
                detail: e.to_string(),
            })?;

        if attributes.is_present() {
            Ok(Provisioned::Installed { requirement })
        } else {
            Err(Error::Provisioning {
                requirement,
                detail: format!("{} not present after loading", attributes.base()),
            })
        }
    }

    fn dell(&self) -> &dyn PropertyStore {
        &self.dell
    }

    fn hp(&self) -> &dyn SettingsCatalog {
        &self.hp
    }

    fn lenovo(&self) -> &dyn InstrumentationStore {
        &self.lenovo
    }

    fn adapters(&self) -> &dyn AdapterPower {
        &self.adapters
    }
}
