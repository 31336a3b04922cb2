//! Windows backend: vendor PowerShell modules and WMI classes.

use super::Platform;
use crate::adapter::{AdapterPower, NetworkAdapter};
use crate::detect::Manufacturer;
use crate::error::{Error, Result};
use crate::shell::{CommandRunner, PowerShell, ps_quote};
use crate::vendor::{InstrumentationStore, PropertyStore, Provisioned, SettingsCatalog};
use serde::Deserialize;
use std::rc::Rc;

pub const DELL_MODULE: &str = "DellBIOSProvider";
pub const HP_MODULE: &str = "HPCMSL";
const DELL_ATTRIBUTE_ROOT: &str = r"DellSmbios:\PowerManagement";
const LENOVO_SETTING_CLASS: &str = "Lenovo_BiosSetting";
/// Lenovo WMI methods report this string on success.
const LENOVO_SUCCESS: &str = "Success";

fn lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Script that makes `module` importable, upgrading PowerShellGet when it
/// is too old to install from the gallery. Prints `ready`, `installed` or
/// `rerun`.
fn provision_module_script(module: &str) -> String {
    let module = ps_quote(module);
    [
        "$ErrorActionPreference = 'Stop'".to_string(),
        format!("if (Get-Module -ListAvailable -Name {module}) {{ 'ready'; return }}"),
        "[Net.ServicePointManager]::SecurityProtocol = [Net.SecurityProtocolType]::Tls12".to_string(),
        "if (-not (Get-PackageProvider -ListAvailable -Name NuGet -ErrorAction SilentlyContinue)) { Install-PackageProvider -Name NuGet -Force | Out-Null }".to_string(),
        "$psget = Get-Module -ListAvailable -Name PowerShellGet | Sort-Object Version -Descending | Select-Object -First 1".to_string(),
        "if ($psget.Version -lt [version]'2.0') { Install-Module -Name PowerShellGet -Force -AllowClobber -Scope AllUsers; 'rerun'; return }".to_string(),
        format!("Install-Module -Name {module} -Force -AllowClobber -Scope AllUsers"),
        "'installed'".to_string(),
    ]
    .join("; ")
}

fn parse_provision_output(output: &str, requirement: &str) -> Result<Provisioned> {
    let token = lines(output).pop().unwrap_or_default();
    let requirement = requirement.to_string();
    match token.as_str() {
        "ready" => Ok(Provisioned::Ready { requirement }),
        "installed" => Ok(Provisioned::Installed { requirement }),
        "rerun" => Ok(Provisioned::RerunRequired {
            requirement: "PowerShellGet".to_string(),
        }),
        other => Err(Error::Provisioning {
            requirement,
            detail: format!("unexpected provisioning output '{}'", other),
        }),
    }
}

/// Dell BIOS attributes through the `DellSmbios:` provider drive.
pub struct DellSmbios<R> {
    ps: Rc<PowerShell<R>>,
}

impl<R: CommandRunner> PropertyStore for DellSmbios<R> {
    fn get(&self, name: &str) -> Result<String> {
        let path = ps_quote(&format!(r"{}\{}", DELL_ATTRIBUTE_ROOT, name));
        self.ps
            .script(&format!(
                "Import-Module {DELL_MODULE} -ErrorAction Stop; (Get-Item -Path {path}).CurrentValue"
            ))
            .map_err(|e| Error::FirmwareRead {
                setting: name.to_string(),
                detail: e.to_string(),
            })
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        let path = ps_quote(&format!(r"{}\{}", DELL_ATTRIBUTE_ROOT, name));
        self.ps
            .script(&format!(
                "Import-Module {DELL_MODULE} -ErrorAction Stop; Set-Item -Path {path} -Value {}",
                ps_quote(value)
            ))
            .map(|_| ())
            .map_err(|e| Error::FirmwareWrite {
                setting: name.to_string(),
                detail: e.to_string(),
            })
    }
}

/// HP BIOS settings through the HP Client Management Script Library.
pub struct HpCmsl<R> {
    ps: Rc<PowerShell<R>>,
}

impl<R: CommandRunner> SettingsCatalog for HpCmsl<R> {
    fn find(&self, needle: &str) -> Result<Vec<String>> {
        // -like is case-insensitive
        let pattern = ps_quote(&format!("*{}*", needle));
        let output = self
            .ps
            .script(&format!(
                "Import-Module {HP_MODULE} -ErrorAction Stop; Get-HPBIOSSettingsList | Where-Object {{ $_.Name -like {pattern} }} | ForEach-Object {{ $_.Name }}"
            ))
            .map_err(|e| Error::FirmwareRead {
                setting: needle.to_string(),
                detail: e.to_string(),
            })?;
        Ok(lines(&output))
    }

    fn get(&self, name: &str) -> Result<String> {
        self.ps
            .script(&format!(
                "Import-Module {HP_MODULE} -ErrorAction Stop; Get-HPBIOSSettingValue -Name {}",
                ps_quote(name)
            ))
            .map_err(|e| Error::FirmwareRead {
                setting: name.to_string(),
                detail: e.to_string(),
            })
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        self.ps
            .script(&format!(
                "Import-Module {HP_MODULE} -ErrorAction Stop; Set-HPBIOSSettingValue -Name {} -Value {}",
                ps_quote(name),
                ps_quote(value)
            ))
            .map(|_| ())
            .map_err(|e| Error::FirmwareWrite {
                setting: name.to_string(),
                detail: e.to_string(),
            })
    }
}

/// Lenovo BIOS settings through the `root\wmi` Lenovo classes.
pub struct LenovoWmi<R> {
    ps: Rc<PowerShell<R>>,
}

impl<R: CommandRunner> LenovoWmi<R> {
    fn call(&self, setting: &str, script: &str) -> Result<()> {
        let returned = self.ps.script(script).map_err(|e| Error::FirmwareWrite {
            setting: setting.to_string(),
            detail: e.to_string(),
        })?;
        if returned.trim() == LENOVO_SUCCESS {
            Ok(())
        } else {
            Err(Error::FirmwareWrite {
                setting: setting.to_string(),
                detail: returned.trim().to_string(),
            })
        }
    }
}

impl<R: CommandRunner> InstrumentationStore for LenovoWmi<R> {
    fn current_settings(&self) -> Result<Vec<String>> {
        let output = self
            .ps
            .script(&format!(
                "Get-CimInstance -Namespace root/wmi -ClassName {LENOVO_SETTING_CLASS} | ForEach-Object {{ $_.CurrentSetting }}"
            ))
            .map_err(|e| Error::FirmwareRead {
                setting: LENOVO_SETTING_CLASS.to_string(),
                detail: e.to_string(),
            })?;
        Ok(lines(&output))
    }

    fn set_setting(&self, assignment: &str) -> Result<()> {
        self.call(
            assignment,
            &format!(
                "(Get-WmiObject -Namespace root/wmi -Class Lenovo_SetBiosSetting).SetBiosSetting({}).return",
                ps_quote(assignment)
            ),
        )
    }

    fn save_settings(&self) -> Result<()> {
        self.call(
            "SaveBiosSettings",
            "(Get-WmiObject -Namespace root/wmi -Class Lenovo_SaveBiosSettings).SaveBiosSettings().return",
        )
    }
}

#[derive(Debug, Deserialize)]
struct WakeEnableRow {
    #[serde(rename = "InstanceName")]
    instance_name: String,
    #[serde(rename = "Enable")]
    enable: bool,
}

fn parse_adapters(output: &str) -> Result<Vec<NetworkAdapter>> {
    if output.trim().is_empty() {
        return Ok(Vec::new());
    }
    let rows: Vec<WakeEnableRow> =
        serde_json::from_str(output).map_err(|e| Error::Parse {
            context: "MSPower_DeviceWakeEnable".to_string(),
            detail: e.to_string(),
        })?;
    Ok(rows
        .into_iter()
        .map(|row| NetworkAdapter {
            id: row.instance_name,
            wake_enabled: row.enable,
        })
        .collect())
}

/// Physical adapters' `MSPower_DeviceWakeEnable` entries.
pub struct WmiAdapters<R> {
    ps: Rc<PowerShell<R>>,
}

impl<R: CommandRunner> AdapterPower for WmiAdapters<R> {
    fn list_adapters(&self) -> Result<Vec<NetworkAdapter>> {
        let script = [
            "$nics = @(Get-CimInstance -ClassName Win32_NetworkAdapter -Filter 'PhysicalAdapter=True' | ForEach-Object { $_.PNPDeviceID })",
            "$rows = @(Get-CimInstance -Namespace root/wmi -ClassName MSPower_DeviceWakeEnable | Where-Object { $n = $_.InstanceName; $nics | Where-Object { $n -like ($_ + '*') } } | Select-Object InstanceName, Enable)",
            "ConvertTo-Json -InputObject $rows -Compress",
        ]
        .join("; ");
        let output = self
            .ps
            .script(&script)
            .map_err(|e| Error::AdapterEnumeration(e.to_string()))?;
        parse_adapters(&output).map_err(|e| Error::AdapterEnumeration(e.to_string()))
    }

    fn enable_wake(&self, adapter: &NetworkAdapter) -> Result<()> {
        self.ps
            .script(&format!(
                "Get-CimInstance -Namespace root/wmi -ClassName MSPower_DeviceWakeEnable | Where-Object {{ $_.InstanceName -eq {} }} | Set-CimInstance -Property @{{ Enable = $true }}",
                ps_quote(&adapter.id)
            ))
            .map(|_| ())
            .map_err(|e| Error::AdapterSet {
                adapter: adapter.id.clone(),
                detail: e.to_string(),
            })
    }
}

pub struct PowerShellPlatform<R> {
    ps: Rc<PowerShell<R>>,
    dell: DellSmbios<R>,
    hp: HpCmsl<R>,
    lenovo: LenovoWmi<R>,
    adapters: WmiAdapters<R>,
}

impl<R: CommandRunner> PowerShellPlatform<R> {
    pub fn new(runner: R) -> Self {
        let ps = Rc::new(PowerShell::new(runner));
        Self {
            dell: DellSmbios { ps: Rc::clone(&ps) },
            hp: HpCmsl { ps: Rc::clone(&ps) },
            lenovo: LenovoWmi { ps: Rc::clone(&ps) },
            adapters: WmiAdapters { ps: Rc::clone(&ps) },
            ps,
        }
    }
}

impl<R: CommandRunner> Platform for PowerShellPlatform<R> {
    fn manufacturer(&self) -> Result<String> {
        self.ps
            .script("(Get-CimInstance -ClassName Win32_ComputerSystem).Manufacturer")
    }

    fn provision(&self, manufacturer: &Manufacturer) -> Result<Provisioned> {
        let module = match manufacturer {
            Manufacturer::Dell => DELL_MODULE,
            Manufacturer::Hp => HP_MODULE,
            Manufacturer::Lenovo => {
                // WMI classes ship with the firmware; nothing to install.
                let found = self
                    .ps
                    .script(&format!(
                        "if (Get-CimClass -Namespace root/wmi -ClassName {LENOVO_SETTING_CLASS} -ErrorAction SilentlyContinue) {{ 'ready' }} else {{ 'missing' }}"
                    ))
                    .map_err(|e| Error::Provisioning {
                        requirement: LENOVO_SETTING_CLASS.to_string(),
                        detail: e.to_string(),
                    })?;
                return if found.trim() == "ready" {
                    Ok(Provisioned::Ready {
                        requirement: LENOVO_SETTING_CLASS.to_string(),
                    })
                } else {
                    Err(Error::Provisioning {
                        requirement: LENOVO_SETTING_CLASS.to_string(),
                        detail: "WMI class not present".to_string(),
                    })
                };
            }
            Manufacturer::Unsupported(name) => {
                return Err(Error::UnsupportedManufacturer(name.clone()));
            }
        };

        let output = self
            .ps
            .script(&provision_module_script(module))
            .map_err(|e| Error::Provisioning {
                requirement: module.to_string(),
                detail: e.to_string(),
            })?;
        parse_provision_output(&output, module)
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
