use crate::sysfs::SysfsRoot;

#[derive(Debug, Clone, Default)]
pub struct DmiInfo {
    pub sys_vendor: Option<String>,
    pub board_vendor: Option<String>,
}

impl DmiInfo {
    pub fn detect(sysfs: &SysfsRoot) -> Self {
        Self {
            sys_vendor: sysfs.read_optional("sys/class/dmi/id/sys_vendor").unwrap_or(None),
            board_vendor: sysfs.read_optional("sys/class/dmi/id/board_vendor").unwrap_or(None),
        }
    }

    /// System manufacturer as reported by SMBIOS. Some boards leave
    /// `sys_vendor` blank or set to a placeholder, so fall back to the
    /// board vendor.
    pub fn manufacturer(&self) -> Option<&str> {
        self.sys_vendor
            .as_deref()
            .filter(|v| !v.is_empty() && !is_placeholder(v))
            .or(self.board_vendor.as_deref().filter(|v| !v.is_empty()))
    }
}

fn is_placeholder(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.contains("to be filled") || lower == "default string" || lower == "system manufacturer"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manufacturer_prefers_sys_vendor() {
        let dmi = DmiInfo {
            sys_vendor: Some("Dell Inc.".into()),
            board_vendor: Some("Dell Inc.".into()),
        };
        assert_eq!(dmi.manufacturer(), Some("Dell Inc."));
    }

    #[test]
    fn test_manufacturer_falls_back_on_placeholder() {
        let dmi = DmiInfo {
            sys_vendor: Some("To Be Filled By O.E.M.".into()),
            board_vendor: Some("LENOVO".into()),
        };
        assert_eq!(dmi.manufacturer(), Some("LENOVO"));
    }

    #[test]
    fn test_manufacturer_missing() {
        assert_eq!(DmiInfo::default().manufacturer(), None);
    }
}
