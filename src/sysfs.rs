use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Directory every `sys/...` path resolves against: `/` on a live machine,
/// a temp dir in tests, or a captured tree passed with `--root`.
#[derive(Debug, Clone)]
pub struct SysfsRoot {
    root: PathBuf,
}

impl SysfsRoot {
    pub fn system() -> Self {
        Self::new("/")
    }

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Read a sysfs file, trimming whitespace.
    pub fn read(&self, relative: impl AsRef<Path>) -> Result<String> {
        let path = self.path(relative);
        std::fs::read_to_string(&path)
            .map(|s| s.trim().to_string())
            .map_err(|e| Error::SysfsRead { path, source: e })
    }

    /// Read a sysfs file, returning None if it doesn't exist or isn't readable.
    pub fn read_optional(&self, relative: impl AsRef<Path>) -> Result<Option<String>> {
        let path = self.path(relative);
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s.trim().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => Ok(None),
            Err(e) => Err(Error::SysfsRead { path, source: e }),
        }
    }

    /// Write a value to a sysfs file.
    pub fn write(&self, relative: impl AsRef<Path>, value: &str) -> Result<()> {
        let path = self.path(relative);
        std::fs::write(&path, value).map_err(|e| Error::SysfsWrite { path, source: e })
    }

    /// List entries in a sysfs directory, sorted by name.
    pub fn list_dir(&self, relative: impl AsRef<Path>) -> Result<Vec<String>> {
        let path = self.path(relative);
        let entries = std::fs::read_dir(&path).map_err(|e| Error::SysfsRead {
            path: path.clone(),
            source: e,
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::SysfsRead {
                path: path.clone(),
                source: e,
            })?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Check if a path exists relative to this root.
    pub fn exists(&self, relative: impl AsRef<Path>) -> bool {
        self.path(relative).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_write() {
        let tmp = tempfile::tempdir().unwrap();
        let sysfs = SysfsRoot::new(tmp.path());

        fs::create_dir_all(tmp.path().join("sys/class/net/eth0/device/power")).unwrap();
        fs::write(
            tmp.path().join("sys/class/net/eth0/device/power/wakeup"),
            "disabled\n",
        )
        .unwrap();

        assert_eq!(
            sysfs.read("sys/class/net/eth0/device/power/wakeup").unwrap(),
            "disabled"
        );
        sysfs
            .write("sys/class/net/eth0/device/power/wakeup", "enabled")
            .unwrap();
        assert_eq!(
            sysfs.read("sys/class/net/eth0/device/power/wakeup").unwrap(),
            "enabled"
        );
    }

    #[test]
    fn test_read_optional_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let sysfs = SysfsRoot::new(tmp.path());

        assert_eq!(sysfs.read_optional("sys/class/dmi/id/sys_vendor").unwrap(), None);
    }

    #[test]
    fn test_list_dir_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let sysfs = SysfsRoot::new(tmp.path());

        fs::create_dir_all(tmp.path().join("sys/class/net/wlan0")).unwrap();
        fs::create_dir_all(tmp.path().join("sys/class/net/eth0")).unwrap();

        let entries = sysfs.list_dir("sys/class/net").unwrap();
        assert_eq!(entries, vec!["eth0", "wlan0"]);
    }

    #[test]
    fn test_list_dir_missing_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let sysfs = SysfsRoot::new(tmp.path());

        assert!(matches!(
            sysfs.list_dir("sys/class/firmware-attributes"),
            Err(Error::SysfsRead { .. })
        ));
    }
}
