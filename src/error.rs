use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("sysfs read failed: {path}: {source}")]
    SysfsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("sysfs write failed: {path}: {source}")]
    SysfsWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse error in {context}: {detail}")]
    Parse { context: String, detail: String },

    #[error("command `{program}` failed: {detail}")]
    Command { program: String, detail: String },

    #[error("could not provision {requirement}: {detail}")]
    Provisioning { requirement: String, detail: String },

    #[error("firmware read failed for {setting}: {detail}")]
    FirmwareRead { setting: String, detail: String },

    #[error("firmware write failed for {setting}: {detail}")]
    FirmwareWrite { setting: String, detail: String },

    #[error("manufacturer not supported: {0}")]
    UnsupportedManufacturer(String),

    #[error("network adapter enumeration failed: {0}")]
    AdapterEnumeration(String),

    #[error("could not enable wake on {adapter}: {detail}")]
    AdapterSet { adapter: String, detail: String },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
