//! Compliance evaluation: runs the firmware tier and the OS tier in a fixed
//! order and folds them into one [`ComplianceResult`].

pub mod policy;

pub use policy::{MergePolicy, NegativeStatusPolicy};

use crate::adapter;
use crate::backend::Platform;
use crate::config::Config;
use crate::detect::Manufacturer;
use crate::vendor::{self, FirmwareTier, Provisioned};
use serde::Serialize;
use std::fmt;

/// Severity code reported to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Compliant,
    Warning,
    Error,
    Unsupported,
}

impl Status {
    /// Numeric code: 0, 1, -1, -2.
    pub fn code(self) -> i32 {
        match self {
            Status::Compliant => 0,
            Status::Warning => 1,
            Status::Error => -1,
            Status::Unsupported => -2,
        }
    }

    pub fn is_negative(self) -> bool {
        self.code() < 0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Compliant => write!(f, "compliant"),
            Status::Warning => write!(f, "warning"),
            Status::Error => write!(f, "error"),
            Status::Unsupported => write!(f, "unsupported"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Detect,
    Remediate,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Detect => write!(f, "detect"),
            Mode::Remediate => write!(f, "remediate"),
        }
    }
}

/// Outcome of one operation on one target (a firmware setting or an adapter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemOutcome {
    pub target: String,
    pub ok: bool,
    pub detail: String,
}

impl ItemOutcome {
    pub fn success(target: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ok: true,
            detail: detail.into(),
        }
    }

    pub fn failure(target: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ok: false,
            detail: detail.into(),
        }
    }
}

/// Result of one tier (firmware or OS).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierReport {
    pub status: Status,
    pub state: Option<String>,
    pub items: Vec<ItemOutcome>,
}

impl TierReport {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            state: None,
            items: Vec::new(),
        }
    }

    /// Error if any item failed, otherwise compliant.
    pub fn from_items(items: Vec<ItemOutcome>) -> Self {
        let status = if items.iter().any(|i| !i.ok) {
            Status::Error
        } else {
            Status::Compliant
        };
        Self {
            status,
            state: None,
            items,
        }
    }

    pub fn state(mut self, value: impl Into<String>) -> Self {
        self.state = Some(value.into());
        self
    }

    pub fn failed_items(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.items.iter().filter(|i| !i.ok)
    }
}

/// Append-only, ordered audit trail of one run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Trace {
    lines: Vec<String>,
}

impl Trace {
    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::debug!(target: "wolcheck::trace", "{}", line);
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contains(&self, line: &str) -> bool {
        self.lines.iter().any(|l| l == line)
    }
}

/// Aggregate output of one detect or remediate run.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceResult {
    pub mode: Mode,
    pub manufacturer: Manufacturer,
    pub status: Status,
    pub firmware: TierReport,
    pub os: TierReport,
    pub trace: Trace,
}

impl ComplianceResult {
    pub fn firmware_state(&self) -> Option<&str> {
        self.firmware.state.as_deref()
    }

    pub fn os_state(&self) -> Option<&str> {
        self.os.state.as_deref()
    }

    pub fn exit_code(&self, policy: NegativeStatusPolicy) -> i32 {
        policy.exit_code(self.status)
    }
}

/// Run one evaluation: provisioning, then the firmware tier, then the OS tier.
/// Tier failures never abort the run; they become a status and trace lines.
pub fn evaluate(platform: &dyn Platform, config: &Config, mode: Mode) -> ComplianceResult {
    let mut trace = Trace::default();

    let manufacturer = match platform.manufacturer() {
        Ok(raw) => Manufacturer::classify(&raw),
        Err(e) => {
            trace.push(format!("Unable to determine manufacturer: {}.", e));
            Manufacturer::Unsupported("Unknown manufacturer".to_string())
        }
    };
    tracing::info!(%manufacturer, %mode, "evaluating Wake-on-LAN compliance");

    let firmware = match vendor::provider_for(&manufacturer, platform, config) {
        Some(provider) => {
            let readiness = if config.provisioning.enabled {
                platform.provision(&manufacturer)
            } else {
                Ok(Provisioned::Skipped)
            };
            FirmwareTier::new(provider, readiness).run(mode, &mut trace)
        }
        None => {
            trace.push(format!("{} not supported by script.", manufacturer));
            TierReport::new(Status::Unsupported)
        }
    };

    let os = match mode {
        Mode::Detect => adapter::detect(platform.adapters(), &mut trace),
        Mode::Remediate => adapter::remediate(platform.adapters(), &mut trace),
    };

    let status = config.policy.merge.merge(&[firmware.status, os.status]);
    tracing::info!(
        firmware = %firmware.status,
        os = %os.status,
        %status,
        "evaluation finished"
    );

    ComplianceResult {
        mode,
        manufacturer,
        status,
        firmware,
        os,
        trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::Compliant.code(), 0);
        assert_eq!(Status::Warning.code(), 1);
        assert_eq!(Status::Error.code(), -1);
        assert_eq!(Status::Unsupported.code(), -2);
        assert!(Status::Unsupported.is_negative());
        assert!(!Status::Warning.is_negative());
    }

    #[test]
    fn test_tier_from_items() {
        let ok = TierReport::from_items(vec![ItemOutcome::success("eth0", "enabled")]);
        assert_eq!(ok.status, Status::Compliant);

        let mixed = TierReport::from_items(vec![
            ItemOutcome::success("eth0", "enabled"),
            ItemOutcome::failure("eth1", "permission denied"),
        ]);
        assert_eq!(mixed.status, Status::Error);
        assert_eq!(mixed.failed_items().count(), 1);
    }

    #[test]
    fn test_tier_from_no_items_is_compliant() {
        assert_eq!(TierReport::from_items(Vec::new()).status, Status::Compliant);
    }

    #[test]
    fn test_trace_is_ordered() {
        let mut trace = Trace::default();
        trace.push("first");
        trace.push(String::from("second"));
        assert_eq!(trace.lines(), ["first", "second"]);
        assert!(trace.contains("second"));
        assert!(!trace.contains("sec"));
    }
}
