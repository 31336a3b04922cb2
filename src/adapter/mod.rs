//! OS tier: per-adapter "allowed to wake the system" flag.

use crate::compliance::{ItemOutcome, Status, TierReport, Trace};
use crate::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkAdapter {
    pub id: String,
    pub wake_enabled: bool,
}

pub trait AdapterPower {
    /// Wake-capable adapters in a stable order.
    fn list_adapters(&self) -> Result<Vec<NetworkAdapter>>;
    fn enable_wake(&self, adapter: &NetworkAdapter) -> Result<()>;
}

pub fn detect(power: &dyn AdapterPower, trace: &mut Trace) -> TierReport {
    let adapters = match power.list_adapters() {
        Ok(adapters) => adapters,
        Err(e) => {
            trace.push(format!("Unable to enumerate network adapters: {}.", e));
            return TierReport::new(Status::Error);
        }
    };

    if adapters.is_empty() {
        trace.push("No wake-capable network adapters found.");
        return TierReport::new(Status::Compliant);
    }

    let disabled: Vec<&NetworkAdapter> = adapters.iter().filter(|a| !a.wake_enabled).collect();
    let items = adapters
        .iter()
        .map(|a| {
            ItemOutcome::success(&a.id, if a.wake_enabled { "enabled" } else { "disabled" })
        })
        .collect();

    if disabled.is_empty() {
        trace.push(format!(
            "Wake enabled on all {} network adapters.",
            adapters.len()
        ));
        let mut report = TierReport::new(Status::Compliant).state("all adapters wake-enabled");
        report.items = items;
        return report;
    }

    for adapter in &disabled {
        trace.push(format!("Wake disabled on adapter {}.", adapter.id));
    }
    let ids: Vec<&str> = disabled.iter().map(|a| a.id.as_str()).collect();
    let mut report =
        TierReport::new(Status::Warning).state(format!("wake disabled: {}", ids.join(", ")));
    report.items = items;
    report
}

/// Enable wake on every adapter, including ones already enabled.
pub fn remediate(power: &dyn AdapterPower, trace: &mut Trace) -> TierReport {
    let adapters = match power.list_adapters() {
        Ok(adapters) => adapters,
        Err(e) => {
            trace.push(format!("Unable to enumerate network adapters: {}.", e));
            return TierReport::new(Status::Error);
        }
    };

    if adapters.is_empty() {
        trace.push("No network adapters found.");
        return TierReport::new(Status::Compliant);
    }

    let mut items = Vec::with_capacity(adapters.len());
    for adapter in &adapters {
        match power.enable_wake(adapter) {
            Ok(()) => {
                trace.push(format!("Wake enabled on adapter {}.", adapter.id));
                items.push(ItemOutcome::success(&adapter.id, "enabled"));
            }
            Err(e) => {
                tracing::warn!(adapter = %adapter.id, error = %e, "enable wake failed");
                trace.push(format!("Unable to enable wake on adapter {}: {}.", adapter.id, e));
                items.push(ItemOutcome::failure(&adapter.id, e.to_string()));
            }
        }
    }

    let report = TierReport::from_items(items);
    let enabled = report.items.iter().filter(|i| i.ok).count();
    let summary = format!("wake enabled on {}/{} adapters", enabled, report.items.len());
    report.state(summary)
}
