use crate::compliance::{ComplianceResult, Status, TierReport};
use colored::{ColoredString, Colorize};

const LABEL_W: usize = 14;

fn status_badge(status: Status) -> ColoredString {
    let text = format!("{} ({})", status, status.code());
    match status {
        Status::Compliant => text.green().bold(),
        Status::Warning => text.yellow().bold(),
        Status::Error => text.red().bold(),
        Status::Unsupported => text.dimmed().bold(),
    }
}

fn print_tier(label: &str, tier: &TierReport) {
    let padded = format!("{:<w$}", label, w = LABEL_W);
    match tier.state.as_deref() {
        Some(state) => println!("  {} {}  {}", padded.dimmed(), status_badge(tier.status), state),
        None => println!("  {} {}", padded.dimmed(), status_badge(tier.status)),
    }
}

/// Tier summaries followed by the trace. Stdout is captured by the
/// orchestrator as the audit trail.
pub fn print_result(result: &ComplianceResult) {
    println!(
        "{} {}",
        "Wake-on-LAN".bold(),
        result.mode.to_string().dimmed()
    );
    println!(
        "  {} {}",
        format!("{:<w$}", "Manufacturer", w = LABEL_W).dimmed(),
        result.manufacturer
    );
    print_tier("Firmware", &result.firmware);
    print_tier("OS adapters", &result.os);
    println!(
        "  {} {}",
        format!("{:<w$}", "Result", w = LABEL_W).dimmed(),
        status_badge(result.status)
    );

    if !result.trace.lines().is_empty() {
        println!();
        for line in result.trace.lines() {
            println!("  {}", line);
        }
    }
}

/// Printed when a negative status is mapped to exit code 0.
pub fn print_informational(result: &ComplianceResult) {
    println!();
    println!(
        "  {} result {} is informational; exiting 0.",
        "Note:".cyan(),
        result.status.code()
    );
}

pub fn result_json(result: &ComplianceResult, exit_code: i32) -> serde_json::Value {
    serde_json::json!({
        "generated_at": chrono::Local::now().to_rfc3339(),
        "mode": result.mode,
        "manufacturer": result.manufacturer.to_string(),
        "status": result.status,
        "code": result.status.code(),
        "exit_code": exit_code,
        "firmware": result.firmware,
        "os": result.os,
        "trace": result.trace,
    })
}

pub fn print_result_json(result: &ComplianceResult, exit_code: i32) -> serde_json::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&result_json(result, exit_code))?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::{Mode, Trace};
    use crate::detect::Manufacturer;

    #[test]
    fn test_result_json_shape() {
        let mut trace = Trace::default();
        trace.push("Acer not supported by script.");
        let result = ComplianceResult {
            mode: Mode::Detect,
            manufacturer: Manufacturer::Unsupported("Acer".into()),
            status: Status::Unsupported,
            firmware: TierReport::new(Status::Unsupported),
            os: TierReport::new(Status::Compliant),
            trace,
        };

        let json = result_json(&result, 0);
        assert_eq!(json["mode"], "detect");
        assert_eq!(json["manufacturer"], "Acer");
        assert_eq!(json["status"], "unsupported");
        assert_eq!(json["code"], -2);
        assert_eq!(json["exit_code"], 0);
        assert_eq!(json["firmware"]["status"], "unsupported");
        assert_eq!(json["trace"][0], "Acer not supported by script.");
        assert!(json["generated_at"].is_string());
    }
}
