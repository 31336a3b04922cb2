use super::Status;
use serde::{Deserialize, Serialize};

/// How tier statuses combine into the overall status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// The last tier that reported something other than compliant decides.
    /// A compliant tier never clears an earlier finding.
    #[default]
    LastFinding,
    /// Error > Warning > Unsupported > Compliant.
    MostSevere,
}

impl MergePolicy {
    /// Fold tier statuses given in evaluation order.
    pub fn merge(self, tiers: &[Status]) -> Status {
        match self {
            MergePolicy::LastFinding => tiers
                .iter()
                .rev()
                .copied()
                .find(|s| *s != Status::Compliant)
                .unwrap_or(Status::Compliant),
            MergePolicy::MostSevere => tiers
                .iter()
                .copied()
                .max_by_key(|s| severity_rank(*s))
                .unwrap_or(Status::Compliant),
        }
    }
}

fn severity_rank(status: Status) -> u8 {
    match status {
        Status::Compliant => 0,
        Status::Unsupported => 1,
        Status::Warning => 2,
        Status::Error => 3,
    }
}

/// Exit code used for negative statuses (error, unsupported).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeStatusPolicy {
    /// Exit 0: unsupported or unreadable hardware does not page the orchestrator.
    #[default]
    Informational,
    /// Exit 2.
    Fail,
}

impl NegativeStatusPolicy {
    pub fn exit_code(self, status: Status) -> i32 {
        match status {
            Status::Compliant => 0,
            Status::Warning => 1,
            Status::Error | Status::Unsupported => match self {
                NegativeStatusPolicy::Informational => 0,
                NegativeStatusPolicy::Fail => 2,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_finding_keeps_earlier_error() {
        let merged = MergePolicy::LastFinding.merge(&[Status::Error, Status::Compliant]);
        assert_eq!(merged, Status::Error);
    }

    #[test]
    fn test_last_finding_later_warning_wins() {
        let merged = MergePolicy::LastFinding.merge(&[Status::Unsupported, Status::Warning]);
        assert_eq!(merged, Status::Warning);
        let merged = MergePolicy::LastFinding.merge(&[Status::Warning, Status::Error]);
        assert_eq!(merged, Status::Error);
    }

    #[test]
    fn test_most_severe() {
        let merged = MergePolicy::MostSevere.merge(&[Status::Error, Status::Warning]);
        assert_eq!(merged, Status::Error);
        let merged = MergePolicy::MostSevere.merge(&[Status::Warning, Status::Unsupported]);
        assert_eq!(merged, Status::Warning);
    }

    #[test]
    fn test_merge_all_compliant() {
        for policy in [MergePolicy::LastFinding, MergePolicy::MostSevere] {
            assert_eq!(
                policy.merge(&[Status::Compliant, Status::Compliant]),
                Status::Compliant
            );
            assert_eq!(policy.merge(&[]), Status::Compliant);
        }
    }

    #[test]
    fn test_exit_codes() {
        let info = NegativeStatusPolicy::Informational;
        assert_eq!(info.exit_code(Status::Compliant), 0);
        assert_eq!(info.exit_code(Status::Warning), 1);
        assert_eq!(info.exit_code(Status::Error), 0);
        assert_eq!(info.exit_code(Status::Unsupported), 0);

        let fail = NegativeStatusPolicy::Fail;
        assert_eq!(fail.exit_code(Status::Warning), 1);
        assert_eq!(fail.exit_code(Status::Error), 2);
        assert_eq!(fail.exit_code(Status::Unsupported), 2);
    }
}
