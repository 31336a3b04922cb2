pub mod dmi;

use serde::Serialize;
use std::fmt;

/// System manufacturer, classified once per run from the identity string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Manufacturer {
    Dell,
    Hp,
    Lenovo,
    /// Carries the raw identity string for reporting.
    Unsupported(String),
}

impl Manufacturer {
    /// Case-insensitive substring match: "dell", "hp"/"hewlett", "lenovo".
    pub fn classify(raw: &str) -> Self {
        let lower = raw.to_ascii_lowercase();
        if lower.contains("dell") {
            Manufacturer::Dell
        } else if lower.contains("hp") || lower.contains("hewlett") {
            Manufacturer::Hp
        } else if lower.contains("lenovo") {
            Manufacturer::Lenovo
        } else {
            Manufacturer::Unsupported(raw.trim().to_string())
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Manufacturer::Unsupported(_))
    }
}

impl fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Manufacturer::Dell => write!(f, "Dell"),
            Manufacturer::Hp => write!(f, "HP"),
            Manufacturer::Lenovo => write!(f, "Lenovo"),
            Manufacturer::Unsupported(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_supported_vendors() {
        assert_eq!(Manufacturer::classify("Dell Inc."), Manufacturer::Dell);
        assert_eq!(Manufacturer::classify("HP"), Manufacturer::Hp);
        assert_eq!(Manufacturer::classify("Hewlett-Packard"), Manufacturer::Hp);
        assert_eq!(Manufacturer::classify("LENOVO"), Manufacturer::Lenovo);
        assert_eq!(Manufacturer::classify("lenovo"), Manufacturer::Lenovo);
    }

    #[test]
    fn test_classify_unsupported_keeps_name() {
        assert_eq!(
            Manufacturer::classify("Acer"),
            Manufacturer::Unsupported("Acer".into())
        );
        assert!(!Manufacturer::classify("Framework").is_supported());
    }

    #[test]
    fn test_display() {
        assert_eq!(Manufacturer::Hp.to_string(), "HP");
        assert_eq!(Manufacturer::Unsupported("Acer".into()).to_string(), "Acer");
    }
}
