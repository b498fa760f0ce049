//! Interception settings.
//!
//! Reads configuration from environment variables:
//! - `CALLGUARD_DISABLED`: when set to `1`, `true` or `yes`, guarded calls
//!   go straight to the wrapped callable with no checking at all
//! - `CALLGUARD_SKIP_RESULTS`: same values; skips the result phase only

/// Settings an [`Interceptor`](crate::interceptor::Interceptor) runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardConfig {
    /// Whether contracts are checked at all.
    pub enabled: bool,
    /// Whether return values are checked against the result contract.
    pub check_results: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        GuardConfig {
            enabled: true,
            check_results: true,
        }
    }
}

impl GuardConfig {
    pub const DISABLED_VAR: &'static str = "CALLGUARD_DISABLED";
    pub const SKIP_RESULTS_VAR: &'static str = "CALLGUARD_SKIP_RESULTS";

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        GuardConfig {
            enabled: !flag(lookup(Self::DISABLED_VAR)),
            check_results: !flag(lookup(Self::SKIP_RESULTS_VAR)),
        }
    }

    /// A config with every check turned off.
    pub fn disabled() -> Self {
        GuardConfig {
            enabled: false,
            check_results: false,
        }
    }
}

fn flag(raw: Option<String>) -> bool {
    raw.map(|v| v.trim().to_ascii_lowercase())
        .is_some_and(|v| matches!(v.as_str(), "1" | "true" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> GuardConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GuardConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn unset_variables_keep_defaults() {
        assert_eq!(from_pairs(&[]), GuardConfig::default());
    }

    #[test]
    fn disabled_flag_accepts_common_spellings() {
        for raw in ["1", "true", "TRUE", " yes "] {
            assert!(!from_pairs(&[("CALLGUARD_DISABLED", raw)]).enabled, "{raw}");
        }
        for raw in ["0", "false", "", "off"] {
            assert!(from_pairs(&[("CALLGUARD_DISABLED", raw)]).enabled, "{raw}");
        }
    }

    #[test]
    fn skip_results_only_affects_result_phase() {
        let cfg = from_pairs(&[("CALLGUARD_SKIP_RESULTS", "1")]);
        assert!(cfg.enabled);
        assert!(!cfg.check_results);
    }
}
