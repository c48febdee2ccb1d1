use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Allow,
    Warn,
    Deny,
}

impl Display for RuleLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::Warn => write!(f, "warn"),
            Self::Deny => write!(f, "deny"),
        }
    }
}

fn default_lineage_analysis() -> bool {
    false
}

fn default_rule_level() -> RuleLevel {
    RuleLevel::Deny
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RuleOverride {
    #[serde(default = "default_rule_level")]
    pub level: RuleLevel,
}

impl Default for RuleOverride {
    fn default() -> Self {
        Self {
            level: default_rule_level(),
        }
    }
}

/// As parsed from `taint-engine.toml`, before defaults are pinned down for
/// downstream callers.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RawConfig {
    #[serde(default = "default_lineage_analysis")]
    pub lineage_analysis: bool,
    #[serde(default)]
    pub rules: BTreeMap<String, RuleOverride>,
}

/// The resolved configuration, with every rule code parsed out of its
/// string key and every field defaulted.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Config {
    pub lineage_analysis: bool,
    pub rule_overrides: BTreeMap<i64, RuleLevel>,
}

impl Config {
    /// Effective level for a rule code: an explicit override if present,
    /// otherwise the rule catalog's default level (`Deny`).
    pub fn effective_level(&self, code: i64) -> RuleLevel {
        self.rule_overrides.get(&code).copied().unwrap_or(RuleLevel::Deny)
    }

    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let mut rule_overrides = BTreeMap::new();
        for (key, override_) in raw.rules {
            let code: i64 = key
                .parse()
                .map_err(|_| ConfigError::InvalidRuleCode { key: key.clone() })?;
            rule_overrides.insert(code, override_.level);
        }
        Ok(Self {
            lineage_analysis: raw.lineage_analysis,
            rule_overrides,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, RawConfig, RuleLevel, RuleOverride};
    use std::collections::BTreeMap;

    #[test]
    fn effective_level_defaults_to_deny() {
        let config = Config::default();
        assert_eq!(config.effective_level(1001), RuleLevel::Deny);
    }

    #[test]
    fn effective_level_honors_an_override() {
        let mut overrides = BTreeMap::new();
        overrides.insert(1001, RuleLevel::Warn);
        let config = Config {
            lineage_analysis: false,
            rule_overrides: overrides,
        };
        assert_eq!(config.effective_level(1001), RuleLevel::Warn);
    }

    #[test]
    fn from_raw_parses_string_keys_into_rule_codes() {
        let mut rules = BTreeMap::new();
        rules.insert(
            "1001".to_string(),
            RuleOverride {
                level: RuleLevel::Warn,
            },
        );
        let raw = RawConfig {
            lineage_analysis: true,
            rules,
        };
        let config = Config::from_raw(raw).expect("valid rule codes should parse");
        assert!(config.lineage_analysis);
        assert_eq!(config.effective_level(1001), RuleLevel::Warn);
    }

    #[test]
    fn from_raw_rejects_a_non_numeric_rule_code() {
        let mut rules = BTreeMap::new();
        rules.insert("not-a-code".to_string(), RuleOverride::default());
        let raw = RawConfig {
            lineage_analysis: false,
            rules,
        };
        assert!(Config::from_raw(raw).is_err());
    }
}
