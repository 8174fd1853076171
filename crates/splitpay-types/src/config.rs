//! Configuration for a SplitPay engine instance.

use serde::{Deserialize, Serialize};

use crate::{SplitError, constants};

/// Limits and switches for a settlement engine.
///
/// Limits may be tightened below the protocol maxima but never raised above
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum participants per split (1..=10).
    pub max_participants: usize,
    /// Maximum split name length in characters (1..=50).
    pub max_name_len: usize,
    /// Whether to keep the hash-chained receipt journal.
    pub journal_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_participants: constants::MAX_PARTICIPANTS,
            max_name_len: constants::MAX_NAME_LEN,
            journal_enabled: true,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the limits are within protocol bounds.
    pub fn validate(&self) -> crate::Result<()> {
        if !(constants::MIN_PARTICIPANTS..=constants::MAX_PARTICIPANTS)
            .contains(&self.max_participants)
        {
            return Err(SplitError::Configuration(format!(
                "max_participants must be within {}..={}, got {}",
                constants::MIN_PARTICIPANTS,
                constants::MAX_PARTICIPANTS,
                self.max_participants
            )));
        }
        if !(1..=constants::MAX_NAME_LEN).contains(&self.max_name_len) {
            return Err(SplitError::Configuration(format!(
                "max_name_len must be within 1..={}, got {}",
                constants::MAX_NAME_LEN,
                self.max_name_len
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_protocol_maxima() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.max_participants, 10);
        assert_eq!(cfg.max_name_len, 50);
        assert!(cfg.journal_enabled);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn from_json_fills_defaults() {
        let cfg = EngineConfig::from_json(r#"{"max_participants": 4}"#).unwrap();
        assert_eq!(cfg.max_participants, 4);
        assert_eq!(cfg.max_name_len, 50);
        assert!(cfg.journal_enabled);
    }

    #[test]
    fn from_json_rejects_out_of_range() {
        let err = EngineConfig::from_json(r#"{"max_participants": 11}"#).unwrap_err();
        assert!(matches!(err, SplitError::Configuration(_)));

        let err = EngineConfig::from_json(r#"{"max_name_len": 0}"#).unwrap_err();
        assert!(matches!(err, SplitError::Configuration(_)));
    }

    #[test]
    fn from_json_rejects_garbage() {
        let err = EngineConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, SplitError::Serialization(_)));
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = EngineConfig {
            max_participants: 3,
            max_name_len: 20,
            journal_enabled: false,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
