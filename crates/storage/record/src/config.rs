use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("IO Error")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Parse Error")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid chain policy")]
    Invalid { message: String },
}

/// Size thresholds governing when a record spills into a two-page chain.
///
/// Records up to `small_limit` logical bytes live in a single page; larger
/// records are split into two `chain_half`-byte halves on two freshly
/// allocated pages. The largest storable record is `2 * chain_half` bytes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChainPolicy {
    pub small_limit: i32,
    pub chain_half: i32,
}

impl Default for ChainPolicy {
    fn default() -> Self {
        Self {
            small_limit: 4096,
            chain_half: 4000,
        }
    }
}

impl ChainPolicy {
    /// The largest record size this policy can place: both chain halves.
    pub fn max_record_size(&self) -> i32 {
        2 * self.chain_half
    }

    /// Loads a policy from a TOML file and validates it.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref().to_path_buf();
        let text = std::fs::read_to_string(&path).map_err(|e| PolicyError::Io {
            path: path.clone(),
            source: e,
        })?;

        let policy: ChainPolicy = toml::from_str(&text).map_err(|e| PolicyError::ParseToml {
            path: path.clone(),
            source: e,
        })?;

        policy.validate()?;
        Ok(policy)
    }

    /// Checks the internal consistency of the thresholds.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.small_limit <= 0 {
            return Err(PolicyError::Invalid {
                message: "small_limit must be positive".to_string(),
            });
        }
        if self.chain_half <= 0 {
            return Err(PolicyError::Invalid {
                message: "chain_half must be positive".to_string(),
            });
        }
        // Records between small_limit and 2 * chain_half go to chains; the
        // window must not be empty or sizes just above small_limit would be
        // unplaceable.
        if self.max_record_size() <= self.small_limit {
            return Err(PolicyError::Invalid {
                message: "2 * chain_half must exceed small_limit".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_engine_constants() {
        let policy = ChainPolicy::default();
        assert_eq!(policy.small_limit, 4096);
        assert_eq!(policy.chain_half, 4000);
        assert_eq!(policy.max_record_size(), 8000);
        policy.validate().unwrap();
    }

    #[test]
    fn parses_from_toml_with_partial_overrides() {
        let policy: ChainPolicy = toml::from_str("small_limit = 2048").unwrap();
        assert_eq!(policy.small_limit, 2048);
        assert_eq!(policy.chain_half, 4000);
    }

    #[test]
    fn rejects_non_positive_thresholds() {
        let policy: ChainPolicy = toml::from_str("chain_half = 0").unwrap();
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::Invalid { .. })
        ));

        let policy: ChainPolicy = toml::from_str("small_limit = -1").unwrap();
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_an_empty_chain_window() {
        let policy: ChainPolicy =
            toml::from_str("small_limit = 4096\nchain_half = 2048").unwrap();
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::Invalid { .. })
        ));
    }
}
