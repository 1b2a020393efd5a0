//! (feature = "serde") JSON helpers for [`BenchConfig`].
//!
//! Every field is optional in the file; missing ones take the builder
//! defaults. The result is validated before it is returned.

use std::path::Path;

use crate::{
    errors::{BenchError, Result},
    params::BenchConfig,
};

/// Parse a config from JSON bytes.
pub fn config_from_slice(bytes: &[u8]) -> Result<BenchConfig> {
    let cfg: BenchConfig =
        serde_json::from_slice(bytes).map_err(|e| BenchError::Serialize(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Read and parse a JSON config file.
pub fn config_from_path(path: &Path) -> Result<BenchConfig> {
    let bytes = std::fs::read(path)?;
    config_from_slice(&bytes)
}

/// Pretty-printed JSON for a config (e.g. to seed a file with defaults).
pub fn config_to_bytes(cfg: &BenchConfig) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(cfg).map_err(|e| BenchError::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_uses_defaults() {
        let cfg = config_from_slice(br#"{ "schedule": [10, 20, 40], "seed": 5 }"#).unwrap();
        assert_eq!(cfg.schedule.sizes(), &[10, 20, 40]);
        assert_eq!(cfg.seed, Some(5));
        assert_eq!(cfg.repetitions, crate::params::DEF_REPETITIONS);
    }

    #[test]
    fn bad_schedule_is_rejected() {
        let err = config_from_slice(br#"{ "schedule": [40, 20] }"#).unwrap_err();
        assert!(matches!(err, BenchError::Serialize(_)));

        let err = config_from_slice(br#"{ "repetitions": 0 }"#).unwrap_err();
        assert!(matches!(err, BenchError::InvalidConfig(_)));
    }

    #[test]
    fn roundtrip() {
        let cfg = BenchConfig::builder().sizes(vec![3, 9]).naive_cutoff(None).build().unwrap();
        let bytes = config_to_bytes(&cfg).unwrap();
        assert_eq!(config_from_slice(&bytes).unwrap(), cfg);
    }
}
