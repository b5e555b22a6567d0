//! Configuration fingerprints
//!
//! Every aggregated result carries the SHA-256 of the configuration that
//! produced it, so exported tables can be matched back to their inputs and
//! two runs can be checked for identical setups.

use crate::error::SimulationError;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Compute deterministic SHA256 hash of a configuration
///
/// Uses canonical JSON serialization with sorted keys so the hash does not
/// depend on field or map iteration order.
///
/// # Example
/// ```
/// use reliability_simulator_core_rs::orchestrator::compute_config_hash;
///
/// let a = compute_config_hash(&serde_json::json!({"b": 1, "a": 2})).unwrap();
/// let b = compute_config_hash(&serde_json::json!({"a": 2, "b": 1})).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::Serialization(format!("Config serialization failed: {}", e))
    })?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::Serialization(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
