//! Serde helpers for producers that send `null` for absent fields

use serde::{Deserialize, Deserializer};

/// Deserialize a string field, reading `null` as empty
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
