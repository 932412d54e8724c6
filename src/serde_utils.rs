// Serde helpers for values read from the environment.

use serde::{Deserialize, Deserializer};

/// Parses the boolean spellings commonly found in shell environments
/// (`1`, `t`, `TRUE`, `False`, ...). Anything unrecognised counts as false
/// so a typo in a toggle never aborts the program.
pub fn deserialize_lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(parse_lenient_bool).unwrap_or(false))
}

pub fn parse_lenient_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "t" | "T" | "TRUE" | "true" | "True")
}
