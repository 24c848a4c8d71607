//! Serde helpers for the provider's loose JSON typing.
//!
//! Responsibilities:
//! - Accept numeric ids and counters sent either as JSON numbers or strings.
//! - Accept booleans sent as `true`/`false`, `1`/`0` or `"1"`/`"0"`.
//! - Move optional secrets (passwords) across the wire as plain strings.
//!
//! Explicitly does NOT handle:
//! - Validating higher-level semantics (positive ids, page bounds).
//!
//! Invariants / assumptions:
//! - WordPress-style plugins may return numbers as strings depending on the
//!   code path that built the response.
//! - Errors are generic parse errors and never echo payloads.

use serde::Deserialize;
use serde::de::Error as _;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum U64OrString {
    U64(u64),
    I64(i64),
    String(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BoolLike {
    Bool(bool),
    Int(i64),
    String(String),
}

fn u64_from(value: U64OrString) -> Result<u64, String> {
    match value {
        U64OrString::U64(v) => Ok(v),
        U64OrString::I64(v) => u64::try_from(v).map_err(|e| e.to_string()),
        U64OrString::String(s) => s.trim().parse::<u64>().map_err(|e| e.to_string()),
    }
}

fn bool_from(value: BoolLike) -> Result<bool, String> {
    match value {
        BoolLike::Bool(b) => Ok(b),
        BoolLike::Int(0) => Ok(false),
        BoolLike::Int(1) => Ok(true),
        BoolLike::Int(other) => Err(format!("invalid boolean integer {other}")),
        BoolLike::String(s) => match s.trim() {
            "1" | "true" => Ok(true),
            "0" | "false" | "" => Ok(false),
            _ => Err("invalid boolean string".to_string()),
        },
    }
}

pub fn u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    u64_from(U64OrString::deserialize(deserializer)?).map_err(D::Error::custom)
}

pub fn opt_u64_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<U64OrString>::deserialize(deserializer)?
        .map(u64_from)
        .transpose()
        .map_err(D::Error::custom)
}

pub fn bool_from_any<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<BoolLike>::deserialize(deserializer)? {
        None => Ok(false),
        Some(value) => bool_from(value).map_err(D::Error::custom),
    }
}

/// Optional `SecretString` carried as a plain JSON string.
pub mod opt_secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(secret: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match secret {
            Some(s) => serializer.serialize_some(s.expose_secret()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?
            .filter(|s| !s.is_empty())
            .map(|s| SecretString::new(s.into())))
    }
}
