//! Ids arrive as JSON numbers from some sources and as numeric strings from
//! others. Everything is canonicalized to `u64` when decoding so comparisons
//! never depend on which source produced the record.

use serde::{Deserialize, Deserializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl RawId {
    fn into_u64<E: de::Error>(self) -> Result<u64, E> {
        match self {
            RawId::Number(n) => Ok(n),
            RawId::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid numeric id: {s:?}"))),
        }
    }
}

/// `#[serde(deserialize_with = "id::deserialize")]`
pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer)?.into_u64()
}

/// Same as [`deserialize`] for optional ids.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer)?
        .map(RawId::into_u64)
        .transpose()
}
