use serde::{Deserialize, Deserializer};

/// Deserializes a QuickBooks entity id, which the API sends as a numeric string
/// (`"Id": "145"`) but which older payloads and fixtures carry as a number.
/// Null or non-numeric strings become 0.
pub fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        Number(u64),
        String(String),
    }

    Ok(match Option::<StringOrNumber>::deserialize(deserializer)? {
        Some(StringOrNumber::Number(n)) => n,
        Some(StringOrNumber::String(s)) => s.trim().parse().unwrap_or_default(),
        None => 0,
    })
}

/// Treats an explicit `null` like an absent key.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
