use serde::{Deserialize, Deserializer};

pub fn remove_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url[..url.len() - 1].to_string()
    } else {
        url.to_string()
    }
}

/// Providers disagree on whether integers travel as JSON strings or numbers.
pub fn deserialize_number_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum N {
        Str(String),
        Int(u64),
        Float(f64),
    }
    Ok(match N::deserialize(deserializer)? {
        N::Str(s) => s,
        N::Int(n) => n.to_string(),
        N::Float(f) => f.to_string(),
    })
}

/// Same as [`deserialize_number_string`] but parsed into an `f64`.
pub fn deserialize_f64_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let s = deserialize_number_string(deserializer)?;
    s.trim().parse::<f64>().map_err(serde::de::Error::custom)
}

/// Same as [`deserialize_number_string`] but parsed into a `u64`.
pub fn deserialize_u64_lenient<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let s = deserialize_number_string(deserializer)?;
    let s = s.trim();
    s.parse::<u64>()
        .or_else(|_| s.parse::<f64>().map(|f| f.max(0.0).round() as u64))
        .map_err(serde::de::Error::custom)
}
