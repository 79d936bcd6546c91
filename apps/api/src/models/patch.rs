use serde::{Deserialize, Deserializer};

/// Deserializes a field that may be absent, `null`, or a value into `Option<Option<T>>`.
///
/// Pair with `#[serde(default)]`: absent → `None`, `null` → `Some(None)`, value → `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
