use serde::{Deserialize, Deserializer};

/// Distinguishes an absent field from an explicit `null` in partial updates.
///
/// Use together with `#[serde(default)]`:
///
/// - field absent: `None` (keep the stored value)
/// - `null`: `Some(None)` (clear it)
/// - value: `Some(Some(v))`
pub fn deserialize_double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_double_option")]
        patronymic: Option<Option<String>>,
    }

    #[test]
    fn test_absent_field() {
        let patch: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch.patronymic, None);
    }

    #[test]
    fn test_explicit_null() {
        let patch: Patch = serde_json::from_str(r#"{"patronymic":null}"#).unwrap();
        assert_eq!(patch.patronymic, Some(None));
    }

    #[test]
    fn test_value() {
        let patch: Patch = serde_json::from_str(r#"{"patronymic":"Ivanovich"}"#).unwrap();
        assert_eq!(patch.patronymic, Some(Some("Ivanovich".to_string())));
    }
}
