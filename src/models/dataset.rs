use serde::Deserialize;

use crate::models::de;
use crate::utils::errors::VizError;

/// A dataset entry from the dataset list payload
///
/// The checked state is UI-local, but the layout engine consumes it to decide
/// which transcripts are visible and in which order the tracks are stacked.
///
/// # Examples
///
/// ```rust
/// use isoviz::models::Dataset;
///
/// let datasets = Dataset::list_from_json(
///     r#"[{"id": "ds1", "name": "Cortex", "is_reference": true, "isChecked": true}]"#,
/// )
/// .unwrap();
/// assert!(datasets[0].is_checked);
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Dataset {
    #[serde(deserialize_with = "de::ident")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_reference: bool,
    #[serde(default, rename = "isChecked")]
    pub is_checked: bool,
}

impl Dataset {
    /// Deserializes the dataset list payload
    pub fn list_from_json(payload: &str) -> Result<Vec<Self>, VizError> {
        Ok(serde_json::from_str(payload)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_list_from_json() {
        let datasets = Dataset::list_from_json(
            r#"[
                {"id": 1, "name": "Cortex", "is_reference": true, "isChecked": true},
                {"id": 2, "name": "Striatum"}
            ]"#,
        )
        .unwrap();
        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[0].id, "1");
        assert!(datasets[0].is_checked);
        assert!(!datasets[1].is_reference);
        assert!(!datasets[1].is_checked);
    }
}
