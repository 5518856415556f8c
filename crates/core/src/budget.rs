//! Budget bands.
//!
//! A budget is one of a fixed, ordered list of bands. The position in
//! [`BUDGET_BANDS`] is what gets stored; the label is only for display.

use serde::{Deserialize, Deserializer};

/// Display labels for each band. The index is the stored value.
pub const BUDGET_BANDS: &[&str] = &[
    "R < 50 000 . 00",
    "R 50 - 60 000 . 00",
    "R 60 - 70 000 . 00",
    "R 70 - 80 000 . 00",
    "R 80 - 90 000 . 00",
    "R 90 - 100 000 . 00",
    "R 100 - 110 000 . 00",
    "R 110 - 120 000 . 00",
    "R 120 - 130 000 . 00",
    "R 130 - 140 000 . 00",
    "R 140 - 150 000 . 00",
    "R 150 - 160 000 . 00",
    "R 160 - 170 000 . 00",
    "R 170 - 180 000 . 00",
    "R 180 - 190 000 . 00",
    "R 190 - 200 000 . 00",
    "R > 200 000 . 00",
];

/// Look up the display label for a stored band index.
pub fn band_label(index: i16) -> Option<&'static str> {
    usize::try_from(index)
        .ok()
        .and_then(|i| BUDGET_BANDS.get(i))
        .copied()
}

/// Validate that `index` addresses one of the known bands.
pub fn validate_band(index: i16) -> Result<(), String> {
    if band_label(index).is_some() {
        Ok(())
    } else {
        Err(format!(
            "Invalid budget band {index}. Must be between 0 and {}",
            BUDGET_BANDS.len() - 1
        ))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBand {
    Index(i64),
    Text(String),
}

/// Deserialize an optional band index given either as a number (`2`) or as
/// a numeric string (`"2"`, which is how HTML radio inputs submit it).
///
/// An empty string is treated as "no budget". Range checking is left to
/// [`validate_band`] so the error surfaces as a validation failure.
pub fn deserialize_optional_band<'de, D>(deserializer: D) -> Result<Option<i16>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let index = match Option::<RawBand>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawBand::Index(i)) => i,
        Some(RawBand::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<i64>()
                .map_err(|_| D::Error::custom(format!("budget must be a band index, got '{s}'")))?
        }
    };

    i16::try_from(index)
        .map(Some)
        .map_err(|_| D::Error::custom(format!("budget band {index} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "deserialize_optional_band")]
        budget: Option<i16>,
    }

    fn parse(json: &str) -> Result<Option<i16>, serde_json::Error> {
        serde_json::from_str::<Holder>(json).map(|h| h.budget)
    }

    #[test]
    fn there_are_seventeen_bands() {
        assert_eq!(BUDGET_BANDS.len(), 17);
        assert_eq!(band_label(0), Some("R < 50 000 . 00"));
        assert_eq!(band_label(16), Some("R > 200 000 . 00"));
    }

    #[test]
    fn out_of_range_bands_have_no_label() {
        assert_eq!(band_label(-1), None);
        assert_eq!(band_label(17), None);
        assert!(validate_band(17).is_err());
        assert!(validate_band(2).is_ok());
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(parse(r#"{"budget": 2}"#).unwrap(), Some(2));
        assert_eq!(parse(r#"{"budget": "2"}"#).unwrap(), Some(2));
        assert_eq!(parse(r#"{"budget": " 11 "}"#).unwrap(), Some(11));
    }

    #[test]
    fn missing_null_and_empty_mean_no_budget() {
        assert_eq!(parse("{}").unwrap(), None);
        assert_eq!(parse(r#"{"budget": null}"#).unwrap(), None);
        assert_eq!(parse(r#"{"budget": ""}"#).unwrap(), None);
    }

    #[test]
    fn rejects_non_numeric_text() {
        assert!(parse(r#"{"budget": "lots"}"#).is_err());
        assert!(parse(r#"{"budget": 100000}"#).is_err());
    }
}
