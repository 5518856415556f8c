//! Shoot type and shoot base enumerations.
//!
//! Both are stored as their literal text in the database (guarded by CHECK
//! constraints) and decoded back through `TryFrom<String>`. The wire format
//! uses the same literals.

use serde::{Deserialize, Serialize};

pub const SHOOT_TYPE_STUDIO: &str = "Studio";
pub const SHOOT_TYPE_NARRATIVE: &str = "Narrative";
pub const SHOOT_TYPE_DOCUMENTARY: &str = "Documentary";

/// All valid shoot type literals, in display order.
pub const VALID_SHOOT_TYPES: &[&str] = &[
    SHOOT_TYPE_STUDIO,
    SHOOT_TYPE_NARRATIVE,
    SHOOT_TYPE_DOCUMENTARY,
];

pub const SHOOT_BASE_LOCAL: &str = "Local";
pub const SHOOT_BASE_NATIONAL: &str = "National";
pub const SHOOT_BASE_INTERNATIONAL: &str = "International";

/// All valid shoot base literals, in display order.
pub const VALID_SHOOT_BASES: &[&str] = &[
    SHOOT_BASE_LOCAL,
    SHOOT_BASE_NATIONAL,
    SHOOT_BASE_INTERNATIONAL,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShootType {
    Studio,
    Narrative,
    Documentary,
}

impl ShootType {
    /// Convert from the stored string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            SHOOT_TYPE_STUDIO => Ok(Self::Studio),
            SHOOT_TYPE_NARRATIVE => Ok(Self::Narrative),
            SHOOT_TYPE_DOCUMENTARY => Ok(Self::Documentary),
            _ => Err(format!(
                "Invalid shoot type '{s}'. Must be one of: {}",
                VALID_SHOOT_TYPES.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Studio => SHOOT_TYPE_STUDIO,
            Self::Narrative => SHOOT_TYPE_NARRATIVE,
            Self::Documentary => SHOOT_TYPE_DOCUMENTARY,
        }
    }
}

impl TryFrom<String> for ShootType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str_value(&value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShootBase {
    Local,
    National,
    International,
}

impl ShootBase {
    /// Convert from the stored string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            SHOOT_BASE_LOCAL => Ok(Self::Local),
            SHOOT_BASE_NATIONAL => Ok(Self::National),
            SHOOT_BASE_INTERNATIONAL => Ok(Self::International),
            _ => Err(format!(
                "Invalid shoot base '{s}'. Must be one of: {}",
                VALID_SHOOT_BASES.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => SHOOT_BASE_LOCAL,
            Self::National => SHOOT_BASE_NATIONAL,
            Self::International => SHOOT_BASE_INTERNATIONAL,
        }
    }
}

impl TryFrom<String> for ShootBase {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str_value(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shoot_type_round_trips_through_str_value() {
        for literal in VALID_SHOOT_TYPES {
            let parsed = ShootType::from_str_value(literal).unwrap();
            assert_eq!(parsed.as_str(), *literal);
        }
    }

    #[test]
    fn unknown_shoot_type_is_rejected() {
        let err = ShootType::from_str_value("Animation").unwrap_err();
        assert!(err.contains("Invalid shoot type"));
        assert!(err.contains("Documentary"));
    }

    #[test]
    fn shoot_base_is_case_sensitive() {
        assert!(ShootBase::from_str_value("local").is_err());
        assert_eq!(
            ShootBase::from_str_value("International").unwrap(),
            ShootBase::International
        );
    }

    #[test]
    fn stored_text_converts_with_try_from() {
        assert_eq!(
            ShootType::try_from("Narrative".to_string()),
            Ok(ShootType::Narrative)
        );
        assert!(ShootBase::try_from("Offshore".to_string()).is_err());
    }

    #[test]
    fn serde_uses_the_literal_names() {
        let json = serde_json::to_string(&ShootBase::National).unwrap();
        assert_eq!(json, "\"National\"");
        let parsed: Result<ShootType, _> = serde_json::from_str("\"Corporate\"");
        assert!(parsed.is_err());
    }
}
