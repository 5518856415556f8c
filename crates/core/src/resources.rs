//! Resource tags and their dependent head-count fields.
//!
//! Resources are free-form strings; [`RESOURCE_OPTIONS`] is the vocabulary
//! the booking form offers. Two of them unlock a count field.

pub const RESOURCE_ACTORS: &str = "Actors";
pub const RESOURCE_EXTRAS: &str = "Extras";

/// Resource vocabulary offered by the booking form, in display order.
pub const RESOURCE_OPTIONS: &[&str] = &[
    RESOURCE_ACTORS,
    RESOURCE_EXTRAS,
    "Dialogue",
    "Voice Over",
    "Visual Effects",
    "Practical Effects",
    "Fixer",
    "Translator",
    "Driver",
];

/// Check that every selected counted resource comes with its count.
///
/// Counts supplied for resources that were not selected are accepted and
/// left untouched.
pub fn validate_resource_counts(
    resources: &[String],
    actors_count: Option<i32>,
    extras_count: Option<i32>,
) -> Result<(), String> {
    let mut missing = Vec::new();
    if has_resource(resources, RESOURCE_ACTORS) && actors_count.is_none() {
        missing.push("actors_count");
    }
    if has_resource(resources, RESOURCE_EXTRAS) && extras_count.is_none() {
        missing.push("extras_count");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "Selected resources require a head count: {}",
            missing.join(", ")
        ))
    }
}

fn has_resource(resources: &[String], tag: &str) -> bool {
    resources.iter().any(|r| r == tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn actors_without_count_is_rejected() {
        let err = validate_resource_counts(&tags(&["Actors", "Driver"]), None, None).unwrap_err();
        assert!(err.contains("actors_count"));
        assert!(!err.contains("extras_count"));
    }

    #[test]
    fn both_counts_reported_together() {
        let err = validate_resource_counts(&tags(&["Extras", "Actors"]), None, None).unwrap_err();
        assert!(err.contains("actors_count, extras_count"));
    }

    #[test]
    fn counts_present_passes() {
        assert!(validate_resource_counts(&tags(&["Actors", "Extras"]), Some(5), Some(0)).is_ok());
    }

    #[test]
    fn uncounted_resources_need_nothing() {
        assert!(validate_resource_counts(&tags(&["Fixer", "Custom rig"]), None, None).is_ok());
        assert!(validate_resource_counts(&[], Some(3), None).is_ok());
    }
}
