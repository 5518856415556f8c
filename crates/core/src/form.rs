//! Description of the project booking form.
//!
//! The client renders the form from this description. Each field's widget
//! is a [`FieldKind`] variant, and the element it renders as is sent
//! alongside it as `input_type`.

use serde::Serialize;

use crate::budget::BUDGET_BANDS;
use crate::resources::{RESOURCE_ACTORS, RESOURCE_EXTRAS, RESOURCE_OPTIONS};
use crate::shoot::{VALID_SHOOT_BASES, VALID_SHOOT_TYPES};

/// The widget used for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Textarea,
    Number,
    /// A single checkbox producing a boolean.
    YesNo,
    /// Pick one. When `indexed`, the submitted value is the option's position.
    Radio { options: Vec<String>, indexed: bool },
    /// Pick any number.
    Checkbox { options: Vec<String> },
    Date,
}

impl FieldKind {
    /// The HTML `<input type>` (or element) used to render this kind.
    pub fn input_type(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::YesNo | Self::Checkbox { .. } => "checkbox",
            Self::Radio { .. } => "radio",
            Self::Date => "date",
        }
    }
}

/// When a field is shown, relative to another field's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum Visibility {
    /// Shown while the named yes/no field is true.
    FlagSet { field: &'static str },
    /// Shown while the named checkbox field includes `option`.
    OptionSelected {
        field: &'static str,
        option: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    /// The element to render, derived from `kind`.
    pub input_type: &'static str,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_when: Option<Visibility>,
}

impl FormField {
    fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            required: false,
            input_type: kind.input_type(),
            kind,
            visible_when: None,
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn visible_when(mut self, visibility: Visibility) -> Self {
        self.visible_when = Some(visibility);
        self
    }
}

fn owned(options: &[&str]) -> Vec<String> {
    options.iter().map(|s| s.to_string()).collect()
}

/// The booking form, in display order.
pub fn project_form() -> Vec<FormField> {
    use FieldKind::*;

    vec![
        FormField::new("name", "Project Name", Text).required(),
        FormField::new("client", "Client Name", Text).required(),
        FormField::new("job_number", "Job Number", Text),
        FormField::new(
            "shoot_type",
            "Shoot type",
            Radio {
                options: owned(VALID_SHOOT_TYPES),
                indexed: false,
            },
        )
        .required(),
        FormField::new("head", "Project Head", Text),
        FormField::new(
            "finalised_concept",
            "Does this shoot have a finalised concept?",
            YesNo,
        ),
        FormField::new("concept", "Shoot concept", Textarea).visible_when(Visibility::FlagSet {
            field: "finalised_concept",
        }),
        FormField::new(
            "finalised_script",
            "Does this shoot have a finalised script?",
            YesNo,
        ),
        FormField::new(
            "budget",
            "Estimated budget for the shoot",
            Radio {
                options: owned(BUDGET_BANDS),
                indexed: true,
            },
        )
        .required(),
        FormField::new(
            "resources",
            "Any foreseen resources?",
            Checkbox {
                options: owned(RESOURCE_OPTIONS),
            },
        ),
        FormField::new("actors_count", "How many actors?", Number).visible_when(
            Visibility::OptionSelected {
                field: "resources",
                option: RESOURCE_ACTORS,
            },
        ),
        FormField::new("extras_count", "How many extras?", Number).visible_when(
            Visibility::OptionSelected {
                field: "resources",
                option: RESOURCE_EXTRAS,
            },
        ),
        FormField::new(
            "shoot_base",
            "Where would the shoot be based?",
            Radio {
                options: owned(VALID_SHOOT_BASES),
                indexed: false,
            },
        )
        .required(),
        FormField::new("locations", "Locations", Textarea),
        FormField::new("location_count", "Number of locations", Number),
        FormField::new("due_date", "Due date/Deadline", Date),
        FormField::new("shoot_start", "Proposed shoot start", Date),
        FormField::new("shoot_end", "Proposed shoot end", Date),
        FormField::new("notes", "Additional Notes", Textarea),
    ]
}
