//! Field schema — which `key value` lines a section may carry and how each
//! value is coerced onto [`Section`].

use crate::model::{is_dimension_shape, DataType, Section};

/// Coerce a raw value and store it on the section.
pub type Apply = fn(&mut Section, &str);

pub struct Field {
    pub key: &'static str,
    /// Target attribute on [`Section`].
    pub attr: &'static str,
    pub apply: Apply,
}

macro_rules! field {
    ($key:literal => $attr:ident, $coerce:path) => {
        Field {
            key: $key,
            attr: stringify!($attr),
            apply: |section: &mut Section, value: &str| section.$attr = $coerce(value),
        }
    };
}

/// Interpreted fields.
pub static FIELDS: &[Field] = &[
    field!("block" => block, text),
    field!("name" => name, text),
    field!("type" => data_type, DataType::from_field),
    field!("shape" => shape, shape),
    field!("reader" => reader, text),
    field!("description" => description, text),
    field!("valid" => valid, words),
    field!("optional" => optional, flag),
    field!("tagged" => tagged, flag),
    field!("in_record" => in_record, flag),
    field!("layered" => layered, flag),
    field!("netcdf" => netcdf, flag),
    field!("just_data" => just_data, flag),
    field!("block_variable" => block_variable, flag),
];

/// Fields that are consumed without producing an attribute.
pub static IGNORED: &[&str] = &[
    "default_value",
    "longname",
    "numeric_index",
    "deprecated",
    "removed",
    "preserve_case",
    "time_series",
    "mf6internal",
    "other_names",
    "support_negative_index",
    "jagged_array",
    "extended",
    "developmode",
    "prerelease",
];

pub enum Lookup {
    Field(&'static Field),
    Ignored,
    Unknown,
}

pub fn lookup(key: &str) -> Lookup {
    if let Some(field) = FIELDS.iter().find(|f| f.key == key) {
        Lookup::Field(field)
    } else if IGNORED.contains(&key) {
        Lookup::Ignored
    } else {
        Lookup::Unknown
    }
}

fn text(value: &str) -> String {
    value.to_string()
}

fn flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn words(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

fn shape(value: &str) -> String {
    let value = value.trim();
    if is_dimension_shape(value) {
        value.to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_is_exact_and_case_insensitive() {
        assert!(flag("true"));
        assert!(flag("True"));
        assert!(flag("TRUE "));
        assert!(!flag("false"));
        assert!(!flag("yes"));
        assert!(!flag("truey"));
        assert!(!flag(""));
    }

    #[test]
    fn shape_keeps_only_dimension_lists() {
        assert_eq!(shape("(ncol)"), "(ncol)");
        assert_eq!(shape("(nrow, ncol)"), "(nrow, ncol)");
        assert_eq!(shape("(:)"), "");
        assert_eq!(shape("lenbigline"), "");
        assert_eq!(shape(""), "");
    }

    #[test]
    fn keys_are_unique_across_tables() {
        for field in FIELDS {
            assert!(!IGNORED.contains(&field.key), "{} is both kept and ignored", field.key);
        }
    }

    #[test]
    fn apply_routes_to_attribute() {
        let mut section = Section::default();
        let Lookup::Field(field) = lookup("valid") else {
            panic!("valid should be a known field");
        };
        assert_eq!(field.attr, "valid");
        (field.apply)(&mut section, "cm  m ft");
        assert_eq!(section.valid, vec!["cm", "m", "ft"]);
    }

    #[test]
    fn lookup_classifies_keys() {
        assert!(matches!(lookup("name"), Lookup::Field(_)));
        assert!(matches!(lookup("default_value"), Lookup::Ignored));
        assert!(matches!(lookup("colour"), Lookup::Unknown));
    }
}
