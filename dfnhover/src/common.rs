//! Common-description dictionary built from the shared definitions file.
//!
//! The shared file holds `name`/`description` paragraphs whose descriptions
//! act as templates for `REPLACE` directives in regular definition files.

use crate::error::{DfnError, Result};
use crate::model::Line;
use crate::parser::paragraphs;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Clone)]
pub struct CommonDictionary {
    entries: HashMap<String, String>,
}

impl CommonDictionary {
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        for paragraph in paragraphs(text) {
            let mut name = None;
            let mut description = None;
            for raw in paragraph.lines() {
                let line = Line::tokenize(raw);
                match line.key.as_str() {
                    "name" => name = Some(line.value),
                    "description" => description = Some(line.value),
                    _ => {}
                }
            }
            if let (Some(name), Some(description)) = (name, description) {
                entries.insert(name, description);
            }
        }
        CommonDictionary { entries }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| DfnError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dict = Self::parse(&text);
        tracing::debug!(path = %path.display(), entries = dict.len(), "loaded common descriptions");
        Ok(dict)
    }

    pub fn get(&self, key: &str) -> Result<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| DfnError::MissingCommon(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMON: &str = "\
# common descriptions

name cellid
description is the cell identifier, and depends on the type of grid that is used for the simulation.

name auxnames
description REPLACE is unused here
type string

name orphan
type string
";

    #[test]
    fn parse_pairs() {
        let dict = CommonDictionary::parse(COMMON);
        assert_eq!(dict.len(), 2);
        assert!(dict.get("cellid").unwrap().starts_with("is the cell identifier"));
        assert!(dict.get("auxnames").is_ok());
    }

    #[test]
    fn missing_key_is_an_error() {
        let dict = CommonDictionary::parse(COMMON);
        let err = dict.get("orphan").unwrap_err();
        assert!(matches!(err, DfnError::MissingCommon(ref k) if k == "orphan"));
    }
}
