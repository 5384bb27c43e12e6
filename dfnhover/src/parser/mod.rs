//! Definition file parser — comment stripping, paragraph splitting, line
//! tokenizing, and section building through the field schema.

pub mod schema;

use crate::error::{DfnError, Result};
use crate::model::{Line, Section};
use schema::Lookup;

impl Line {
    /// Split on the first whitespace run. The value keeps its inner
    /// whitespace and case.
    pub fn tokenize(raw: &str) -> Line {
        let raw = raw.trim();
        match raw.find(char::is_whitespace) {
            Some(pos) => Line {
                key: raw[..pos].to_string(),
                value: raw[pos..].trim_start().to_string(),
            },
            None => Line {
                key: raw.to_string(),
                value: String::new(),
            },
        }
    }
}

/// Split file text into comment-free, blank-line delimited paragraphs.
pub fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') {
            continue;
        }
        if trimmed.is_empty() {
            if !current.is_empty() {
                out.push(current.join("\n"));
                current.clear();
            }
            continue;
        }
        current.push(line.trim_end());
    }
    if !current.is_empty() {
        out.push(current.join("\n"));
    }
    out
}

/// Build one section from a paragraph.
pub fn parse_section(paragraph: &str) -> Result<Section> {
    let mut section = Section::default();
    for raw in paragraph.lines() {
        let line = Line::tokenize(raw);
        match schema::lookup(&line.key) {
            Lookup::Field(field) => (field.apply)(&mut section, &line.value),
            Lookup::Ignored => {}
            Lookup::Unknown => {
                return Err(DfnError::UnknownField {
                    key: line.key,
                    section: paragraph.to_string(),
                })
            }
        }
    }

    let missing = if section.name.is_empty() {
        Some("name")
    } else if section.block.is_empty() {
        Some("block")
    } else {
        None
    };
    if let Some(field) = missing {
        return Err(DfnError::MissingField {
            field,
            section: paragraph.to_string(),
        });
    }

    Ok(section)
}

/// Parse every paragraph of a regular definition file.
pub fn parse_sections(text: &str) -> Result<Vec<Section>> {
    paragraphs(text).iter().map(|p| parse_section(p)).collect()
}
