//! Data model for parsed definition files.

use crate::error::{DfnError, Result};
use std::fs;
use std::path::Path;

/// One physical line of a definition file, split into field key and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub key: String,
    /// Everything after the first whitespace run; empty when absent.
    pub value: String,
}

/// Declared type of a section.
///
/// Composite kinds carry the ordered member names they aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Primitive(String),
    Record(Vec<String>),
    Recarray(Vec<String>),
    Keystring(Vec<String>),
}

impl Default for DataType {
    fn default() -> Self {
        DataType::Primitive(String::new())
    }
}

impl DataType {
    /// Decide the kind from a raw `type` value such as `recarray cellid q aux`.
    pub fn from_field(value: &str) -> Self {
        let mut words = value.split_whitespace();
        let head = words.next().unwrap_or_default();
        let members: Vec<String> = words.map(str::to_string).collect();
        match head {
            "record" => DataType::Record(members),
            "recarray" => DataType::Recarray(members),
            "keystring" => DataType::Keystring(members),
            _ => DataType::Primitive(value.trim().to_string()),
        }
    }

    pub fn is_composite(&self) -> bool {
        !matches!(self, DataType::Primitive(_))
    }

    /// Bare `keyword` type: a flag with no value token.
    pub fn is_keyword(&self) -> bool {
        matches!(self, DataType::Primitive(name) if name == "keyword")
    }

    pub fn members(&self) -> &[String] {
        match self {
            DataType::Primitive(_) => &[],
            DataType::Record(recs) | DataType::Recarray(recs) | DataType::Keystring(recs) => recs,
        }
    }
}

/// One keyword/variable definition (a blank-line delimited paragraph).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub block: String,
    pub reader: String,
    pub description: String,
    /// Parenthesized dimension list, or empty.
    pub shape: String,
    pub data_type: DataType,
    pub valid: Vec<String>,
    pub optional: bool,
    pub tagged: bool,
    pub in_record: bool,
    pub layered: bool,
    pub netcdf: bool,
    pub just_data: bool,
    pub block_variable: bool,
}

impl Default for Section {
    fn default() -> Self {
        Section {
            name: String::new(),
            block: String::new(),
            reader: String::new(),
            description: String::new(),
            shape: String::new(),
            data_type: DataType::default(),
            valid: Vec::new(),
            optional: false,
            tagged: true,
            in_record: false,
            layered: false,
            netcdf: false,
            just_data: false,
            block_variable: false,
        }
    }
}

impl Section {
    pub fn is_array(&self) -> bool {
        self.reader == "readarray"
    }

    pub fn is_dev_option(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.name.starts_with(prefix)
    }

    /// `<name(shape)>` token; the shape is dropped unless it is a real dimension list.
    pub fn placeholder(&self) -> String {
        let shape = if is_dimension_shape(&self.shape) {
            self.shape.as_str()
        } else {
            ""
        };
        format!("<{}{}>", self.name, shape)
    }
}

/// True for `(ncol)`-style shapes; false for free text and the `(:)` wildcard.
pub fn is_dimension_shape(shape: &str) -> bool {
    shape.starts_with('(') && shape.ends_with(')') && shape != "(:)"
}

/// A parsed definition file.
#[derive(Debug, Clone)]
pub struct DfnFile {
    /// File stem, e.g. `gwf-dis`.
    pub id: String,
    pub sections: Vec<Section>,
}

impl DfnFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| DfnError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::parse(id, &text)
    }

    pub fn parse(id: impl Into<String>, text: &str) -> Result<Self> {
        let id = id.into();
        let sections = crate::parser::parse_sections(text)?;
        tracing::debug!(file = %id, sections = sections.len(), "parsed definition file");
        Ok(DfnFile { id, sections })
    }

    /// Block names in order of first appearance.
    pub fn blocks(&self) -> Vec<&str> {
        let mut blocks: Vec<&str> = Vec::new();
        for section in &self.sections {
            if !blocks.contains(&section.block.as_str()) {
                blocks.push(&section.block);
            }
        }
        blocks
    }

    pub fn in_block<'a>(&'a self, block: &'a str) -> impl Iterator<Item = &'a Section> + 'a {
        self.sections.iter().filter(move |s| s.block == block)
    }

    pub fn tagged(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.tagged)
    }

    /// Sections with a primitive type, i.e. everything but record/recarray/keystring.
    pub fn scalars(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| !s.data_type.is_composite())
    }

    /// `.dis` for `gwf-dis`; `None` when the stem has no component separator.
    pub fn extension(&self) -> Option<String> {
        self.id
            .split_once('-')
            .map(|(_, ext)| format!(".{}", ext))
    }
}
