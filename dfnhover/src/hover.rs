//! Hover aggregation across definition files.
//!
//! Descriptions shared by several files collapse into one entry listing
//! every contributing file.

use crate::common::CommonDictionary;
use crate::error::Result;
use crate::model::DfnFile;
use crate::render::block::render_block;
use crate::render::Artifact;
use crate::replace::resolve_description;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// `keyword -> block -> description -> file ids`
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeywordHover(BTreeMap<String, BTreeMap<String, BTreeMap<String, BTreeSet<String>>>>);

impl KeywordHover {
    pub fn insert(&mut self, keyword: &str, block: &str, description: &str, file_id: &str) {
        self.0
            .entry(keyword.to_string())
            .or_default()
            .entry(block.to_string())
            .or_default()
            .entry(description.to_string())
            .or_default()
            .insert(file_id.to_string());
    }

    /// Descriptions of every scalar section in one file.
    ///
    /// Composites and developer options are skipped, as are sections
    /// without a description.
    pub fn collect(file: &DfnFile, common: &CommonDictionary, dev_prefix: &str) -> Result<Self> {
        let mut hover = KeywordHover::default();
        for section in file.scalars() {
            if section.is_dev_option(dev_prefix) || section.description.is_empty() {
                continue;
            }
            let description = resolve_description(&section.description, common)?;
            hover.insert(&section.name, &section.block, &description, &file.id);
        }
        Ok(hover)
    }

    pub fn merge(&mut self, other: KeywordHover) {
        for (keyword, blocks) in other.0 {
            let target = self.0.entry(keyword).or_default();
            for (block, descriptions) in blocks {
                let target = target.entry(block).or_default();
                for (description, files) in descriptions {
                    target.entry(description).or_default().extend(files);
                }
            }
        }
    }

    pub fn get(&self, keyword: &str, block: &str) -> Option<&BTreeMap<String, BTreeSet<String>>> {
        self.0.get(keyword)?.get(block)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Artifact for KeywordHover {
    fn file_name(&self) -> &'static str {
        "hover_keyword.json"
    }
}

/// `block -> file id -> rendered syntax`
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BlockHover(BTreeMap<String, BTreeMap<String, String>>);

impl BlockHover {
    pub fn insert(&mut self, block: &str, file_id: &str, text: String) {
        self.0
            .entry(block.to_string())
            .or_default()
            .insert(file_id.to_string(), text);
    }

    pub fn collect(file: &DfnFile, dev_prefix: &str) -> Self {
        let mut hover = BlockHover::default();
        for block in file.blocks() {
            if let Some(text) = render_block(file, block, dev_prefix) {
                hover.insert(block, &file.id, text);
            }
        }
        hover
    }

    pub fn merge(&mut self, other: BlockHover) {
        for (block, files) in other.0 {
            self.0.entry(block).or_default().extend(files);
        }
    }

    pub fn get(&self, block: &str, file_id: &str) -> Option<&str> {
        self.0.get(block)?.get(file_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Artifact for BlockHover {
    fn file_name(&self) -> &'static str {
        "hover_block.json"
    }
}
