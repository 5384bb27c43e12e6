//! Grammar vocabulary — the file extensions, block names, keywords, and
//! valid option values that syntax highlighting needs.

use crate::model::DfnFile;
use crate::render::Artifact;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Vocabulary {
    pub extensions: BTreeSet<String>,
    pub blocks: BTreeSet<String>,
    pub keywords: BTreeSet<String>,
    pub valids: BTreeSet<String>,
}

impl Vocabulary {
    pub fn collect(file: &DfnFile, dev_prefix: &str) -> Self {
        let mut vocab = Vocabulary::default();
        vocab.extensions.extend(file.extension());
        vocab
            .blocks
            .extend(file.scalars().map(|s| s.block.clone()));
        vocab.keywords.extend(
            file.tagged()
                .filter(|s| !s.data_type.is_composite() && !s.is_dev_option(dev_prefix))
                .map(|s| s.name.clone()),
        );
        for section in &file.sections {
            vocab.valids.extend(section.valid.iter().cloned());
        }
        vocab
    }

    pub fn merge(&mut self, other: Vocabulary) {
        self.extensions.extend(other.extensions);
        self.blocks.extend(other.blocks);
        self.keywords.extend(other.keywords);
        self.valids.extend(other.valids);
    }
}

impl Artifact for Vocabulary {
    fn file_name(&self) -> &'static str {
        "vocab.json"
    }
}
