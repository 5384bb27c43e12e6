//! dfnhover — turn MODFLOW 6 definition (dfn) files into editor hover data.
//!
//! Definition files describe the blocks and keywords of MF6 input files.
//! This crate parses them into [`DfnFile`]s, resolves shared `REPLACE`
//! descriptions against the common dictionary, reconstructs the input
//! syntax of every block, and aggregates the results per keyword and per
//! block. A [`Pass`] runs the whole pipeline over one directory.

pub mod common;
pub mod error;
pub mod hover;
pub mod model;
pub mod parser;
pub mod pass;
pub mod render;
pub mod replace;
pub mod vocab;

pub use common::CommonDictionary;
pub use error::{DfnError, Result};
pub use hover::{BlockHover, KeywordHover};
pub use model::{DataType, DfnFile, Line, Section};
pub use pass::{Pass, PassConfig, PassReport};
pub use vocab::Vocabulary;
