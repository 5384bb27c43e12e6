//! Renderers — block syntax text and the JSON artifacts built from it.

pub mod block;
pub mod json;

use serde::Serialize;

/// A generated output document.
pub trait Artifact: Serialize {
    /// File name the artifact is written under.
    fn file_name(&self) -> &'static str;
}
