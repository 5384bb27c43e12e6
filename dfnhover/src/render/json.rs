//! JSON renderer for hover and vocabulary artifacts.
//!
//! Artifacts are built from `BTreeMap`/`BTreeSet`, so keys and lists come
//! out sorted and identical input always yields identical bytes.

use crate::render::Artifact;

/// Pretty-printed JSON with a trailing newline.
pub fn render<A: Artifact>(artifact: &A) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(artifact)?;
    out.push('\n');
    Ok(out)
}
