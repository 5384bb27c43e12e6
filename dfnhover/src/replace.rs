//! REPLACE directive expansion and description normalization.
//!
//! A description such as
//! `REPLACE auxnames {'{#1}': 'Groundwater Flow'}` is replaced by the common
//! description stored under `auxnames`, with every `{#1}` substituted.
//! The payload is a dict literal of quoted strings; it is read as data,
//! never evaluated.

use crate::common::CommonDictionary;
use crate::error::{DfnError, Result};
use regex::Regex;
use std::sync::LazyLock;

const MARKER: &str = "REPLACE";

static RE_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\bREPLACE\s+(\S+)\s*(\{.*)?$").unwrap());

/// A parsed `REPLACE <key> <mapping>` directive.
#[derive(Debug, PartialEq, Eq)]
pub struct Directive {
    pub key: String,
    /// Substitution pairs in literal order.
    pub pairs: Vec<(String, String)>,
}

impl Directive {
    /// `Ok(None)` unless the description holds `REPLACE <key>` optionally
    /// followed by a `{...}` payload; prose such as `NOREPLACE` is plain text.
    pub fn parse(description: &str) -> Result<Option<Directive>> {
        if !description.contains(MARKER) {
            return Ok(None);
        }
        let Some(caps) = RE_DIRECTIVE.captures(description) else {
            return Ok(None);
        };
        let payload = caps.get(2).map_or("", |m| m.as_str().trim());
        let pairs = parse_payload(payload)?;
        Ok(Some(Directive {
            key: caps[1].to_string(),
            pairs,
        }))
    }

    pub fn expand(&self, common: &CommonDictionary) -> Result<String> {
        let template = common.get(&self.key)?;
        Ok(substitute(template, &self.pairs))
    }
}

/// Resolve a raw description into its display form.
pub fn resolve_description(raw: &str, common: &CommonDictionary) -> Result<String> {
    let text = match Directive::parse(raw)? {
        Some(directive) => directive.expand(common)?,
        None => raw.to_string(),
    };
    Ok(normalize(&text))
}

/// Collapse doubled backticks and doubled single quotes into one backtick
/// and drop backslashes.
pub fn normalize(text: &str) -> String {
    text.replace("``", "`").replace("''", "`").replace('\\', "")
}

/// Replace every occurrence of each key in one left-to-right scan of the
/// template. Inserted values are never rescanned; at a given position the
/// first matching pair wins.
pub fn substitute(template: &str, pairs: &[(String, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    'scan: while !rest.is_empty() {
        for (key, value) in pairs {
            if !key.is_empty() && rest.starts_with(key.as_str()) {
                out.push_str(value);
                rest = &rest[key.len()..];
                continue 'scan;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    out
}

/// Read the mapping payload, recovering from trailing garbage by retrying
/// on the longest prefix that ends in a closing brace and parses cleanly.
pub fn parse_payload(payload: &str) -> Result<Vec<(String, String)>> {
    if payload.is_empty() {
        return Ok(Vec::new());
    }
    let reason = match read_mapping(payload) {
        Ok(pairs) => return Ok(pairs),
        Err(reason) => reason,
    };
    for (pos, _) in payload.rmatch_indices('}') {
        if let Ok(pairs) = read_mapping(&payload[..=pos]) {
            tracing::debug!(payload, "recovered truncated REPLACE payload");
            return Ok(pairs);
        }
    }
    Err(DfnError::MalformedPayload {
        payload: payload.to_string(),
        reason,
    })
}

/// Strict reader for `{'k': 'v', "k2": "v2",}`; the whole input must be consumed.
fn read_mapping(input: &str) -> std::result::Result<Vec<(String, String)>, String> {
    let mut reader = Reader::new(input);
    reader.skip_ws();
    reader.expect('{')?;
    let mut pairs = Vec::new();
    loop {
        reader.skip_ws();
        if reader.eat('}') {
            break;
        }
        let key = reader.string()?;
        reader.skip_ws();
        reader.expect(':')?;
        reader.skip_ws();
        let value = reader.string()?;
        pairs.push((key, value));
        reader.skip_ws();
        if reader.eat(',') {
            continue;
        }
        reader.skip_ws();
        reader.expect('}')?;
        break;
    }
    reader.skip_ws();
    if let Some(c) = reader.peek() {
        return Err(format!("unexpected `{}` after mapping", c));
    }
    Ok(pairs)
}

struct Reader<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Reader {
            chars: input.chars().peekable(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn skip_ws(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn eat(&mut self, want: char) -> bool {
        self.chars.next_if_eq(&want).is_some()
    }

    fn expect(&mut self, want: char) -> std::result::Result<(), String> {
        match self.chars.next() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(format!("expected `{}`, found `{}`", want, c)),
            None => Err(format!("expected `{}`, found end of input", want)),
        }
    }

    /// Single- or double-quoted string with Python-style escapes.
    fn string(&mut self) -> std::result::Result<String, String> {
        let quote = match self.chars.next() {
            Some(q @ ('\'' | '"')) => q,
            Some(c) => return Err(format!("expected quoted string, found `{}`", c)),
            None => return Err("expected quoted string, found end of input".to_string()),
        };
        let mut out = String::new();
        loop {
            match self.chars.next() {
                None => return Err("unterminated string".to_string()),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.chars.next() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                    Some(c) => {
                        out.push('\\');
                        out.push(c);
                    }
                    None => return Err("unterminated string".to_string()),
                },
                Some(c) => out.push(c),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn common() -> CommonDictionary {
        CommonDictionary::parse(
            "name cellid\ndescription key1 is the cell identifier; key1 depends on the grid.\n\n\
             name auxnames\ndescription defines auxiliary variables for the {#1} package.\n\n\
             name ts_filerecord\ndescription keyword to specify that a time-series file is used.\n",
        )
    }

    #[test]
    fn no_marker_passes_through() {
        assert_eq!(Directive::parse("plain text").unwrap(), None);
    }

    #[test]
    fn replaces_every_occurrence() {
        let desc = resolve_description("REPLACE cellid {'key1': 'val1'}", &common()).unwrap();
        assert_eq!(desc, "val1 is the cell identifier; val1 depends on the grid.");
    }

    #[test]
    fn empty_mapping_uses_template() {
        let desc = resolve_description("REPLACE ts_filerecord {}", &common()).unwrap();
        assert_eq!(desc, "keyword to specify that a time-series file is used.");
    }

    #[test]
    fn double_quoted_pairs() {
        let desc = resolve_description(
            r#"REPLACE auxnames {"{#1}": "Groundwater Flow"}"#,
            &common(),
        )
        .unwrap();
        assert_eq!(desc, "defines auxiliary variables for the Groundwater Flow package.");
    }

    #[test]
    fn missing_common_entry_is_fatal() {
        let err = resolve_description("REPLACE nothere {}", &common()).unwrap_err();
        assert!(matches!(err, DfnError::MissingCommon(ref k) if k == "nothere"));
    }

    #[test]
    fn marker_in_prose_is_plain_text() {
        let desc = resolve_description(
            "the REPLACEMENT value is used when NOREPLACE is off",
            &CommonDictionary::default(),
        )
        .unwrap();
        assert_eq!(desc, "the REPLACEMENT value is used when NOREPLACE is off");
        assert_eq!(Directive::parse("see REPLACE").unwrap(), None);
        assert_eq!(Directive::parse("REPLACE is off").unwrap(), None);
    }

    #[test]
    fn directive_with_broken_payload_is_fatal() {
        let err = resolve_description("REPLACE cellid {'key1': 'val1'", &common()).unwrap_err();
        assert!(matches!(err, DfnError::MalformedPayload { .. }));
    }

    #[test]
    fn directive_without_payload_uses_template() {
        let desc = resolve_description("REPLACE ts_filerecord", &common()).unwrap();
        assert_eq!(desc, "keyword to specify that a time-series file is used.");
    }

    #[test]
    fn substitution_does_not_chain() {
        let pairs = vec![
            ("{#1}".to_string(), "{#2}".to_string()),
            ("{#2}".to_string(), "two".to_string()),
        ];
        assert_eq!(substitute("a {#1} b {#2}", &pairs), "a {#2} b two");
    }

    #[test]
    fn truncated_payload_recovers_at_last_good_brace() {
        let pairs = parse_payload("{'{#1}': 'GWF', '{#2}': 'model'}  trailing }'junk").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("{#1}".to_string(), "GWF".to_string()),
                ("{#2}".to_string(), "model".to_string()),
            ]
        );
    }

    #[test]
    fn payload_without_closing_brace_fails() {
        let err = parse_payload("{'{#1}': 'GWF'").unwrap_err();
        assert!(matches!(err, DfnError::MalformedPayload { .. }));
    }

    #[test]
    fn escapes_in_strings() {
        let pairs = parse_payload(r#"{'a\'b': "c\\d", 'e': 'f',}"#).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("a'b".to_string(), "c\\d".to_string()),
                ("e".to_string(), "f".to_string()),
            ]
        );
    }

    #[test]
    fn normalize_quotes_and_backslashes() {
        assert_eq!(normalize("``GWF'' and \\texttt{x}"), "`GWF` and texttt{x}");
    }
}
