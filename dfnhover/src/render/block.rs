//! Block-syntax renderer.
//!
//! Rebuilds the text a user types for one block of one definition file:
//!
//! ```text
//! BEGIN PERIOD <iper>
//!   [PRINT_INPUT]
//!   <cellid> <q> [<aux(naux)>]
//!   <cellid> <q> [<aux(naux)>]
//!   ...
//! END PERIOD
//! ```

use crate::model::{DataType, DfnFile, Section};
use std::collections::HashMap;

/// Member lookup keyed by `(name, block)`. The first declaration wins when
/// a name repeats within a block.
struct MemberIndex<'a> {
    members: HashMap<(&'a str, &'a str), &'a Section>,
}

impl<'a> MemberIndex<'a> {
    fn build(file: &'a DfnFile) -> Self {
        let mut members = HashMap::new();
        for section in file.sections.iter().filter(|s| s.in_record) {
            members
                .entry((section.name.as_str(), section.block.as_str()))
                .or_insert(section);
        }
        MemberIndex { members }
    }

    fn get(&self, name: &str, block: &str) -> Option<&'a Section> {
        self.members.get(&(name, block)).copied()
    }
}

/// Accumulated lines for one block.
struct BlockText {
    begin: String,
    /// Body lines without the block indent.
    body: Vec<String>,
}

impl BlockText {
    fn new(block: &str) -> Self {
        BlockText {
            begin: format!("BEGIN {}", block.to_uppercase()),
            body: Vec::new(),
        }
    }

    /// `END` plus the block keyword from the opening line.
    fn end(&self) -> String {
        let keyword = self.begin.split_whitespace().nth(1).unwrap_or_default();
        format!("END {}", keyword)
    }

    fn finish(self) -> String {
        let mut lines = Vec::with_capacity(self.body.len() + 2);
        let end = self.end();
        lines.push(self.begin);
        lines.extend(self.body.into_iter().map(|line| format!("  {}", line)));
        lines.push(end);
        lines.join("\n")
    }
}

/// Top-level entries: everything not nested in a record, plus block
/// variables and record/recarray definitions.
fn is_top_level(section: &Section) -> bool {
    !section.in_record
        || section.block_variable
        || matches!(section.data_type, DataType::Record(_) | DataType::Recarray(_))
}

fn bracket(text: String, optional: bool) -> String {
    if optional {
        format!("[{}]", text)
    } else {
        text
    }
}

/// Bracket a multi-line entry: opening bracket on the first line, closing on the last.
fn bracket_lines(mut lines: Vec<String>, optional: bool) -> Vec<String> {
    if optional && !lines.is_empty() {
        lines[0].insert(0, '[');
        if let Some(last) = lines.last_mut() {
            last.push(']');
        }
    }
    lines
}

fn member_token(member: &Section) -> String {
    let token = if member.data_type.is_keyword() {
        member.name.to_uppercase()
    } else {
        member.placeholder()
    };
    bracket(token, member.optional)
}

/// Lines for a record/recarray, or `None` when no member resolves.
fn render_composite(
    section: &Section,
    index: &MemberIndex<'_>,
    dev_prefix: &str,
) -> Option<Vec<String>> {
    let tokens: Vec<String> = section
        .data_type
        .members()
        .iter()
        .filter_map(|name| index.get(name, &section.block))
        .filter(|member| !member.is_dev_option(dev_prefix))
        .map(member_token)
        .collect();
    if tokens.is_empty() {
        tracing::warn!(
            record = %section.name,
            block = %section.block,
            "no members resolve; record omitted"
        );
        return None;
    }

    let entry = bracket(tokens.join(" "), section.optional);
    match section.data_type {
        DataType::Recarray(_) => Some(vec![entry.clone(), entry, "...".to_string()]),
        _ => Some(vec![entry]),
    }
}

fn render_scalar(section: &Section) -> Vec<String> {
    let lines = if section.is_array() {
        let data = format!("{} -- READARRAY", section.placeholder());
        if section.just_data {
            vec![data]
        } else {
            let mut head = section.name.to_uppercase();
            if section.layered {
                head.push_str(" [LAYERED]");
            }
            if section.netcdf {
                head.push_str(" [NETCDF]");
            }
            vec![head, format!("  {}", data)]
        }
    } else {
        let mut entry = section.name.to_uppercase();
        if !section.data_type.is_keyword() {
            entry.push(' ');
            entry.push_str(&section.placeholder());
        }
        vec![entry]
    };
    bracket_lines(lines, section.optional)
}

/// Render the syntax of `block` in `file`, or `None` if the block has no
/// top-level entries.
pub fn render_block(file: &DfnFile, block: &str, dev_prefix: &str) -> Option<String> {
    let index = MemberIndex::build(file);
    let mut text: Option<BlockText> = None;

    for section in file.in_block(block).filter(|s| is_top_level(s)) {
        let text = text.get_or_insert_with(|| BlockText::new(block));
        if section.is_dev_option(dev_prefix) {
            continue;
        }
        match &section.data_type {
            DataType::Record(_) | DataType::Recarray(_) => {
                if let Some(lines) = render_composite(section, &index, dev_prefix) {
                    text.body.extend(lines);
                }
            }
            DataType::Keystring(_) => {}
            DataType::Primitive(_) if section.block_variable => {
                text.begin.push(' ');
                text.begin.push_str(&format!("<{}>", section.name));
            }
            DataType::Primitive(_) => text.body.extend(render_scalar(section)),
        }
    }

    let text = text?.finish();
    tracing::debug!(file = %file.id, block, "rendered block syntax");
    Some(format!(
        "```mf6\n# Structure of {} block in {}\n{}\n```",
        block.to_uppercase(),
        file.id.to_uppercase(),
        text
    ))
}
