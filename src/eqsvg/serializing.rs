//! Serialization back into the document text format
//!
//! Parsing the output yields the same labels, latex and colors. Ids are not part of the
//! text; they are recovered by passing the previous equations to the parser.
//!
//! A document without settings whose first body is shaped like `key: value` would lose
//! that body to frontmatter detection on the way back in. Such documents get a
//! `generator:` marker section in front, which the parser consumes and drops.

use crate::eqsvg::document::{Equation, Frontmatter};
use crate::eqsvg::parsing::frontmatter::{looks_like_frontmatter, GENERATOR_KEY};
use crate::eqsvg::GENERATOR;

pub const SEPARATOR: &str = "---";

pub fn to_document_text(frontmatter: &Frontmatter, equations: &[Equation]) -> String {
    document_text(frontmatter, equations.iter().map(|eq| eq.latex.as_str()))
}

/// Frontmatter followed by equation bodies, in order.
pub fn document_text<'a, I>(frontmatter: &Frontmatter, bodies: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let bodies: Vec<&str> = bodies.into_iter().collect();
    let mut sections = Vec::with_capacity(bodies.len() + 1);
    if !frontmatter.is_empty() {
        sections.push(frontmatter_text(frontmatter));
    } else if bodies.first().is_some_and(|body| looks_like_frontmatter(body)) {
        sections.push(format!("{GENERATOR_KEY}: {GENERATOR}"));
    }
    sections.extend(bodies.into_iter().map(str::to_string));
    join_sections(sections)
}

/// Frontmatter lines: `color:` first, then presets and other settings sorted by name.
pub fn frontmatter_text(frontmatter: &Frontmatter) -> String {
    let mut lines = Vec::new();
    if let Some(color) = &frontmatter.color {
        lines.push(format!("color: {color}"));
    }
    for (name, value) in &frontmatter.presets {
        lines.push(format!("define.{name}: {value}"));
    }
    for (key, value) in &frontmatter.settings {
        lines.push(format!("{key}: {value}"));
    }
    lines.join("\n")
}

/// Join section bodies with separator lines. Ends with a newline unless empty.
pub fn join_sections<I, S>(sections: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (index, section) in sections.into_iter().enumerate() {
        if index > 0 {
            out.push_str(SEPARATOR);
            out.push('\n');
        }
        out.push_str(section.as_ref().trim_end_matches('\n'));
        out.push('\n');
    }
    out
}
