//! Section splitting
//!
//!     A document is a sequence of sections separated by lines made of three or more
//!     hyphens (surrounding whitespace allowed, nothing else). A separator closes the
//!     current section and opens the next one; the last section is kept whether or not
//!     the document ends with a separator.
//!
//!     Line numbers are zero-based and refer to the original document, including blank
//!     lines at the edges of a section.

use once_cell::sync::Lazy;
use regex::Regex;

static SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*-{3,}\s*$").unwrap());

pub fn is_separator(line: &str) -> bool {
    SEPARATOR.is_match(line)
}

/// A maximal run of lines between separators (or document boundaries).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub lines: Vec<&'a str>,
    pub start_line: usize,
    pub end_line: usize,
}

impl<'a> Section<'a> {
    /// The section text without leading and trailing blank lines.
    pub fn content(&self) -> String {
        let first = self.lines.iter().position(|l| !l.trim().is_empty());
        let last = self.lines.iter().rposition(|l| !l.trim().is_empty());
        match (first, last) {
            (Some(first), Some(last)) => self.lines[first..=last].join("\n"),
            _ => String::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }
}

/// Split source text into its non-blank sections, in document order.
pub fn split_sections(source: &str) -> Vec<Section<'_>> {
    let mut sections = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut start = 0;

    for (index, line) in source.lines().enumerate() {
        if is_separator(line) {
            push_section(&mut sections, std::mem::take(&mut current), start);
            start = index + 1;
        } else {
            current.push(line);
        }
    }
    push_section(&mut sections, current, start);

    sections
}

fn push_section<'a>(sections: &mut Vec<Section<'a>>, lines: Vec<&'a str>, start: usize) {
    if lines.is_empty() {
        return;
    }
    let section = Section {
        end_line: start + lines.len() - 1,
        lines,
        start_line: start,
    };
    if !section.is_blank() {
        sections.push(section);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_separators() {
        assert!(is_separator("---"));
        assert!(is_separator("  -----  "));
        assert!(!is_separator("--"));
        assert!(!is_separator("--- x"));
        assert!(!is_separator("a - b - c"));
    }

    #[test]
    fn splits_with_original_line_ranges() {
        let source = "a\nb\n---\n\nc\n\n---\nd";
        let sections = split_sections(source);
        assert_eq!(sections.len(), 3);
        assert_eq!((sections[0].start_line, sections[0].end_line), (0, 1));
        assert_eq!((sections[1].start_line, sections[1].end_line), (3, 5));
        assert_eq!(sections[1].content(), "c");
        assert_eq!((sections[2].start_line, sections[2].end_line), (7, 7));
    }

    #[test]
    fn trailing_separator_is_optional() {
        assert_eq!(split_sections("x\n---\ny\n---\n").len(), 2);
        assert_eq!(split_sections("x\n---\ny").len(), 2);
    }

    #[test]
    fn blank_sections_are_dropped() {
        let sections = split_sections("---\n\n---\nx\n---\n   \n");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].start_line, 3);
    }

    #[test]
    fn empty_document_has_no_sections() {
        assert!(split_sections("").is_empty());
    }
}
