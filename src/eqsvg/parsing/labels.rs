//! Equation labels
//!
//! An explicit `\label{..}` wins; equations without one are numbered `eq1`, `eq2`, ...
//! in document order, counting only the auto-labeled ones.

use once_cell::sync::Lazy;
use regex::Regex;

static LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\label\{([\w:.\-]+)\}").unwrap());

const AUTO_PREFIX: &str = "eq";

pub fn explicit_label(latex: &str) -> Option<String> {
    LABEL.captures(latex).map(|caps| caps[1].to_string())
}

/// Remove every `\label{..}` command.
pub fn strip_labels(latex: &str) -> String {
    LABEL.replace_all(latex, "").into_owned()
}

/// Hands out `eq<N>` names for equations without an explicit label.
#[derive(Debug, Default)]
pub struct AutoLabeler {
    issued: usize,
}

impl AutoLabeler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_label(&mut self) -> String {
        self.issued += 1;
        format!("{AUTO_PREFIX}{}", self.issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_label_identifier() {
        assert_eq!(
            explicit_label(r"E = mc^2 \label{eq:energy.v-2}").as_deref(),
            Some("eq:energy.v-2")
        );
        assert_eq!(explicit_label(r"\label{}"), None);
        assert_eq!(explicit_label("x"), None);
    }

    #[test]
    fn strips_labels() {
        assert_eq!(strip_labels(r"a \label{x} + b"), "a  + b");
    }

    #[test]
    fn auto_labels_count_up() {
        let mut labeler = AutoLabeler::new();
        assert_eq!(labeler.next_label(), "eq1");
        assert_eq!(labeler.next_label(), "eq2");
    }
}
