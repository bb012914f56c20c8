//! Testing utilities for parse results
//!
//!     Fluent assertions over a [ParsedDocument], in the spirit of comparing whole
//!     structures rather than counting items:
//!
//!     ```rust,ignore
//!     use eqsvg::eqsvg::testing::assert_document;
//!
//!     assert_document(&doc)
//!         .frontmatter_color(Some("red"))
//!         .equation_count(2)
//!         .equation(0, |eq| {
//!             eq.label("eq1").latex("x^2").lines(0, 0).no_color();
//!         });
//!     ```
//!
//!     Every failure message carries the path of the item being checked.

use crate::eqsvg::document::{Equation, EquationId, ParsedDocument};

/// Create an assertion builder for a parse result
pub fn assert_document(doc: &ParsedDocument) -> DocumentAssertion<'_> {
    DocumentAssertion { doc }
}

pub struct DocumentAssertion<'a> {
    doc: &'a ParsedDocument,
}

impl<'a> DocumentAssertion<'a> {
    pub fn equation_count(self, expected: usize) -> Self {
        let actual = self.doc.equations.len();
        assert_eq!(
            actual,
            expected,
            "document: Expected {} equations, found {}: [{}]",
            expected,
            actual,
            summarize(&self.doc.equations)
        );
        self
    }

    pub fn labels(self, expected: &[&str]) -> Self {
        let actual: Vec<&str> = self.doc.equations.iter().map(|eq| eq.label.as_str()).collect();
        assert_eq!(actual, expected, "document: labels differ");
        self
    }

    pub fn frontmatter_color(self, expected: Option<&str>) -> Self {
        let actual = self.doc.frontmatter.color.as_deref();
        assert_eq!(
            actual, expected,
            "frontmatter: Expected color {:?}, got {:?}",
            expected, actual
        );
        self
    }

    pub fn preset(self, name: &str, expected: &str) -> Self {
        let actual = self.doc.frontmatter.presets.get(name).map(String::as_str);
        assert_eq!(
            actual,
            Some(expected),
            "frontmatter: Expected preset '{}' to be '{}', got {:?}",
            name,
            expected,
            actual
        );
        self
    }

    pub fn setting(self, key: &str, expected: &str) -> Self {
        let actual = self.doc.frontmatter.settings.get(key).map(String::as_str);
        assert_eq!(
            actual,
            Some(expected),
            "frontmatter: Expected setting '{}' to be '{}', got {:?}",
            key,
            expected,
            actual
        );
        self
    }

    pub fn equation<F>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(EquationAssertion<'a>),
    {
        let equation = self.doc.equations.get(index).unwrap_or_else(|| {
            panic!(
                "document: Expected equation at index {}, but only {} present",
                index,
                self.doc.equations.len()
            )
        });
        check(EquationAssertion {
            equation,
            context: format!("equations[{index}]"),
        });
        self
    }
}

pub struct EquationAssertion<'a> {
    equation: &'a Equation,
    context: String,
}

impl<'a> EquationAssertion<'a> {
    pub fn label(self, expected: &str) -> Self {
        assert_eq!(
            self.equation.label, expected,
            "{}: Expected label '{}', got '{}'",
            self.context, expected, self.equation.label
        );
        self
    }

    pub fn latex(self, expected: &str) -> Self {
        assert_eq!(
            self.equation.latex, expected,
            "{}: latex differs",
            self.context
        );
        self
    }

    pub fn latex_contains(self, needle: &str) -> Self {
        assert!(
            self.equation.latex.contains(needle),
            "{}: Expected latex to contain '{}', got '{}'",
            self.context,
            needle,
            self.equation.latex
        );
        self
    }

    pub fn color(self, expected: &str) -> Self {
        assert_eq!(
            self.equation.color.as_deref(),
            Some(expected),
            "{}: Expected color '{}'",
            self.context,
            expected
        );
        self
    }

    pub fn no_color(self) -> Self {
        assert!(
            self.equation.color.is_none(),
            "{}: Expected no color, got {:?}",
            self.context,
            self.equation.color
        );
        self
    }

    pub fn lines(self, start: usize, end: usize) -> Self {
        let actual = (self.equation.start_line, self.equation.end_line);
        assert_eq!(
            actual,
            (start, end),
            "{}: Expected lines {}..={}, got {}..={}",
            self.context,
            start,
            end,
            actual.0,
            actual.1
        );
        self
    }

    pub fn id(self, expected: &EquationId) -> Self {
        assert_eq!(
            &self.equation.id, expected,
            "{}: Expected id '{}', got '{}'",
            self.context, expected, self.equation.id
        );
        self
    }
}

fn summarize(equations: &[Equation]) -> String {
    equations
        .iter()
        .map(|eq| eq.label.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
