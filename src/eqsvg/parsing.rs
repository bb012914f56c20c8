//! Document parsing
//!
//!     Turns the raw document text into a [ParsedDocument]: an optional frontmatter block
//!     plus one [Equation] per remaining section, in source order.
//!
//! Stages
//!
//!     1. Sections: split on separator lines. See [sections].
//!     2. Frontmatter: the first non-blank section is consumed as settings when it is
//!        shaped like them. See [frontmatter].
//!     3. Equations: for every other section, in order:
//!         - label: explicit `\label{..}` or the next `eq<N>`. See [labels].
//!         - override color: trailing `% color:` directive, resolved through presets.
//!         - latex: color commands and the directive rewritten with the resolved values,
//!           so the body reads the same without the frontmatter.
//!         - id: reused from the previous parse when recognized. See [identity].
//!
//!     Parsing is pure and never fails; odd input degrades into odd but visible output.

pub mod frontmatter;
pub mod identity;
pub mod labels;
pub mod sections;

use crate::eqsvg::color::{
    extract_color_directive, resolve_color, rewrite_color_commands, rewrite_color_directive,
    ColorMode,
};
use crate::eqsvg::document::{Equation, Frontmatter, ParsedDocument};

use self::frontmatter::{extract_frontmatter, is_frontmatter};
use self::identity::IdentityMatcher;
use self::labels::{explicit_label, AutoLabeler};
use self::sections::{split_sections, Section};

/// Parse with the default (CSS) color mode.
///
/// Pass the equations of the previous parse result to keep their ids, or an empty
/// slice for a fresh document.
pub fn parse(source: &str, previous: &[Equation]) -> ParsedDocument {
    parse_with_mode(source, previous, ColorMode::default())
}

pub fn parse_with_mode(source: &str, previous: &[Equation], mode: ColorMode) -> ParsedDocument {
    let mut sections = split_sections(source).into_iter().peekable();

    let frontmatter = match sections.peek() {
        Some(first) if is_frontmatter(first) => {
            let frontmatter = extract_frontmatter(first, mode);
            sections.next();
            frontmatter
        }
        _ => Frontmatter::default(),
    };

    let equations: Vec<Equation> = {
        let mut builder = EquationBuilder {
            frontmatter: &frontmatter,
            mode,
            labeler: AutoLabeler::new(),
            identity: IdentityMatcher::new(previous),
        };
        sections.map(|section| builder.build(&section)).collect()
    };

    tracing::debug!(
        equations = equations.len(),
        presets = frontmatter.presets.len(),
        "parsed document"
    );

    ParsedDocument {
        frontmatter,
        equations,
    }
}

struct EquationBuilder<'f, 'p> {
    frontmatter: &'f Frontmatter,
    mode: ColorMode,
    labeler: AutoLabeler,
    identity: IdentityMatcher<'p>,
}

impl EquationBuilder<'_, '_> {
    fn build(&mut self, section: &Section<'_>) -> Equation {
        let body = section.content();
        let presets = &self.frontmatter.presets;

        let explicit = explicit_label(&body);
        let label = match &explicit {
            Some(label) => label.clone(),
            None => self.labeler.next_label(),
        };

        let color = extract_color_directive(&body)
            .map(|directive| resolve_color(&directive, presets, self.mode));
        let mut latex = rewrite_color_commands(&body, presets, self.mode);
        if let Some(color) = &color {
            latex = rewrite_color_directive(&latex, color);
        }
        let id = self.identity.assign(explicit.as_deref(), &latex);

        Equation {
            id,
            label,
            latex,
            start_line: section.start_line,
            end_line: section.end_line,
            color,
            rendered_svg: None,
        }
    }
}
