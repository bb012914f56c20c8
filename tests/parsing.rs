//! Integration tests for document parsing
//!
//! Covers section splitting, labels, colors and equation identity across re-parses.

use eqsvg::eqsvg::color::ColorMode;
use eqsvg::eqsvg::parsing::{parse, parse_with_mode};
use eqsvg::eqsvg::testing::assert_document;
use rstest::rstest;

const DOCUMENT: &str = "\
color: $ink
define.ink: #336699
define.brand: #FF0000AA
---
E = mc^2
---
\\label{euler}
e^{i\\pi} + 1 = 0
% color: $brand
---
\\color{brand}{a^2} + b^2 = c^2
";

#[test]
fn test_full_document() {
    let doc = parse(DOCUMENT, &[]);

    assert_document(&doc)
        .frontmatter_color(Some("#336699"))
        .preset("ink", "#336699")
        .preset("brand", "#FF0000AA")
        .labels(&["eq1", "euler", "eq2"])
        .equation(0, |eq| {
            eq.latex("E = mc^2").lines(4, 4).no_color();
        })
        .equation(1, |eq| {
            eq.latex_contains("\\label{euler}").lines(6, 8).color("#FF0000");
        })
        .equation(2, |eq| {
            eq.latex("\\color{#FF0000}{a^2} + b^2 = c^2").no_color();
        });
}

#[test]
fn test_three_unlabeled_equations_are_numbered() {
    let doc = parse("a\n---\nb\n---\nc\n", &[]);
    assert_document(&doc).labels(&["eq1", "eq2", "eq3"]);
}

#[rstest]
#[case::first("\\label{top} a\n---\nb\n---\nc", &["top", "eq1", "eq2"])]
#[case::middle("a\n---\n\\label{mid} b\n---\nc", &["eq1", "mid", "eq2"])]
#[case::all("\\label{x} a\n---\n\\label{y} b", &["x", "y"])]
#[case::punctuation("\\label{eq:energy.v-2} a", &["eq:energy.v-2"])]
fn test_auto_numbering_skips_explicit_labels(#[case] source: &str, #[case] expected: &[&str]) {
    assert_document(&parse(source, &[])).labels(expected);
}

#[rstest]
#[case::no_trailing_separator("a\n---\nb")]
#[case::trailing_separator("a\n---\nb\n---\n")]
#[case::trailing_blank_lines("a\n---\nb\n\n\n")]
#[case::crlf("a\r\n---\r\nb")]
fn test_final_section_is_kept(#[case] source: &str) {
    assert_document(&parse(source, &[]))
        .equation_count(2)
        .equation(1, |eq| {
            eq.label("eq2").latex("b");
        });
}

#[rstest]
#[case::three_hyphens("---")]
#[case::many_hyphens("----------")]
#[case::surrounding_whitespace("  ---  ")]
fn test_separator_shapes(#[case] separator: &str) {
    let source = format!("a\n{separator}\nb");
    assert_document(&parse(&source, &[])).equation_count(2);
}

#[rstest]
#[case::two_hyphens("a\n--\nb")]
#[case::text_after("a\n--- b\nb")]
#[case::minus_in_math("a --- b")]
fn test_not_a_separator(#[case] source: &str) {
    assert_document(&parse(source, &[])).equation_count(1);
}

#[test]
fn test_trailing_directive_sets_color() {
    let doc = parse("x + y\n% color: blue\n", &[]);
    assert_document(&doc).equation(0, |eq| {
        eq.color("blue");
    });
}

#[test]
fn test_non_terminal_directive_is_ignored() {
    let doc = parse("% color: blue\nx + y\n", &[]);
    assert_document(&doc).equation(0, |eq| {
        eq.no_color().latex("% color: blue\nx + y");
    });
}

#[test]
fn test_directive_followed_by_blank_lines_still_counts() {
    let doc = parse("x\n% color: green\n\n\n---\ny", &[]);
    assert_document(&doc).equation(0, |eq| {
        eq.color("green").lines(0, 3);
    });
}

#[test]
fn test_unresolved_preset_passes_through() {
    let doc = parse("x\n% color: $missing\n", &[]);
    assert_document(&doc).equation(0, |eq| {
        eq.color("$missing");
    });
}

#[test]
fn test_brand_preset_strips_alpha() {
    let doc = parse(
        "define.brand: #FF0000AA\n---\n\\color{brand}{x}\n% color: $brand\n",
        &[],
    );
    assert_document(&doc).equation(0, |eq| {
        eq.color("#FF0000").latex_contains("\\color{#FF0000}{x}");
    });
}

#[test]
fn test_native_mode_uses_rgb_model() {
    let doc = parse_with_mode(
        "define.brand: #FF0000AA\n---\n\\color{brand}{x}\n% color: $brand\n",
        &[],
        ColorMode::Native,
    );
    assert_document(&doc).equation(0, |eq| {
        eq.color("#FF0000").latex_contains("\\color[RGB]{255,0,0}{x}");
    });
}

#[test]
fn test_frontmatter_looking_equation_is_not_frontmatter() {
    let doc = parse("f(x): \\frac{1}{x}\n---\ny", &[]);
    assert_document(&doc)
        .frontmatter_color(None)
        .equation_count(2);
}

#[rstest]
#[case::thin_space("v: a\\,b\n---\ny")]
#[case::escaped_brace("s: \\{x\\}\n---\ny")]
#[case::escaped_percent("p: 5\\%\n---\ny")]
#[case::control_word("f: A \\to B\n---\ny")]
fn test_section_with_any_command_is_an_equation(#[case] source: &str) {
    assert_document(&parse(source, &[]))
        .frontmatter_color(None)
        .equation_count(2);
}

#[test]
fn test_unknown_frontmatter_keys_are_kept() {
    let doc = parse("title: Notes\ncolor: red\n---\nx", &[]);
    assert_document(&doc)
        .frontmatter_color(Some("red"))
        .setting("title", "Notes")
        .equation_count(1);
    assert!(doc.frontmatter.presets.is_empty());
}

#[test]
fn test_settings_only_frontmatter_survives_serialization() {
    let first = parse("title: notes\n---\nspeed: v", &[]);
    let second = parse(&first.to_text(), &first.equations);

    assert_eq!(first.frontmatter, second.frontmatter);
    assert_document(&second).equation(0, |eq| {
        eq.latex("speed: v").id(&first.equations[0].id);
    });
}

mod identity {
    use super::*;

    const ORIGINAL: &str = "a + b\n---\n\\label{main}\nx = 1\n---\nc + d\n";

    #[test]
    fn test_unchanged_text_keeps_every_id() {
        let first = parse(ORIGINAL, &[]);
        let second = parse(ORIGINAL, &first.equations);
        for (before, after) in first.equations.iter().zip(&second.equations) {
            assert_eq!(before.id, after.id);
        }
    }

    #[test]
    fn test_editing_labeled_equation_keeps_ids() {
        let first = parse(ORIGINAL, &[]);
        let edited = ORIGINAL.replace("x = 1", "x = 2");
        let second = parse(&edited, &first.equations);

        assert_document(&second)
            .equation(0, |eq| {
                eq.id(&first.equations[0].id);
            })
            .equation(1, |eq| {
                eq.id(&first.equations[1].id).latex_contains("x = 2");
            })
            .equation(2, |eq| {
                eq.id(&first.equations[2].id);
            });
    }

    #[test]
    fn test_reordering_keeps_ids_by_content() {
        let first = parse("a\n---\nb\n---\nc", &[]);
        let second = parse("c\n---\na\n---\nb", &first.equations);

        assert_eq!(second.equations[0].id, first.equations[2].id);
        assert_eq!(second.equations[1].id, first.equations[0].id);
        assert_eq!(second.equations[2].id, first.equations[1].id);
        // labels follow position, not identity
        assert_document(&second).labels(&["eq1", "eq2", "eq3"]);
    }

    #[test]
    fn test_editing_unlabeled_equation_mints_new_id() {
        let first = parse("a\n---\nb", &[]);
        let second = parse("a\n---\nb + 1", &first.equations);
        assert_eq!(second.equations[0].id, first.equations[0].id);
        assert_ne!(second.equations[1].id, first.equations[1].id);
    }

    #[test]
    fn test_inserted_equation_gets_fresh_id() {
        let first = parse("a\n---\nb", &[]);
        let second = parse("a\n---\nnew\n---\nb", &first.equations);
        assert_eq!(second.equations[0].id, first.equations[0].id);
        assert_eq!(second.equations[2].id, first.equations[1].id);
        assert_ne!(second.equations[1].id, first.equations[0].id);
        assert_ne!(second.equations[1].id, first.equations[1].id);
    }

    #[test]
    fn test_duplicate_bodies_match_first_previous_equation() {
        // Known limitation: identical bodies are matched first come, first served, so a
        // new leading duplicate takes the id the old leading one had.
        let first = parse("dup\n---\nother\n---\ndup", &[]);
        let second = parse("dup\n---\ndup\n---\nother", &first.equations);

        assert_eq!(second.equations[0].id, first.equations[0].id);
        assert_eq!(second.equations[1].id, first.equations[2].id);
        assert_eq!(second.equations[2].id, first.equations[1].id);
    }

    #[test]
    fn test_ids_are_unique_within_a_parse() {
        let first = parse("dup", &[]);
        let second = parse("dup\n---\ndup", &first.equations);
        assert_eq!(second.equations[0].id, first.equations[0].id);
        assert_ne!(second.equations[0].id, second.equations[1].id);
    }
}

#[test]
fn test_serialized_text_reparses_to_same_equations() {
    let first = parse(DOCUMENT, &[]);
    let second = parse(&first.to_text(), &first.equations);

    assert_eq!(first.frontmatter, second.frontmatter);
    assert_eq!(first.equations.len(), second.equations.len());
    for (before, after) in first.equations.iter().zip(&second.equations) {
        assert_eq!(before.label, after.label);
        assert_eq!(before.latex, after.latex);
        assert_eq!(before.color, after.color);
        assert_eq!(before.id, after.id);
    }
}

#[test]
fn test_parse_result_snapshot() {
    let doc = parse(DOCUMENT, &[]);
    let summary: Vec<String> = doc
        .equations
        .iter()
        .map(|eq| {
            format!(
                "{} [{}..={}] color={:?}\n{}",
                eq.label, eq.start_line, eq.end_line, eq.color, eq.latex
            )
        })
        .collect();
    insta::assert_snapshot!(summary.join("\n\n"));
}
