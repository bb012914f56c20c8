//! Color Resolution
//!
//!     Equations and frontmatter reference colors in several syntaxes: named colors, hex
//!     literals with or without alpha, `rgb(..)`/`rgba(..)` functions and `$name` references
//!     to presets declared in the frontmatter. This module turns all of them into a value
//!     that both the typesetting engine and SVG accept.
//!
//! Modes
//!
//!     Two strategies exist and are both exposed through [ColorMode]:
//!
//!         Css (default):
//!             Permissive. Drops alpha channels (`#RRGGBBAA` -> `#RRGGBB`, `rgba` -> `rgb`)
//!             and passes every other literal through unchanged.
//!         Native:
//!             Strict. Hex and rgb literals always become a `#RRGGBB` triplet, and inside
//!             equation bodies they are rewritten into the markup's own `[RGB]{r,g,b}`
//!             color model. The closed set of [STANDARD_COLORS] is never touched.
//!
//! Unresolvable references never fail: an unknown `$name` comes back as written so the
//! problem stays visible in the output.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use eqsvg_config::ColorModeSetting;

/// Preset name -> color literal, as declared with `define.<name>:` in the frontmatter.
pub type Presets = BTreeMap<String, String>;

/// Color names the markup understands natively. Matched case-insensitively.
pub const STANDARD_COLORS: &[&str] = &[
    "black",
    "white",
    "red",
    "green",
    "blue",
    "cyan",
    "magenta",
    "yellow",
    "darkgray",
    "gray",
    "lightgray",
    "brown",
    "lime",
    "olive",
    "orange",
    "pink",
    "purple",
    "teal",
    "violet",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Css,
    Native,
}

impl From<ColorModeSetting> for ColorMode {
    fn from(setting: ColorModeSetting) -> Self {
        match setting {
            ColorModeSetting::Css => ColorMode::Css,
            ColorModeSetting::Native => ColorMode::Native,
        }
    }
}

static HEX_WITH_ALPHA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9A-Fa-f]{6})[0-9A-Fa-f]{2}$").unwrap());

static HEX_ANY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$").unwrap()
});

static RGBA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^rgba\(\s*([^,()]+?)\s*,\s*([^,()]+?)\s*,\s*([^,()]+?)\s*,\s*[^,()]+?\s*\)$")
        .unwrap()
});

static RGB_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^rgba?\(\s*([0-9.]+%?)\s*,\s*([0-9.]+%?)\s*,\s*([0-9.]+%?)\s*(?:,\s*[0-9.]+%?\s*)?\)$",
    )
    .unwrap()
});

/// Color-setting commands whose first argument names a color.
/// Longer names come first so `\colorbox` is not read as `\color`.
static COLOR_COMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(colorbox|textcolor|pagecolor|color)(\s*\[[^\]]*\])?(\s*)\{([^{}]*)\}").unwrap()
});

static COLOR_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*%\s*color\s*:\s*(\S.*?)\s*$").unwrap());

static SVG_PAINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\s)(fill|stroke)\s*=\s*(?:"(?:black|currentColor)"|'(?:black|currentColor)')"#)
        .unwrap()
});

pub fn is_standard_color(name: &str) -> bool {
    STANDARD_COLORS
        .iter()
        .any(|standard| standard.eq_ignore_ascii_case(name))
}

/// Permissive normalization: strips alpha channels, passes everything else through.
pub fn normalize_color(literal: &str) -> String {
    let literal = literal.trim();
    if let Some(caps) = HEX_WITH_ALPHA.captures(literal) {
        return format!("#{}", &caps[1]);
    }
    if let Some(caps) = RGBA.captures(literal) {
        return format!("rgb({},{},{})", &caps[1], &caps[2], &caps[3]);
    }
    literal.to_string()
}

/// Strict normalization: any hex or rgb literal becomes `#RRGGBB`.
pub fn normalize_native(literal: &str) -> String {
    let literal = literal.trim();
    if is_standard_color(literal) {
        return literal.to_string();
    }
    match rgb_triplet(literal) {
        Some((r, g, b)) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        None => literal.to_string(),
    }
}

pub fn normalize(literal: &str, mode: ColorMode) -> String {
    match mode {
        ColorMode::Css => normalize_color(literal),
        ColorMode::Native => normalize_native(literal),
    }
}

/// Convert a hex or rgb literal into the `[RGB]{r,g,b}` color-model argument.
pub fn to_native_model(literal: &str) -> Option<String> {
    rgb_triplet(literal.trim()).map(|(r, g, b)| format!("[RGB]{{{},{},{}}}", r, g, b))
}

/// Parse a hex (3, 6 or 8 digits) or `rgb`/`rgba` literal into 8-bit channels.
pub fn rgb_triplet(literal: &str) -> Option<(u8, u8, u8)> {
    if let Some(caps) = HEX_ANY.captures(literal) {
        let digits = &caps[1];
        let expanded: String = if digits.len() == 3 {
            digits.chars().flat_map(|c| [c, c]).collect()
        } else {
            digits[..6].to_string()
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
        return Some((channel(0)?, channel(2)?, channel(4)?));
    }
    let caps = RGB_FUNCTION.captures(literal)?;
    Some((
        rgb_component(&caps[1])?,
        rgb_component(&caps[2])?,
        rgb_component(&caps[3])?,
    ))
}

fn rgb_component(raw: &str) -> Option<u8> {
    let value = match raw.strip_suffix('%') {
        Some(percent) => percent.parse::<f64>().ok()? * 255.0 / 100.0,
        None => raw.parse::<f64>().ok()?,
    };
    Some(value.clamp(0.0, 255.0).round() as u8)
}

/// Resolve a `$name` reference through the presets, then normalize.
///
/// Unknown references are returned as written (including the `$`).
pub fn resolve_color(literal: &str, presets: &Presets, mode: ColorMode) -> String {
    let literal = literal.trim();
    let resolved = match literal.strip_prefix('$') {
        Some(name) => match presets.get(name) {
            Some(value) => value.as_str(),
            None => {
                tracing::debug!(reference = literal, "unresolved color preset");
                literal
            }
        },
        None => literal,
    };
    normalize(resolved, mode)
}

/// Rewrite the color argument of every color-setting command in an equation body.
///
/// Standard names and unknown bare words are left alone, preset names (with or without
/// the `$` sigil) are substituted and CSS-style literals are normalized in place.
/// Commands that already carry an explicit model (`\color[rgb]{..}`) are not touched.
pub fn rewrite_color_commands(latex: &str, presets: &Presets, mode: ColorMode) -> String {
    COLOR_COMMAND
        .replace_all(latex, |caps: &Captures| {
            let original = caps[0].to_string();
            if caps.get(2).is_some() {
                return original;
            }
            let command = &caps[1];
            let spacing = &caps[3];
            let Some(value) = rewrite_color_argument(&caps[4], presets, mode) else {
                return original;
            };
            match (mode, to_native_model(&value)) {
                (ColorMode::Native, Some(model)) => format!("\\{command}{model}"),
                _ => format!("\\{command}{spacing}{{{value}}}"),
            }
        })
        .into_owned()
}

fn rewrite_color_argument(argument: &str, presets: &Presets, mode: ColorMode) -> Option<String> {
    let name = argument.trim();
    if name.is_empty() || is_standard_color(name) {
        return None;
    }
    let reference = name.strip_prefix('$').unwrap_or(name);
    if let Some(preset) = presets.get(reference) {
        return Some(normalize(preset, mode));
    }
    if name.starts_with('#') || name.to_ascii_lowercase().starts_with("rgb") {
        return Some(normalize(name, mode));
    }
    None
}

/// The `% color: <value>` directive, only when it is the last non-blank line.
pub fn extract_color_directive(latex: &str) -> Option<String> {
    let last = latex.lines().rev().find(|line| !line.trim().is_empty())?;
    COLOR_DIRECTIVE
        .captures(last)
        .map(|caps| caps[1].to_string())
}

/// Swap the value of a trailing `% color:` directive for `resolved`.
///
/// Bodies without a trailing directive come back unchanged. Everything around the value,
/// including blank lines after the directive, is kept as written.
pub fn rewrite_color_directive(latex: &str, resolved: &str) -> String {
    let mut lines: Vec<String> = latex.split('\n').map(str::to_string).collect();
    let Some(index) = lines.iter().rposition(|line| !line.trim().is_empty()) else {
        return latex.to_string();
    };
    let Some(value) = COLOR_DIRECTIVE
        .captures(&lines[index])
        .and_then(|caps| caps.get(1))
        .map(|value| value.range())
    else {
        return latex.to_string();
    };
    lines[index].replace_range(value, resolved);
    lines.join("\n")
}

/// Replace literal `black`/`currentColor` paint attributes with `color`.
pub fn apply_svg_color(svg: &str, color: &str) -> String {
    let escaped = crate::eqsvg::codec::escape::escape_attr(color);
    SVG_PAINT
        .replace_all(svg, |caps: &Captures| format!("{}{}=\"{}\"", &caps[1], &caps[2], escaped))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presets(pairs: &[(&str, &str)]) -> Presets {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn strips_alpha_from_eight_digit_hex() {
        assert_eq!(normalize_color("#FF0000AA"), "#FF0000");
        assert_eq!(normalize_color("#ff0000"), "#ff0000");
    }

    #[test]
    fn rgba_becomes_rgb() {
        assert_eq!(normalize_color("rgba(10, 20 ,30, 0.5)"), "rgb(10,20,30)");
        assert_eq!(normalize_color("rgb(1, 2, 3)"), "rgb(1, 2, 3)");
    }

    #[test]
    fn permissive_passes_names_through() {
        assert_eq!(normalize_color("CornflowerBlue"), "CornflowerBlue");
    }

    #[test]
    fn native_always_produces_hex_triplet() {
        assert_eq!(normalize_native("#f00"), "#FF0000");
        assert_eq!(normalize_native("#00ff0080"), "#00FF00");
        assert_eq!(normalize_native("rgba(0, 0, 255, 0.2)"), "#0000FF");
        assert_eq!(normalize_native("rgb(100%, 0%, 0%)"), "#FF0000");
        assert_eq!(normalize_native("Red"), "Red");
        assert_eq!(normalize_native("mycolor"), "mycolor");
    }

    #[test]
    fn native_model_argument() {
        assert_eq!(to_native_model("#FF8000").as_deref(), Some("[RGB]{255,128,0}"));
        assert_eq!(to_native_model("blue"), None);
    }

    #[test]
    fn resolves_preset_references() {
        let presets = presets(&[("brand", "#FF0000AA")]);
        assert_eq!(resolve_color("$brand", &presets, ColorMode::Css), "#FF0000");
        assert_eq!(resolve_color("$missing", &presets, ColorMode::Css), "$missing");
        assert_eq!(resolve_color("teal", &presets, ColorMode::Css), "teal");
    }

    #[test]
    fn rewrites_color_commands_in_body() {
        let presets = presets(&[("brand", "#FF0000AA")]);
        let latex = r"\color{brand} x + \textcolor{red}{y} + \colorbox{#00FF00CC}{z} + \color{mine}";
        assert_eq!(
            rewrite_color_commands(latex, &presets, ColorMode::Css),
            r"\color{#FF0000} x + \textcolor{red}{y} + \colorbox{#00FF00}{z} + \color{mine}"
        );
    }

    #[test]
    fn rewrites_into_native_model() {
        let presets = presets(&[("brand", "#FF0000AA")]);
        let latex = r"\color{$brand} x \color[rgb]{1,0,0} y";
        assert_eq!(
            rewrite_color_commands(latex, &presets, ColorMode::Native),
            r"\color[RGB]{255,0,0} x \color[rgb]{1,0,0} y"
        );
    }

    #[test]
    fn standard_names_are_not_substituted_by_presets() {
        let presets = presets(&[("red", "#00FF00")]);
        let latex = r"\color{red} x";
        assert_eq!(rewrite_color_commands(latex, &presets, ColorMode::Css), latex);
    }

    #[test]
    fn directive_only_on_last_line() {
        assert_eq!(
            extract_color_directive("x^2\n% color: blue\n\n").as_deref(),
            Some("blue")
        );
        assert_eq!(extract_color_directive("% color: blue\nx^2"), None);
    }

    #[test]
    fn directive_value_is_replaced_in_place() {
        assert_eq!(
            rewrite_color_directive("x\n%  color:  $brand\n", "#FF0000"),
            "x\n%  color:  #FF0000\n"
        );
        assert_eq!(rewrite_color_directive("% color: $a\nx", "#FF0000"), "% color: $a\nx");
        assert_eq!(rewrite_color_directive("", "red"), "");
    }

    #[test]
    fn single_quoted_paint_is_recolored() {
        let svg = "<path fill='black' stroke='currentColor' d='M0 0'/>";
        assert_eq!(
            apply_svg_color(svg, "red"),
            r#"<path fill="red" stroke="red" d='M0 0'/>"#
        );
    }

    #[test]
    fn svg_paint_is_recolored() {
        let svg = r#"<g stroke="currentColor" fill="black"><path fill="none"/></g>"#;
        assert_eq!(
            apply_svg_color(svg, "#FF0000"),
            r##"<g stroke="#FF0000" fill="#FF0000"><path fill="none"/></g>"##
        );
    }
}
