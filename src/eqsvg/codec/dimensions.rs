//! Root `<svg>` tag inspection: dimensions, viewBox and inner markup

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Exported artifacts are twice the size of the engine's fragment.
pub const EXPORT_SCALE: f64 = 2.0;

pub const FALLBACK_WIDTH: &str = "100";
pub const FALLBACK_HEIGHT: &str = "50";
pub const FALLBACK_VIEW_BOX: &str = "0 0 100 50";

static ROOT_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<svg\b[^>]*>").unwrap());

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][\w:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

static LENGTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([0-9]*\.?[0-9]+)\s*(ex|pt|px|em)?\s*$").unwrap());

static VIEW_BOX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*-?[0-9.]+(?:[\s,]+-?[0-9.]+){3}\s*$").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Ex,
    Pt,
    Px,
    Em,
    None,
}

impl LengthUnit {
    fn parse(suffix: Option<&str>) -> Self {
        match suffix {
            Some("ex") => LengthUnit::Ex,
            Some("pt") => LengthUnit::Pt,
            Some("px") => LengthUnit::Px,
            Some("em") => LengthUnit::Em,
            _ => LengthUnit::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LengthUnit::Ex => "ex",
            LengthUnit::Pt => "pt",
            LengthUnit::Px => "px",
            LengthUnit::Em => "em",
            LengthUnit::None => "",
        }
    }
}

/// A `width`/`height` value. Displays with three decimals and the original unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = LENGTH.captures(raw)?;
        let value = caps[1].parse().ok()?;
        Some(Length {
            value,
            unit: LengthUnit::parse(caps.get(2).map(|m| m.as_str())),
        })
    }

    pub fn scaled(self, factor: f64) -> Self {
        Length {
            value: self.value * factor,
            unit: self.unit,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}{}", self.value, self.unit.as_str())
    }
}

/// The root element of an SVG fragment, split into its pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgRoot<'a> {
    /// The opening `<svg ...>` tag.
    pub tag: &'a str,
    /// Everything between the opening tag and the last `</svg>`.
    pub inner: &'a str,
}

impl<'a> SvgRoot<'a> {
    /// Locate the root element. Without one, the whole fragment is treated as inner markup.
    pub fn locate(fragment: &'a str) -> Self {
        let Some(tag) = ROOT_TAG.find(fragment) else {
            return SvgRoot {
                tag: "",
                inner: fragment,
            };
        };
        if tag.as_str().ends_with("/>") {
            return SvgRoot {
                tag: tag.as_str(),
                inner: "",
            };
        }
        let body = &fragment[tag.end()..];
        let inner = match body.rfind("</svg>") {
            Some(end) => &body[..end],
            None => body,
        };
        SvgRoot {
            tag: tag.as_str(),
            inner,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        attribute(self.tag, name)
    }

    /// `width`, `height` and `viewBox` for the exported document.
    pub fn export_frame(&self) -> Frame {
        Frame {
            width: scaled_length(self.attribute("width"), FALLBACK_WIDTH),
            height: scaled_length(self.attribute("height"), FALLBACK_HEIGHT),
            view_box: self
                .attribute("viewBox")
                .filter(|vb| VIEW_BOX.is_match(vb))
                .unwrap_or_else(|| FALLBACK_VIEW_BOX.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: String,
    pub height: String,
    pub view_box: String,
}

fn scaled_length(raw: Option<String>, fallback: &str) -> String {
    raw.as_deref()
        .and_then(Length::parse)
        .map(|length| length.scaled(EXPORT_SCALE).to_string())
        .unwrap_or_else(|| fallback.to_string())
}

/// Value of a named attribute inside a single tag, unescaped.
pub fn attribute(tag: &str, name: &str) -> Option<String> {
    ATTRIBUTE
        .captures_iter(tag)
        .find(|caps| &caps[1] == name)
        .and_then(|caps| caps.get(2).or_else(|| caps.get(3)))
        .map(|value| super::escape::unescape(value.as_str()))
}
