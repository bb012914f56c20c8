//! Frontmatter classification and extraction
//!
//!     The first section of a document is frontmatter if, ignoring comment lines, it has
//!     no backslash command (control words like `\frac` and control symbols like `\,`
//!     alike) and at least one `key: value` line where the key is an identifier
//!     optionally followed by `.identifier`.
//!
//!     Recognized keys:
//!         color: <value>           global color, may reference a preset
//!         define.<name>: <value>   preset declaration
//!         generator: <name>        written by the serializer, carries no setting
//!
//!     Any other key is kept verbatim in [Frontmatter::settings].

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use super::sections::{split_sections, Section};
use crate::eqsvg::color::{resolve_color, ColorMode, Presets};
use crate::eqsvg::document::Frontmatter;

static COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\(?:[A-Za-z]+|[^A-Za-z\s])").unwrap());

static KEY_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z_][\w-]*(?:\.[A-Za-z_][\w-]*)?)\s*:\s*(\S.*?)\s*$").unwrap()
});

const PRESET_PREFIX: &str = "define.";

/// Key of the marker section emitted ahead of a body that would otherwise read as settings.
pub const GENERATOR_KEY: &str = "generator";

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('%')
}

fn settings_lines<'s, 'a>(section: &'s Section<'a>) -> impl Iterator<Item = &'a str> + 's {
    section.lines.iter().copied().filter(|line| !is_comment(line))
}

/// Whether a section is shaped like frontmatter.
pub fn is_frontmatter(section: &Section<'_>) -> bool {
    let mut has_setting = false;
    for line in settings_lines(section) {
        if COMMAND.is_match(line) {
            return false;
        }
        has_setting |= KEY_VALUE.is_match(line);
    }
    has_setting
}

/// Whether `text`, placed first in a document, would be taken for frontmatter.
pub fn looks_like_frontmatter(text: &str) -> bool {
    split_sections(text).first().is_some_and(is_frontmatter)
}

/// Read global settings out of a frontmatter section.
///
/// The global color is resolved only once every preset is known, so it may reference a
/// preset declared further down.
pub fn extract_frontmatter(section: &Section<'_>, mode: ColorMode) -> Frontmatter {
    let mut presets = Presets::new();
    let mut settings = BTreeMap::new();
    let mut raw_color = None;

    for line in settings_lines(section) {
        let Some(caps) = KEY_VALUE.captures(line) else {
            continue;
        };
        let key = &caps[1];
        let value = caps[2].to_string();
        if key == "color" {
            raw_color = Some(value);
        } else if let Some(name) = key.strip_prefix(PRESET_PREFIX) {
            presets.insert(name.to_string(), value);
        } else if key == GENERATOR_KEY {
            tracing::trace!(generator = %value, "skipping generator marker");
        } else {
            tracing::debug!(key, "keeping unknown frontmatter key");
            settings.insert(key.to_string(), value);
        }
    }

    let color = raw_color.map(|raw| resolve_color(&raw, &presets, mode));
    Frontmatter {
        color,
        presets,
        settings,
    }
}
