//! Font-size fitting for replaced text.

use serde::{Deserialize, Serialize};

/// Smallest size [`adapted_font_size`] will return.
pub const MIN_FONT_SIZE: f64 = 10.0;

/// Largest size any font spec or fitting start point is allowed to carry.
pub const MAX_FONT_SIZE: f64 = 400.0;

pub const DEFAULT_FONT_SIZE: f64 = 16.0;
pub const DEFAULT_FONT_FAMILY: &str = "Microsoft Yahei";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSpec {
    pub size: f64,
    pub family: String,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            size: DEFAULT_FONT_SIZE,
            family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl FontSpec {
    pub fn new(size: f64, family: impl Into<String>) -> Self {
        Self {
            size,
            family: family.into(),
        }
    }

    pub fn with_size(&self, size: f64) -> Self {
        Self {
            size,
            family: self.family.clone(),
        }
    }

    /// Reads the first `font-size: Npx` and `font-family: ...` declarations of
    /// inline-styled HTML, falling back to the defaults for whichever is missing.
    pub fn from_html(html: &str) -> Self {
        let mut spec = Self::default();
        if let Some(size) = css_value(html, "font-size:").and_then(parse_px) {
            spec.size = size.min(MAX_FONT_SIZE);
        }
        if let Some(family) = css_value(html, "font-family:") {
            let family = family.trim_matches(|c| c == '\'' || c == '"').trim();
            if !family.is_empty() {
                spec.family = family.to_string();
            }
        }
        spec
    }
}

fn css_value<'a>(html: &'a str, property: &str) -> Option<&'a str> {
    let lower = html.to_ascii_lowercase();
    let start = lower.find(property)? + property.len();
    let rest = &html[start..];
    let end = rest.find([';', '>', '"']).unwrap_or(rest.len());
    Some(rest[..end].trim())
}

fn parse_px(value: &str) -> Option<f64> {
    let px: f64 = value.trim().strip_suffix("px")?.trim().parse().ok()?;
    (px.is_finite() && px > 0.0).then_some(px)
}

/// Measures rendered text width in pixels.
pub trait TextMeasurer {
    fn measure_width(&self, text: &str, font: &FontSpec) -> f64;
}

/// Width estimate from character classes: full-width characters take one em,
/// everything else a little over half.
#[derive(Debug, Clone, Copy)]
pub struct CharWidthMeasurer {
    pub narrow_ratio: f64,
}

impl Default for CharWidthMeasurer {
    fn default() -> Self {
        Self { narrow_ratio: 0.55 }
    }
}

fn is_full_width(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6)
}

impl TextMeasurer for CharWidthMeasurer {
    fn measure_width(&self, text: &str, font: &FontSpec) -> f64 {
        text.chars()
            .map(|c| if is_full_width(c) { font.size } else { font.size * self.narrow_ratio })
            .sum()
    }
}

/// Largest size, counting down from `font.size`, at which `text` wraps into at
/// most `max_line` lines of `width` pixels. Steps by 2 above 22px and by 1 at or
/// below. The start size is clamped into `[MIN_FONT_SIZE, MAX_FONT_SIZE]`, and a
/// non-finite one starts from [`DEFAULT_FONT_SIZE`].
pub fn adapted_font_size(
    measurer: &dyn TextMeasurer,
    text: &str,
    font: &FontSpec,
    width: f64,
    max_line: usize,
) -> f64 {
    if width <= 0.0 {
        return MIN_FONT_SIZE;
    }
    let mut size = if font.size.is_finite() {
        font.size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
    } else {
        DEFAULT_FONT_SIZE
    };
    while size >= MIN_FONT_SIZE {
        let lines = (measurer.measure_width(text, &font.with_size(size)) / width).ceil();
        if lines <= max_line as f64 {
            return size;
        }
        size -= if size <= 22.0 { 1.0 } else { 2.0 };
    }
    MIN_FONT_SIZE
}

/// The 1-based label for item `index` on a page starting at `offset`.
/// With `pad`, single digits get a leading zero.
pub fn number_label(index: usize, offset: usize, pad: bool) -> String {
    let n = index + offset + 1;
    if pad {
        format!("{n:02}")
    } else {
        n.to_string()
    }
}
