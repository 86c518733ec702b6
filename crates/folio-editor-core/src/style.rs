//! Text styling for styled runs.
//!
//! `Style` is the sparse, optional-per-attribute descriptor stored on runs.
//! `Formatting` is the fully resolved view (every attribute has a value),
//! used for toolbar state and the editor's defaults.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Font size tiers. Each tier maps to a fixed rem value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontSize {
    #[serde(rename = "xs")]
    Xs,
    #[serde(rename = "sm")]
    Sm,
    #[default]
    #[serde(rename = "base")]
    Base,
    #[serde(rename = "lg")]
    Lg,
    #[serde(rename = "xl")]
    Xl,
    #[serde(rename = "2xl")]
    Xl2,
    #[serde(rename = "3xl")]
    Xl3,
}

impl FontSize {
    pub const ALL: [FontSize; 7] = [
        FontSize::Xs,
        FontSize::Sm,
        FontSize::Base,
        FontSize::Lg,
        FontSize::Xl,
        FontSize::Xl2,
        FontSize::Xl3,
    ];

    /// Tier name as used in persisted runs.
    pub fn as_str(&self) -> &'static str {
        match self {
            FontSize::Xs => "xs",
            FontSize::Sm => "sm",
            FontSize::Base => "base",
            FontSize::Lg => "lg",
            FontSize::Xl => "xl",
            FontSize::Xl2 => "2xl",
            FontSize::Xl3 => "3xl",
        }
    }

    /// CSS value for this tier.
    pub fn css_value(&self) -> &'static str {
        match self {
            FontSize::Xs => "0.75rem",
            FontSize::Sm => "0.875rem",
            FontSize::Base => "1rem",
            FontSize::Lg => "1.125rem",
            FontSize::Xl => "1.25rem",
            FontSize::Xl2 => "1.5rem",
            FontSize::Xl3 => "1.875rem",
        }
    }

    fn rem(&self) -> f32 {
        match self {
            FontSize::Xs => 0.75,
            FontSize::Sm => 0.875,
            FontSize::Base => 1.0,
            FontSize::Lg => 1.125,
            FontSize::Xl => 1.25,
            FontSize::Xl2 => 1.5,
            FontSize::Xl3 => 1.875,
        }
    }

    /// Parse a CSS `font-size` value back into a tier.
    ///
    /// Only rem values from the tier table are recognized; anything else
    /// (px sizes from foreign markup, keywords) yields `None`.
    pub fn from_css_value(value: &str) -> Option<FontSize> {
        let number = value.trim().strip_suffix("rem")?.trim();
        let rem: f32 = number.parse().ok()?;
        FontSize::ALL
            .into_iter()
            .find(|tier| (tier.rem() - rem).abs() < 0.001)
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontSize {
    type Err = UnknownFontSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FontSize::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| UnknownFontSize(s.to_string()))
    }
}

/// Returned when a tier name is not one of `xs..3xl`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown font size tier: {0}")]
pub struct UnknownFontSize(pub String);

/// Optional style attributes carried by a run.
///
/// `None` means "not set". A flag explicitly set to `Some(false)` is treated
/// the same as unset; `normalized` folds both into `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

impl Style {
    pub fn bold() -> Self {
        Style {
            bold: Some(true),
            ..Default::default()
        }
    }

    pub fn italic() -> Self {
        Style {
            italic: Some(true),
            ..Default::default()
        }
    }

    pub fn underline() -> Self {
        Style {
            underline: Some(true),
            ..Default::default()
        }
    }

    pub fn is_bold(&self) -> bool {
        self.bold.unwrap_or(false)
    }

    pub fn is_italic(&self) -> bool {
        self.italic.unwrap_or(false)
    }

    pub fn is_underline(&self) -> bool {
        self.underline.unwrap_or(false)
    }

    /// True when no attribute has an effect.
    pub fn is_plain(&self) -> bool {
        !self.is_bold()
            && !self.is_italic()
            && !self.is_underline()
            && self.font_size.is_none()
            && self.color.is_none()
            && self.font_family.is_none()
    }

    /// Canonical form: false flags dropped, plain styles become `None`.
    ///
    /// Font families are stored unquoted (`Fira Sans, serif`) and values
    /// lose any `;` so they stay inside one CSS declaration.
    pub fn normalized(self) -> Option<Style> {
        let style = Style {
            bold: self.bold.filter(|b| *b),
            italic: self.italic.filter(|b| *b),
            underline: self.underline.filter(|b| *b),
            color: self.color.as_deref().and_then(clean_value),
            font_family: self.font_family.as_deref().and_then(clean_family),
            ..self
        };
        if style.is_plain() { None } else { Some(style) }
    }

    /// Layer `other` on top of `self`: attributes set in `other` win.
    pub fn overlay(&self, other: &Style) -> Style {
        Style {
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            underline: other.underline.or(self.underline),
            font_size: other.font_size.or(self.font_size),
            color: other.color.clone().or_else(|| self.color.clone()),
            font_family: other.font_family.clone().or_else(|| self.font_family.clone()),
        }
    }

    /// Inline CSS declarations for this style (without direction/alignment).
    pub fn to_css(&self) -> String {
        let mut decls: Vec<String> = Vec::new();
        if self.is_bold() {
            decls.push("font-weight: bold".to_string());
        }
        if self.is_italic() {
            decls.push("font-style: italic".to_string());
        }
        if self.is_underline() {
            decls.push("text-decoration: underline".to_string());
        }
        if let Some(size) = self.font_size {
            decls.push(format!("font-size: {}", size.css_value()));
        }
        if let Some(color) = self.color.as_deref().and_then(clean_value) {
            decls.push(format!("color: {}", color));
        }
        if let Some(family) = self.font_family.as_deref().and_then(clean_family) {
            decls.push(format!("font-family: {}", quote_family(&family)));
        }
        decls.join("; ")
    }

    /// Parse inline CSS declarations into a style.
    ///
    /// Unknown properties are ignored, so a container carrying only layout
    /// declarations parses to a plain style.
    pub fn from_css(css: &str) -> Style {
        let mut style = Style::default();
        for decl in css.split(';') {
            let Some((property, value)) = decl.split_once(':') else {
                continue;
            };
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();
            match property.as_str() {
                "font-weight" => {
                    let bold = match value.to_ascii_lowercase().as_str() {
                        "bold" | "bolder" => true,
                        other => other.parse::<u16>().map(|w| w >= 600).unwrap_or(false),
                    };
                    if bold {
                        style.bold = Some(true);
                    }
                }
                "font-style" => {
                    let lower = value.to_ascii_lowercase();
                    if lower == "italic" || lower == "oblique" {
                        style.italic = Some(true);
                    }
                }
                "text-decoration" | "text-decoration-line" => {
                    if value.to_ascii_lowercase().contains("underline") {
                        style.underline = Some(true);
                    }
                }
                "font-size" => style.font_size = FontSize::from_css_value(value),
                "color" => style.color = clean_value(value),
                "font-family" => style.font_family = clean_family(value),
                _ => {}
            }
        }
        style
    }
}

/// Trimmed value with `;` removed, or `None` when nothing is left.
fn clean_value(value: &str) -> Option<String> {
    let value: String = value.chars().filter(|c| *c != ';').collect();
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Family list with each name unquoted: `"Fira Sans", serif` becomes
/// `Fira Sans, serif`.
fn clean_family(value: &str) -> Option<String> {
    let names: Vec<String> = value
        .split(',')
        .map(|name| {
            unquote(name.trim())
                .chars()
                .filter(|c| !matches!(c, ';' | '"' | '\''))
                .collect::<String>()
                .trim()
                .to_string()
        })
        .filter(|name| !name.is_empty())
        .collect();
    (!names.is_empty()).then(|| names.join(", "))
}

/// Family list as CSS: names containing whitespace are double-quoted.
fn quote_family(family: &str) -> String {
    family
        .split(", ")
        .map(|name| {
            if name.contains(char::is_whitespace) {
                format!("\"{}\"", name)
            } else {
                name.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Fully resolved formatting at a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Formatting {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub font_size: FontSize,
    pub color: String,
    pub font_family: String,
}

impl Default for Formatting {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            font_size: FontSize::Base,
            color: "#000000".to_string(),
            font_family: "Arial".to_string(),
        }
    }
}

impl Formatting {
    /// Resolve a sparse style against defaults.
    pub fn resolve(style: Option<&Style>, defaults: &Formatting) -> Formatting {
        let Some(style) = style else {
            return defaults.clone();
        };
        Formatting {
            bold: style.bold.unwrap_or(defaults.bold),
            italic: style.italic.unwrap_or(defaults.italic),
            underline: style.underline.unwrap_or(defaults.underline),
            font_size: style.font_size.unwrap_or(defaults.font_size),
            color: style.color.clone().unwrap_or_else(|| defaults.color.clone()),
            font_family: style
                .font_family
                .clone()
                .unwrap_or_else(|| defaults.font_family.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_size_table() {
        assert_eq!(FontSize::Xs.css_value(), "0.75rem");
        assert_eq!(FontSize::Xl3.css_value(), "1.875rem");
        for tier in FontSize::ALL {
            assert_eq!(FontSize::from_css_value(tier.css_value()), Some(tier));
            assert_eq!(tier.as_str().parse::<FontSize>(), Ok(tier));
        }
        assert_eq!(FontSize::from_css_value("14px"), None);
        assert_eq!(FontSize::from_css_value("2rem"), None);
        assert!("huge".parse::<FontSize>().is_err());
    }

    #[test]
    fn test_css_roundtrip() {
        let style = Style {
            bold: Some(true),
            underline: Some(true),
            font_size: Some(FontSize::Lg),
            color: Some("#ff0000".into()),
            font_family: Some("Georgia".into()),
            ..Default::default()
        };
        let css = style.to_css();
        assert_eq!(Style::from_css(&css), style);
    }

    #[test]
    fn test_font_family_quoting() {
        let quoted = Style {
            font_family: Some("\"Fira Sans\", serif".into()),
            ..Default::default()
        };
        assert_eq!(quoted.to_css(), "font-family: \"Fira Sans\", serif");
        assert_eq!(
            Style::from_css(&quoted.to_css()).font_family.as_deref(),
            Some("Fira Sans, serif")
        );

        let canonical = quoted.normalized().unwrap();
        assert_eq!(canonical.font_family.as_deref(), Some("Fira Sans, serif"));
        assert_eq!(Style::from_css(&canonical.to_css()), canonical);
    }

    #[test]
    fn test_semicolons_stay_in_one_declaration() {
        let style = Style {
            color: Some("red; font-weight: bold".into()),
            font_family: Some("Evil;Font".into()),
            ..Default::default()
        };
        let css = style.to_css();
        assert_eq!(css, "color: red font-weight: bold; font-family: EvilFont");
        let parsed = Style::from_css(&css);
        assert!(!parsed.is_bold());
        assert_eq!(parsed.font_family.as_deref(), Some("EvilFont"));
    }

    #[test]
    fn test_from_css_foreign_declarations() {
        let style = Style::from_css(
            "direction: ltr; text-align: left; font-weight: 700; font-family: 'Times New Roman'",
        );
        assert!(style.is_bold());
        assert_eq!(style.font_family.as_deref(), Some("Times New Roman"));

        let plain = Style::from_css("direction: ltr; text-align: left");
        assert!(plain.is_plain());
        assert_eq!(plain.normalized(), None);

        assert!(!Style::from_css("font-weight: 400").is_bold());
    }

    #[test]
    fn test_normalized_drops_false_flags() {
        let style = Style {
            bold: Some(false),
            italic: Some(true),
            ..Default::default()
        };
        assert_eq!(style.normalized(), Some(Style::italic()));
    }

    #[test]
    fn test_overlay() {
        let base = Style {
            bold: Some(true),
            color: Some("red".into()),
            ..Default::default()
        };
        let top = Style {
            color: Some("blue".into()),
            italic: Some(true),
            ..Default::default()
        };
        let merged = base.overlay(&top);
        assert!(merged.is_bold());
        assert!(merged.is_italic());
        assert_eq!(merged.color.as_deref(), Some("blue"));
    }

    #[test]
    fn test_resolve_defaults() {
        let defaults = Formatting::default();
        assert_eq!(Formatting::resolve(None, &defaults), defaults);

        let resolved = Formatting::resolve(Some(&Style::bold()), &defaults);
        assert!(resolved.bold);
        assert_eq!(resolved.font_family, "Arial");
        assert_eq!(resolved.font_size, FontSize::Base);
        assert_eq!(resolved.color, "#000000");
    }
}
