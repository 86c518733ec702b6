//! Formatting commands over styled runs.

use std::ops::Range;

use crate::offset_map::to_node_position;
use crate::runs::{self, StyledRun};
use crate::style::{FontSize, Formatting, Style};
use crate::surface::SurfaceNode;

/// A formatting command from the toolbar or a shortcut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatKind {
    Bold,
    Italic,
    Underline,
    Color(String),
    FontSize(FontSize),
    FontFamily(String),
}

impl FormatKind {
    /// Bold, italic and underline toggle; the rest set a value.
    pub fn is_toggle(&self) -> bool {
        matches!(self, FormatKind::Bold | FormatKind::Italic | FormatKind::Underline)
    }

    /// Whether `style` already carries this attribute.
    fn is_set_in(&self, style: Option<&Style>) -> bool {
        let Some(style) = style else {
            return false;
        };
        match self {
            FormatKind::Bold => style.is_bold(),
            FormatKind::Italic => style.is_italic(),
            FormatKind::Underline => style.is_underline(),
            FormatKind::Color(color) => style.color.as_ref() == Some(color),
            FormatKind::FontSize(size) => style.font_size == Some(*size),
            FormatKind::FontFamily(family) => style.font_family.as_ref() == Some(family),
        }
    }

    /// Apply to a style. `enable` only matters for toggles.
    fn apply_to(&self, style: Option<&Style>, enable: bool) -> Option<Style> {
        let mut style = style.cloned().unwrap_or_default();
        match self {
            FormatKind::Bold => style.bold = Some(enable),
            FormatKind::Italic => style.italic = Some(enable),
            FormatKind::Underline => style.underline = Some(enable),
            FormatKind::Color(color) => style.color = Some(color.clone()),
            FormatKind::FontSize(size) => style.font_size = Some(*size),
            FormatKind::FontFamily(family) => style.font_family = Some(family.clone()),
        }
        style.normalized()
    }
}

/// Apply a formatting command to a char range of the runs.
///
/// Toggles are removed when every selected run already has them and set
/// otherwise. Runs made only of line breaks do not take part in that check.
/// Value attributes overwrite whatever the runs had.
pub fn apply_formatting(runs: &[StyledRun], range: Range<usize>, kind: &FormatKind) -> Vec<StyledRun> {
    let enable = if kind.is_toggle() {
        let selected = runs::slice_runs(runs, range.clone());
        let mut visible = selected
            .iter()
            .filter(|run| run.text.chars().any(|c| c != '\n'))
            .peekable();
        let all_set = visible.peek().is_some() && visible.all(|run| kind.is_set_in(run.style.as_ref()));
        !all_set
    } else {
        true
    };
    tracing::debug!(target: "folio::format", ?kind, ?range, enable, "apply formatting");
    runs::map_range(runs, range, |style| kind.apply_to(style, enable))
}

/// Next typing style after a formatting command with a collapsed caret.
///
/// `current` is the style text would get at the caret. Toggles flip relative
/// to it; value attributes are set.
pub fn update_typing_style(current: Option<&Style>, kind: &FormatKind) -> Option<Style> {
    let enable = !(kind.is_toggle() && kind.is_set_in(current));
    kind.apply_to(current, enable)
}

/// Formatting in effect at a caret, read from the containers enclosing it.
///
/// Every styled ancestor between the root and the caret's node contributes,
/// innermost last, and the result is resolved against `defaults`.
pub fn current_formatting_at(root: &SurfaceNode, caret: usize, defaults: &Formatting) -> Formatting {
    let position = to_node_position(root, caret);
    let mut style = Style::default();
    for depth in 1..=position.path.len() {
        if let Some(SurfaceNode::Element { tag, css, .. }) = root.node_at(&position.path[..depth]) {
            style = style.overlay(&runs::element_style(tag, css.as_deref()));
        }
    }
    Formatting::resolve(style.normalized().as_ref(), defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runs::render;

    fn hello_world() -> Vec<StyledRun> {
        vec![StyledRun::plain("hello world")]
    }

    #[test]
    fn test_bold_middle_of_run() {
        let out = apply_formatting(&hello_world(), 5..10, &FormatKind::Bold);
        assert_eq!(
            out,
            vec![
                StyledRun::plain("hello"),
                StyledRun::new(" worl", Some(Style::bold())),
                StyledRun::plain("d"),
            ]
        );
    }

    #[test]
    fn test_toggle_removes_when_all_set() {
        let bolded = apply_formatting(&hello_world(), 0..11, &FormatKind::Bold);
        assert_eq!(bolded, vec![StyledRun::new("hello world", Some(Style::bold()))]);
        let unbolded = apply_formatting(&bolded, 0..11, &FormatKind::Bold);
        assert_eq!(unbolded, hello_world());
    }

    #[test]
    fn test_toggle_sets_on_mixed_selection() {
        let partly = apply_formatting(&hello_world(), 0..5, &FormatKind::Italic);
        let out = apply_formatting(&partly, 0..11, &FormatKind::Italic);
        assert_eq!(out, vec![StyledRun::new("hello world", Some(Style::italic()))]);
    }

    #[test]
    fn test_toggle_ignores_line_break_runs() {
        let runs = vec![
            StyledRun::new("one", Some(Style::bold())),
            StyledRun::plain("\n"),
            StyledRun::new("two", Some(Style::bold())),
        ];
        let out = apply_formatting(&runs, 0..7, &FormatKind::Bold);
        assert_eq!(out, vec![StyledRun::plain("one\ntwo")]);
    }

    #[test]
    fn test_value_formats_overwrite() {
        let runs = vec![StyledRun::new(
            "abc",
            Some(Style {
                color: Some("#111111".into()),
                bold: Some(true),
                ..Default::default()
            }),
        )];
        let out = apply_formatting(&runs, 0..3, &FormatKind::Color("#ff0000".into()));
        let style = out[0].style.as_ref().unwrap();
        assert_eq!(style.color.as_deref(), Some("#ff0000"));
        assert!(style.is_bold());

        let sized = apply_formatting(&out, 1..2, &FormatKind::FontSize(FontSize::Xl));
        assert_eq!(sized.len(), 3);
        assert_eq!(sized[1].style.as_ref().unwrap().font_size, Some(FontSize::Xl));

        let family = apply_formatting(&sized, 0..3, &FormatKind::FontFamily("Georgia".into()));
        assert!(
            family
                .iter()
                .all(|run| run.style.as_ref().unwrap().font_family.as_deref() == Some("Georgia"))
        );
    }

    #[test]
    fn test_update_typing_style() {
        let bold = update_typing_style(None, &FormatKind::Bold);
        assert_eq!(bold, Some(Style::bold()));
        assert_eq!(update_typing_style(bold.as_ref(), &FormatKind::Bold), None);
        let colored = update_typing_style(bold.as_ref(), &FormatKind::Color("red".into())).unwrap();
        assert!(colored.is_bold());
        assert_eq!(colored.color.as_deref(), Some("red"));
    }

    #[test]
    fn test_current_formatting_at() {
        let runs = apply_formatting(&hello_world(), 5..10, &FormatKind::Bold);
        let runs = apply_formatting(&runs, 6..8, &FormatKind::FontSize(FontSize::Lg));
        let root = SurfaceNode::root(render(&runs));
        let defaults = Formatting::default();

        assert_eq!(current_formatting_at(&root, 2, &defaults), defaults);
        let at_bold = current_formatting_at(&root, 5, &defaults);
        assert!(at_bold.bold);
        assert_eq!(at_bold.font_size, FontSize::Base);
        assert_eq!(at_bold.font_family, "Arial");

        let at_large = current_formatting_at(&root, 6, &defaults);
        assert!(at_large.bold);
        assert_eq!(at_large.font_size, FontSize::Lg);
    }

    #[test]
    fn test_current_formatting_nested_containers() {
        let root = SurfaceNode::root(vec![SurfaceNode::element(
            "span",
            Some("color: #00ff00".into()),
            vec![SurfaceNode::element("em", None, vec![SurfaceNode::text("x")])],
        )]);
        let formatting = current_formatting_at(&root, 0, &Formatting::default());
        assert!(formatting.italic);
        assert_eq!(formatting.color, "#00ff00");
    }
}
