//! Styled-run document model.
//!
//! A document is a flat list of `StyledRun`s. Concatenating their text gives
//! the plain text, with `\n` for line breaks. Runs convert to and from the
//! surface tree: `extract` reads a snapshot, `render` produces the fragment
//! the surface displays.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::style::Style;
use crate::surface::SurfaceNode;

/// Declarations appended to every rendered run container.
const RUN_LAYOUT_CSS: &str = "direction: ltr; text-align: left";

/// A span of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyledRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
}

impl StyledRun {
    pub fn new(text: impl Into<String>, style: Option<Style>) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, None)
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Concatenated text of all runs.
pub fn plain_text(runs: &[StyledRun]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}

/// Total length in chars.
pub fn text_len(runs: &[StyledRun]) -> usize {
    runs.iter().map(StyledRun::len).sum()
}

/// A single unstyled run holding `text`, or nothing for empty text.
pub fn runs_from_plain(text: &str) -> Vec<StyledRun> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![StyledRun::plain(text)]
    }
}

/// Append a run, merging it into the previous one when styles match.
fn push_run(out: &mut Vec<StyledRun>, text: &str, style: Option<Style>) {
    if text.is_empty() {
        return;
    }
    let style = style.and_then(Style::normalized);
    match out.last_mut() {
        Some(last) if last.style == style => last.text.push_str(text),
        _ => out.push(StyledRun::new(text, style)),
    }
}

/// Style an element contributes: its tag (for markup that styles by tag
/// name) overlaid with its inline declarations.
pub(crate) fn element_style(tag: &str, css: Option<&str>) -> Style {
    let by_tag = match tag {
        "b" | "strong" => Style::bold(),
        "i" | "em" => Style::italic(),
        "u" => Style::underline(),
        _ => Style::default(),
    };
    match css {
        Some(css) => by_tag.overlay(&Style::from_css(css)),
        None => by_tag,
    }
}

/// Read the runs out of a surface snapshot.
///
/// Text nodes take the style of their enclosing containers (inner containers
/// win). Line-break nodes become `\n` carrying the same style. The root's
/// own declarations are layout only and are ignored.
pub fn extract(root: &SurfaceNode) -> Vec<StyledRun> {
    let mut out = Vec::new();
    for child in root.children() {
        extract_into(child, &Style::default(), &mut out);
    }
    out
}

fn extract_into(node: &SurfaceNode, inherited: &Style, out: &mut Vec<StyledRun>) {
    match node {
        SurfaceNode::Text(text) => push_run(out, text, Some(inherited.clone())),
        SurfaceNode::LineBreak => push_run(out, "\n", Some(inherited.clone())),
        SurfaceNode::Element { tag, css, children } => {
            let style = inherited.overlay(&element_style(tag, css.as_deref()));
            for child in children {
                extract_into(child, &style, out);
            }
        }
    }
}

fn run_css(style: Option<&Style>) -> String {
    match style.map(Style::to_css) {
        Some(css) if !css.is_empty() => format!("{}; {}", css, RUN_LAYOUT_CSS),
        _ => RUN_LAYOUT_CSS.to_string(),
    }
}

/// Render runs into the fragment the surface displays.
///
/// Each run becomes one `span` carrying its declarations; `\n` inside a run
/// becomes a line-break node.
pub fn render(runs: &[StyledRun]) -> Vec<SurfaceNode> {
    runs.iter()
        .filter(|run| !run.is_empty())
        .map(|run| {
            let mut children = Vec::new();
            for (i, line) in run.text.split('\n').enumerate() {
                if i > 0 {
                    children.push(SurfaceNode::LineBreak);
                }
                if !line.is_empty() {
                    children.push(SurfaceNode::text(line));
                }
            }
            SurfaceNode::element("span", Some(run_css(run.style.as_ref())), children)
        })
        .collect()
}

/// Render runs as an HTML string for read-only previews.
pub fn render_html(runs: &[StyledRun]) -> String {
    let mut html = String::new();
    for run in runs.iter().filter(|run| !run.is_empty()) {
        html.push_str("<span style=\"");
        html.push_str(&html_escape::encode_double_quoted_attribute(&run_css(
            run.style.as_ref(),
        )));
        html.push_str("\">");
        for (i, line) in run.text.split('\n').enumerate() {
            if i > 0 {
                html.push_str("<br>");
            }
            html.push_str(&html_escape::encode_text(line));
        }
        html.push_str("</span>");
    }
    html
}

/// Split a string at a char offset.
pub(crate) fn split_chars(text: &str, at: usize) -> (&str, &str) {
    let byte = text
        .char_indices()
        .nth(at)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text.split_at(byte)
}

/// Runs covering a char range, trimmed at the boundaries.
pub fn slice_runs(runs: &[StyledRun], range: Range<usize>) -> Vec<StyledRun> {
    let mut out = Vec::new();
    let mut pos = 0;
    for run in runs {
        let len = run.len();
        let run_range = pos..pos + len;
        pos += len;

        let start = range.start.max(run_range.start);
        let end = range.end.min(run_range.end);
        if start >= end {
            continue;
        }
        let (_, tail) = split_chars(&run.text, start - run_range.start);
        let (piece, _) = split_chars(tail, end - start);
        push_run(&mut out, piece, run.style.clone());
    }
    out
}

/// Replace a char range with `text` in one style.
pub fn replace_range(
    runs: &[StyledRun],
    range: Range<usize>,
    text: &str,
    style: Option<Style>,
) -> Vec<StyledRun> {
    let len = text_len(runs);
    let start = range.start.min(len);
    let end = range.end.clamp(start, len);

    let mut out = Vec::new();
    for run in slice_runs(runs, 0..start) {
        push_run(&mut out, &run.text, run.style);
    }
    push_run(&mut out, text, style);
    for run in slice_runs(runs, end..len) {
        push_run(&mut out, &run.text, run.style);
    }
    out
}

/// Restyle every run inside a char range.
///
/// Runs are split at the range boundaries first; `f` receives each inner
/// run's current style and returns its replacement.
pub fn map_range<F>(runs: &[StyledRun], range: Range<usize>, mut f: F) -> Vec<StyledRun>
where
    F: FnMut(Option<&Style>) -> Option<Style>,
{
    let len = text_len(runs);
    let start = range.start.min(len);
    let end = range.end.clamp(start, len);

    let mut out = Vec::new();
    for run in slice_runs(runs, 0..start) {
        push_run(&mut out, &run.text, run.style);
    }
    for run in slice_runs(runs, start..end) {
        let style = f(run.style.as_ref());
        push_run(&mut out, &run.text, style);
    }
    for run in slice_runs(runs, end..len) {
        push_run(&mut out, &run.text, run.style);
    }
    out
}

/// Style text typed at `offset` inherits: the char before it, or the first
/// char at the start of the document.
pub fn style_at(runs: &[StyledRun], offset: usize) -> Option<&Style> {
    let target = offset.saturating_sub(1);
    let mut pos = 0;
    for run in runs {
        let len = run.len();
        if target < pos + len {
            return run.style.as_ref();
        }
        pos += len;
    }
    runs.last().and_then(|run| run.style.as_ref())
}
