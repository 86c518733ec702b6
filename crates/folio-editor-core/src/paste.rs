//! Clipboard paste cleanup.
//!
//! Pasted content always enters the document as plain text. HTML payloads
//! are reduced to their text with block boundaries kept as line breaks;
//! everything else about the source markup is dropped.

/// What the clipboard offered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PastePayload {
    pub html: Option<String>,
    pub plain: Option<String>,
}

impl PastePayload {
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            plain: None,
        }
    }

    pub fn plain(plain: impl Into<String>) -> Self {
        Self {
            html: None,
            plain: Some(plain.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.html.as_deref().is_none_or(str::is_empty) && self.plain.as_deref().is_none_or(str::is_empty)
    }
}

/// Tags whose boundaries become line breaks.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "li", "dt", "dd", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "blockquote", "pre",
    "ul", "ol", "dl", "table", "section", "article", "header", "footer",
];

/// Table cells are separated by a space.
const CELL_TAGS: &[&str] = &["td", "th"];

/// Tags whose content is never text.
const SKIPPED_TAGS: &[&str] = &["style", "script", "head", "title", "template"];

/// Text to insert for a paste, or `None` when there is nothing to insert.
///
/// HTML wins when it yields any text; otherwise the plain payload is used
/// with its line endings normalized.
pub fn sanitize(payload: &PastePayload) -> Option<String> {
    if let Some(html) = payload.html.as_deref() {
        let text = html_to_text(html);
        if !text.is_empty() {
            return Some(text);
        }
    }
    payload
        .plain
        .as_deref()
        .map(normalize_newlines)
        .filter(|text| !text.is_empty())
}

/// Convert CRLF and lone CR to LF.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Strip markup, keeping block boundaries and `<br>` as `\n`.
pub fn html_to_text(html: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with `html`.
    let lower = html.to_ascii_lowercase();
    let mut out = TextSink::default();
    let mut pos = 0;

    while pos < html.len() {
        let rest = &html[pos..];
        if rest.starts_with("<!--") {
            pos = match rest.find("-->") {
                Some(end) => pos + end + 3,
                None => html.len(),
            };
            continue;
        }
        if rest.starts_with('<') {
            let Some(tag_end) = find_tag_end(rest) else {
                // A stray `<` with no closing `>` is text.
                out.push_text("<");
                pos += 1;
                continue;
            };
            let tag = Tag::parse(&lower[pos + 1..pos + tag_end]);
            pos += tag_end + 1;

            if !tag.closing && !tag.self_closing && SKIPPED_TAGS.contains(&tag.name) {
                let close = format!("</{}", tag.name);
                pos = match lower[pos..].find(&close) {
                    Some(start) => {
                        let after = pos + start;
                        lower[after..].find('>').map_or(html.len(), |gt| after + gt + 1)
                    }
                    None => html.len(),
                };
                continue;
            }
            if tag.name == "br" {
                out.line_break();
            } else if BLOCK_TAGS.contains(&tag.name) {
                out.pending_break = true;
            } else if CELL_TAGS.contains(&tag.name) {
                out.pending_space = true;
            }
            continue;
        }

        let text_end = rest.find('<').unwrap_or(rest.len());
        let decoded = html_escape::decode_html_entities(&rest[..text_end]);
        out.push_text(&decoded);
        pos += text_end;
    }

    out.finish()
}

/// Byte index of the `>` closing the tag at the start of `rest`, skipping
/// quoted attribute values.
fn find_tag_end(rest: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in rest.char_indices().skip(1) {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '>') => return Some(i),
            (None, '<') => return None,
            _ => {}
        }
    }
    None
}

struct Tag<'a> {
    name: &'a str,
    closing: bool,
    self_closing: bool,
}

impl<'a> Tag<'a> {
    /// Parse the inside of `<...>` (already lowercased).
    fn parse(inner: &'a str) -> Tag<'a> {
        let closing = inner.starts_with('/');
        let body = inner.trim_start_matches('/');
        let name_len = body
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(body.len());
        Tag {
            name: &body[..name_len],
            closing,
            self_closing: inner.trim_end().ends_with('/'),
        }
    }
}

/// Output buffer with HTML whitespace collapsing.
#[derive(Default)]
struct TextSink {
    out: String,
    pending_space: bool,
    pending_break: bool,
}

impl TextSink {
    fn push_text(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                ' ' | '\t' | '\n' | '\r' | '\u{000C}' => self.pending_space = true,
                c => {
                    self.flush_break();
                    if self.pending_space && !self.out.is_empty() && !self.out.ends_with('\n') {
                        self.out.push(' ');
                    }
                    self.pending_space = false;
                    self.out.push(if c == '\u{00A0}' { ' ' } else { c });
                }
            }
        }
    }

    fn flush_break(&mut self) {
        if self.pending_break {
            self.pending_break = false;
            self.pending_space = false;
            if !self.out.is_empty() && !self.out.ends_with('\n') {
                self.trim_trailing_spaces();
                self.out.push('\n');
            }
        }
    }

    fn line_break(&mut self) {
        self.flush_break();
        self.trim_trailing_spaces();
        self.pending_space = false;
        self.out.push('\n');
    }

    fn trim_trailing_spaces(&mut self) {
        let trimmed = self.out.trim_end_matches(' ').len();
        self.out.truncate(trimmed);
    }

    fn finish(self) -> String {
        self.out.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_become_lines() {
        assert_eq!(html_to_text("<p>Hi</p><p>There</p>"), "Hi\nThere");
        let payload = PastePayload::html("<p>Hi</p><p>There</p>");
        assert_eq!(sanitize(&payload).as_deref(), Some("Hi\nThere"));
    }

    #[test]
    fn test_inline_markup_stripped() {
        let html = r#"<span style="font-weight:bold">bold</span> and <a href="x?a=1&amp;b=2">link</a>"#;
        assert_eq!(html_to_text(html), "bold and link");
    }

    #[test]
    fn test_line_breaks_and_lists() {
        assert_eq!(html_to_text("one<br>two<br/>three"), "one\ntwo\nthree");
        assert_eq!(html_to_text("<ul><li>a</li><li>b</li></ul>after"), "a\nb\nafter");
        assert_eq!(html_to_text("<div>a<br></div><div>b</div>"), "a\nb");
        assert_eq!(html_to_text("<h1>Title</h1>\n<table><tr><td>x</td><td>y</td></tr></table>"), "Title\nx y");
    }

    #[test]
    fn test_whitespace_and_entities() {
        assert_eq!(html_to_text("  lots   of \n\t space  "), "lots of space");
        assert_eq!(html_to_text("a&nbsp;&nbsp;b &lt;tag&gt; &amp; &#233;"), "a  b <tag> & é");
    }

    #[test]
    fn test_skipped_content() {
        let html = "<html><head><title>T</title><style>p { color: red; }</style></head>\
                    <body><!-- comment --><script>alert('<p>')</script><p>kept</p></body></html>";
        assert_eq!(html_to_text(html), "kept");
    }

    #[test]
    fn test_quoted_gt_in_attribute() {
        assert_eq!(html_to_text(r#"<img alt="a > b">text"#), "text");
        assert_eq!(html_to_text("1 < 2"), "1 < 2");
    }

    #[test]
    fn test_plain_fallback() {
        let payload = PastePayload {
            html: Some("<p>  </p>".into()),
            plain: Some("line one\r\nline two\rthree".into()),
        };
        assert_eq!(sanitize(&payload).as_deref(), Some("line one\nline two\nthree"));
        assert_eq!(sanitize(&PastePayload::plain("  keep  spaces ")).as_deref(), Some("  keep  spaces "));
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(sanitize(&PastePayload::default()), None);
        assert_eq!(sanitize(&PastePayload::plain("")), None);
        assert!(PastePayload::default().is_empty());
        assert!(!PastePayload::plain("x").is_empty());
    }
}
