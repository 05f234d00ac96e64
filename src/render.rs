//! Trusted-content renderer.
//!
//! Answers (from the knowledge base or the backend) may carry two bits of
//! markup: `**bold**` and literal `<a href="...">label</a>` links. This
//! module turns them into a [`RichText`] span list. Everything else is kept
//! as literal text.
//!
//! Only answers go through [`render_answer`]. Visitor text is wrapped with
//! [`RichText::plain`] and is never parsed, so a visitor typing `**x**` or
//! `<a ...>` sees exactly what they typed.

use std::sync::LazyLock;

use regex::Regex;

/// `**…**` is lazy and stays on one line.
const BOLD_PATTERN: &str = r"\*\*(?P<bold>.*?)\*\*";
/// Anchors need a double-quoted href.
const ANCHOR_PATTERN: &str = r#"<a\s[^>]*?href="(?P<href>[^"]*)"[^>]*>(?P<label>.*?)</a>"#;

static MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("{BOLD_PATTERN}|{ANCHOR_PATTERN}")).expect("markup pattern is valid")
});
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(BOLD_PATTERN).expect("bold pattern is valid"));
static ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ANCHOR_PATTERN).expect("anchor pattern is valid"));

// ── Span model ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
    /// `bold` is set for links inside `**…**` or with `**` in their label.
    Link { href: String, label: String, bold: bool },
}

/// A rendered message body: an ordered list of inline spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText {
    spans: Vec<Inline>,
}

impl RichText {
    /// Literal text, no markup interpretation.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::default();
        }
        Self { spans: vec![Inline::Text(text)] }
    }

    pub fn spans(&self) -> &[Inline] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Inline::Text(last)) = self.spans.last_mut() {
            last.push_str(text);
        } else {
            self.spans.push(Inline::Text(text.to_string()));
        }
    }

    /// Contents of a `**…**` span: anchors inside become bold links, the
    /// rest bold text.
    fn push_bold(&mut self, text: &str) {
        let mut cursor = 0;
        for caps in ANCHOR.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            self.push_bold_text(&text[cursor..whole.start()]);
            if let (Some(href), Some(label)) = (caps.name("href"), caps.name("label")) {
                self.spans.push(link(href.as_str(), label.as_str(), true));
            }
            cursor = whole.end();
        }
        self.push_bold_text(&text[cursor..]);
    }

    fn push_bold_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.spans.push(Inline::Bold(text.to_string()));
        }
    }

    /// Text with markup stripped; links become `label (href)`.
    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            match span {
                Inline::Text(t) | Inline::Bold(t) => out.push_str(t),
                Inline::Link { href, label, .. } => {
                    out.push_str(label);
                    out.push_str(" (");
                    out.push_str(href);
                    out.push(')');
                }
            }
        }
        out
    }

    /// HTML fragment for a web host. Literal text is escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            match span {
                Inline::Text(t) => out.push_str(&escape_html(t)),
                Inline::Bold(t) => {
                    out.push_str("<b>");
                    out.push_str(&escape_html(t));
                    out.push_str("</b>");
                }
                Inline::Link { href, label, bold } => {
                    if *bold {
                        out.push_str("<b>");
                    }
                    out.push_str("<a href=\"");
                    out.push_str(&escape_html(href));
                    out.push_str("\" target=\"_blank\">");
                    out.push_str(&escape_html(label));
                    out.push_str("</a>");
                    if *bold {
                        out.push_str("</b>");
                    }
                }
            }
        }
        out
    }

    /// Styled string for a terminal. Styling is dropped when stdout is not
    /// a tty.
    #[cfg(feature = "channel-console")]
    pub fn to_terminal(&self) -> String {
        use console::style;

        let mut out = String::new();
        for span in &self.spans {
            match span {
                Inline::Text(t) => out.push_str(t),
                Inline::Bold(t) => out.push_str(&style(t).bold().to_string()),
                Inline::Link { href, label, bold } => {
                    let styled = style(label).underlined();
                    let styled = if *bold { styled.bold() } else { styled };
                    out.push_str(&styled.to_string());
                    out.push_str(&format!(" ({})", style(href).dim()));
                }
            }
        }
        out
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Render an answer string. Unmatched `**` and stray tags stay literal.
pub fn render_answer(text: &str) -> RichText {
    let mut rich = RichText::default();
    let mut cursor = 0;

    for caps in MARKUP.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        rich.push_text(&text[cursor..whole.start()]);

        if let Some(bold) = caps.name("bold") {
            rich.push_bold(bold.as_str());
        } else if let (Some(href), Some(label)) = (caps.name("href"), caps.name("label")) {
            rich.spans.push(link(href.as_str(), label.as_str(), false));
        }
        cursor = whole.end();
    }

    rich.push_text(&text[cursor..]);
    rich
}

/// `**` markers in a label are dropped and make the whole link bold.
fn link(href: &str, label: &str, bold: bool) -> Inline {
    Inline::Link {
        href: href.to_string(),
        label: BOLD.replace_all(label, "${bold}").into_owned(),
        bold: bold || BOLD.is_match(label),
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
