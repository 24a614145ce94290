//! Restricted markdown to HTML
//!
//! Supported: `#`/`##`/`###` headers, `**bold**`, `*italic*`, fenced code
//! with an optional language tag, `` `inline code` ``, `[links](url)`, `- `
//! and `1. ` list items, `> ` blockquotes, `---` rules and paragraphs split on
//! blank lines.
//!
//! The output is raw markup. Nothing is escaped, so HTML in the input reaches
//! the page unchanged: only render trusted content.
//!
//! Known limits kept for compatibility with existing content:
//! - only the first run of adjacent `- ` items is wrapped in `<ul>`; later
//!   runs come out as bare `<li>` inside a paragraph
//! - numbered items become `<li>` with no enclosing `<ol>`

mod inline;

pub use inline::render_inline;

/// Opening tags of segments that are emitted without a `<p>` wrapper
const BLOCK_PREFIXES: &[&str] = &["<h", "<ul", "<ol", "<pre", "<blockquote", "<hr"];

#[derive(Debug, Clone, PartialEq)]
enum Line<'a> {
    Blank,
    Header(usize, &'a str),
    Rule,
    Quote(&'a str),
    Bullet(&'a str),
    Numbered(&'a str),
    Fence(Option<&'a str>),
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    if line.trim().is_empty() {
        return Line::Blank;
    }
    for (level, marker) in [(3, "### "), (2, "## "), (1, "# ")] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Line::Header(level, rest);
        }
    }
    if line == "---" {
        return Line::Rule;
    }
    if let Some(rest) = line.strip_prefix("> ") {
        return Line::Quote(rest);
    }
    if let Some(rest) = line.strip_prefix("- ") {
        return Line::Bullet(rest);
    }
    if let Some(rest) = line.strip_prefix("```") {
        if rest.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Line::Fence((!rest.is_empty()).then_some(rest));
        }
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(". ") {
            return Line::Numbered(rest);
        }
    }
    Line::Text(line)
}

/// Whether the first unordered run has been emitted yet
#[derive(Debug, Clone, Copy, PartialEq)]
enum ListWrap {
    Pending,
    Done,
}

struct Builder {
    segments: Vec<Vec<String>>,
    current: Vec<String>,
    bullets: Vec<String>,
    wrap: ListWrap,
}

impl Builder {
    fn new() -> Self {
        Self {
            segments: Vec::new(),
            current: Vec::new(),
            bullets: Vec::new(),
            wrap: ListWrap::Pending,
        }
    }

    fn flush_bullets(&mut self) {
        if self.bullets.is_empty() {
            return;
        }
        let mut items: Vec<String> = self
            .bullets
            .drain(..)
            .map(|item| format!("<li>{}</li>", item))
            .collect();
        if self.wrap == ListWrap::Pending {
            if let Some(first) = items.first_mut() {
                first.insert_str(0, "<ul>");
            }
            if let Some(last) = items.last_mut() {
                last.push_str("</ul>");
            }
            self.wrap = ListWrap::Done;
        }
        self.current.extend(items);
    }

    fn end_segment(&mut self) {
        self.flush_bullets();
        if !self.current.is_empty() {
            self.segments.push(std::mem::take(&mut self.current));
        }
    }

    fn push(&mut self, html: String) {
        self.flush_bullets();
        self.current.push(html);
    }

    fn finish(mut self) -> String {
        self.end_segment();
        self.segments
            .iter()
            .map(|lines| {
                let starts_block = lines
                    .first()
                    .is_some_and(|first| BLOCK_PREFIXES.iter().any(|p| first.starts_with(p)));
                if starts_block {
                    lines.join("\n")
                } else {
                    format!("<p>{}</p>", lines.join("<br>"))
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render `markdown` to HTML; never fails, empty input gives `""`
pub fn render(markdown: &str) -> String {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut out = Builder::new();
    let mut i = 0;

    while i < lines.len() {
        match classify(lines[i]) {
            Line::Blank => out.end_segment(),
            Line::Header(level, text) => {
                out.push(format!("<h{0}>{1}</h{0}>", level, render_inline(text)))
            }
            Line::Rule => out.push("<hr>".to_string()),
            Line::Quote(text) => {
                out.push(format!("<blockquote>{}</blockquote>", render_inline(text)))
            }
            Line::Bullet(text) => out.bullets.push(render_inline(text)),
            Line::Numbered(text) => out.push(format!("<li>{}</li>", render_inline(text))),
            Line::Fence(lang) => {
                let close = lines[i + 1..]
                    .iter()
                    .position(|l| l.starts_with("```"))
                    .map(|offset| i + 1 + offset);
                match close {
                    Some(end) => {
                        out.end_segment();
                        out.push(code_block(lang, &lines[i + 1..end]));
                        out.end_segment();
                        i = end;
                    }
                    // Unterminated fences stay literal text
                    None => out.push(render_inline(lines[i])),
                }
            }
            Line::Text(text) => out.push(render_inline(text)),
        }
        i += 1;
    }

    out.finish()
}

fn code_block(lang: Option<&str>, body: &[&str]) -> String {
    let mut code = String::new();
    for line in body {
        code.push_str(line);
        code.push('\n');
    }
    match lang {
        Some(lang) => format!(r#"<pre><code class="language-{}">{}</code></pre>"#, lang, code),
        None => format!("<pre><code>{}</code></pre>", code),
    }
}

/// Stateless renderer handle for callers that want an object
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, markdown: &str) -> String {
        render(markdown)
    }
}
