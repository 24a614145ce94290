//! Inline spans: code, bold, italic, links

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref CODE: Regex = Regex::new(r"`([^`]+)`").unwrap();
    static ref BOLD: Regex = Regex::new(r"\*\*(.*?)\*\*").unwrap();
    static ref ITALIC: Regex = Regex::new(r"\*(.*?)\*").unwrap();
    static ref LINK: Regex = Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap();
}

/// A private-use character absent from `text`, used to mark code slots
fn free_marker(text: &str) -> Option<char> {
    ('\u{E000}'..='\u{F8FF}')
        .chain('\u{F0000}'..='\u{FFFFD}')
        .find(|c| !text.contains(*c))
}

/// Render the inline spans of one line
///
/// Code spans are lifted out first so the other rules never touch their
/// contents. Bold must run before italic since both use `*`.
pub fn render_inline(text: &str) -> String {
    if !CODE.is_match(text) {
        return spans(text);
    }
    let Some(marker) = free_marker(text) else {
        // Every marker is taken; code spans lose their protection
        return spans(&CODE.replace_all(text, "<code>$1</code>"));
    };

    let mut code: Vec<String> = Vec::new();
    let masked = CODE.replace_all(text, |caps: &Captures<'_>| {
        code.push(caps[1].to_string());
        format!("{0}{1}{0}", marker, code.len() - 1)
    });

    // The marker occurs only in pairs around a slot number
    let mut html = String::new();
    for (i, part) in spans(&masked).split(marker).enumerate() {
        if i % 2 == 0 {
            html.push_str(part);
            continue;
        }
        match part.parse::<usize>().ok().and_then(|n| code.get(n)) {
            Some(body) => {
                html.push_str("<code>");
                html.push_str(body);
                html.push_str("</code>");
            }
            None => html.push_str(part),
        }
    }
    html
}

fn spans(text: &str) -> String {
    let html = BOLD.replace_all(text, "<strong>$1</strong>");
    let html = ITALIC.replace_all(&html, "<em>$1</em>");
    LINK.replace_all(
        &html,
        r#"<a href="$2" target="_blank" rel="noopener noreferrer">$1</a>"#,
    )
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_before_italic() {
        assert_eq!(
            render_inline("**bold** and *italic*"),
            "<strong>bold</strong> and <em>italic</em>"
        );
    }

    #[test]
    fn test_code_span_is_protected() {
        assert_eq!(
            render_inline("run `a **b** c` now"),
            "run <code>a **b** c</code> now"
        );
    }

    #[test]
    fn test_link() {
        assert_eq!(
            render_inline("see [docs](https://x.dev/a)"),
            r#"see <a href="https://x.dev/a" target="_blank" rel="noopener noreferrer">docs</a>"#
        );
    }

    #[test]
    fn test_link_around_code() {
        assert_eq!(
            render_inline("[`cargo`](https://doc.rust-lang.org/cargo)"),
            r#"<a href="https://doc.rust-lang.org/cargo" target="_blank" rel="noopener noreferrer"><code>cargo</code></a>"#
        );
    }

    #[test]
    fn test_unbalanced_delimiters_stay_literal() {
        assert_eq!(render_inline("2 * 3"), "2 * 3");
        assert_eq!(render_inline("`open"), "`open");
        assert_eq!(render_inline("[text](no close"), "[text](no close");
    }

    #[test]
    fn test_slot_lookalikes_in_text_survive() {
        assert_eq!(
            render_inline("a \u{1A}0\u{1A} b `x`"),
            "a \u{1A}0\u{1A} b <code>x</code>"
        );
        assert_eq!(
            render_inline("\u{E000}0\u{E000} and `y`"),
            "\u{E000}0\u{E000} and <code>y</code>"
        );
    }

    #[test]
    fn test_no_escaping() {
        assert_eq!(render_inline("<b>raw</b>"), "<b>raw</b>");
    }
}
