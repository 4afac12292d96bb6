//! HTML fragments produced and consumed by the editor commands

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|div|li|h[1-6]|tr|blockquote|pre)\s*>")
        .expect("line break pattern is valid")
});

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(amp|lt|gt|quot|#39|apos|nbsp);").expect("entity pattern is valid")
});

/// Reduce an HTML fragment to its text
///
/// Block ends and `<br>` become newlines, every other tag and attribute
/// (inline styles included) is dropped, and common entities are decoded.
#[must_use]
pub fn strip_markup(html: &str) -> String {
    let text = LINE_BREAK.replace_all(html, "\n");
    let text = TAG.replace_all(&text, "");
    let text = ENTITY.replace_all(&text, |caps: &regex::Captures<'_>| {
        match &caps[1] {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            "#39" | "apos" => "'",
            _ => " ",
        }
        .to_string()
    });
    text.trim_end_matches('\n').to_string()
}

#[must_use]
pub fn escape_html(text: &str) -> String {
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

/// `<pre><code>` block holding `text` verbatim
#[must_use]
pub fn code_block(text: &str) -> String {
    format!("<pre><code>{}</code></pre>", escape_html(text))
}

/// `<blockquote>` with one paragraph per line of `text`
#[must_use]
pub fn quote_block(text: &str) -> String {
    let paragraphs: String = text
        .lines()
        .map(|line| format!("<p>{}</p>", escape_html(line)))
        .collect();
    let paragraphs = if paragraphs.is_empty() {
        "<p><br></p>".to_string()
    } else {
        paragraphs
    };
    format!("<blockquote>{paragraphs}</blockquote>")
}

/// Empty table with a trailing paragraph so the caret can leave it
#[must_use]
pub fn table_html(rows: usize, cols: usize) -> String {
    let row = format!("<tr>{}</tr>", "<td><br></td>".repeat(cols));
    format!("<table><tbody>{}</tbody></table><p><br></p>", row.repeat(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup_drops_styles_and_keeps_lines() {
        let html = r#"<p><span style="color:red">let</span> x = 1;</p><p>x &lt; 2 &amp;&amp; y</p>"#;
        assert_eq!(strip_markup(html), "let x = 1;\nx < 2 && y");
        assert_eq!(strip_markup("a<br>b<BR/>c"), "a\nb\nc");
    }

    #[test]
    fn test_code_block_escapes_text() {
        assert_eq!(
            code_block("<b>"),
            "<pre><code>&lt;b&gt;</code></pre>"
        );
    }

    #[test]
    fn test_quote_block_paragraphs() {
        assert_eq!(
            quote_block("one\ntwo"),
            "<blockquote><p>one</p><p>two</p></blockquote>"
        );
        assert_eq!(quote_block(""), "<blockquote><p><br></p></blockquote>");
    }

    #[test]
    fn test_table_shape() {
        let html = table_html(2, 3);
        assert_eq!(html.matches("<tr>").count(), 2);
        assert_eq!(html.matches("<td>").count(), 6);
    }
}
