//! Text-to-markup helpers shared by the document builder and the page renderer.

/// Escapes text for use in element content and double-quoted attributes.
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

/// Escapes a single line and restores `<b>` emphasis as `<strong>`.
pub fn inline_rich_text(text: &str) -> String {
    escape_html(text)
        .replace("&lt;b&gt;", "<strong>")
        .replace("&lt;/b&gt;", "</strong>")
}

/// Like [`inline_rich_text`], with newlines rendered as `<br />`.
pub fn rich_text(text: &str) -> String {
    inline_rich_text(text).replace('\n', "<br />")
}

/// The text a reader sees: `<b>` markers dropped, everything else kept verbatim.
pub fn visible_text(text: &str) -> String {
    text.replace("<b>", "").replace("</b>", "")
}

/// Non-blank lines of a multi-line field, trimmed.
pub fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_rich_text_keeps_bold_only() {
        assert_eq!(
            rich_text("Secured <b>Rank 2</b> <i>x</i>\nnext"),
            "Secured <strong>Rank 2</strong> &lt;i&gt;x&lt;/i&gt;<br />next"
        );
    }

    #[test]
    fn test_script_is_neutralised() {
        let html = rich_text("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_visible_text_drops_bold_markers() {
        assert_eq!(visible_text("<b>IBPC</b> Award"), "IBPC Award");
    }

    #[test]
    fn test_non_blank_lines() {
        let lines: Vec<&str> = non_blank_lines("one\n\n  two  \n ").collect();
        assert_eq!(lines, vec!["one", "two"]);
    }
}
