//! Request handlers, one module per page or API group.

pub mod analytics;
pub mod api;
pub mod dashboard;
pub mod explorer;
pub mod export;
pub mod pipeline;

/// Escape a user-supplied string for interpolation into HTML.
pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

#[cfg(test)]
mod tests {
    use super::escape_html;

    #[test]
    fn test_escape_html_neutralises_markup() {
        assert_eq!(
            escape_html(r#""><script>alert(1)</script>"#),
            "&quot;&gt;&lt;script&gt;alert(1)&lt;/script&gt;"
        );
        assert_eq!(escape_html("MKVLAW"), "MKVLAW");
    }
}
