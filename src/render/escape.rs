/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Keep only hrefs with a safe scheme; anything else becomes `#`.
pub fn safe_href(href: &str) -> String {
    let trimmed = href.trim();
    let lower = trimmed.to_ascii_lowercase();
    let allowed = ["http://", "https://", "mailto:", "tel:", "/", "#"]
        .iter()
        .any(|prefix| lower.starts_with(prefix));

    if allowed && !lower.starts_with("//") {
        escape_html(trimmed)
    } else {
        "#".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_safe_href() {
        assert_eq!(safe_href("/contact"), "/contact");
        assert_eq!(safe_href("https://example.com/?a=1&b=2"), "https://example.com/?a=1&amp;b=2");
        assert_eq!(safe_href("mailto:hi@example.com"), "mailto:hi@example.com");
        assert_eq!(safe_href("javascript:alert(1)"), "#");
        assert_eq!(safe_href("//evil.example.com"), "#");
    }
}
