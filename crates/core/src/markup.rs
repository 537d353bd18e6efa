//! Rich-text fields authored in the backend's HTML editor.
//!
//! The client never sanitizes these silently. Callers pick a rendering
//! capability explicitly: trusted markup, escaped literal text, or plain text.

use serde::{Deserialize, Serialize};

/// HTML produced by the backend (lesson descriptions, slides, exercise prompts).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(String);

impl RichText {
    #[must_use]
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    /// The raw markup, to be injected as-is. The backend is the trust boundary.
    #[must_use]
    pub fn trusted_html(&self) -> &str {
        &self.0
    }

    /// The markup with HTML metacharacters escaped, so tags show up literally.
    #[must_use]
    pub fn escaped(&self) -> String {
        escape_html(&self.0)
    }

    /// Text content with tags dropped and whitespace collapsed.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::with_capacity(self.0.len());
        let mut in_tag = false;
        for ch in self.0.chars() {
            match ch {
                '<' => {
                    in_tag = true;
                    out.push(' ');
                }
                '>' if in_tag => in_tag = false,
                _ if !in_tag => out.push(ch),
                _ => {}
            }
        }
        let decoded = out
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&");
        decoded.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.plain_text().is_empty()
    }
}

impl From<&str> for RichText {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RichText {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Escapes `&`, `<`, `>`, `"` and `'`.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trusted_html_is_untouched() {
        let text = RichText::new("<p>x = <strong>2</strong></p>");
        assert_eq!(text.trusted_html(), "<p>x = <strong>2</strong></p>");
    }

    #[test]
    fn escaped_shows_tags_literally() {
        let text = RichText::new("<em>a & b</em>");
        assert_eq!(text.escaped(), "&lt;em&gt;a &amp; b&lt;/em&gt;");
    }

    #[test]
    fn plain_text_drops_tags_and_entities() {
        let text = RichText::new("<p>Suma&nbsp;de</p><p>fracciones &amp; más</p>");
        assert_eq!(text.plain_text(), "Suma de fracciones & más");
    }

    #[test]
    fn blank_markup_is_detected() {
        assert!(RichText::new("<p> </p>").is_blank());
        assert!(!RichText::new("<p>1</p>").is_blank());
    }
}
