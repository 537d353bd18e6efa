use std::collections::{HashMap, HashSet};

use matelog_core::RichText;

use crate::context::MarkupPolicy;

/// HTML for a rich field under the given policy.
#[must_use]
pub fn render_markup(text: &RichText, policy: MarkupPolicy) -> String {
    match policy {
        MarkupPolicy::Trusted => text.trusted_html().to_string(),
        MarkupPolicy::Sanitized => sanitize_html(text.trusted_html()),
    }
}

/// Keeps the formatting lesson authors use and drops everything active.
#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "div", "span", "br", "em", "strong", "b", "i", "u", "sub", "sup", "code", "pre",
        "blockquote", "ul", "ol", "li", "h3", "h4", "table", "thead", "tbody", "tr", "th", "td",
        "img", "a",
    ]
    .into_iter()
    .collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", ["href"].into_iter().collect());
    attributes.insert("img", ["src", "alt"].into_iter().collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .clean(html)
        .to_string()
}
