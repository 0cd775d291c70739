//! Allow-list HTML sanitizer for article content.
//!
//! Only structural markup survives: tags outside the allow-list are
//! unwrapped (their text is kept), attributes outside the allow-list are
//! dropped, and nothing executable can pass through: no script/style
//! bodies, no event-handler attributes, no `data-*`, no `javascript:` URLs.

const ALLOWED_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "br", "strong", "em", "u", "a", "ul", "ol", "li",
    "blockquote", "img", "div", "span",
];

const ALLOWED_ATTRS: &[&str] = &["href", "target", "rel", "src", "alt", "title", "class", "id"];

/// Tags whose inner content is dropped outright instead of unwrapped.
const DROP_CONTENT_TAGS: &[&str] = &["script", "style"];

/// Attributes whose values must not carry an executable scheme.
const URL_ATTRS: &[&str] = &["href", "src"];

struct Tag {
    closing: bool,
    name: String,
    attrs: Vec<(String, Option<String>)>,
    end: usize,
}

enum Markup {
    /// Comment, doctype, or processing instruction: skip to `end`.
    Skip { end: usize },
    Tag(Tag),
    /// A `<` that does not open markup.
    NotMarkup,
}

pub fn sanitize_html(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '<' {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        match parse_markup(&chars, i) {
            Markup::Skip { end } => i = end,
            Markup::NotMarkup => {
                out.push_str("&lt;");
                i += 1;
            }
            Markup::Tag(tag) => {
                let allowed = ALLOWED_TAGS.contains(&tag.name.as_str());
                if tag.closing {
                    if allowed {
                        out.push_str("</");
                        out.push_str(&tag.name);
                        out.push('>');
                    }
                    i = tag.end;
                } else if DROP_CONTENT_TAGS.contains(&tag.name.as_str()) {
                    i = skip_past_closing(&chars, tag.end, &tag.name);
                } else {
                    if allowed {
                        emit_tag(&mut out, &tag);
                    }
                    i = tag.end;
                }
            }
        }
    }

    out
}

fn parse_markup(chars: &[char], start: usize) -> Markup {
    let len = chars.len();
    let mut i = start + 1;
    if i >= len {
        return Markup::NotMarkup;
    }

    // Comments, doctypes, processing instructions
    if chars[i] == '!' || chars[i] == '?' {
        if starts_with(chars, i, "!--") {
            return Markup::Skip {
                end: find_seq(chars, i, "-->").unwrap_or(len),
            };
        }
        let end = chars[i..]
            .iter()
            .position(|&c| c == '>')
            .map(|p| i + p + 1)
            .unwrap_or(len);
        return Markup::Skip { end };
    }

    let closing = chars[i] == '/';
    if closing {
        i += 1;
    }

    if i >= len || !chars[i].is_ascii_alphabetic() {
        return Markup::NotMarkup;
    }

    let mut name = String::new();
    while i < len && chars[i].is_ascii_alphanumeric() {
        name.push(chars[i].to_ascii_lowercase());
        i += 1;
    }

    let mut attrs = Vec::new();
    loop {
        while i < len && (chars[i].is_whitespace() || chars[i] == '/') {
            i += 1;
        }
        if i >= len {
            return Markup::Tag(Tag {
                closing,
                name,
                attrs,
                end: len,
            });
        }
        if chars[i] == '>' {
            return Markup::Tag(Tag {
                closing,
                name,
                attrs,
                end: i + 1,
            });
        }

        let mut attr_name = String::new();
        while i < len && !chars[i].is_whitespace() && !matches!(chars[i], '=' | '>' | '/') {
            attr_name.push(chars[i].to_ascii_lowercase());
            i += 1;
        }
        if attr_name.is_empty() {
            i += 1;
            continue;
        }

        while i < len && chars[i].is_whitespace() {
            i += 1;
        }

        let mut attr_value = None;
        if i < len && chars[i] == '=' {
            i += 1;
            while i < len && chars[i].is_whitespace() {
                i += 1;
            }
            let mut value = String::new();
            if i < len && (chars[i] == '"' || chars[i] == '\'') {
                let quote = chars[i];
                i += 1;
                while i < len && chars[i] != quote {
                    value.push(chars[i]);
                    i += 1;
                }
                if i < len {
                    i += 1; // closing quote
                }
            } else {
                while i < len && !chars[i].is_whitespace() && chars[i] != '>' {
                    value.push(chars[i]);
                    i += 1;
                }
            }
            attr_value = Some(value);
        }

        attrs.push((attr_name, attr_value));
    }
}

fn emit_tag(out: &mut String, tag: &Tag) {
    out.push('<');
    out.push_str(&tag.name);

    for (name, value) in &tag.attrs {
        if !ALLOWED_ATTRS.contains(&name.as_str()) {
            continue;
        }
        // data-* never passes, independent of the allow-list
        if name.starts_with("data-") {
            continue;
        }
        if URL_ATTRS.contains(&name.as_str()) {
            if let Some(value) = value {
                if !safe_url(value) {
                    continue;
                }
            }
        }

        out.push(' ');
        out.push_str(name);
        if let Some(value) = value {
            out.push_str("=\"");
            out.push_str(&value.replace('"', "&quot;"));
            out.push('"');
        }
    }

    out.push('>');
}

/// URL attribute values may be relative or carry a benign scheme; anything
/// that parses to an executable scheme is dropped.
fn safe_url(value: &str) -> bool {
    match url::Url::parse(value.trim()) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https" | "mailto" | "ftp"),
        // Relative paths and fragments do not parse as absolute URLs
        Err(_) => true,
    }
}

/// Advance past the matching close tag, dropping everything in between.
fn skip_past_closing(chars: &[char], from: usize, name: &str) -> usize {
    let len = chars.len();
    let mut i = from;
    while i < len {
        if chars[i] == '<' && i + 1 < len && chars[i + 1] == '/' {
            let mut j = i + 2;
            let mut matched = true;
            for expected in name.chars() {
                if j < len && chars[j].to_ascii_lowercase() == expected {
                    j += 1;
                } else {
                    matched = false;
                    break;
                }
            }
            if matched {
                while j < len && chars[j] != '>' {
                    j += 1;
                }
                return if j < len { j + 1 } else { len };
            }
        }
        i += 1;
    }
    len
}

fn starts_with(chars: &[char], from: usize, pattern: &str) -> bool {
    let mut i = from;
    for expected in pattern.chars() {
        if i >= chars.len() || chars[i] != expected {
            return false;
        }
        i += 1;
    }
    true
}

fn find_seq(chars: &[char], from: usize, pattern: &str) -> Option<usize> {
    let pattern_len = pattern.chars().count();
    let mut i = from;
    while i + pattern_len <= chars.len() {
        if starts_with(chars, i, pattern) {
            return Some(i + pattern_len);
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_tag_and_body_removed_content_kept() {
        let out = sanitize_html("<script>alert(1)</script><p>hello</p>");
        assert_eq!(out, "<p>hello</p>");
        assert!(!out.contains("script"));
        assert!(!out.contains("alert"));
    }

    #[test]
    fn event_handler_attributes_stripped() {
        let out = sanitize_html(r#"<div onclick="steal()" class="box">hi</div>"#);
        assert_eq!(out, r#"<div class="box">hi</div>"#);
    }

    #[test]
    fn data_attributes_always_stripped() {
        let out = sanitize_html(r#"<p data-track="42" id="p1">x</p>"#);
        assert_eq!(out, r#"<p id="p1">x</p>"#);
    }

    #[test]
    fn disallowed_tags_unwrapped_text_kept() {
        let out = sanitize_html("<section><p>keep me</p></section>");
        assert_eq!(out, "<p>keep me</p>");

        let out = sanitize_html("<table><tr><td>cell</td></tr></table>");
        assert_eq!(out, "cell");
    }

    #[test]
    fn allowed_markup_passes_through() {
        let input = r#"<h2>Head</h2><p>Body with <strong>bold</strong>, <em>italics</em> and <u>underline</u>.</p><ul><li>one</li><li>two</li></ul><blockquote>quote</blockquote>"#;
        assert_eq!(sanitize_html(input), input);
    }

    #[test]
    fn allowed_link_attributes_preserved() {
        let input = r#"<a href="https://example.com/page" target="_blank" rel="noopener">link</a>"#;
        assert_eq!(sanitize_html(input), input);
    }

    #[test]
    fn javascript_urls_dropped() {
        let out = sanitize_html(r#"<a href="javascript:alert(1)">x</a>"#);
        assert_eq!(out, "<a>x</a>");

        let out = sanitize_html(r#"<img src="JavaScript:alert(1)" alt="pic">"#);
        assert_eq!(out, r#"<img alt="pic">"#);
    }

    #[test]
    fn relative_urls_kept() {
        let input = r#"<img src="/assets/chart.png" alt="chart">"#;
        assert_eq!(sanitize_html(input), input);
    }

    #[test]
    fn comments_and_doctypes_removed() {
        assert_eq!(sanitize_html("<!-- hidden -->text"), "text");
        assert_eq!(sanitize_html("<!DOCTYPE html><p>x</p>"), "<p>x</p>");
    }

    #[test]
    fn stray_angle_bracket_escaped() {
        assert_eq!(sanitize_html("1 < 2"), "1 &lt; 2");
    }

    #[test]
    fn tag_and_attribute_names_normalized_to_lowercase() {
        let out = sanitize_html(r#"<IMG SRC="x.png" ALT="pic">"#);
        assert_eq!(out, r#"<img src="x.png" alt="pic">"#);
    }

    #[test]
    fn style_body_dropped() {
        let out = sanitize_html("<style>p { display:none }</style><p>visible</p>");
        assert_eq!(out, "<p>visible</p>");
    }

    #[test]
    fn nested_quotes_in_values_escaped() {
        let out = sanitize_html(r#"<span title='say "hi"'>x</span>"#);
        assert_eq!(out, r#"<span title="say &quot;hi&quot;">x</span>"#);
    }
}
