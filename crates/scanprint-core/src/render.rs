//! # Label Rendering
//!
//! Turns a scanned payload into the document handed to the printer service:
//! a minimal HTML page whose only content is the payload as a heading.
//!
//! The payload is untrusted input from a camera, so it is always escaped.
//! Multi-line payloads (vCard, Wi-Fi QR) keep their lines via `<br>`.

/// Renders the printable label for `payload`.
///
/// ## Example
/// ```rust
/// use scanprint_core::render::render_label;
///
/// let html = render_label("A1B2C3");
/// assert!(html.contains("<h1>A1B2C3</h1>"));
/// ```
pub fn render_label(payload: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n<body>\n<h1>{}</h1>\n</body>\n</html>\n",
        heading_text(payload)
    )
}

/// Escapes `payload` and turns each line break (`\n`, `\r\n` or `\r`)
/// into `<br>`.
fn heading_text(payload: &str) -> String {
    escape_html(payload)
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_holds_payload_heading() {
        let html = render_label("A1B2C3");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>A1B2C3</h1>"));
        assert_eq!(html.matches("<h1>").count(), 1);
    }

    #[test]
    fn test_payload_cannot_inject_markup() {
        let html = render_label("<script>alert('x')</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("<h1>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;</h1>"));
    }

    #[test]
    fn test_line_breaks_become_br() {
        let html = render_label("BEGIN:VCARD\r\nFN:Ada\nEND:VCARD");
        assert!(html.contains("<h1>BEGIN:VCARD<br>FN:Ada<br>END:VCARD</h1>"));

        let html = render_label("a\rb");
        assert!(html.contains("<h1>a<br>b</h1>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a&b"), "a&amp;b");
        assert_eq!(escape_html("\"q\""), "&quot;q&quot;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
