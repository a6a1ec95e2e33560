// ABOUTME: Decodes saved page bytes into a string before parsing.
// ABOUTME: Uses an explicit charset, then a <meta> declaration, then chardetng detection.

use once_cell::sync::Lazy;
use regex::bytes::Regex;

static META_CHARSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([a-zA-Z0-9_\-:.]+)"#)
        .expect("valid meta charset regex")
});

/// Only the head of a document is searched for a charset declaration.
const META_SCAN_LIMIT: usize = 4096;

/// Decode page bytes to a String.
///
/// `charset` is typically the charset parameter of a Content-Type header the
/// caller saved alongside the page.
pub fn decode_document(body: &[u8], charset: Option<&str>) -> String {
    if let Some(label) = charset {
        if let Some(encoding) = encoding_rs::Encoding::for_label(label.trim().as_bytes()) {
            let (decoded, _, _) = encoding.decode(body);
            return decoded.into_owned();
        }
    }

    if let Some(label) = sniff_meta_charset(body) {
        if let Some(encoding) = encoding_rs::Encoding::for_label(label.as_bytes()) {
            let (decoded, _, _) = encoding.decode(body);
            return decoded.into_owned();
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Pulls the charset label out of a Content-Type value such as
/// `text/html; Charset="Windows-1252"`, lowercased.
///
/// Only parameters after the media type count, so a bare label like
/// `utf-8` yields `None` and callers can use it as is.
pub fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches(|c| c == '"' || c == '\'').to_ascii_lowercase())
        .filter(|label| !label.is_empty())
}

fn sniff_meta_charset(body: &[u8]) -> Option<String> {
    let head = &body[..body.len().min(META_SCAN_LIMIT)];
    let caps = META_CHARSET_RE.captures(head)?;
    let label = caps.get(1)?;
    Some(String::from_utf8_lossy(label.as_bytes()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_charset_wins() {
        // "café" in ISO-8859-1
        let body = b"<p>caf\xe9</p>";
        assert_eq!(decode_document(body, Some("iso-8859-1")), "<p>café</p>");
    }

    #[test]
    fn meta_charset_is_honoured() {
        let body = b"<html><head><meta charset=\"windows-1252\"></head><body>\x93quoted\x94</body></html>";
        let decoded = decode_document(body, None);
        assert!(decoded.contains("\u{201C}quoted\u{201D}"));
    }

    #[test]
    fn utf8_is_detected_without_hints() {
        let body = "<p>naïve résumé</p>".as_bytes();
        assert_eq!(decode_document(body, None), "<p>naïve résumé</p>");
    }

    #[test]
    fn unknown_label_falls_through() {
        let body = "<p>plain</p>".as_bytes();
        assert_eq!(decode_document(body, Some("no-such-charset")), "<p>plain</p>");
    }

    #[test]
    fn extract_charset_from_content_type() {
        assert_eq!(
            extract_charset("text/html; charset=\"UTF-8\""),
            Some("utf-8".to_string())
        );
        assert_eq!(extract_charset("text/html"), None);
        assert_eq!(
            extract_charset("text/html;format=flowed; Charset = 'Windows-1252'"),
            Some("windows-1252".to_string())
        );
        assert_eq!(extract_charset("windows-1252"), None);
        assert_eq!(extract_charset("text/html; charset="), None);
    }
}
