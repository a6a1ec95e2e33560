// ABOUTME: Output format converters for extracted HTML fragments such as post bodies.
// ABOUTME: Handles sanitizing HTML and converting it to Markdown or plain text.

//! Output format conversion.
//!
//! Post bodies come out of the engine as raw inner HTML. These helpers turn
//! that into something safe to store or print.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?\s*>").unwrap());
static BLANK_LINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static HSPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S\n]+").unwrap());

/// Sanitize a post body with an ammonia policy suited to forum content.
///
/// Keeps basic formatting, quotes, code, lists, links and images. Drops
/// scripts, styles, event handlers and every attribute not listed here.
pub fn sanitize_html(html: &str) -> String {
    let allowed_tags = [
        "p", "br", "strong", "b", "em", "i", "u", "s", "h1", "h2", "h3", "h4", "h5", "h6", "ul",
        "ol", "li", "blockquote", "pre", "code", "img", "a", "span", "div", "table", "thead",
        "tbody", "tr", "th", "td",
    ];

    let mut builder = ammonia::Builder::new();
    builder.tags(allowed_tags.iter().copied().collect());

    builder.add_tag_attributes("a", &["href"]);
    builder.add_tag_attributes("img", &["src", "alt", "width", "height"]);
    builder.add_tag_attributes("blockquote", &["data-ipsquote-username"]);

    builder
        .url_schemes(["http", "https", "mailto"].iter().copied().collect())
        .clean(html)
        .to_string()
}

fn preprocess_br_tags(html: &str) -> String {
    BR_RE.replace_all(html, "\n").to_string()
}

/// Convert HTML to Markdown using htmd.
///
/// On conversion error, returns the input with `<br>` tags turned into
/// newlines.
pub fn html_to_markdown(html: &str) -> String {
    let preprocessed = preprocess_br_tags(html);

    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style", "noscript"])
        .build();

    let md = converter
        .convert(&preprocessed)
        .unwrap_or_else(|_| preprocessed.clone());

    BLANK_LINES_RE.replace_all(&md, "\n\n").trim().to_string()
}

/// Convert HTML to plain text.
///
/// Treats `<br>` as a newline, collapses horizontal whitespace, trims every
/// line and drops blank ones.
pub fn html_to_text(html: &str) -> String {
    let preprocessed = preprocess_br_tags(html);

    let fragment = Html::parse_fragment(&preprocessed);
    let raw_text: String = fragment.root_element().text().collect::<Vec<_>>().join(" ");

    let normalized = HSPACE_RE.replace_all(&raw_text, " ");

    normalized
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
