// ABOUTME: Integration tests for the decode-then-extract pipeline of the view engine.
// ABOUTME: Covers non-UTF-8 documents, nested views inside groups and schema files loaded from JSON.

use ipsforum_view::{decode_document, Engine, Field, Group, Page, View};
use pretty_assertions::assert_eq;

#[test]
fn latin1_document_extracts_decoded_text() {
    let mut body = b"<html><head><meta charset=\"iso-8859-1\"></head><body>".to_vec();
    body.extend_from_slice(b"<ul><li class=\"row\"><a href=\"/x\">Caf\xe9 cr\xe8me</a></li></ul>");
    body.extend_from_slice(b"</body></html>");

    let html = decode_document(&body, None);
    let page = Page::new("Rows").with("rows", Group::of_field(Field::css("li.row > a")));
    let values = Engine::default().extract_html(&html, &page).unwrap();

    let rows = values.get("rows").unwrap().as_group();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].as_field().unwrap().text, "Café crème");
}

#[test]
fn nested_views_inside_group_entries_stay_scoped() {
    let html = r#"
        <div class="post"><div class="meta"><span class="who">alice</span></div></div>
        <div class="post"><div class="other"><span class="who">stray</span></div></div>
    "#;
    let post = View::css(".post").with("meta", View::css(".meta").with("who", Field::css(".who")));
    let page = Page::new("Posts").with("posts", Group::of_view(post));

    let values = Engine::default().extract_html(html, &page).unwrap();
    let posts = values.get("posts").unwrap().as_group();
    assert_eq!(posts.len(), 2);

    let first_meta = posts[0].as_view().unwrap()["meta"].as_view().unwrap();
    assert_eq!(first_meta["who"].as_field().unwrap().text, "alice");
    // the second post has no .meta, so its view is absent and .who is never looked up
    assert!(posts[1].as_view().unwrap()["meta"].is_absent());
}

#[test]
fn schema_loaded_from_json_behaves_like_built_one() {
    let json = r#"{
        "name": "Links",
        "children": {
            "links": {
                "kind": "group",
                "template": { "kind": "field", "locator": { "by": "css", "expr": "a:not([rel])" } }
            },
            "home": { "kind": "field", "locator": { "by": "id", "expr": "home" }, "optional": true }
        }
    }"#;
    let loaded: Page = serde_json::from_str(json).unwrap();
    let built = Page::new("Links")
        .with("links", Group::of_field(Field::css("a:not([rel])")))
        .with("home", Field::id("home").optional());
    assert_eq!(loaded, built);

    let html = r#"<a href="/a">A</a><a rel="nofollow" href="/b">B</a><a id="home" href="/">Home</a>"#;
    let values = Engine::default().extract_html(html, &loaded).unwrap();
    assert_eq!(values.get("links").unwrap().as_group().len(), 2);
    assert_eq!(values.get("home").unwrap().as_field().unwrap().text, "Home");
}
