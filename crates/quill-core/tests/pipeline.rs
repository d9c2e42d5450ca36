//! End-to-end tests: source text or JSON in, markup and CSS out.

use rhizome_quill_core::{RegistryError, Site, VarStore, to_markup, to_style};
use rhizome_quill_ir::{Node, read, read_document};

const PAGE: &str = r#"
; landing page
'(html
   (head (title "Quill"))
   (body
     (header (@ class "hero" id "top")
       (h1 ($ title))
       (img (@ src "logo.png" alt "logo")))
     (if user
       (p "Hi " ($ user.name) "!")
       (a (@ href "/login") "Sign in"))
     (ul (for post in posts
           (li (a (@ href ($ post.url)) ($ post.title)))))
     (footer ($raw footer) ($ "<c> 2024"))))
"#;

const STYLES: &str = r#"
'(("body" ("margin" "0") ("font-family" "var(font)"))
  (".hero" ("background" "var(primary)") ("padding" "--gap"))
  ("@media" "(max-width: 600px)"
    (".hero" ("padding" "0")))
  ("@keyframes" "fade"
    ("from" ("opacity" "0"))
    ("to" ("opacity" "1"))))
"#;

#[test]
fn test_page_from_source() {
    let page = read_document(PAGE).unwrap();
    assert_eq!(
        to_markup(&page).unwrap(),
        concat!(
            "<html><head><title>Quill</title></head><body>",
            "<header class=\"hero\" id=\"top\"><h1><%= title %></h1>",
            "<img src=\"logo.png\" alt=\"logo\" /></header>",
            "<% if (user) { %><p>Hi <%= user.name %>!</p>",
            "<% } else { %><a href=\"/login\">Sign in</a><% } %>",
            "<ul><% for (const post of posts) { %>",
            "<li><a href=\"<%= post.url %>\"><%= post.title %></a></li><% } %></ul>",
            "<footer><%- footer %>&lt;c&gt; 2024</footer>",
            "</body></html>",
        )
    );
}

#[test]
fn test_styles_from_source() {
    let vars: VarStore = [
        ("font", "sans-serif"),
        ("primary", "#667eea"),
        ("gap", "16px"),
    ]
    .into_iter()
    .collect();
    let rules = read_document(STYLES).unwrap();
    assert_eq!(
        to_style(&rules, Some(&vars)).unwrap(),
        concat!(
            "body {\n  margin: 0;\n  font-family: sans-serif;\n}\n",
            ".hero {\n  background: #667eea;\n  padding: 16px;\n}\n",
            "@media (max-width: 600px) {\n  .hero {\n    padding: 0;\n  }\n}\n",
            "@keyframes fade {\n  from {\n    opacity: 0;\n  }\n  to {\n    opacity: 1;\n  }\n}\n",
        )
    );
}

#[test]
fn test_json_and_source_agree() {
    let json = serde_json::json!([
        "div",
        ["@", "class", "card"],
        ["$", {"symbol": "item.name"}],
        ["$raw", {"symbol": "item.body"}]
    ]);
    let from_json: Node = serde_json::from_value(json).unwrap();
    let from_source =
        read(r#"("div" ("@" "class" "card") ("$" item.name) ("$raw" item.body))"#).unwrap();

    let expected = "<div class=\"card\"><%= item.name %><%- item.body %></div>";
    assert_eq!(to_markup(&from_json).unwrap(), expected);
    assert_eq!(to_markup(&from_source).unwrap(), expected);
}

#[test]
fn test_dotted_source_matches_list_source() {
    let dotted = read("(p . (\"a\" . (\"b\" . ())))").unwrap();
    let plain = read("(p \"a\" \"b\")").unwrap();
    assert_eq!(to_markup(&dotted).unwrap(), to_markup(&plain).unwrap());
    assert_eq!(to_markup(&dotted).unwrap(), "<p>ab</p>");
}

#[test]
fn test_site_round() {
    let mut site = Site::new();
    site.define_var(&Node::string("primary"), &Node::string("#667eea"))
        .unwrap();
    site.define_var(&Node::string("gap"), &Node::number(8))
        .unwrap();

    site.register_template(&Node::string("index"), &read_document(PAGE).unwrap())
        .unwrap();
    site.register_style(
        &Node::string("hero"),
        &read("((\".hero\" (\"color\" \"var(primary)\") (\"margin\" \"var(gap)px\")))").unwrap(),
    )
    .unwrap();

    assert!(site.template("index").unwrap().starts_with("<html><head>"));
    assert_eq!(
        site.style("hero").unwrap(),
        ".hero {\n  color: #667eea;\n  margin: 8px;\n}\n"
    );
    assert!(matches!(
        site.template("hero"),
        Err(RegistryError::NotFound { .. })
    ));
}
