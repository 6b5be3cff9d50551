//! Minifying already-minified content changes nothing, and minifying keeps
//! what the content means.

use assetplate_minify::Minifier;
use proptest::prelude::*;

fn ident() -> impl Strategy<Value = String> {
    "[a-z][a-z-]{0,8}"
}

fn css_value() -> impl Strategy<Value = String> {
    prop_oneof![
        ident(),
        (1u32..500, prop_oneof![Just("px"), Just("em"), Just("%")])
            .prop_map(|(n, unit)| format!("{n}{unit}")),
        "#[0-9a-f]{6}",
    ]
}

fn css_rule() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(ident(), 1..3),
        prop::collection::vec((ident(), prop::collection::vec(css_value(), 1..4)), 1..5),
        "[ \n\t]{0,3}",
    )
        .prop_map(|(selectors, declarations, ws)| {
            let body: Vec<String> = declarations
                .into_iter()
                .map(|(prop, values)| format!("{ws}{prop} :{ws}{} ;", values.join("  ")))
                .collect();
            format!("{} {{{}{ws}}}\n", selectors.join(" ,\n"), body.join(""))
        })
}

fn json_value() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::from),
        any::<i32>().prop_map(serde_json::Value::from),
        "[a-z <>&]{0,12}".prop_map(serde_json::Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::from),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..4).prop_map(|pairs| {
                serde_json::Value::Object(pairs.into_iter().collect())
            }),
        ]
    })
}

proptest! {
    #[test]
    fn css_minify_is_idempotent(rules in prop::collection::vec(css_rule(), 1..4)) {
        let minifier = Minifier::standard();
        let source = rules.concat();
        let once = minifier.minify("text/css", source.as_bytes()).unwrap().into_owned();
        let twice = minifier.minify("text/css", &once).unwrap().into_owned();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn css_minify_never_grows(rules in prop::collection::vec(css_rule(), 1..4)) {
        let minifier = Minifier::standard();
        let source = rules.concat();
        let once = minifier.minify("text/css", source.as_bytes()).unwrap();
        prop_assert!(once.len() <= source.len());
    }

    #[test]
    fn json_minify_is_idempotent(value in json_value()) {
        let minifier = Minifier::standard();
        let pretty = serde_json::to_vec_pretty(&value).unwrap();
        let once = minifier.minify("application/json", &pretty).unwrap().into_owned();
        let twice = minifier.minify("application/json", &once).unwrap().into_owned();
        prop_assert_eq!(&once, &twice);
        let parsed: serde_json::Value = serde_json::from_slice(&once).unwrap();
        prop_assert_eq!(parsed, value);
    }

    #[test]
    fn unmatched_types_pass_through(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let minifier = Minifier::standard();
        let out = minifier.minify("application/octet-stream", &bytes).unwrap();
        prop_assert_eq!(&*out, bytes.as_slice());
    }
}

#[test]
fn xml_minify_is_idempotent() {
    let minifier = Minifier::standard();
    let source = b"<?xml version=\"1.0\"?>\n<rss version=\"2.0\">\n  <channel>\n    <title>{{ title }}</title>\n  </channel>\n</rss>\n";
    let once = minifier.minify("application/rss+xml", source).unwrap().into_owned();
    let twice = minifier.minify("application/rss+xml", &once).unwrap().into_owned();
    assert_eq!(once, twice);
}

#[test]
fn html_minify_is_idempotent() {
    let minifier = Minifier::standard();
    let source = b"<!doctype html>\n<html lang=\"en\">\n  <p class=\"lead\">  {{ body }}  </p>\n</html>\n";
    let once = minifier.minify("text/html", source).unwrap().into_owned();
    let twice = minifier.minify("text/html", &once).unwrap().into_owned();
    assert_eq!(once, twice);
}

#[test]
fn xml_mixed_content_is_idempotent_and_keeps_words_apart() {
    let minifier = Minifier::standard();
    let source = b"<svg>\n  <text>Total: <tspan>{{ count }}</tspan> items</text>\n</svg>\n";
    let once = minifier.minify("image/svg+xml", source).unwrap().into_owned();
    assert_eq!(
        once,
        b"<svg><text>Total: <tspan>{{ count }}</tspan> items</text></svg>"
    );
    let twice = minifier.minify("image/svg+xml", &once).unwrap().into_owned();
    assert_eq!(once, twice);
}

#[test]
fn xhtml_keeps_inline_spacing() {
    let minifier = Minifier::standard();
    let source = b"<html>\n  <p>Hello <b>big</b> world</p>\n</html>";
    let once = minifier.minify("application/xhtml+xml", source).unwrap();
    assert_eq!(&*once, b"<html><p>Hello <b>big</b> world</p></html>");
}

#[test]
fn js_minify_is_idempotent() {
    let minifier = Minifier::standard();
    let source = b"// point helpers\nfunction Point(x, y) {\n  this.x = x;\n  this.y = y;\n}\n\nPoint.prototype.len = function () {\n  return Math.sqrt(this.x * this.x + this.y * this.y);\n};\n\nvar label = \"</script>\";\n";
    let once = minifier.minify("text/javascript", source).unwrap().into_owned();
    assert!(once.len() < source.len());
    let twice = minifier.minify("text/javascript", &once).unwrap().into_owned();
    assert_eq!(once, twice);
}

#[test]
fn html_with_templated_attributes_is_idempotent() {
    let minifier = Minifier::standard();
    let source = b"<ul>\n  {% for item in items %}\n  <li class=\"{{item.kind}}\" data-id=\"{{ item.id }}\">{{ item.name }}</li>\n  {% endfor %}\n</ul>\n";
    let once = minifier.minify("text/html", source).unwrap().into_owned();
    let text = String::from_utf8(once.clone()).unwrap();
    assert!(text.contains("class=\"{{item.kind}}\""), "got {text}");
    let twice = minifier.minify("text/html", &once).unwrap().into_owned();
    assert_eq!(once, twice);
}
