use super::*;
use serde_json::json;

#[test]
fn parses_hex_forms() {
    assert_eq!(Paint::parse("#555"), Ok(Paint::Color(Rgba8::rgb(0x55, 0x55, 0x55))));
    assert_eq!(Paint::parse("#d92"), Ok(Paint::Color(Rgba8::rgb(0xdd, 0x99, 0x22))));
    assert_eq!(Paint::parse("#F4F3DE"), Ok(Paint::Color(Rgba8::rgb(0xf4, 0xf3, 0xde))));
    assert_eq!(Paint::parse("b24b13"), Ok(Paint::Color(Rgba8::rgb(0xb2, 0x4b, 0x13))));
    assert_eq!(
        Paint::parse("#0000ff80"),
        Ok(Paint::Color(Rgba8::rgba(0, 0, 255, 128)))
    );
}

#[test]
fn parses_rgba_functions_and_names() {
    assert_eq!(
        Paint::parse("rgba(148, 37, 188, 0.3)"),
        Ok(Paint::Color(Rgba8::rgba(148, 37, 188, 77)))
    );
    assert_eq!(Paint::parse("rgb(1, 2, 3)"), Ok(Paint::Color(Rgba8::rgb(1, 2, 3))));
    assert_eq!(Paint::parse("powderblue"), Ok(Paint::Color(Rgba8::rgb(176, 224, 230))));
    assert_eq!(Paint::parse("none"), Ok(Paint::None));
}

#[test]
fn rejects_garbage() {
    assert!(Paint::parse("#12").is_err());
    assert!(Paint::parse("rgba(1, 2)").is_err());
    assert!(Paint::parse("chartreuse-ish").is_err());
}

#[test]
fn serde_uses_css_strings() {
    let p: Paint = serde_json::from_value(json!("rgba(224, 93, 22, 0.3)")).unwrap();
    let css = serde_json::to_value(p).unwrap();
    assert_eq!(css, json!("#e05d164d"));
    let back: Paint = serde_json::from_value(css).unwrap();
    assert_eq!(back, p);
    assert_eq!(serde_json::to_value(Paint::None).unwrap(), json!("none"));
}
