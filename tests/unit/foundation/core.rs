use super::*;

#[test]
fn canvas_rejects_zero_and_oversized() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 70_000).is_err());
    let c = Canvas::new(1000, 800).unwrap();
    assert_eq!(c.rgba_len(), 1000 * 800 * 4);
}

#[test]
fn rgb_hex_parse_and_format() {
    let c = Rgb8::parse_hex("#08306b").unwrap();
    assert_eq!(c, Rgb8::new(0x08, 0x30, 0x6b));
    assert_eq!(c.to_hex(), "#08306b");
    assert_eq!(Rgb8::parse_hex("ffffff").unwrap(), Rgb8::new(255, 255, 255));
    assert!(Rgb8::parse_hex("#fff").is_err());
    assert!(Rgb8::parse_hex("#gg0000").is_err());
}

#[test]
fn rgb_deserializes_from_hex_array_and_object() {
    let a: Rgb8 = serde_json::from_str("\"#0000ff\"").unwrap();
    let b: Rgb8 = serde_json::from_str("[0, 0, 255]").unwrap();
    let c: Rgb8 = serde_json::from_str(r#"{"r":0,"g":0,"b":255}"#).unwrap();
    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[test]
fn premul_opaque_is_identity_and_transparent_is_zero() {
    let p = Rgba8Premul::from_straight_rgba(10, 20, 30, 255);
    assert_eq!(p.to_array(), [10, 20, 30, 255]);
    let z = Rgba8Premul::from_straight_rgba(10, 20, 30, 0);
    assert_eq!(z.to_array(), [0, 0, 0, 0]);
}
