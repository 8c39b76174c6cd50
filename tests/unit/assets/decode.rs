use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let prepared = decode_image(&png_bytes(1, 1, [100, 50, 200, 128])).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_garbage_fails() {
    assert!(decode_image(b"definitely not an image").is_err());
}

#[test]
fn svg_rasterizes_at_intrinsic_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="30" height="12">
        <rect width="30" height="12" fill="#ff0000"/></svg>"##;
    let img = rasterize_svg(svg).unwrap();
    assert_eq!((img.width, img.height), (30, 12));
    assert_eq!(&img.rgba8_premul[..4], &[255, 0, 0, 255]);

    assert!(rasterize_svg(b"<svg").is_err());
}

#[test]
fn load_image_file_dispatches_on_content() {
    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("logo.png");
    std::fs::write(&png, png_bytes(4, 2, [0, 0, 255, 255])).unwrap();
    assert_eq!(load_image_file(&png).unwrap().width, 4);

    let svg = dir.path().join("logo.bin");
    std::fs::write(
        &svg,
        br#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg" width="5" height="6"></svg>"#,
    )
    .unwrap();
    assert_eq!(load_image_file(&svg).unwrap().height, 6);

    assert!(load_image_file(&dir.path().join("absent.png")).is_err());
}

#[test]
fn unpremultiply_inverts_premultiply() {
    let mut px = vec![200, 100, 50, 128, 10, 20, 30, 255, 9, 9, 9, 0];
    let orig = px.clone();
    premultiply_rgba8_in_place(&mut px);
    unpremultiply_rgba8_in_place(&mut px);
    for (a, b) in px[..8].iter().zip(&orig[..8]) {
        assert!(a.abs_diff(*b) <= 1, "{px:?} vs {orig:?}");
    }
    assert_eq!(&px[8..], &[0, 0, 0, 0]);
}
