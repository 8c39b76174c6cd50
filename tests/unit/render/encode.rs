use super::*;

fn frame(w: u32, h: u32, px: [u8; 4], premultiplied: bool) -> FrameRgba {
    FrameRgba {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
        premultiplied,
    }
}

#[test]
fn png_roundtrip_unpremultiplies() {
    let f = frame(3, 2, [64, 32, 0, 128], true);
    let bytes = encode_frame(&f, OutputFormat::Png, DEFAULT_JPEG_QUALITY).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (3, 2));
    let p = decoded.get_pixel(1, 1).0;
    assert_eq!(p[3], 128);
    assert!(p[0].abs_diff(128) <= 1);
    assert!(p[1].abs_diff(64) <= 1);
}

#[test]
fn jpeg_is_decodable_and_opaque() {
    let f = frame(16, 8, [200, 40, 40, 255], true);
    let bytes = encode_frame(&f, OutputFormat::Jpeg, 95).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (16, 8));
    let p = decoded.to_rgba8().get_pixel(4, 4).0;
    assert_eq!(p[3], 255);
    assert!(p[0].abs_diff(200) <= 8);
}

#[test]
fn size_mismatch_is_encode_error() {
    let mut f = frame(2, 2, [0, 0, 0, 255], false);
    f.data.pop();
    let err = encode_frame(&f, OutputFormat::Png, 95).unwrap_err();
    assert!(matches!(err, LaurelError::EncodeWrite(_)));
}

#[test]
fn write_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let f = frame(1, 1, [0, 0, 0, 255], false);
    let err = write_frame(
        &f,
        &dir.path().join("nope").join("a.jpg"),
        OutputFormat::Jpeg,
        95,
    )
    .unwrap_err();
    assert!(matches!(err, LaurelError::EncodeWrite(_)));

    let ok = dir.path().join("a.png");
    write_frame(&f, &ok, OutputFormat::Png, 95).unwrap();
    assert!(ok.is_file());
}

#[test]
fn format_extension_and_serde() {
    assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
    assert_eq!(OutputFormat::Png.extension(), "png");
    assert_eq!(serde_json::to_string(&OutputFormat::Png).unwrap(), "\"png\"");
    assert_eq!(OutputFormat::default(), OutputFormat::Jpeg);
}
