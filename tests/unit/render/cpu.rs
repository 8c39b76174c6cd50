use super::*;

fn px(frame: &FrameRgba, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

#[test]
fn surface_matches_background_size_and_pixels() {
    let backend = CpuBackend::new(FontBook::default());
    let bg = RasterImage::solid(20, 10, Rgba8::rgb(0, 0, 255)).unwrap();
    let surface = backend.create_surface(&bg).unwrap();

    let frame = surface.finish().unwrap();
    assert_eq!((frame.width, frame.height), (20, 10));
    assert!(frame.premultiplied);
    assert_eq!(px(&frame, 0, 0), [0, 0, 255, 255]);
    assert_eq!(px(&frame, 19, 9), [0, 0, 255, 255]);
}

#[test]
fn draw_image_scales_into_destination() {
    let backend = CpuBackend::new(FontBook::default());
    let bg = RasterImage::solid(20, 10, Rgba8::WHITE).unwrap();
    let logo = RasterImage::solid(40, 40, Rgba8::rgb(255, 0, 0)).unwrap();

    let mut surface = backend.create_surface(&bg).unwrap();
    surface
        .draw_image(&logo, Rect::new(2.0, 2.0, 6.0, 6.0))
        .unwrap();
    let frame = surface.finish().unwrap();

    assert_eq!(px(&frame, 3, 3), [255, 0, 0, 255]);
    assert_eq!(px(&frame, 5, 5), [255, 0, 0, 255]);
    assert_eq!(px(&frame, 10, 5), [255, 255, 255, 255]);
    assert_eq!(px(&frame, 0, 0), [255, 255, 255, 255]);
}

#[test]
fn empty_destination_is_a_no_op() {
    let backend = CpuBackend::new(FontBook::default());
    let bg = RasterImage::solid(4, 4, Rgba8::WHITE).unwrap();
    let logo = RasterImage::solid(2, 2, Rgba8::BLACK).unwrap();
    let mut surface = backend.create_surface(&bg).unwrap();
    surface
        .draw_image(&logo, Rect::new(1.0, 1.0, 1.0, 3.0))
        .unwrap();
    assert_eq!(px(&surface.finish().unwrap(), 1, 1), [255, 255, 255, 255]);
}

#[test]
fn text_requires_registered_font() {
    let backend = CpuBackend::new(FontBook::default());
    assert!(backend.font_families().is_empty());
    let bg = RasterImage::solid(4, 4, Rgba8::WHITE).unwrap();
    let mut surface = backend.create_surface(&bg).unwrap();

    assert!(surface.measure_text("x").is_err());
    let font = ResolvedFont {
        family: Arc::from("Nope"),
        size_px: 12.0,
    };
    assert!(surface.set_font(&font).is_err());
    let bad_size = ResolvedFont {
        family: Arc::from("Nope"),
        size_px: 0.0,
    };
    assert!(surface.set_font(&bad_size).is_err());
}

#[test]
fn gradient_rows_interpolate_top_to_bottom() {
    let fill = Fill::VerticalGradient {
        top: Rgba8::BLACK,
        bottom: Rgba8::WHITE,
        y0: 40.0,
        y1: 42.0,
    };
    let img = gradient_paint(&fill, 40.0, 3).unwrap();
    let vello_cpu::ImageSource::Pixmap(pixmap) = &img.image else {
        panic!("expected pixmap source");
    };
    assert_eq!((pixmap.width(), pixmap.height()), (1, 3));
    let data = pixmap.data_as_u8_slice();
    assert_eq!(&data[0..4], &[0, 0, 0, 255]);
    assert_eq!(&data[4..8], &[128, 128, 128, 255]);
    assert_eq!(&data[8..12], &[255, 255, 255, 255]);
}

#[test]
fn pixmap_rejects_bad_sizes() {
    assert!(pixmap_from_premul_bytes(&[0; 8], 1, 1).is_err());
    assert!(pixmap_from_premul_bytes(&[], 0, 0).is_err());
    assert!(to_u16(70_000, "w").is_err());
    assert_eq!(to_u16(1080, "w").unwrap(), 1080);
}
