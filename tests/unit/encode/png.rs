use super::*;

fn surface(w: u32, h: u32, px: [u8; 4]) -> RasterSurface {
    RasterSurface {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
    }
}

#[test]
fn png_signature_and_dimensions() {
    let bytes = encode_png(&surface(7, 3, [10, 20, 30, 255])).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (7, 3));
    assert_eq!(decoded.get_pixel(6, 2).0, [10, 20, 30, 255]);
}

#[test]
fn translucent_pixels_are_unpremultiplied() {
    // Premultiplied white at alpha 204.
    let bytes = encode_png(&surface(2, 2, [204, 204, 204, 204])).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 204]);
}

#[test]
fn mismatched_buffer_is_a_render_error() {
    let bad = RasterSurface {
        width: 4,
        height: 4,
        data: vec![0; 10],
    };
    let err = encode_png(&bad).unwrap_err();
    assert!(matches!(err, TracecardError::Render(_)));
}

#[test]
fn extension_is_png() {
    assert_eq!(ARTIFACT_EXTENSION, "png");
}
