use std::io::Cursor;

use super::*;

fn png_1x1(rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(1, 1, rgba.to_vec()).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let bmp = decode_image(&png_1x1([100, 50, 200, 128])).unwrap();
    assert_eq!((bmp.width, bmp.height), (1, 1));
    assert_eq!(
        bmp.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn transparent_pixels_zero_their_color() {
    let bmp = decode_image(&png_1x1([255, 255, 255, 0])).unwrap();
    assert_eq!(bmp.rgba8_premul.as_slice(), &[0, 0, 0, 0]);
}

#[test]
fn garbage_is_an_error() {
    assert!(decode_image(b"definitely not an image").is_err());
    assert!(decode_avatar(b"definitely not an image", 64).is_err());
}

#[test]
fn svg_sniffing() {
    assert!(looks_like_svg(b"<svg xmlns='http://www.w3.org/2000/svg'/>"));
    assert!(looks_like_svg(b"\xEF\xBB\xBF  \n<?xml version=\"1.0\"?><svg/>"));
    assert!(!looks_like_svg(b"<?xml version=\"1.0\"?><html/>"));
    assert!(!looks_like_svg(&png_1x1([0, 0, 0, 255])));
}

#[test]
fn svg_rasterizes_to_cover_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
        <rect width="20" height="10" fill="#ff0000"/></svg>"##;
    let bmp = decode_avatar(svg, 64).unwrap();
    assert_eq!((bmp.width, bmp.height), (128, 64));
    assert_eq!(bmp.rgba8_premul.len(), 128 * 64 * 4);
    // Centre pixel is opaque red.
    let i = (32 * 128 + 64) * 4;
    assert_eq!(&bmp.rgba8_premul[i..i + 4], &[255, 0, 0, 255]);
}

#[test]
fn malformed_svg_is_an_error() {
    assert!(parse_svg(b"<svg").is_err());
    assert!(decode_avatar(b"<svg", 64).is_err());
}
