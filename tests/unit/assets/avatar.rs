use std::io::Cursor;

use super::*;

fn png(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn config(default_source: Option<&str>) -> OgConfig {
    let mut cfg = OgConfig::default();
    cfg.avatar.default_source = default_source.map(str::to_string);
    cfg
}

const SVG_ICON: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='4' height='4'%3E%3Crect width='4' height='4' fill='%23fff'/%3E%3C/svg%3E";

#[test]
fn raster_px_rounds_diameter_up() {
    assert_eq!(AvatarResolver::new(&config(None), 255.2).raster_px(), 256);
    assert_eq!(AvatarResolver::new(&config(None), 0.0).raster_px(), 1);
}

#[test]
fn inline_bitmap_resolves() {
    let r = AvatarResolver::new(&config(None), 256.0);
    let img = r.resolve(Some(&AvatarSource::Bytes(png(3, 2))));
    let AvatarImage::Bitmap(bmp) = img else {
        panic!("expected bitmap");
    };
    assert_eq!((bmp.width, bmp.height), (3, 2));
}

#[test]
fn broken_source_becomes_placeholder() {
    let r = AvatarResolver::new(&config(Some(SVG_ICON)), 256.0);
    let img = r.resolve(Some(&AvatarSource::Bytes(b"not an image".to_vec())));
    assert_eq!(img, AvatarImage::Placeholder(r.placeholder()));
}

#[test]
fn absent_source_uses_default_icon() {
    let r = AvatarResolver::new(&config(Some(SVG_ICON)), 16.0);
    let AvatarImage::Bitmap(bmp) = r.resolve(None) else {
        panic!("expected default icon bitmap");
    };
    assert_eq!((bmp.width, bmp.height), (16, 16));
}

#[test]
fn absent_source_with_broken_default_is_placeholder() {
    let r = AvatarResolver::new(&config(Some("no/such/default.svg")), 256.0);
    assert!(r.resolve(None).is_placeholder());

    let r = AvatarResolver::new(&config(None), 256.0);
    assert!(r.resolve(None).is_placeholder());
}

#[test]
fn placeholder_uses_theme_colors() {
    let cfg = config(None);
    let p = AvatarResolver::new(&cfg, 256.0).placeholder();
    assert_eq!(p.fill, cfg.theme.avatar_fill);
    assert_eq!(p.glyph, Rgba8::WHITE.with_alpha(204));
}
