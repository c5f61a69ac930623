use std::sync::Arc;

use kurbo::Shape;

use super::*;
use crate::{
    assets::avatar::Placeholder,
    layout::engine::compute_layout,
    request::ImageRequest,
    text::measure::DeterministicMeasurer,
};

fn layout_for(req: &ImageRequest) -> OgLayout {
    let mut m = DeterministicMeasurer::default();
    compute_layout(req, Canvas::OG_DEFAULT, &mut m)
}

fn placeholder() -> AvatarImage {
    let theme = Theme::default();
    AvatarImage::Placeholder(Placeholder {
        fill: theme.avatar_fill,
        glyph: theme.placeholder_glyph,
    })
}

#[test]
fn paint_order_is_fixed() {
    let theme = Theme::default();
    let plan = build_draw_plan(&layout_for(&ImageRequest::default()), &placeholder(), &theme);

    assert!(matches!(plan.ops[0], DrawOp::LinearGradient { .. }));
    assert!(matches!(plan.ops[1], DrawOp::FillCircle { .. }));
    assert!(matches!(plan.ops[2], DrawOp::FillPath { .. }));
    let texts: Vec<_> = plan.text_runs().map(|(t, f)| (t.to_string(), f.weight)).collect();
    assert_eq!(
        texts,
        vec![
            ("Title".to_string(), 700),
            ("Description".to_string(), 300),
            ("yehezgun.com".to_string(), 700),
            ("Twitter: @yehezgun".to_string(), 500),
        ]
    );
    assert_eq!(plan.ops.len(), 7);
}

#[test]
fn gradient_spans_the_diagonal() {
    let theme = Theme::default();
    let plan = build_draw_plan(&layout_for(&ImageRequest::default()), &placeholder(), &theme);
    let DrawOp::LinearGradient {
        rect,
        start,
        end,
        from,
        to,
    } = &plan.ops[0]
    else {
        panic!("first op must be the background");
    };
    assert_eq!(*rect, Rect::new(0.0, 0.0, 1200.0, 600.0));
    assert_eq!((*start, *end), (Point::ORIGIN, Point::new(1200.0, 600.0)));
    assert_eq!(from.to_hex(), "#1e293b");
    assert_eq!(to.to_hex(), "#475569");
}

#[test]
fn bitmap_avatar_is_clipped_image() {
    let theme = Theme::default();
    let bmp = AvatarBitmap {
        width: 2,
        height: 2,
        rgba8_premul: Arc::new(vec![255; 16]),
    };
    let layout = layout_for(&ImageRequest::default());
    let plan = build_draw_plan(&layout, &AvatarImage::Bitmap(bmp), &theme);
    let DrawOp::FillCircle { center, radius, .. } = &plan.ops[1] else {
        panic!("avatar backdrop missing");
    };
    assert_eq!((*center, *radius), (Point::new(976.0, 258.0), 128.0));
    assert!(matches!(&plan.ops[2], DrawOp::ClippedImage { bounds, .. } if *bounds == layout.avatar));
}

#[test]
fn long_description_paints_two_runs() {
    let req = ImageRequest::new("T", "lorem ipsum dolor ".repeat(40).trim(), "s", "n");
    let layout = layout_for(&req);
    assert!(layout.description.dropped_lines > 0);
    let plan = build_draw_plan(&layout, &placeholder(), &Theme::default());
    let light_runs = plan.text_runs().filter(|(_, f)| f.weight == 300).count();
    assert_eq!(light_runs, 2);
}

#[test]
fn silhouette_sits_inside_the_avatar() {
    let c = Point::new(976.0, 258.0);
    let bb = placeholder_silhouette(c, 256.0).bounding_box();
    assert!(bb.x0 >= c.x - 128.0 && bb.x1 <= c.x + 128.0);
    assert!(bb.y0 >= c.y - 128.0 && bb.y1 <= c.y + 128.0);
    assert!((bb.width() - 96.0).abs() < 1e-6);

    let half = placeholder_silhouette(Point::ORIGIN, 128.0).bounding_box();
    assert!((half.width() - 48.0).abs() < 1e-6);
}

#[test]
fn cover_fills_bounds_and_centres() {
    let b = LayoutBox::new(100.0, 50.0, 200.0, 200.0);
    // Wide image: height matches, width overflows equally on both sides.
    let t = cover_transform(400, 200, &b);
    let p0 = t * Point::new(0.0, 0.0);
    let p1 = t * Point::new(400.0, 200.0);
    assert!((p0.y - 50.0).abs() < 1e-9 && (p1.y - 250.0).abs() < 1e-9);
    assert!((p0.x - 0.0).abs() < 1e-9 && (p1.x - 400.0).abs() < 1e-9);
}
