use super::*;
use crate::{
    assets::avatar::AvatarBitmap,
    compose::plan::{DrawPlan, placeholder_silhouette},
    foundation::core::LayoutBox,
    render::backend::execute_plan,
};

fn close(a: [u8; 4], b: [u8; 4], tol: u8) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= tol)
}

fn small_canvas() -> Canvas {
    Canvas {
        width: 64,
        height: 32,
    }
}

fn gradient(canvas: Canvas) -> DrawOp {
    let (w, h) = (canvas.width_f64(), canvas.height_f64());
    DrawOp::LinearGradient {
        rect: Rect::new(0.0, 0.0, w, h),
        start: Point::ORIGIN,
        end: Point::new(w, h),
        from: Rgba8::opaque(0, 0, 0),
        to: Rgba8::opaque(200, 100, 50),
    }
}

#[test]
fn gradient_runs_from_top_left_to_bottom_right() {
    let canvas = small_canvas();
    let plan = DrawPlan {
        canvas,
        ops: vec![gradient(canvas)],
    };
    let s = execute_plan(&mut CpuBackend::new(None), &plan).unwrap();
    let tl = s.pixel(0, 0).unwrap();
    let br = s.pixel(63, 31).unwrap();
    let mid = s.pixel(32, 16).unwrap();
    assert!(close(tl, [0, 0, 0, 255], 4), "{tl:?}");
    assert!(close(br, [200, 100, 50, 255], 4), "{br:?}");
    assert!(close(mid, [100, 50, 25, 255], 6), "{mid:?}");
    assert!(s.data().chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn circle_and_placeholder_paint_inside_bounds() {
    let canvas = small_canvas();
    let center = Point::new(32.0, 16.0);
    let plan = DrawPlan {
        canvas,
        ops: vec![
            gradient(canvas),
            DrawOp::FillCircle {
                center,
                radius: 14.0,
                color: Rgba8::opaque(0x64, 0x74, 0x8b),
            },
            DrawOp::FillPath {
                path: placeholder_silhouette(center, 28.0),
                color: Rgba8::WHITE,
            },
        ],
    };
    let s = execute_plan(&mut CpuBackend::new(None), &plan).unwrap();
    // Just left of the head, still inside the circle.
    assert!(close(s.pixel(22, 16).unwrap(), [0x64, 0x74, 0x8b, 255], 2));
    // Head centre sits 16/256 of the diameter above the avatar centre.
    assert!(close(s.pixel(32, 14).unwrap(), [255, 255, 255, 255], 2));
    // Outside the circle the background shows through.
    assert!(close(s.pixel(2, 2).unwrap(), [8, 4, 2, 255], 6));
}

#[test]
fn clipped_image_covers_circle_only() {
    let canvas = small_canvas();
    let red = AvatarBitmap {
        width: 4,
        height: 2,
        rgba8_premul: std::sync::Arc::new([255u8, 0, 0, 255].repeat(8)),
    };
    let bounds = LayoutBox::new(16.0, 0.0, 32.0, 32.0);
    let plan = DrawPlan {
        canvas,
        ops: vec![
            gradient(canvas),
            DrawOp::ClippedImage {
                image: red,
                bounds,
            },
        ],
    };
    let s = execute_plan(&mut CpuBackend::new(None), &plan).unwrap();
    assert!(close(s.pixel(32, 16).unwrap(), [255, 0, 0, 255], 2));
    assert!(close(s.pixel(20, 16).unwrap(), [255, 0, 0, 255], 2));
    // Corner of the bounding square is outside the circle.
    let corner = s.pixel(16, 0).unwrap();
    assert!(!close(corner, [255, 0, 0, 255], 40), "{corner:?}");
}

#[test]
fn text_without_fonts_is_skipped() {
    let canvas = small_canvas();
    let plan = DrawPlan {
        canvas,
        ops: vec![
            gradient(canvas),
            DrawOp::TextRun {
                text: "Hello".to_string(),
                font: FontSpec::new(700, 20.0),
                origin: Point::new(2.0, 2.0),
                color: Rgba8::WHITE,
            },
        ],
    };
    let with_text = execute_plan(&mut CpuBackend::new(None), &plan).unwrap();
    let without = execute_plan(
        &mut CpuBackend::new(None),
        &DrawPlan {
            canvas,
            ops: vec![gradient(canvas)],
        },
    )
    .unwrap();
    assert_eq!(with_text.data(), without.data());
}

#[test]
fn draw_before_begin_is_an_error() {
    let mut b = CpuBackend::new(None);
    assert!(b.draw(&gradient(small_canvas())).is_err());
    assert!(b.finish().is_err());
}
