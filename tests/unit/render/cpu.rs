use std::sync::Arc;

use super::*;
use crate::foundation::core::GeoPoint;
use crate::render::layout::MapReference;

fn solid(w: u32, h: u32, premul: [u8; 4]) -> PreparedImage {
    let mut bytes = Vec::with_capacity((w * h * 4) as usize);
    for _ in 0..w * h {
        bytes.extend_from_slice(&premul);
    }
    PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(bytes),
    }
}

// Labels are skipped for empty nicknames, so these assets carry no font.
fn fontless_assets() -> Arc<CardAssets> {
    Arc::new(CardAssets {
        font: Arc::new(Vec::new()),
        primary_logo: solid(10, 10, [255, 0, 0, 255]),
        secondary_logo: solid(10, 10, [0, 0, 255, 255]),
        base_map: solid(8, 8, [0, 255, 0, 255]),
    })
}

fn square_job(trace: &[(f64, f64)]) -> RenderJob {
    RenderJob::new(
        "",
        trace.iter().map(|&(a, b)| GeoPoint::new(a, b)).collect(),
        vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 10.0),
            GeoPoint::new(10.0, 10.0),
            GeoPoint::new(10.0, 0.0),
        ],
    )
    .unwrap()
}

fn compositor(layout: CardLayout) -> LayerCompositor {
    LayerCompositor::new(layout, fontless_assets()).unwrap()
}

fn assert_px_near(got: [u8; 4], want: [u8; 4], tol: u8) {
    for (g, w) in got.iter().zip(want.iter()) {
        assert!(g.abs_diff(*w) <= tol, "got {got:?}, want {want:?}");
    }
}

#[test]
fn empty_shape_fails_before_drawing() {
    let job = RenderJob::new("", vec![], vec![]).unwrap();
    let err = compositor(CardLayout::default()).render(&job).unwrap_err();
    assert!(matches!(err, TracecardError::InvalidRegion));
}

#[test]
fn degenerate_shape_fails() {
    let job = RenderJob::new("", vec![], vec![GeoPoint::new(1.0, 1.0); 3]).unwrap();
    let err = compositor(CardLayout::default()).render(&job).unwrap_err();
    assert!(matches!(err, TracecardError::DegenerateRegion));
}

#[test]
fn output_is_fixed_size() {
    let surface = compositor(CardLayout::default())
        .render(&square_job(&[(5.0, 5.0)]))
        .unwrap();
    assert_eq!((surface.width, surface.height), (1000, 1000));
    assert_eq!(surface.data.len(), 1000 * 1000 * 4);
}

#[test]
fn wash_covers_untouched_canvas() {
    let surface = compositor(CardLayout::default())
        .render(&square_job(&[]))
        .unwrap();
    // Far corner: no map, logo or stroke reaches it.
    assert_px_near(surface.pixel(995, 5).unwrap(), [204, 204, 204, 204], 1);
}

#[test]
fn logos_sit_at_fixed_positions() {
    let surface = compositor(CardLayout::default())
        .render(&square_job(&[]))
        .unwrap();
    assert_px_near(surface.pixel(165, 125).unwrap(), [255, 0, 0, 255], 1);
    assert_px_near(surface.pixel(895, 935).unwrap(), [0, 0, 255, 255], 1);
}

#[test]
fn map_fills_projected_reference_rectangle() {
    let layout = CardLayout {
        map: MapReference {
            top_left: GeoPoint::new(10.0, 0.0),
            bottom_right: GeoPoint::new(0.0, 10.0),
        },
        ..CardLayout::default()
    };
    let surface = compositor(layout)
        .render_layers(&square_job(&[]), &[Layer::MapCrop])
        .unwrap();
    // The square projects to x in [300, 700], y in [200, 800].
    assert_px_near(surface.pixel(500, 500).unwrap(), [0, 255, 0, 255], 1);
    assert_px_near(surface.pixel(310, 210).unwrap(), [0, 255, 0, 255], 1);
    assert_eq!(surface.pixel(100, 500).unwrap(), [0, 0, 0, 0]);
    assert_eq!(surface.pixel(500, 900).unwrap(), [0, 0, 0, 0]);
}

#[test]
fn trace_is_translucent_over_wash() {
    let surface = compositor(CardLayout::default())
        .render(&square_job(&[(5.0, 0.0), (5.0, 10.0)]))
        .unwrap();
    let px = surface.pixel(500, 500).unwrap();
    assert_ne!(px, [204, 204, 204, 204]);
    assert!(px[2] > px[0], "trace should tint blue: {px:?}");
    assert!(px[3] > 204 && px[3] < 255, "trace should stay translucent: {px:?}");
}

#[test]
fn shape_stroke_occludes_trace_where_they_overlap() {
    // Trace runs along the shape's bottom edge, y = 800.
    let job = square_job(&[(0.0, 0.0), (0.0, 10.0)]);
    let surface = compositor(CardLayout::default()).render(&job).unwrap();
    assert_px_near(surface.pixel(500, 800).unwrap(), [0, 0, 0, 255], 1);

    // Trace-only pixel just outside the 10px shape stroke but inside the 30px trace stroke.
    let trace_only = surface.pixel(500, 812).unwrap();
    assert!(trace_only[2] > trace_only[0], "{trace_only:?}");
}

#[test]
fn reversed_order_lets_trace_tint_the_outline() {
    let job = square_job(&[(0.0, 0.0), (0.0, 10.0)]);
    let comp = compositor(CardLayout::default());
    let reversed = comp
        .render_layers(&job, &[Layer::ShapeStroke, Layer::TraceStroke])
        .unwrap();
    let px = reversed.pixel(500, 800).unwrap();
    assert!(px[2] > 0, "translucent trace drawn last must tint black: {px:?}");
}

#[test]
fn single_point_trace_draws_nothing() {
    let comp = compositor(CardLayout::default());
    let with_dot = comp
        .render_layers(&square_job(&[(5.0, 5.0)]), &[Layer::TraceStroke])
        .unwrap();
    assert!(with_dot.data.iter().all(|&b| b == 0));
}

#[test]
fn render_is_deterministic() {
    let comp = compositor(CardLayout::default());
    let job = square_job(&[(1.0, 1.0), (4.0, 7.0), (9.0, 2.0)]);
    assert_eq!(comp.render(&job).unwrap(), comp.render(&job).unwrap());
}

#[test]
fn layer_order_is_fixed() {
    assert_eq!(
        Layer::ORDER,
        [
            Layer::MapCrop,
            Layer::Wash,
            Layer::Label,
            Layer::Logos,
            Layer::TraceStroke,
            Layer::ShapeStroke,
        ]
    );
}

#[test]
fn invalid_layout_is_rejected() {
    let layout = CardLayout {
        trace_stroke: StrokeStyle {
            width: 0.0,
            ..CardLayout::default().trace_stroke
        },
        ..CardLayout::default()
    };
    assert!(LayerCompositor::new(layout, fontless_assets()).is_err());
}

const BLOCK_FONT: &[u8] = include_bytes!("../../fixtures/TracecardBlocks-Bold.ttf");

fn block_font_assets() -> Arc<CardAssets> {
    Arc::new(CardAssets {
        font: Arc::new(BLOCK_FONT.to_vec()),
        ..(*fontless_assets()).clone()
    })
}

fn nickname_job(nickname: &str) -> RenderJob {
    let mut job = square_job(&[]);
    job.nickname = nickname.to_owned();
    job
}

#[test]
fn label_font_is_registered_at_construction() {
    let comp = LayerCompositor::new(CardLayout::default(), block_font_assets()).unwrap();
    assert_eq!(comp.font_family(), Some("Tracecard Blocks"));
    assert_eq!(compositor(CardLayout::default()).font_family(), None);
}

#[test]
fn unreadable_font_fails_construction() {
    let assets = Arc::new(CardAssets {
        font: Arc::new(b"not a font".to_vec()),
        ..(*fontless_assets()).clone()
    });
    let err = LayerCompositor::new(CardLayout::default(), assets).err().unwrap();
    assert!(matches!(err, TracecardError::AssetLoad(_)), "{err:?}");
}

#[test]
fn label_is_drawn_below_its_anchor() {
    let comp = LayerCompositor::new(CardLayout::default(), block_font_assets()).unwrap();
    let surface = comp
        .render_layers(&nickname_job("WWWWWW"), &[Layer::Label])
        .unwrap();

    let inked = |x0: u32, x1: u32, y0: u32, y1: u32| {
        (y0..y1).any(|y| (x0..x1).any(|x| surface.pixel(x, y).is_some_and(|p| p[3] > 128)))
    };
    assert!(inked(50, 400, 900, 950), "label should ink the area under its anchor");
    assert!(!inked(0, 1000, 0, 880), "nothing should be drawn above the anchor");
}

#[test]
fn repeated_labels_reuse_the_registered_font() {
    let comp = LayerCompositor::new(CardLayout::default(), block_font_assets()).unwrap();
    let ada = nickname_job("Ada");
    let first = comp.render(&ada).unwrap();
    let other = comp.render(&nickname_job("Grace")).unwrap();
    let again = comp.render(&ada).unwrap();
    assert_eq!(first, again);
    assert_ne!(first, other);
}

#[test]
fn labels_render_concurrently_from_one_compositor() {
    let comp = Arc::new(LayerCompositor::new(CardLayout::default(), block_font_assets()).unwrap());
    let job = nickname_job("Ada");
    let expected = comp.render(&job).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let comp = Arc::clone(&comp);
            let job = job.clone();
            std::thread::spawn(move || comp.render(&job).unwrap())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}

#[test]
fn nickname_without_font_is_a_render_error() {
    let err = compositor(CardLayout::default())
        .render(&nickname_job("Ada"))
        .unwrap_err();
    assert!(matches!(err, TracecardError::Render(_)), "{err:?}");
}

#[test]
fn image_bytes_must_match_dimensions() {
    let mut short = solid(10, 10, [255, 0, 0, 255]);
    Arc::make_mut(&mut short.rgba8_premul).truncate(10 * 9 * 4);
    let assets = Arc::new(CardAssets {
        primary_logo: short,
        ..(*fontless_assets()).clone()
    });
    let err = LayerCompositor::new(CardLayout::default(), assets).err().unwrap();
    assert!(matches!(err, TracecardError::AssetLoad(_)), "{err:?}");
}

#[test]
fn oversized_image_is_rejected_before_rasterizing() {
    let assets = Arc::new(CardAssets {
        base_map: PreparedImage {
            width: 70_000,
            height: 1,
            rgba8_premul: Arc::new(vec![0; 70_000 * 4]),
        },
        ..(*fontless_assets()).clone()
    });
    let err = LayerCompositor::new(CardLayout::default(), assets).err().unwrap();
    assert!(matches!(err, TracecardError::AssetLoad(_)), "{err:?}");
}
