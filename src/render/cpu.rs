use std::sync::{Arc, Mutex, PoisonError};

use crate::assets::decode::PreparedImage;
use crate::assets::store::{CardAssets, TextBrushRgba8, TextLayoutEngine};
use crate::foundation::core::{Affine, PixelRect, Point, Rgba8};
use crate::foundation::error::{TracecardError, TracecardResult};
use crate::job::RenderJob;
use crate::projection::{CoordinateProjector, ProjectionParameters};
use crate::render::layout::{CardLayout, StrokeStyle};
use crate::render::surface::RasterSurface;

/// Visual layers of a card, bottom to top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Base map stretched between the projected map reference corners.
    MapCrop,
    /// Translucent full-canvas overlay muting the map.
    Wash,
    /// Nickname text.
    Label,
    /// Both branding logos.
    Logos,
    /// Translucent free-hand trace polyline.
    TraceStroke,
    /// Opaque shape outline polyline.
    ShapeStroke,
}

impl Layer {
    /// Fixed draw order; later layers occlude earlier ones where opaque.
    pub const ORDER: [Layer; 6] = [
        Layer::MapCrop,
        Layer::Wash,
        Layer::Label,
        Layer::Logos,
        Layer::TraceStroke,
        Layer::ShapeStroke,
    ];
}

/// Label font registered once, with the engine that shapes every nickname.
struct LabelFont {
    family: String,
    engine: Mutex<TextLayoutEngine>,
}

#[derive(Clone)]
struct ImagePaint {
    paint: vello_cpu::Image,
    w: u32,
    h: u32,
}

/// CPU compositor powered by `vello_cpu`.
///
/// Paints and the label font are prepared once, so one instance can serve concurrent renders;
/// each call builds its own render context and projection parameters. Label shaping is the only
/// step that takes a lock.
pub struct LayerCompositor {
    layout: CardLayout,
    projector: CoordinateProjector,
    label_font: Option<LabelFont>,
    font: vello_cpu::peniko::FontData,
    base_map: ImagePaint,
    primary_logo: ImagePaint,
    secondary_logo: ImagePaint,
}

impl LayerCompositor {
    /// Prepare paints and register the label font for `assets` under `layout`.
    ///
    /// Assets with empty font bytes are accepted; such a compositor can only render jobs with an
    /// empty nickname.
    pub fn new(layout: CardLayout, assets: Arc<CardAssets>) -> TracecardResult<Self> {
        layout.validate()?;
        let projector = CoordinateProjector::new(layout.projection)?;

        let label_font = if assets.font.is_empty() {
            None
        } else {
            let mut engine = TextLayoutEngine::new();
            let family = engine
                .register_font(&assets.font)
                .map_err(|e| TracecardError::asset_load(format!("font: {e}")))?;
            Some(LabelFont {
                family,
                engine: Mutex::new(engine),
            })
        };
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(assets.font.to_vec()),
            0,
        );

        Ok(Self {
            projector,
            label_font,
            font,
            base_map: image_paint(&assets.base_map)?,
            primary_logo: image_paint(&assets.primary_logo)?,
            secondary_logo: image_paint(&assets.secondary_logo)?,
            layout,
        })
    }

    /// Family name of the registered label font, if the assets carried one.
    pub fn font_family(&self) -> Option<&str> {
        self.label_font.as_ref().map(|f| f.family.as_str())
    }

    /// Borrow the layout this compositor draws with.
    pub fn layout(&self) -> &CardLayout {
        &self.layout
    }

    /// Borrow the projector derived from the layout.
    pub fn projector(&self) -> &CoordinateProjector {
        &self.projector
    }

    /// Render every layer of `job` in [`Layer::ORDER`].
    ///
    /// Fails before drawing anything when the shape is empty or degenerate.
    #[tracing::instrument(skip(self, job), fields(nickname = %job.nickname))]
    pub fn render(&self, job: &RenderJob) -> TracecardResult<RasterSurface> {
        self.render_layers(job, &Layer::ORDER)
    }

    /// Render only `layers`, in the order given.
    pub fn render_layers(
        &self,
        job: &RenderJob,
        layers: &[Layer],
    ) -> TracecardResult<RasterSurface> {
        let params = self.projector.compute_parameters(&job.shape)?;

        let size: u16 = self
            .layout
            .size()
            .try_into()
            .map_err(|_| TracecardError::render("canvas size exceeds u16"))?;
        let mut ctx = vello_cpu::RenderContext::new(size, size);
        for &layer in layers {
            self.draw_layer(layer, job, &params, &mut ctx)?;
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(size, size);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(RasterSurface {
            width: u32::from(size),
            height: u32::from(size),
            data: pixmap.data_as_u8_slice().to_vec(),
        })
    }

    fn draw_layer(
        &self,
        layer: Layer,
        job: &RenderJob,
        params: &ProjectionParameters,
        ctx: &mut vello_cpu::RenderContext,
    ) -> TracecardResult<()> {
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match layer {
            Layer::MapCrop => {
                let top_left = params.project(self.layout.map.top_left);
                let bottom_right = params.project(self.layout.map.bottom_right);
                draw_image(
                    ctx,
                    &self.base_map,
                    PixelRect::from_corners(top_left, bottom_right),
                );
            }
            Layer::Wash => {
                let side = f64::from(self.layout.size());
                ctx.set_paint(cpu_color(self.layout.wash));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, side, side));
            }
            Layer::Label => self.draw_label(&job.nickname, ctx)?,
            Layer::Logos => {
                draw_image(ctx, &self.primary_logo, self.layout.primary_logo);
                draw_image(ctx, &self.secondary_logo, self.layout.secondary_logo);
            }
            Layer::TraceStroke => {
                draw_polyline(ctx, &params.project_all(&job.trace), self.layout.trace_stroke);
            }
            Layer::ShapeStroke => {
                draw_polyline(ctx, &params.project_all(&job.shape), self.layout.shape_stroke);
            }
        }
        Ok(())
    }

    fn draw_label(&self, text: &str, ctx: &mut vello_cpu::RenderContext) -> TracecardResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let Some(label_font) = &self.label_font else {
            return Err(TracecardError::render("nickname given but no label font is loaded"));
        };
        let style = self.layout.label;
        let brush = TextBrushRgba8 {
            r: style.color.r,
            g: style.color.g,
            b: style.color.b,
            a: style.color.a,
        };
        let layout = label_font
            .engine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .layout_line(text, &label_font.family, style.size_px, brush)
            .map_err(|e| TracecardError::render(format!("label layout failed: {e}")))?;

        ctx.set_transform(affine_to_cpu(Affine::translate((
            style.anchor.x,
            style.anchor.y,
        ))));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

fn draw_image(ctx: &mut vello_cpu::RenderContext, img: &ImagePaint, dst: PixelRect) {
    let (w, h) = (f64::from(img.w), f64::from(img.h));
    ctx.set_transform(affine_to_cpu(dst.fit_transform(w, h)));
    ctx.set_paint(img.paint.clone());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
}

/// Stroke `points` as one open polyline. Fewer than two points draw nothing.
fn draw_polyline(ctx: &mut vello_cpu::RenderContext, points: &[Point], style: StrokeStyle) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    if rest.is_empty() {
        return;
    }

    let mut path = vello_cpu::kurbo::BezPath::new();
    path.move_to(point_to_cpu(*first));
    for &p in rest {
        path.line_to(point_to_cpu(p));
    }

    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_stroke(
        vello_cpu::kurbo::Stroke::new(style.width)
            .with_caps(vello_cpu::kurbo::Cap::Round)
            .with_join(vello_cpu::kurbo::Join::Round),
    );
    ctx.set_paint(cpu_color(style.color));
    ctx.stroke_path(&path);
}

fn cpu_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

/// Wrap premultiplied image bytes in a pixmap-backed paint.
fn image_paint(img: &PreparedImage) -> TracecardResult<ImagePaint> {
    let (Ok(w), Ok(h)) = (u16::try_from(img.width), u16::try_from(img.height)) else {
        return Err(TracecardError::asset_load(format!(
            "{}x{} image exceeds the rasterizer limit of {} px per side",
            img.width,
            img.height,
            u16::MAX
        )));
    };
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = img
        .rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect();
    if img.rgba8_premul.len() % 4 != 0 || pixels.len() != usize::from(w) * usize::from(h) {
        return Err(TracecardError::asset_load(format!(
            "{} pixel bytes do not describe a {}x{} image",
            img.rgba8_premul.len(),
            img.width,
            img.height
        )));
    }
    let translucent = pixels.iter().any(|px| px.a != u8::MAX);
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, translucent);

    Ok(ImagePaint {
        paint: vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        },
        w: img.width,
        h: img.height,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
