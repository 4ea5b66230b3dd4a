//! Path building and draw drivers
//!
//! Path calls append transformed commands. `fill` and `stroke` flatten the
//! path (once per path revision), expand it and forward the slices to the
//! sink. A failed step aborts only the current call: nothing reaches the
//! sink and the frame statistics stay untouched.

use quill_paint::Paint;
use quill_path::{DrawPath, FillExpansion, LineJoin, StrokeExpansion, Vertex, Winding};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::context::Canvas;
use crate::sink::RenderSink;
use crate::stats::strip_triangles;

/// Join parameters used for fill fringes, independent of the stroke style
const FILL_LINE_JOIN: LineJoin = LineJoin::Miter;
const FILL_MITER_LIMIT: f32 = 2.4;

/// Stroke widths are clamped to this many device pixels
const MAX_STROKE_WIDTH: f32 = 200.0;

type DrawPaths<'a> = SmallVec<[DrawPath<'a>; 4]>;

fn log_dropped(op: &'static str, result: quill_path::Result<()>) {
    if let Err(e) = result {
        warn!(error = %e, op, "Path command dropped");
    }
}

impl<R: RenderSink> Canvas<R> {
    fn antialias_enabled(&self) -> bool {
        self.config.antialias && self.states.current().shape_anti_alias
    }

    // === Paths ===

    /// Clear the current path and its cached geometry
    pub fn begin_path(&mut self) {
        self.commands.clear();
        self.cache.clear();
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        let t = self.states.current().transform;
        let r = self.commands.move_to(x, y, &t);
        log_dropped("move_to", r);
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        let t = self.states.current().transform;
        let r = self.commands.line_to(x, y, &t);
        log_dropped("line_to", r);
    }

    pub fn bezier_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        let t = self.states.current().transform;
        let r = self.commands.bezier_to(c1x, c1y, c2x, c2y, x, y, &t);
        log_dropped("bezier_to", r);
    }

    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        let t = self.states.current().transform;
        let r = self.commands.quad_to(cx, cy, x, y, &t);
        log_dropped("quad_to", r);
    }

    pub fn arc_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, radius: f32) {
        let t = self.states.current().transform;
        let r = self
            .commands
            .arc_to(x1, y1, x2, y2, radius, &t, self.tolerances.dist);
        log_dropped("arc_to", r);
    }

    pub fn close_path(&mut self) {
        let r = self.commands.close();
        log_dropped("close_path", r);
    }

    /// Declare the current sub-path solid (`Winding::SOLID`) or a hole
    pub fn path_winding(&mut self, winding: Winding) {
        let r = self.commands.winding(winding);
        log_dropped("path_winding", r);
    }

    pub fn arc(&mut self, cx: f32, cy: f32, r: f32, a0: f32, a1: f32, dir: Winding) {
        let t = self.states.current().transform;
        let res = self.commands.arc(cx, cy, r, a0, a1, dir, &t);
        log_dropped("arc", res);
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let t = self.states.current().transform;
        let r = self.commands.rect(x, y, w, h, &t);
        log_dropped("rect", r);
    }

    pub fn rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, r: f32) {
        let t = self.states.current().transform;
        let res = self.commands.rounded_rect(x, y, w, h, r, &t);
        log_dropped("rounded_rect", res);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn rounded_rect_varying(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        top_left: f32,
        top_right: f32,
        bottom_right: f32,
        bottom_left: f32,
    ) {
        let t = self.states.current().transform;
        let r = self.commands.rounded_rect_varying(
            x,
            y,
            w,
            h,
            top_left,
            top_right,
            bottom_right,
            bottom_left,
            &t,
        );
        log_dropped("rounded_rect_varying", r);
    }

    pub fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        let t = self.states.current().transform;
        let r = self.commands.ellipse(cx, cy, rx, ry, &t);
        log_dropped("ellipse", r);
    }

    pub fn circle(&mut self, cx: f32, cy: f32, r: f32) {
        let t = self.states.current().transform;
        let res = self.commands.circle(cx, cy, r, &t);
        log_dropped("circle", res);
    }

    // === Drawing ===

    /// Fill the current path with the fill paint
    pub fn fill(&mut self) {
        let aa = self.antialias_enabled();
        let tol = self.tolerances;
        let fringe_w = if aa { tol.fringe } else { 0.0 };

        let expanded = self.cache.flatten(&self.commands, &tol).and_then(|_| {
            self.cache
                .expand_fill(fringe_w, FILL_LINE_JOIN, FILL_MITER_LIMIT, tol.fringe)
        });
        self.submit_fill(expanded);
    }

    /// Hand an expanded fill to the sink; a failed expansion submits nothing
    fn submit_fill(&mut self, expanded: quill_path::Result<FillExpansion>) {
        let tol = self.tolerances;
        let expansion = match expanded {
            Ok(expansion) => expansion,
            Err(e) => {
                warn!(error = %e, "Fill aborted");
                return;
            }
        };

        let state = self.states.current();
        let paint = state.fill.fade(state.alpha);
        let paths: DrawPaths<'_> = self.cache.draw_paths().collect();

        self.sink.render_fill(
            &paint,
            state.composite,
            &state.scissor,
            tol.fringe,
            self.cache.bounds(),
            &paths,
        );

        for path in &paths {
            self.stats.fill_triangles +=
                strip_triangles(path.fill.len()) + strip_triangles(path.stroke.len());
            self.stats.draw_calls += 2;
        }

        trace!(
            subpaths = paths.len(),
            points = self.cache.points().len(),
            vertices = self.cache.vertices().len(),
            convex = expansion.convex,
            "Fill"
        );
        if self.config.debug_dump_paths {
            self.dump_path_cache();
        }
    }

    /// Stroke the current path with the stroke paint
    pub fn stroke(&mut self) {
        let aa = self.antialias_enabled();
        let tol = self.tolerances;
        let state = self.states.current();

        let scale = state.transform.average_scale();
        let mut stroke_width = (state.stroke_width * scale).clamp(0.0, MAX_STROKE_WIDTH);
        let mut paint = state.stroke;

        // Thinner than a pixel: keep the geometry, fade by coverage instead
        if stroke_width < tol.fringe {
            let coverage = (stroke_width / tol.fringe).clamp(0.0, 1.0);
            paint = paint.fade(coverage * coverage);
            stroke_width = tol.fringe;
        }
        let paint = paint.fade(state.alpha);
        let (line_cap, line_join, miter_limit) = (state.line_cap, state.line_join, state.miter_limit);

        let expanded = self.cache.flatten(&self.commands, &tol).and_then(|_| {
            self.cache.expand_stroke(
                stroke_width * 0.5,
                if aa { tol.fringe } else { 0.0 },
                line_cap,
                line_join,
                miter_limit,
                tol.tess,
            )
        });
        self.submit_stroke(expanded, paint, stroke_width);
    }

    fn submit_stroke(
        &mut self,
        expanded: quill_path::Result<StrokeExpansion>,
        paint: Paint,
        stroke_width: f32,
    ) {
        if let Err(e) = expanded {
            warn!(error = %e, "Stroke aborted");
            return;
        }

        let tol = self.tolerances;
        let state = self.states.current();
        let paths: DrawPaths<'_> = self.cache.draw_paths().collect();

        self.sink.render_stroke(
            &paint,
            state.composite,
            &state.scissor,
            tol.fringe,
            stroke_width,
            &paths,
        );

        for path in &paths {
            self.stats.stroke_triangles += strip_triangles(path.stroke.len());
            self.stats.draw_calls += 1;
        }

        trace!(
            subpaths = paths.len(),
            vertices = self.cache.vertices().len(),
            stroke_width,
            "Stroke"
        );
        if self.config.debug_dump_paths {
            self.dump_path_cache();
        }
    }

    /// Draw pre-tessellated triangles (glyph quads) with the fill paint
    pub fn fill_triangles(&mut self, vertices: &[Vertex]) {
        if vertices.is_empty() {
            return;
        }
        let state = self.states.current();
        let paint: Paint = state.fill.fade(state.alpha);

        self.sink.render_triangles(
            &paint,
            state.composite,
            &state.scissor,
            vertices,
            self.tolerances.fringe,
        );

        self.stats.text_triangles += vertices.len() / 3;
        self.stats.draw_calls += 1;
    }

    /// Log every sub-path's fill and stroke vertices at debug level
    pub fn dump_path_cache(&self) {
        let cache = &self.cache;
        debug!(subpaths = cache.subpaths().len(), "Dumping path cache");
        for (i, sp) in cache.subpaths().iter().enumerate() {
            debug!(
                index = i,
                points = sp.count,
                closed = sp.closed,
                convex = sp.convex,
                "Sub-path"
            );
            for v in cache.fill_vertices(sp) {
                debug!("  fill {} {}", v.x, v.y);
            }
            for v in cache.stroke_vertices(sp) {
                debug!("  stroke {} {}", v.x, v.y);
            }
        }
    }
}
