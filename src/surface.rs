//! Drawing surface seam between the particle field and the renderer.
//!
//! Field entities think in canvas space: origin at the top-left corner, x to
//! the right, y downwards, units in logical pixels.  They draw through the
//! [`Surface`] trait and never hold on to a surface themselves.
//!
//! Two surfaces ship with the crate:
//!
//! | Surface        | Backing            | Used by                          |
//! |----------------|--------------------|----------------------------------|
//! | [`GizmoSurface`] | Bevy `Gizmos`    | `draw_field_system` at runtime   |
//! | [`DrawList`]   | `Vec<DrawCommand>` | tests and headless verification  |
//!
//! `GizmoSurface` converts canvas coordinates to Bevy world coordinates
//! (origin at the window centre, y upwards) and approximates fills, glows and
//! stroke widths with concentric or parallel gizmo lines.

use bevy::prelude::*;

// ── Extent ────────────────────────────────────────────────────────────────────

/// Current pixel extent of the drawing surface.
///
/// Read from the primary window at mount and updated by `window_resize_system`.
/// Entities read it when they sample fresh positions, so a resize only
/// affects entities created or reset afterwards.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceExtent {
    pub width: f32,
    pub height: f32,
}

impl SurfaceExtent {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A surface is drawable only when both sides are finite and positive.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Whether `p` lies inside `[0, width] × [0, height]`.
    pub fn contains(&self, p: Vec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    /// Canvas space → Bevy world space (origin centre, y up).
    pub fn to_world(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x - self.width * 0.5, self.height * 0.5 - p.y)
    }
}

// ── Strokes ───────────────────────────────────────────────────────────────────

/// A stroke style: colour at the head of the path, colour at the tail, width.
///
/// Solid strokes use the same colour at both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub head: Color,
    pub tail: Color,
    pub width: f32,
}

impl Stroke {
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            head: color,
            tail: color,
            width,
        }
    }

    pub fn gradient(head: Color, tail: Color, width: f32) -> Self {
        Self { head, tail, width }
    }
}

// ── Surface trait ─────────────────────────────────────────────────────────────

/// The raster primitives the field needs from its host.
pub trait Surface {
    /// Erase everything drawn so far this frame.
    fn clear(&mut self);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Straight stroke from `from` (head colour) to `to` (tail colour).
    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: Stroke);

    /// Quadratic Bézier stroke from `from` through `control` to `to`.
    fn stroke_curve(&mut self, from: Vec2, control: Vec2, to: Vec2, stroke: Stroke);

    /// Circular arc starting at angle `start` and sweeping `sweep` radians.
    fn stroke_arc(&mut self, center: Vec2, radius: f32, start: f32, sweep: f32, stroke: Stroke);

    /// Radial gradient disc: `inner` at the centre fading to `outer` at `radius`.
    fn fill_glow(&mut self, center: Vec2, radius: f32, inner: Color, outer: Color);
}

// ── Geometry helpers ──────────────────────────────────────────────────────────

/// Linear interpolation between two colours in sRGB space.
pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let a = a.to_srgba();
    let b = b.to_srgba();
    Color::srgba(
        a.red + (b.red - a.red) * t,
        a.green + (b.green - a.green) * t,
        a.blue + (b.blue - a.blue) * t,
        a.alpha + (b.alpha - a.alpha) * t,
    )
}

/// Point on a quadratic Bézier at parameter `t ∈ [0, 1]`.
pub fn quadratic_point(from: Vec2, control: Vec2, to: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    from * (u * u) + control * (2.0 * u * t) + to * (t * t)
}

/// Flatten a quadratic Bézier into `segments + 1` points.
pub fn flatten_quadratic(from: Vec2, control: Vec2, to: Vec2, segments: usize) -> Vec<Vec2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| quadratic_point(from, control, to, i as f32 / segments as f32))
        .collect()
}

/// Flatten a circular arc into `segments + 1` points.
pub fn arc_points(center: Vec2, radius: f32, start: f32, sweep: f32, segments: usize) -> Vec<Vec2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let a = start + sweep * (i as f32 / segments as f32);
            center + Vec2::new(a.cos(), a.sin()) * radius
        })
        .collect()
}

/// Perpendicular offsets (px) that emulate a stroke of `width` with 1 px lines.
fn width_offsets(width: f32) -> impl Iterator<Item = f32> {
    let n = width.round().max(1.0) as usize;
    let mid = (n as f32 - 1.0) * 0.5;
    (0..n).map(move |i| i as f32 - mid)
}

// ── Gizmo surface ─────────────────────────────────────────────────────────────

/// [`Surface`] backed by Bevy's immediate-mode gizmos.
///
/// Gizmos are flushed every frame, so `clear` has nothing to erase; the
/// window background comes from `ClearColor`.
pub struct GizmoSurface<'a, 'w, 's> {
    gizmos: &'a mut Gizmos<'w, 's>,
    extent: SurfaceExtent,
    curve_segments: usize,
    glow_rings: usize,
}

impl<'a, 'w, 's> GizmoSurface<'a, 'w, 's> {
    pub fn new(
        gizmos: &'a mut Gizmos<'w, 's>,
        extent: SurfaceExtent,
        curve_segments: usize,
        glow_rings: usize,
    ) -> Self {
        Self {
            gizmos,
            extent,
            curve_segments: curve_segments.max(2),
            glow_rings: glow_rings.max(2),
        }
    }

    fn polyline(&mut self, points: &[Vec2], stroke: Stroke) {
        let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
            return;
        };
        let extent = self.extent;
        let normal = (last - first).perp().normalize_or_zero();
        let count = points.len().saturating_sub(1).max(1) as f32;
        for offset in width_offsets(stroke.width) {
            let shifted = points.iter().enumerate().map(|(i, p)| {
                let color = lerp_color(stroke.head, stroke.tail, i as f32 / count);
                (extent.to_world(*p + normal * offset), color)
            });
            self.gizmos.linestrip_gradient_2d(shifted);
        }
    }
}

impl Surface for GizmoSurface<'_, '_, '_> {
    fn clear(&mut self) {}

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let world = self.extent.to_world(center);
        let rings = (radius.ceil() as usize).clamp(1, 4);
        for i in 1..=rings {
            let r = radius * i as f32 / rings as f32;
            self.gizmos.circle_2d(world, r, color);
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: Stroke) {
        let extent = self.extent;
        let normal = (to - from).perp().normalize_or_zero();
        for offset in width_offsets(stroke.width) {
            let shift = normal * offset;
            self.gizmos.line_gradient_2d(
                extent.to_world(from + shift),
                extent.to_world(to + shift),
                stroke.head,
                stroke.tail,
            );
        }
    }

    fn stroke_curve(&mut self, from: Vec2, control: Vec2, to: Vec2, stroke: Stroke) {
        let points = flatten_quadratic(from, control, to, self.curve_segments);
        self.polyline(&points, stroke);
    }

    fn stroke_arc(&mut self, center: Vec2, radius: f32, start: f32, sweep: f32, stroke: Stroke) {
        let extent = self.extent;
        for offset in width_offsets(stroke.width) {
            let points = arc_points(center, radius + offset, start, sweep, self.curve_segments);
            let count = points.len().saturating_sub(1).max(1) as f32;
            let strip = points.iter().enumerate().map(|(i, p)| {
                let color = lerp_color(stroke.head, stroke.tail, i as f32 / count);
                (extent.to_world(*p), color)
            });
            self.gizmos.linestrip_gradient_2d(strip);
        }
    }

    fn fill_glow(&mut self, center: Vec2, radius: f32, inner: Color, outer: Color) {
        let world = self.extent.to_world(center);
        let rings = self.glow_rings;
        for i in 0..rings {
            let t = i as f32 / (rings - 1) as f32;
            let r = (radius * t).max(0.5);
            self.gizmos.circle_2d(world, r, lerp_color(inner, outer, t));
        }
    }
}

// ── Recording surface ─────────────────────────────────────────────────────────

/// One primitive recorded by a [`DrawList`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        stroke: Stroke,
    },
    Curve {
        from: Vec2,
        control: Vec2,
        to: Vec2,
        stroke: Stroke,
    },
    Arc {
        center: Vec2,
        radius: f32,
        start: f32,
        sweep: f32,
        stroke: Stroke,
    },
    Glow {
        center: Vec2,
        radius: f32,
        inner: Color,
        outer: Color,
    },
}

/// [`Surface`] that records commands instead of rasterising them.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
    /// Number of times `clear` has been called.
    pub clears: usize,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }
}

impl Surface for DrawList {
    fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: Stroke) {
        self.commands.push(DrawCommand::Line { from, to, stroke });
    }

    fn stroke_curve(&mut self, from: Vec2, control: Vec2, to: Vec2, stroke: Stroke) {
        self.commands.push(DrawCommand::Curve {
            from,
            control,
            to,
            stroke,
        });
    }

    fn stroke_arc(&mut self, center: Vec2, radius: f32, start: f32, sweep: f32, stroke: Stroke) {
        self.commands.push(DrawCommand::Arc {
            center,
            radius,
            start,
            sweep,
            stroke,
        });
    }

    fn fill_glow(&mut self, center: Vec2, radius: f32, inner: Color, outer: Color) {
        self.commands.push(DrawCommand::Glow {
            center,
            radius,
            inner,
            outer,
        });
    }
}
