//! Pointer and touch input feeding the attractor's target.
//!
//! Input only ever writes `Attractor::target`; the attractor's own easing does
//! the rest.  Window events arrive in window-local logical pixels with y
//! pointing down, which matches canvas space up to the surface origin offset.
//!
//! ## Touch vs scroll
//!
//! A finger dragged mostly vertically on a touch screen usually means "scroll
//! the page", not "steer the black hole".  Each touch is tracked as a
//! [`TouchGesture`]: until it has moved more than `touch_slop` pixels it steers
//! as a tap would; past the slop it is classified once as `Steer` or `Scroll`
//! and keeps that classification until the finger lifts.

use crate::attractor::Attractor;
use crate::config::FieldConfig;
use crate::simulation::{field_is_live, FieldSet};
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use bevy::window::CursorMoved;
use std::collections::HashMap;

// ── Coordinate conversion ─────────────────────────────────────────────────────

/// Top-left corner of the drawing surface inside the window (logical px).
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SurfaceOrigin(pub Vec2);

/// Window-local client coordinates → surface-local canvas coordinates.
pub fn client_to_surface(client: Vec2, origin: SurfaceOrigin) -> Vec2 {
    client - origin.0
}

// ── Touch gestures ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Still within the slop radius.
    Pending,
    Steer,
    Scroll,
}

/// One finger's gesture from press to lift.
#[derive(Debug, Clone, Copy)]
pub struct TouchGesture {
    pub start: Vec2,
    pub kind: GestureKind,
}

impl TouchGesture {
    pub fn begin(start: Vec2) -> Self {
        Self {
            start,
            kind: GestureKind::Pending,
        }
    }

    /// Feed a new finger position; returns the position to steer towards, or
    /// `None` if this gesture is a scroll.
    pub fn track(&mut self, position: Vec2, slop: f32) -> Option<Vec2> {
        if self.kind == GestureKind::Pending {
            let delta = position - self.start;
            if delta.length() > slop {
                self.kind = if delta.y.abs() > delta.x.abs() {
                    GestureKind::Scroll
                } else {
                    GestureKind::Steer
                };
            }
        }
        match self.kind {
            GestureKind::Scroll => None,
            GestureKind::Pending | GestureKind::Steer => Some(position),
        }
    }
}

/// Live gestures keyed by touch id.
#[derive(Resource, Debug, Default)]
pub struct TouchTracker {
    pub gestures: HashMap<u64, TouchGesture>,
}

impl TouchTracker {
    /// Apply one touch event; returns a steer position when the event should
    /// move the attractor.
    pub fn handle(&mut self, id: u64, phase: TouchPhase, position: Vec2, slop: f32) -> Option<Vec2> {
        match phase {
            TouchPhase::Started => {
                self.gestures.insert(id, TouchGesture::begin(position));
                Some(position)
            }
            TouchPhase::Moved => self
                .gestures
                .entry(id)
                .or_insert_with(|| TouchGesture::begin(position))
                .track(position, slop),
            TouchPhase::Ended | TouchPhase::Canceled => {
                self.gestures.remove(&id);
                None
            }
        }
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Registers the pointer and touch listeners.  They run only while the field
/// is live, so teardown releases them along with the frame driver.
pub struct PointerInputPlugin;

impl Plugin for PointerInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SurfaceOrigin>()
            .init_resource::<TouchTracker>()
            .add_message::<CursorMoved>()
            .add_message::<TouchInput>()
            .add_systems(
                Update,
                (pointer_input_system, touch_input_system)
                    .in_set(FieldSet::Input)
                    .run_if(field_is_live),
            );
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Forward the latest cursor position of this frame to every attractor.
pub fn pointer_input_system(
    mut cursor: MessageReader<CursorMoved>,
    origin: Res<SurfaceOrigin>,
    mut q: Query<&mut Attractor>,
) {
    let Some(last) = cursor.read().last() else {
        return;
    };
    let p = client_to_surface(last.position, *origin);
    for mut attractor in q.iter_mut() {
        attractor.set_target(p.x, p.y);
    }
}

/// Steer with touches that are taps or horizontal-ish drags; ignore scrolls.
pub fn touch_input_system(
    mut touches: MessageReader<TouchInput>,
    config: Res<FieldConfig>,
    origin: Res<SurfaceOrigin>,
    mut tracker: ResMut<TouchTracker>,
    mut q: Query<&mut Attractor>,
) {
    for touch in touches.read() {
        let p = client_to_surface(touch.position, *origin);
        if let Some(steer) = tracker.handle(touch.id, touch.phase, p, config.touch_slop) {
            for mut attractor in q.iter_mut() {
                attractor.set_target(steer.x, steer.y);
            }
        }
    }
}
