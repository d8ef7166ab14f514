//! Starfield particle backdrop
//!
//! Twinkling stars, pooled comets and a pointer-driven black-hole attractor
//! with an orbiting spark swarm and periodic flares, drawn each frame onto a
//! 2D surface.  Entity logic is plain Rust over the [`surface::Surface`]
//! seam; Bevy provides the frame loop, window, input and gizmo rendering.

pub mod attractor;
pub mod comet;
pub mod config;
pub mod constants;
pub mod error;
pub mod graphics;
pub mod input;
pub mod particle;
pub mod simulation;
pub mod spark;
pub mod star;
pub mod surface;
pub mod testing;
