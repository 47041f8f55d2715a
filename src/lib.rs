//! Cannonade — a 2D artillery ballistics sandbox.
//!
//! A cannon fires balls in ballistic arcs under gravity and quadratic drag;
//! balls bounce on the ground with energy loss, settle, display their flight
//! time, and can draw their fitted trajectory curve.

pub mod cannon;
pub mod cannonball;
pub mod config;
pub mod constants;
pub mod error;
pub mod graphics;
pub mod kinematics;
pub mod particles;
pub mod rendering;
pub mod trajectory;
