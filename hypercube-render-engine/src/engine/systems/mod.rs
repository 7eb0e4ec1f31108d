//! Per-frame systems tying the parameter store to the active engine.
//!
//! Switch requests, snapshot forwarding, drawing, shortcuts and FPS reporting.

/// Engine switch requests from RPC, shortcuts and session restore.
pub mod engine_switch;

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to the host page via RPC and updates the native overlay.
pub mod fps_tracking;

/// Native keyboard shortcuts and the parameter actions they share with RPC.
pub mod keyboard;

/// Once-per-frame snapshot delivery to the coordinator.
pub mod parameter_sync;

/// Gizmo drawing of the active adapter's frame.
pub mod render;
