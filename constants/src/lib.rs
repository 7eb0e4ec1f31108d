//! Shared compile-time configuration for the hypercube workspace.
//!
//! Everything here is plain data so both the offline geometry tooling and the
//! render engine agree on catalog sizes, channel ranges and tuning values.

/// Polytope catalog dimensions and generation tolerances.
pub mod geometry;

/// Interaction tuning: decay factors, smoothing windows, device angle limits.
pub mod interaction;

/// Parameter channel table with ranges and defaults.
pub mod parameters;

/// Storage keys and document tags for persisted and shared state.
pub mod persistence;

/// Rendering surface ceiling, layer styles and projection constants.
pub mod render_settings;
