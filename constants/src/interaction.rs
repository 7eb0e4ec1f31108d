/// Effects stop once their magnitude falls below this value.
pub const EFFECT_EPSILON: f32 = 0.01;

/// Per-tick decay multipliers for the animated modes.
pub const BURST_DECAY: f32 = 0.90;
pub const RIPPLE_DECAY: f32 = 0.88;
pub const SWEEP_DECAY: f32 = 0.92;

/// Peak offsets a click burst adds to chaos and speed.
pub const BURST_CHAOS_BOOST: f32 = 0.5;
pub const BURST_SPEED_BOOST: f32 = 1.2;

/// Peak offsets of a click ripple.
pub const RIPPLE_MORPH_AMPLITUDE: f32 = 0.6;
pub const RIPPLE_DENSITY_BOOST: f32 = 12.0;
pub const RIPPLE_HUE_SPREAD: f32 = 60.0;
pub const RIPPLE_PHASE_STEP: f32 = 0.45;

/// Hue degrees gained per scroll line by the sweep mode.
pub const SWEEP_HUE_PER_LINE: f32 = 6.0;
pub const SWEEP_DENSITY_PER_LINE: f32 = 0.8;

/// Accumulated scroll lines required for one geometry step.
pub const CYCLE_STEP_THRESHOLD: f32 = 1.0;

/// Scroll unit conversion for pixel-based wheels.
pub const PIXELS_PER_SCROLL_LINE: f32 = 20.0;

/// Exponential smoothing factor for pointer-driven rotation.
pub const POINTER_ROTATION_SMOOTHING: f32 = 0.3;

/// Samples kept by the velocity mode and the tilt filter.
pub const VELOCITY_HISTORY: usize = 5;
pub const TILT_SMOOTHING_WINDOW: usize = 5;

/// Velocity (normalized units per event) that maps to full chaos.
pub const VELOCITY_FULL_SCALE: f32 = 0.08;

/// Device angle clamps in degrees.
pub const TILT_BETA_LIMIT: f32 = 90.0;
pub const TILT_GAMMA_LIMIT: f32 = 90.0;

/// Fraction of a half turn applied per 90 degrees of tilt.
pub const TILT_SENSITIVITY: f32 = 0.5;
