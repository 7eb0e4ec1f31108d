//! Versioned parameter state shared by interaction, engines and persistence.
//!
//! ```text
//! InteractionRouter / RPC / restore
//!   └─> ParameterStore::set | set_many | replace   (clamp via range table)
//!       ├─> version++
//!       └─> listeners (synchronous, once per call)
//!           └─> PendingSnapshot ──> forward_parameter_changes (once per frame)
//! ```

/// Channel names, range lookup and clamping.
pub mod channel;

/// Full snapshots and partial patches.
pub mod parameter_set;

/// The store resource itself.
pub mod store;

pub use channel::{CHANNEL_COUNT, Channel};
pub use parameter_set::{ParameterPatch, ParameterSet};
pub use store::{ListenerId, ParameterStore, SessionRng};
