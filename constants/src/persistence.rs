/// Local storage key holding the last session state.
pub const STATE_STORAGE_KEY: &str = "hypercube.state";

/// Local storage key holding the user's saved collection.
pub const COLLECTION_STORAGE_KEY: &str = "hypercube.collection";

/// URL query parameter carrying a share code.
pub const SHARE_QUERY_PARAM: &str = "state";

/// Fixed tag identifying collection documents.
pub const COLLECTION_TYPE_TAG: &str = "hypercube-collection";

pub const STATE_FORMAT_VERSION: u32 = 1;
pub const SHARE_FORMAT_VERSION: u32 = 1;
pub const COLLECTION_FORMAT_VERSION: u32 = 1;

/// Seconds without parameter changes before the state is written back.
pub const SAVE_DEBOUNCE_SECS: f32 = 0.75;

/// Preset collection shipped as a JSON asset.
pub const PRESET_COLLECTION_PATH: &str = "collections/presets.collection.json";
