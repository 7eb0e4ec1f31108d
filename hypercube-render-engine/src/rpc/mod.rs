//! JSON-RPC 2.0 bridge to the page hosting the visualizer iframe.
//!
//! Requests carry an `id` and get exactly one response; messages without an
//! `id` are host notifications and are never answered. Unknown methods fail
//! with `-32601`, bad arguments with `-32602`, engine faults with `-32603`.
//!
//! | method                 | params                          | result                              |
//! |------------------------|---------------------------------|-------------------------------------|
//! | `set_parameters`       | `{parameters: {name: value}}`   | snapshot, `version`, `changed`      |
//! | `get_parameters`       |                                 | snapshot, `version`                 |
//! | `randomize` / `reset`  |                                 | snapshot, `version`                 |
//! | `switch_engine`        | `{engine}`                      | `engine`, `already_active`          |
//! | `select_mode`          | `{category, mode}`              | `category`, `mode`, `changed`       |
//! | `import_collection`    | `{document}` or `{json}`        | `imported`, `total`                 |
//! | `export_collection`    |                                 | collection document                 |
//! | `apply_variation`      | `{index}` or `{name}`           | `name`, `engine`                    |
//! | `get_share_code`       |                                 | `code`, `query`                     |
//! | `apply_share_code`     | `{code}`                        | snapshot, `version`, `engine`       |
//! | `get_geometry_catalog` |                                 | bases, cores, current index, cache  |
//! | `get_fps`              |                                 | `fps`                               |
//!
//! Host notifications: `tilt {alpha, beta, gamma}` and `audio_levels {bass, mid, high}`.
//! Outgoing notifications: `engine_changed`, `engine_switch_failed`, `mode_changed`
//! and `fps_update`.

pub mod web_rpc;
