mod apply;
mod classify;
mod config;
mod exiftool_reader;
mod planner;
mod timestamp;

pub use apply::{apply_plan, undo_last, ApplyFailure, ApplyResult, UndoResult};
pub use classify::{ClassifyRules, MediaKind, NamingStyle};
pub use config::{app_paths, load_config, save_config, AppConfig, AppPaths};
pub use exiftool_reader::{
    datetime_tag_candidates, resolve_datetime, ExifToolSession, MetadataProvider, TagMap,
};
pub use planner::{
    generate_plan, PlanOptions, RenameCandidate, RenamePlan, RenameStats, SkipReason, SkippedFile,
};
pub use timestamp::{canonical_token, TimestampError};
