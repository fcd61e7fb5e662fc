mod builder;
mod detail_cache;
mod models;
mod persistence;
mod snapshot;
mod store;

pub use builder::{build_snapshot, validate_record, BuildError, BuildIssue};
pub use detail_cache::{DetailCache, DEFAULT_DETAIL_CACHE_SIZE};
pub use models::{
    is_url_safe_slug, slugify, Difficulty, Problem, ProblemView, RawId, RawRecord, RawTag, TagRef,
    PROBLEM_URL_PREFIX,
};
pub use persistence::SnapshotFile;
pub use snapshot::{BuildStats, Snapshot};
pub use store::SnapshotStore;
