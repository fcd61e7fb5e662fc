//! Shared constants for end-to-end tests
//!
//! When the fixture catalog changes, update only this file and fixtures.rs.

// ============================================================================
// Fixture Catalog
// ============================================================================

/// Records served by the mock upstream, including unusable ones
pub const RAW_RECORD_COUNT: usize = 7;

/// Problems that survive validation and deduplication
pub const PROBLEM_COUNT: usize = 5;

pub const TWO_SUM_ID: u32 = 1;
pub const TWO_SUM_SLUG: &str = "two-sum";
pub const TWO_SUM_TITLE: &str = "Two Sum";

pub const ADD_TWO_NUMBERS_ID: u32 = 2;
pub const ADD_TWO_NUMBERS_SLUG: &str = "add-two-numbers";

pub const MEDIAN_ID: u32 = 4;
pub const MEDIAN_SLUG: &str = "median-of-two-sorted-arrays";

pub const THREE_SUM_ID: u32 = 15;
pub const THREE_SUM_SLUG: &str = "3sum";

pub const COMBINE_TABLES_ID: u32 = 175;
pub const COMBINE_TABLES_SLUG: &str = "combine-two-tables";

/// Problems carrying the "array" tag
pub const ARRAY_TAG_COUNT: usize = 3;

/// Distinct tags across the fixture catalog
pub const TAG_COUNT: usize = 10;

// ============================================================================
// Fixture Users
// ============================================================================

/// The only user the mock upstream knows
pub const KNOWN_USER: &str = "alice";

/// A well-formed username the mock upstream does not know
pub const UNKNOWN_USER: &str = "nobody";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Page size used against the mock upstream, small enough to force paging
pub const UPSTREAM_PAGE_SIZE: u32 = 3;

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
