//! User-facing console output.

pub mod formatter;

pub use formatter::{
    display_error, display_release, display_status, display_success, release_summary,
};
