//! Domain logic - pure release rules independent of the hosting API

pub mod marker;
pub mod release;
pub mod version;

pub use marker::{BumpKind, BumpMarker};
pub use release::{ReleasePlan, INITIAL_VERSION};
pub use version::{Version, VersionBump};
