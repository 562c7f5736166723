//! Base trait for feature state in MVI architecture.

use std::fmt::Debug;

/// Marker trait for feature state.
///
/// States should be:
/// - Clonable (snapshots are taken before each reduction)
/// - Comparable (PartialEq for detecting changes)
/// - Printable (Debug output is used for structural diffs)
pub trait FeatureState: Clone + PartialEq + Debug + Send + Sync + 'static {}
