//! Base trait for actions in MVI architecture.

use std::fmt::Debug;

/// Marker trait for action types.
///
/// Actions represent:
/// - User events (button taps, text input)
/// - Effect callbacks (API responses, timers)
/// - Navigation events (presenting and dismissing children)
///
/// Actions are cloned when a composed reducer hands the same action to a
/// child and then to its parent.
pub trait Action: Clone + Debug + Send + 'static {}
