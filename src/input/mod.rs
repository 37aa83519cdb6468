//! Hand input: landmark frames and gesture classification
//!
//! The pose estimator hands over one `HandFrame` (or nothing) per detection
//! cycle; `GestureClassifier` turns it into a typed `GestureState`.

mod gesture;
pub mod landmarks;

pub use gesture::{GestureClassifier, GestureKind, GestureState};
pub use landmarks::{Finger, HandFrame, LANDMARK_COUNT};
