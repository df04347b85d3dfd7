//! Motion control: the ramped bidirectional position controller.

pub mod motion;

pub use motion::{Direction, MotionController};
