//! Motion sensor routing.
//!
//! Samples bypass the widget layer entirely and go straight to the event sink
//! through [`router::MotionRouter`].

pub mod router;

pub use router::{MotionRouter, SensorSample};
