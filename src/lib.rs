//! Touch overlay and motion router for a console emulator front end.
//!
//! Touches on the on-screen widgets become button, stick and touch-screen
//! events, motion sensor samples become motion events. Both end up in an
//! [`controller::EventSink`] owned by the host.

pub mod config;
pub mod controller;
pub mod motion;
pub mod overlay;
pub mod persistence;
pub mod trace;
