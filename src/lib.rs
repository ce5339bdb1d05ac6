//! Dialogue Playback: a visual-novel style presentation engine.
//!
//! Plays a pre-generated script line by line with a typewriter reveal,
//! user-paced or timer-paced advancement, a replayable backlog, and a
//! UI-visibility toggle. The engine is single-threaded and never reads a
//! wall clock: hosts pass the current monotonic time into every call.

pub mod core;
pub mod schema;
