//! Authored content and a scripted playthrough harness for the town runtime.
//! The binary target drives [`sim::run_playthrough`] and dumps the manifest
//! and event log as JSON artefacts; the integration tests reuse the same
//! driver.

pub mod content;
pub mod sim;
