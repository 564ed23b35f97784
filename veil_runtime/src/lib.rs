//! Scripted gameplay runtime for a small narrative exploration town.
//!
//! Rendering, physics, and input belong to the embedding host; this crate owns
//! the orchestration layer on top of them: NPCs walking waypoint routes,
//! branching conversation sets, a single global mission state gating world
//! changes, checkpoint respawns on the temple climb, and the timed video gate
//! used for cutscenes. Everything is single threaded and frame stepped: the
//! host calls [`town::Town::update`] once per frame with a delta time and
//! reacts to the commands the town emits.

use thiserror::Error;

pub mod animation;
pub mod checkpoint;
pub mod conversation;
pub mod events;
pub mod math;
pub mod mission;
pub mod movement;
pub mod npc;
pub mod stage;
pub mod town;
pub mod video;
pub mod zones;

/// Authoring mistakes caught while loading a town manifest. All content is
/// validated up front so the frame loop never has to deal with dangling
/// dialog links or empty routes.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("waypoint set `{set}` has no waypoints")]
    EmptyWaypointSet { set: String },
    #[error("waypoint set `{set}` has non-positive move speed {speed}")]
    BadMoveSpeed { set: String, speed: f32 },
    #[error("conversation `{set}` starts at unknown dialog `{dialog}`")]
    UnknownStartDialog { set: String, dialog: String },
    #[error("conversation `{set}` line `{dialog}` links to unknown dialog `{target}`")]
    UnknownDialogTarget {
        set: String,
        dialog: String,
        target: String,
    },
    #[error("conversation `{set}` line `{dialog}` is unreachable from the start line")]
    UnreachableDialog { set: String, dialog: String },
    #[error("duplicate npc id `{npc}`")]
    DuplicateNpc { npc: String },
    #[error("npc `{npc}` default animation `{clip}` is not configured")]
    UnknownDefaultClip { npc: String, clip: String },
}
