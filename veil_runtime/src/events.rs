use serde::{Deserialize, Serialize};

use crate::mission::MissionCue;

/// Append-only transcript of everything noteworthy the town does, one dotted
/// lowercase line per event (`"waypoint.complete girl runOutOfHouse"`). The
/// harness dumps it as a JSON artefact and the regression tests grep it.
#[derive(Debug, Default)]
pub struct EventLog {
    lines: Vec<String>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines equal to `line`, mostly used to assert exactly-once
    /// behaviour.
    pub fn count_of(&self, line: &str) -> usize {
        self.lines.iter().filter(|l| l.as_str() == line).count()
    }

    pub fn contains(&self, line: &str) -> bool {
        self.count_of(line) > 0
    }
}

/// Declarative follow-up work attached to content: fired when a waypoint set
/// completes, a dialog line is shown, or a conversation ends. Keeping these
/// as plain data (rather than callbacks) lets the manifest round-trip through
/// serde and keeps authoring errors inspectable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Hook {
    /// Put the named NPC on one of its waypoint routes.
    StartWaypointSet { npc: String, set: String },
    /// Arm a conversation so the next click on the NPC opens it.
    PrepareConversation { npc: String, set: String },
    /// Open a conversation immediately, without waiting for a click.
    StartConversation { npc: String, set: String },
    /// Play one of the NPC's configured clips.
    PlayAnimation {
        npc: String,
        clip: String,
        #[serde(default)]
        restart: bool,
    },
    /// Fire a predefined avatar emote on the player.
    TriggerEmote { emote: String },
    /// Hand a story beat to the mission orchestrator.
    Mission { cue: MissionCue },
}
