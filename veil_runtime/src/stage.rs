//! Host-facing world state: the entity ledger and the player transform.
//!
//! The stage never renders anything. It records what exists and where, hands
//! out monotonically increasing handles, and queues fire-and-forget commands
//! (teleports, emotes) for the embedding host to execute.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::math::{EulerDeg, Pose, Vec3};

pub type EntityId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Scenery,
    NpcVisual,
    NpcCollider,
    TriggerVolume,
    Collectable,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageEntity {
    pub kind: EntityKind,
    pub label: String,
    pub position: Vec3,
    pub rotation: EulerDeg,
    pub scale: Vec3,
}

/// Commands the runtime wants the host to carry out this frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HostCommand {
    MovePlayer { position: Vec3, look_at: Vec3 },
    TriggerEmote { emote: String },
}

/// The player as the runtime sees them: a transform plus the identity the
/// host resolves asynchronously after join.
#[derive(Debug, Default)]
pub struct PlayerProfile {
    pub pose: Pose,
    display_name: Option<String>,
}

impl PlayerProfile {
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn resolve_identity(&mut self, display_name: impl Into<String>) {
        self.display_name = Some(display_name.into());
    }
}

#[derive(Debug)]
pub struct WorldStage {
    entities: BTreeMap<EntityId, StageEntity>,
    next_handle: EntityId,
    commands: Vec<HostCommand>,
    player: PlayerProfile,
}

impl Default for WorldStage {
    fn default() -> Self {
        WorldStage {
            entities: BTreeMap::new(),
            next_handle: 1,
            commands: Vec::new(),
            player: PlayerProfile::default(),
        }
    }
}

impl WorldStage {
    pub fn new() -> Self {
        WorldStage::default()
    }

    pub fn spawn(
        &mut self,
        kind: EntityKind,
        label: impl Into<String>,
        position: Vec3,
        rotation: EulerDeg,
        scale: Vec3,
    ) -> EntityId {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.entities.insert(
            handle,
            StageEntity {
                kind,
                label: label.into(),
                position,
                rotation,
                scale,
            },
        );
        handle
    }

    /// Returns false when the handle was already gone; removal is idempotent.
    pub fn remove(&mut self, id: EntityId) -> bool {
        self.entities.remove(&id).is_some()
    }

    pub fn entity(&self, id: EntityId) -> Option<&StageEntity> {
        self.entities.get(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &StageEntity)> {
        self.entities.iter().map(|(id, e)| (*id, e))
    }

    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.entities.values().filter(|e| e.kind == kind).count()
    }

    pub fn set_position(&mut self, id: EntityId, position: Vec3) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.position = position;
        }
    }

    pub fn set_pose(&mut self, id: EntityId, position: Vec3, rotation: EulerDeg) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.position = position;
            entity.rotation = rotation;
        }
    }

    pub fn player(&self) -> &PlayerProfile {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerProfile {
        &mut self.player
    }

    /// Teleports the player and queues the matching host command.
    pub fn move_player(&mut self, position: Vec3, look_at: Vec3) {
        self.player.pose.position = position;
        self.commands.push(HostCommand::MovePlayer { position, look_at });
    }

    /// Queues a predefined avatar emote for the host to play on the player.
    pub fn trigger_emote(&mut self, emote: impl Into<String>) {
        self.commands.push(HostCommand::TriggerEmote {
            emote: emote.into(),
        });
    }

    pub fn drain_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{euler_y, vec3};

    #[test]
    fn handles_are_monotonic_and_stable_across_removal() {
        let mut stage = WorldStage::new();
        let a = stage.spawn(
            EntityKind::Scenery,
            "fountain",
            Vec3::ZERO,
            euler_y(0.0),
            vec3(1.0, 1.0, 1.0),
        );
        let b = stage.spawn(
            EntityKind::Collectable,
            "candle",
            vec3(1.0, 0.0, 0.0),
            euler_y(0.0),
            vec3(1.0, 1.0, 1.0),
        );
        assert!(b > a);
        assert!(stage.remove(b));
        assert!(!stage.remove(b));
        let c = stage.spawn(
            EntityKind::Scenery,
            "lamp",
            Vec3::ZERO,
            euler_y(90.0),
            vec3(1.0, 1.0, 1.0),
        );
        assert!(c > b);
    }

    #[test]
    fn move_player_queues_a_single_command() {
        let mut stage = WorldStage::new();
        stage.move_player(vec3(37.5, 21.0, -19.0), vec3(10.0, 27.0, 9.0));
        assert_eq!(stage.player().pose.position, vec3(37.5, 21.0, -19.0));
        let commands = stage.drain_commands();
        assert_eq!(
            commands,
            vec![HostCommand::MovePlayer {
                position: vec3(37.5, 21.0, -19.0),
                look_at: vec3(10.0, 27.0, 9.0),
            }]
        );
        assert!(stage.drain_commands().is_empty());
    }

    #[test]
    fn emotes_queue_in_order_with_teleports() {
        let mut stage = WorldStage::new();
        stage.move_player(Vec3::ZERO, vec3(0.0, 0.0, 5.0));
        stage.trigger_emote("fistpump");
        let commands = stage.drain_commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands[1],
            HostCommand::TriggerEmote {
                emote: "fistpump".into(),
            }
        );
    }
}
