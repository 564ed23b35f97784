//! Axis-aligned trigger volumes with enter-edge detection. Zones carry a
//! [`ZoneTrigger`] payload; the town decides what each payload means.

use serde::{Deserialize, Serialize};

use crate::math::Vec3;
use crate::stage::{EntityId, EntityKind, WorldStage};

/// What stepping into a zone means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ZoneTrigger {
    /// The player reached the girl's house; kicks the story off.
    GirlHouse,
    /// Progress marker along the temple climb.
    Checkpoint {
        id: String,
        respawn_pos: Vec3,
        respawn_look_at: Vec3,
    },
    /// The player fell off the climb; teleport them back.
    Fall,
    /// Leaving the climb area turns the respawn machinery off.
    DisableCheckpoints,
    /// The landing at either end of the climb flips the checkpoint
    /// direction.
    ReverseCheckpoints,
    /// Walking the upper path toggles the raised fall volume.
    ToggleUpperFallZone,
}

#[derive(Debug)]
pub struct TriggerZone {
    pub entity: EntityId,
    pub name: String,
    center: Vec3,
    scale: Vec3,
    pub trigger: ZoneTrigger,
    inside: bool,
}

impl TriggerZone {
    fn contains(&self, point: Vec3) -> bool {
        (point.x - self.center.x).abs() <= self.scale.x / 2.0
            && (point.y - self.center.y).abs() <= self.scale.y / 2.0
            && (point.z - self.center.z).abs() <= self.scale.z / 2.0
    }
}

/// An enter edge: the player was outside last frame and inside now.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneEntry {
    pub entity: EntityId,
    pub name: String,
    pub trigger: ZoneTrigger,
}

#[derive(Debug, Default)]
pub struct ZoneRuntime {
    zones: Vec<TriggerZone>,
}

impl ZoneRuntime {
    pub fn new() -> Self {
        ZoneRuntime::default()
    }

    pub fn install(
        &mut self,
        stage: &mut WorldStage,
        name: impl Into<String>,
        center: Vec3,
        scale: Vec3,
        trigger: ZoneTrigger,
    ) -> EntityId {
        let name = name.into();
        let entity = stage.spawn(
            EntityKind::TriggerVolume,
            name.clone(),
            center,
            Default::default(),
            scale,
        );
        self.zones.push(TriggerZone {
            entity,
            name,
            center,
            scale,
            trigger,
            inside: false,
        });
        entity
    }

    pub fn remove(&mut self, stage: &mut WorldStage, entity: EntityId) -> bool {
        let before = self.zones.len();
        self.zones.retain(|zone| zone.entity != entity);
        stage.remove(entity);
        self.zones.len() != before
    }

    /// Removes every zone whose trigger matches `pred`; returns how many
    /// went.
    pub fn remove_where(
        &mut self,
        stage: &mut WorldStage,
        pred: impl Fn(&ZoneTrigger) -> bool,
    ) -> usize {
        let mut removed = 0;
        self.zones.retain(|zone| {
            if pred(&zone.trigger) {
                stage.remove(zone.entity);
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    /// Moves a zone, keeping its stage entity in step. The inside flag is
    /// reset so the move cannot manufacture an enter edge retroactively.
    pub fn set_center(&mut self, stage: &mut WorldStage, entity: EntityId, center: Vec3) {
        if let Some(zone) = self.zones.iter_mut().find(|z| z.entity == entity) {
            zone.center = center;
            zone.inside = false;
            stage.set_position(entity, center);
        }
    }

    pub fn count_where(&self, pred: impl Fn(&ZoneTrigger) -> bool) -> usize {
        self.zones.iter().filter(|z| pred(&z.trigger)).count()
    }

    pub fn find_entity(&self, pred: impl Fn(&ZoneTrigger) -> bool) -> Option<EntityId> {
        self.zones
            .iter()
            .find(|z| pred(&z.trigger))
            .map(|z| z.entity)
    }

    /// Updates inside flags against the player position and returns the
    /// enter edges, in installation order.
    pub fn update(&mut self, player: Vec3) -> Vec<ZoneEntry> {
        let mut entries = Vec::new();
        for zone in &mut self.zones {
            let inside = zone.contains(player);
            if inside && !zone.inside {
                entries.push(ZoneEntry {
                    entity: zone.entity,
                    name: zone.name.clone(),
                    trigger: zone.trigger.clone(),
                });
            }
            zone.inside = inside;
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3;

    #[test]
    fn enter_edge_fires_once_until_the_player_leaves() {
        let mut stage = WorldStage::new();
        let mut zones = ZoneRuntime::new();
        zones.install(
            &mut stage,
            "porch",
            vec3(10.0, 0.0, 10.0),
            vec3(4.0, 4.0, 4.0),
            ZoneTrigger::GirlHouse,
        );
        assert!(zones.update(vec3(0.0, 0.0, 0.0)).is_empty());
        let entries = zones.update(vec3(10.0, 0.0, 10.0));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].trigger, ZoneTrigger::GirlHouse);
        // Still inside: no new edge.
        assert!(zones.update(vec3(11.0, 1.0, 9.0)).is_empty());
        // Leave and re-enter: a fresh edge.
        assert!(zones.update(vec3(20.0, 0.0, 10.0)).is_empty());
        assert_eq!(zones.update(vec3(10.0, 0.0, 10.0)).len(), 1);
    }

    #[test]
    fn removal_takes_the_stage_entity_too() {
        let mut stage = WorldStage::new();
        let mut zones = ZoneRuntime::new();
        let entity = zones.install(
            &mut stage,
            "fall",
            vec3(0.0, 10.0, 0.0),
            vec3(160.0, 20.0, 160.0),
            ZoneTrigger::Fall,
        );
        assert_eq!(stage.count_of(EntityKind::TriggerVolume), 1);
        assert!(zones.remove(&mut stage, entity));
        assert_eq!(stage.count_of(EntityKind::TriggerVolume), 0);
        assert!(zones.update(vec3(0.0, 10.0, 0.0)).is_empty());
    }

    #[test]
    fn moving_a_zone_resets_its_inside_flag() {
        let mut stage = WorldStage::new();
        let mut zones = ZoneRuntime::new();
        let entity = zones.install(
            &mut stage,
            "toggle",
            vec3(0.0, 0.0, 0.0),
            vec3(2.0, 2.0, 2.0),
            ZoneTrigger::ToggleUpperFallZone,
        );
        assert_eq!(zones.update(Vec3::ZERO).len(), 1);
        zones.set_center(&mut stage, entity, vec3(5.0, 0.0, 0.0));
        // Player walks into the new location: counts as a fresh enter.
        assert_eq!(zones.update(vec3(5.0, 0.0, 0.0)).len(), 1);
        assert_eq!(stage.entity(entity).unwrap().position, vec3(5.0, 0.0, 0.0));
    }
}
