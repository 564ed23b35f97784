//! Checkpoint bookkeeping for the temple climb: the last checkpoint the
//! player touched, which direction the climb is rigged for, and the respawn
//! pose a fall teleports them to. Zone install and removal lives in the town;
//! this tracker is the ground truth the town consults.

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// One authored checkpoint volume plus where a fall from it puts the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointZoneDef {
    pub name: String,
    pub pos: Vec3,
    pub scale: Vec3,
    pub respawn_pos: Vec3,
    pub respawn_look_at: Vec3,
}

/// A plain positioned box, for the fixed service volumes around the climb.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneBox {
    pub pos: Vec3,
    pub scale: Vec3,
}

/// Everything the town needs to rig the climb in either direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointPlan {
    /// Checkpoints for the ascent, bottom to top.
    pub up: Vec<CheckpointZoneDef>,
    /// Checkpoints for the descent, top to bottom.
    pub down: Vec<CheckpointZoneDef>,
    /// Direction-flip volume at the top landing, used while headed up.
    pub reverse_up: ZoneBox,
    /// Direction-flip volume at the bottom landing, used while headed down.
    pub reverse_down: ZoneBox,
    /// The big catch volume under the climb.
    pub fall: ZoneBox,
    /// Where the fall volume sits while the upper path is active.
    pub fall_upper_pos: Vec3,
    /// Volume that toggles the fall zone between its two heights.
    pub upper_toggle: ZoneBox,
    /// Where the toggle volume moves once the upper fall zone is active.
    pub upper_toggle_alt_pos: Vec3,
    /// Stepping here tears the respawn machinery down.
    pub disable: ZoneBox,
}

#[derive(Debug)]
pub struct CheckpointTracker {
    current: Option<String>,
    respawn_pos: Vec3,
    respawn_look_at: Vec3,
    armed: bool,
    headed_up: bool,
    upper_fall_active: bool,
}

impl Default for CheckpointTracker {
    fn default() -> Self {
        CheckpointTracker {
            current: None,
            respawn_pos: Vec3::ZERO,
            respawn_look_at: Vec3::ZERO,
            armed: false,
            headed_up: true,
            upper_fall_active: false,
        }
    }
}

impl CheckpointTracker {
    pub fn new() -> Self {
        CheckpointTracker::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// True once the player has touched any checkpoint; falls only teleport
    /// while armed.
    pub fn armed(&self) -> bool {
        self.armed
    }

    pub fn headed_up(&self) -> bool {
        self.headed_up
    }

    pub fn upper_fall_active(&self) -> bool {
        self.upper_fall_active
    }

    /// Records a checkpoint touch. Re-touching the current checkpoint is a
    /// no-op and returns false, so bouncing inside one volume cannot spam
    /// the log.
    pub fn set_checkpoint(&mut self, name: &str, respawn_pos: Vec3, respawn_look_at: Vec3) -> bool {
        if self.current.as_deref() == Some(name) {
            return false;
        }
        self.current = Some(name.to_string());
        self.respawn_pos = respawn_pos;
        self.respawn_look_at = respawn_look_at;
        self.armed = true;
        true
    }

    pub fn respawn_pose(&self) -> (Vec3, Vec3) {
        (self.respawn_pos, self.respawn_look_at)
    }

    /// Flips the climb direction and forgets the current checkpoint, so the
    /// first volume of the new direction always registers.
    pub fn reverse(&mut self) -> bool {
        self.headed_up = !self.headed_up;
        self.current = None;
        self.headed_up
    }

    pub fn set_upper_fall_active(&mut self, active: bool) {
        self.upper_fall_active = active;
    }

    /// Full teardown when the player leaves the climb. The respawn pose
    /// returns to the zeroed default, so a later respawn call cannot reuse a
    /// stale checkpoint pose.
    pub fn disarm(&mut self) {
        self.armed = false;
        self.current = None;
        self.respawn_pos = Vec3::ZERO;
        self.respawn_look_at = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3;

    fn touch(tracker: &mut CheckpointTracker, name: &str, respawn_y: f32) -> bool {
        tracker.set_checkpoint(
            name,
            vec3(1.0, respawn_y, 1.0),
            vec3(0.0, respawn_y, 5.0),
        )
    }

    #[test]
    fn retouching_the_same_checkpoint_is_a_no_op() {
        let mut tracker = CheckpointTracker::new();
        assert!(!tracker.armed());
        assert!(touch(&mut tracker, "ledge1", 30.0));
        assert!(!touch(&mut tracker, "ledge1", 30.0));
        assert!(touch(&mut tracker, "ledge2", 34.0));
        assert!(touch(&mut tracker, "ledge1", 30.0));
        assert_eq!(tracker.respawn_pose().0, vec3(1.0, 30.0, 1.0));
    }

    #[test]
    fn double_reversal_restores_the_original_direction() {
        let mut tracker = CheckpointTracker::new();
        touch(&mut tracker, "summit", 46.0);
        assert!(tracker.headed_up());
        assert!(!tracker.reverse());
        // Direction flip forgets the checkpoint id, not the armed flag.
        assert!(tracker.armed());
        assert_eq!(tracker.current(), None);
        assert!(tracker.reverse());
        assert!(tracker.headed_up());
    }

    #[test]
    fn disarm_clears_everything() {
        let mut tracker = CheckpointTracker::new();
        touch(&mut tracker, "ledge1", 30.0);
        tracker.disarm();
        assert!(!tracker.armed());
        assert_eq!(tracker.current(), None);
        // Respawning with nothing stored falls back to the default pose.
        assert_eq!(tracker.respawn_pose(), (Vec3::ZERO, Vec3::ZERO));
    }
}
