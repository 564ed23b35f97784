//! NPC actors: configuration, spawning, the per-frame state machine, and the
//! click surface. An NPC owns its mover, clip selector, and conversation
//! engine; cross-NPC and mission side effects leave the actor as [`Hook`]s
//! or [`ConversationEffect`]s for the town to dispatch.

use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::animation::{AnimationRoles, AnimationSelector, ClipConfig};
use crate::conversation::{ConversationEffect, ConversationEngine, ConversationSet};
use crate::events::{EventLog, Hook};
use crate::math::{EulerDeg, Pose, Vec3};
use crate::movement::{MoverPhase, MoverStep, WaypointMover, WaypointSet};
use crate::stage::{EntityId, EntityKind, WorldStage};
use crate::ContentError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NpcVisual {
    /// A rigged avatar with a collider box so the player cannot walk through
    /// it.
    Avatar {
        body_shape: String,
        #[serde(default)]
        wearables: Vec<String>,
    },
    /// A raw model, collider-free (the monster, mostly).
    Model { src: String },
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcConfig {
    pub id: String,
    pub name: String,
    pub start_position: Vec3,
    pub start_rotation: EulerDeg,
    pub visual: NpcVisual,
    #[serde(default = "default_true")]
    pub clickable: bool,
    #[serde(default)]
    pub hover_text: Option<String>,
    /// Half-width of the square volume around the NPC that reports the
    /// player walking up to it. `None` disables proximity entirely.
    #[serde(default)]
    pub proximity_radius: Option<f32>,
    #[serde(default)]
    pub on_proximity: Vec<Hook>,
    #[serde(default)]
    pub animations: Vec<ClipConfig>,
    #[serde(default)]
    pub default_animation: Option<String>,
    #[serde(default)]
    pub roles: AnimationRoles,
    #[serde(default)]
    pub waypoint_sets: Vec<WaypointSet>,
    #[serde(default)]
    pub conversation_sets: Vec<ConversationSet>,
    /// One-shot flavor lines shown when the NPC is clicked with no
    /// conversation armed.
    #[serde(default)]
    pub flavor_lines: Vec<String>,
    /// Inventory handed over the first time the player clicks this NPC.
    #[serde(default)]
    pub items_to_give: Vec<String>,
}

impl NpcConfig {
    pub fn validate(&self) -> Result<(), ContentError> {
        for set in &self.waypoint_sets {
            set.validate()?;
        }
        for set in &self.conversation_sets {
            set.validate()?;
        }
        if let Some(clip) = &self.default_animation {
            if !self.animations.iter().any(|c| &c.name == clip) {
                return Err(ContentError::UnknownDefaultClip {
                    npc: self.id.clone(),
                    clip: clip.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Which clip role the locomotion state maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClipRole {
    Idle,
    Walk,
    Run,
    Talk,
}

/// Routes at or above this speed play the run clip instead of the walk clip.
const RUN_SPEED: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NpcState {
    Idle,
    Moving,
    Waiting,
    Talking,
}

/// Outcome of a player click, for the town to route.
#[derive(Debug, PartialEq)]
pub enum ClickOutcome {
    /// An armed or in-flight conversation advanced.
    Conversation(Vec<ConversationEffect>),
    /// No conversation armed; show this one-shot flavor line.
    Flavor { text: String },
    Ignored,
}

/// Source of the index used to pick a flavor line. Injectable so tests can
/// pin the pick.
pub trait LinePicker {
    fn pick(&mut self, len: usize) -> usize;
}

pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn seeded(seed: u64) -> Self {
        RandomPicker {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl LinePicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// The conversation surface the mailbox drives. Exactly these three verbs;
/// everything else about a conversation happens through content hooks.
pub trait Conversant {
    fn show_next_dialog(&mut self, events: &mut EventLog) -> Vec<ConversationEffect>;
    fn jump_to_dialog(&mut self, dialog_id: &str, events: &mut EventLog)
        -> Vec<ConversationEffect>;
    fn end_conversation(&mut self, events: &mut EventLog) -> Vec<ConversationEffect>;
}

#[derive(Debug)]
pub struct Npc {
    id: String,
    name: String,
    pub pose: Pose,
    state: NpcState,
    visual_entity: EntityId,
    collider_entity: Option<EntityId>,
    mover: WaypointMover,
    waypoint_sets: std::collections::BTreeMap<String, WaypointSet>,
    clips: AnimationSelector,
    roles: AnimationRoles,
    dialog: ConversationEngine,
    flavor_lines: Vec<String>,
    items_to_give: Vec<String>,
    items_given: bool,
    clickable: bool,
    pub(crate) proximity_radius: Option<f32>,
    pub(crate) player_inside: bool,
    pub(crate) on_proximity: Vec<Hook>,
}

impl Npc {
    /// Places the NPC on the stage and starts its default clip. The config
    /// must already be validated.
    pub fn spawn(config: NpcConfig, stage: &mut WorldStage, events: &mut EventLog) -> Npc {
        let pose = Pose::new(config.start_position, config.start_rotation);
        let visual_entity = stage.spawn(
            EntityKind::NpcVisual,
            config.id.clone(),
            pose.position,
            pose.rotation,
            Vec3::new(1.0, 1.0, 1.0),
        );
        let collider_entity = match &config.visual {
            NpcVisual::Avatar { .. } => Some(stage.spawn(
                EntityKind::NpcCollider,
                format!("{}.collider", config.id),
                pose.position,
                pose.rotation,
                Vec3::new(0.8, 1.9, 0.8),
            )),
            NpcVisual::Model { .. } => None,
        };
        let mut clips = AnimationSelector::new(&config.animations);
        if let Some(default) = &config.default_animation {
            if clips.play(default, None, None, false) {
                events.push(format!("clip.play {} {default}", config.id));
            }
        }
        let mut waypoint_sets = std::collections::BTreeMap::new();
        for set in config.waypoint_sets {
            waypoint_sets.insert(set.id.clone(), set);
        }
        events.push(format!("npc.spawn {}", config.id));
        Npc {
            id: config.id,
            name: config.name,
            pose,
            state: NpcState::Idle,
            visual_entity,
            collider_entity,
            mover: WaypointMover::new(),
            waypoint_sets,
            clips,
            roles: config.roles,
            dialog: ConversationEngine::new(config.conversation_sets),
            flavor_lines: config.flavor_lines,
            items_to_give: config.items_to_give,
            items_given: false,
            clickable: config.clickable,
            proximity_radius: config.proximity_radius,
            player_inside: false,
            on_proximity: config.on_proximity,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> NpcState {
        self.state
    }

    pub fn active_waypoint_set(&self) -> Option<&str> {
        self.mover.active_set()
    }

    pub fn current_clip(&self) -> Option<&str> {
        self.clips.current()
    }

    pub fn has_conversation_pending(&self) -> bool {
        self.dialog.has_pending()
    }

    /// One frame of movement. Talking freezes the mover in place; it picks
    /// back up when the conversation ends. Returned hooks are completion
    /// hooks for the town to dispatch before the next NPC updates.
    pub fn update(&mut self, dt: f32, stage: &mut WorldStage, events: &mut EventLog) -> Vec<Hook> {
        if self.state == NpcState::Talking {
            return Vec::new();
        }
        let mut hooks = Vec::new();
        match self.mover.advance(dt, &mut self.pose) {
            MoverStep::Idle => {}
            MoverStep::Moving | MoverStep::Arrived { .. } => {
                self.sync_stage(stage);
            }
            MoverStep::Completed { set, hooks: fired } => {
                self.sync_stage(stage);
                events.push(format!("waypoint.complete {} {set}", self.id));
                hooks = fired;
            }
        }
        let next_state = match self.mover.phase() {
            MoverPhase::Idle => NpcState::Idle,
            MoverPhase::Moving => NpcState::Moving,
            MoverPhase::Waiting => NpcState::Waiting,
        };
        if next_state != self.state {
            self.state = next_state;
            match next_state {
                NpcState::Moving => self.play_role(self.locomotion_role(), events),
                NpcState::Idle | NpcState::Waiting => self.play_role(ClipRole::Idle, events),
                NpcState::Talking => {}
            }
        }
        hooks
    }

    /// Puts the NPC on one of its routes. Unknown sets are logged no-ops.
    pub fn start_waypoint_set(&mut self, set_id: &str, events: &mut EventLog) -> bool {
        let Some(set) = self.waypoint_sets.get(set_id) else {
            warn!("npc `{}` has no waypoint set `{set_id}`", self.id);
            events.push(format!("waypoint.missing {} {set_id}", self.id));
            return false;
        };
        self.mover.start(set.clone(), self.pose.position);
        if self.state != NpcState::Talking {
            self.state = NpcState::Moving;
            self.play_role(self.locomotion_role(), events);
        }
        events.push(format!("waypoint.start {} {set_id}", self.id));
        true
    }

    /// Halts the current route without firing its completion hooks.
    pub fn stop_movement(&mut self, events: &mut EventLog) {
        if !self.mover.is_active() {
            return;
        }
        self.mover.stop();
        events.push(format!("waypoint.stop {}", self.id));
        if self.state != NpcState::Talking {
            self.state = NpcState::Idle;
            self.play_role(ClipRole::Idle, events);
        }
    }

    /// Hard reposition, keeping stage entities in sync.
    pub fn teleport_to(&mut self, position: Vec3, rotation: Option<EulerDeg>, stage: &mut WorldStage) {
        self.pose.position = position;
        if let Some(rotation) = rotation {
            self.pose.rotation = rotation;
        }
        self.sync_stage(stage);
    }

    pub fn play_clip(&mut self, clip: &str, restart: bool, events: &mut EventLog) {
        if self.clips.play(clip, None, None, restart) {
            events.push(format!("clip.play {} {clip}", self.id));
        } else if !self.clips.has_clip(clip) {
            warn!("npc `{}` has no clip `{clip}`", self.id);
            events.push(format!("clip.missing {} {clip}", self.id));
        }
    }

    /// Arms a conversation for the next click.
    pub fn prepare_conversation(&mut self, set_id: &str, events: &mut EventLog) -> bool {
        if self.dialog.prepare(set_id) {
            events.push(format!("dialog.prepare {} {set_id}", self.id));
            true
        } else {
            warn!("npc `{}` has no conversation set `{set_id}`", self.id);
            events.push(format!("dialog.missing {} {set_id}", self.id));
            false
        }
    }

    /// Opens a conversation immediately.
    pub fn start_conversation(
        &mut self,
        set_id: &str,
        events: &mut EventLog,
    ) -> Vec<ConversationEffect> {
        match self.dialog.start(set_id) {
            Some(effects) => {
                events.push(format!("dialog.start {} {set_id}", self.id));
                self.enter_talking(events);
                effects
            }
            None => {
                warn!("npc `{}` has no conversation set `{set_id}`", self.id);
                events.push(format!("dialog.missing {} {set_id}", self.id));
                Vec::new()
            }
        }
    }

    pub fn on_clicked(
        &mut self,
        picker: &mut dyn LinePicker,
        events: &mut EventLog,
    ) -> ClickOutcome {
        if !self.clickable {
            return ClickOutcome::Ignored;
        }
        self.give_items(events);
        if self.dialog.has_pending() {
            if self.dialog.is_prepared() {
                if let Some(set) = self.dialog.active_set() {
                    events.push(format!("dialog.start {} {set}", self.id));
                }
                self.enter_talking(events);
            }
            let set = self.dialog.active_set().map(str::to_string);
            let effects = self.dialog.show_next();
            self.settle_after_dialog(set, events);
            return ClickOutcome::Conversation(effects);
        }
        if self.flavor_lines.is_empty() {
            return ClickOutcome::Ignored;
        }
        let index = picker.pick(self.flavor_lines.len());
        events.push(format!("npc.flavor {} {index}", self.id));
        ClickOutcome::Flavor {
            text: self.flavor_lines[index].clone(),
        }
    }

    fn give_items(&mut self, events: &mut EventLog) {
        if self.items_given || self.items_to_give.is_empty() {
            return;
        }
        self.items_given = true;
        events.push(format!("npc.items {} {}", self.id, self.items_to_give.join(",")));
    }

    fn enter_talking(&mut self, events: &mut EventLog) {
        if self.state != NpcState::Talking {
            self.state = NpcState::Talking;
            self.play_role(ClipRole::Talk, events);
        }
    }

    fn leave_talking(&mut self, events: &mut EventLog) {
        if self.state == NpcState::Talking {
            self.state = NpcState::Idle;
            self.play_role(ClipRole::Idle, events);
        }
    }

    fn play_role(&mut self, role: ClipRole, events: &mut EventLog) {
        let clip = match role {
            ClipRole::Idle => self.roles.idle.clone(),
            ClipRole::Walk => self.roles.walk.clone(),
            // A fast route on an NPC with no run clip still walks.
            ClipRole::Run => self.roles.run.clone().or_else(|| self.roles.walk.clone()),
            ClipRole::Talk => self.roles.talk.clone(),
        };
        if let Some(clip) = clip {
            if self.clips.play(&clip, None, None, false) {
                events.push(format!("clip.play {} {clip}", self.id));
            }
        }
    }

    fn locomotion_role(&self) -> ClipRole {
        match self.mover.move_speed() {
            Some(speed) if speed >= RUN_SPEED => ClipRole::Run,
            _ => ClipRole::Walk,
        }
    }

    /// Logs the end of `set` if the engine just consumed it and drops out of
    /// the talking state. Natural exhaustion and a forced close both funnel
    /// through here, so `dialog.end` is logged exactly once either way.
    fn settle_after_dialog(&mut self, set: Option<String>, events: &mut EventLog) {
        if self.dialog.has_pending() {
            return;
        }
        if let Some(set) = set {
            events.push(format!("dialog.end {} {set}", self.id));
        }
        self.leave_talking(events);
    }

    fn sync_stage(&self, stage: &mut WorldStage) {
        stage.set_pose(self.visual_entity, self.pose.position, self.pose.rotation);
        if let Some(collider) = self.collider_entity {
            stage.set_position(collider, self.pose.position);
        }
    }

    /// Tears the NPC off the stage, collider included. Consuming the actor
    /// keeps a despawned id from being updated or clicked afterwards.
    pub fn despawn(self, stage: &mut WorldStage, events: &mut EventLog) {
        stage.remove(self.visual_entity);
        if let Some(collider) = self.collider_entity {
            stage.remove(collider);
        }
        events.push(format!("npc.despawn {}", self.id));
    }
}

impl Conversant for Npc {
    fn show_next_dialog(&mut self, events: &mut EventLog) -> Vec<ConversationEffect> {
        let set = self.dialog.active_set().map(str::to_string);
        let effects = self.dialog.show_next();
        self.settle_after_dialog(set, events);
        effects
    }

    fn jump_to_dialog(
        &mut self,
        dialog_id: &str,
        events: &mut EventLog,
    ) -> Vec<ConversationEffect> {
        let set = self.dialog.active_set().map(str::to_string);
        let effects = self.dialog.jump_to(dialog_id);
        self.settle_after_dialog(set, events);
        effects
    }

    fn end_conversation(&mut self, events: &mut EventLog) -> Vec<ConversationEffect> {
        let set = self.dialog.active_set().map(str::to_string);
        let effects = self.dialog.end_conversation();
        self.settle_after_dialog(set, events);
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{DialogLine, Speaker};
    use crate::math::{euler_y, vec3};
    use crate::movement::Waypoint;

    struct FixedPicker(usize);

    impl LinePicker for FixedPicker {
        fn pick(&mut self, len: usize) -> usize {
            self.0.min(len - 1)
        }
    }

    fn walker_config() -> NpcConfig {
        NpcConfig {
            id: "walker".into(),
            name: "Walker".into(),
            start_position: Vec3::ZERO,
            start_rotation: euler_y(0.0),
            visual: NpcVisual::Avatar {
                body_shape: "urn:body".into(),
                wearables: vec![],
            },
            clickable: true,
            hover_text: Some("Talk".into()),
            proximity_radius: None,
            on_proximity: vec![],
            animations: vec![ClipConfig::named("Idle"), ClipConfig::named("Walk")],
            default_animation: Some("Idle".into()),
            roles: AnimationRoles {
                idle: Some("Idle".into()),
                walk: Some("Walk".into()),
                run: None,
                talk: None,
            },
            waypoint_sets: vec![WaypointSet {
                id: "stroll".into(),
                waypoints: vec![Waypoint {
                    position: vec3(4.0, 0.0, 0.0),
                    rotation: euler_y(90.0),
                    wait_time: 0.0,
                }],
                loop_route: false,
                move_speed: 2.0,
                on_complete: vec![],
            }],
            conversation_sets: vec![],
            flavor_lines: vec!["Nice night.".into(), "Leave me be.".into()],
            items_to_give: vec!["key".into()],
        }
    }

    #[test]
    fn walking_switches_clips_and_syncs_the_stage() {
        let mut stage = WorldStage::new();
        let mut events = EventLog::new();
        let mut npc = Npc::spawn(walker_config(), &mut stage, &mut events);
        assert_eq!(npc.current_clip(), Some("Idle"));
        assert!(npc.start_waypoint_set("stroll", &mut events));
        assert_eq!(npc.current_clip(), Some("Walk"));
        npc.update(1.0, &mut stage, &mut events);
        assert_eq!(npc.pose.position, vec3(2.0, 0.0, 0.0));
        npc.update(1.0, &mut stage, &mut events);
        assert_eq!(npc.state(), NpcState::Idle);
        assert_eq!(npc.current_clip(), Some("Idle"));
        assert!(events.contains("waypoint.complete walker stroll"));
        // Stage entity followed the pose.
        let (_, visual) = stage
            .entities()
            .find(|(_, e)| e.label == "walker")
            .unwrap();
        assert_eq!(visual.position, vec3(4.0, 0.0, 0.0));
        assert_eq!(visual.rotation, euler_y(90.0));
    }

    #[test]
    fn unknown_waypoint_set_is_a_logged_no_op() {
        let mut stage = WorldStage::new();
        let mut events = EventLog::new();
        let mut npc = Npc::spawn(walker_config(), &mut stage, &mut events);
        assert!(!npc.start_waypoint_set("bogus", &mut events));
        assert_eq!(npc.state(), NpcState::Idle);
        assert!(events.contains("waypoint.missing walker bogus"));
    }

    #[test]
    fn click_without_conversation_picks_a_flavor_line() {
        let mut stage = WorldStage::new();
        let mut events = EventLog::new();
        let mut npc = Npc::spawn(walker_config(), &mut stage, &mut events);
        let mut picker = FixedPicker(1);
        match npc.on_clicked(&mut picker, &mut events) {
            ClickOutcome::Flavor { text } => assert_eq!(text, "Leave me be."),
            other => panic!("expected flavor line, got {other:?}"),
        }
    }

    #[test]
    fn items_are_given_exactly_once() {
        let mut stage = WorldStage::new();
        let mut events = EventLog::new();
        let mut npc = Npc::spawn(walker_config(), &mut stage, &mut events);
        let mut picker = FixedPicker(0);
        npc.on_clicked(&mut picker, &mut events);
        npc.on_clicked(&mut picker, &mut events);
        assert_eq!(events.count_of("npc.items walker key"), 1);
    }

    #[test]
    fn unclickable_npc_ignores_clicks() {
        let mut stage = WorldStage::new();
        let mut events = EventLog::new();
        let mut config = walker_config();
        config.clickable = false;
        let mut npc = Npc::spawn(config, &mut stage, &mut events);
        let mut picker = FixedPicker(0);
        assert_eq!(npc.on_clicked(&mut picker, &mut events), ClickOutcome::Ignored);
        assert!(!events.contains("npc.items walker key"));
    }

    #[test]
    fn stop_movement_goes_idle_without_completion() {
        let mut stage = WorldStage::new();
        let mut events = EventLog::new();
        let mut npc = Npc::spawn(walker_config(), &mut stage, &mut events);
        npc.start_waypoint_set("stroll", &mut events);
        npc.update(0.5, &mut stage, &mut events);
        npc.stop_movement(&mut events);
        assert_eq!(npc.state(), NpcState::Idle);
        assert!(npc.active_waypoint_set().is_none());
        assert!(!events.contains("waypoint.complete walker stroll"));
    }

    fn say(speaker: Speaker, text: &str, next: Option<&str>) -> DialogLine {
        DialogLine {
            speaker,
            text: text.into(),
            next_dialog_id: next.map(str::to_string),
            actions: vec![],
            player_choices: vec![],
        }
    }

    fn gossip_config() -> NpcConfig {
        let mut config = walker_config();
        config.conversation_sets = vec![ConversationSet {
            id: "gossip".into(),
            start_dialog_id: "g1".into(),
            dialogs: [
                ("g1".to_string(), say(Speaker::Npc, "Cold out.", Some("g2"))),
                ("g2".to_string(), say(Speaker::Player, "Sure is.", None)),
            ]
            .into_iter()
            .collect(),
            on_complete: vec![],
        }];
        config
    }

    #[test]
    fn advancing_past_the_last_line_ends_the_conversation_once() {
        let mut stage = WorldStage::new();
        let mut events = EventLog::new();
        let mut npc = Npc::spawn(gossip_config(), &mut stage, &mut events);
        let mut picker = FixedPicker(0);
        npc.prepare_conversation("gossip", &mut events);
        npc.on_clicked(&mut picker, &mut events);
        assert_eq!(npc.state(), NpcState::Talking);
        npc.show_next_dialog(&mut events);
        assert!(!events.contains("dialog.end walker gossip"));
        let effects = npc.show_next_dialog(&mut events);
        assert!(effects
            .iter()
            .any(|e| matches!(e, ConversationEffect::Close)));
        assert_eq!(events.count_of("dialog.end walker gossip"), 1);
        assert_eq!(npc.state(), NpcState::Idle);
        // A later forced close has nothing left to end.
        npc.end_conversation(&mut events);
        assert_eq!(events.count_of("dialog.end walker gossip"), 1);
    }

    #[test]
    fn force_closing_mid_conversation_logs_the_same_end_line() {
        let mut stage = WorldStage::new();
        let mut events = EventLog::new();
        let mut npc = Npc::spawn(gossip_config(), &mut stage, &mut events);
        let mut picker = FixedPicker(0);
        npc.prepare_conversation("gossip", &mut events);
        npc.on_clicked(&mut picker, &mut events);
        npc.end_conversation(&mut events);
        assert_eq!(events.count_of("dialog.end walker gossip"), 1);
        assert_eq!(npc.state(), NpcState::Idle);
    }

    #[test]
    fn fast_routes_play_the_run_clip() {
        let mut stage = WorldStage::new();
        let mut events = EventLog::new();
        let mut config = walker_config();
        config.animations.push(ClipConfig::named("Run"));
        config.roles.run = Some("Run".into());
        config.waypoint_sets.push(WaypointSet {
            id: "bolt".into(),
            waypoints: vec![Waypoint {
                position: vec3(12.0, 0.0, 0.0),
                rotation: euler_y(0.0),
                wait_time: 0.0,
            }],
            loop_route: false,
            move_speed: 6.0,
            on_complete: vec![],
        });
        let mut npc = Npc::spawn(config, &mut stage, &mut events);
        npc.start_waypoint_set("bolt", &mut events);
        assert_eq!(npc.current_clip(), Some("Run"));
        npc.update(3.0, &mut stage, &mut events);
        assert_eq!(npc.state(), NpcState::Idle);
        assert_eq!(npc.current_clip(), Some("Idle"));
        // The slow stroll still walks.
        npc.start_waypoint_set("stroll", &mut events);
        assert_eq!(npc.current_clip(), Some("Walk"));
    }

    #[test]
    fn despawn_removes_visual_and_collider() {
        let mut stage = WorldStage::new();
        let mut events = EventLog::new();
        let npc = Npc::spawn(walker_config(), &mut stage, &mut events);
        assert_eq!(stage.count_of(EntityKind::NpcVisual), 1);
        assert_eq!(stage.count_of(EntityKind::NpcCollider), 1);
        npc.despawn(&mut stage, &mut events);
        assert_eq!(stage.count_of(EntityKind::NpcVisual), 0);
        assert_eq!(stage.count_of(EntityKind::NpcCollider), 0);
        assert!(events.contains("npc.despawn walker"));
    }
}
