//! The town itself: one struct owning the stage, every NPC, the mission
//! director, zones, checkpoints, and the video gate. The host calls
//! [`Town::update`] once per frame and forwards player input (clicks, dialog
//! buttons, position) through the public methods.
//!
//! Update order within a frame is fixed: video gate, then zone edges, then
//! NPCs in registration order. Hooks an NPC emits are dispatched before the
//! next NPC updates, so content never observes a half-applied beat.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::checkpoint::{CheckpointPlan, CheckpointTracker};
use crate::conversation::ConversationEffect;
use crate::events::{EventLog, Hook};
use crate::math::{EulerDeg, Vec3};
use crate::mission::{
    CandleOutcome, DialogSnapshot, MissionCue, MissionDirector, MissionState, RitualItems,
    CANDLE_TARGET,
};
use crate::npc::{ClickOutcome, LinePicker, Npc, NpcConfig, NpcState};
use crate::stage::{EntityId, EntityKind, HostCommand, WorldStage};
use crate::video::{VideoConfig, VideoGate, VideoPhase, VideoReport};
use crate::zones::{ZoneEntry, ZoneRuntime, ZoneTrigger};
use crate::ContentError;

/// Story NPC ids the named beats steer. Content must use the same ids.
pub const GIRL: &str = "girl";
pub const SHOP_KEEPER: &str = "shopKeeper";

fn unit_scale() -> Vec3 {
    Vec3::new(1.0, 1.0, 1.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneryDef {
    pub name: String,
    pub src: String,
    pub pos: Vec3,
    #[serde(default)]
    pub rotation: EulerDeg,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectableSpawn {
    pub name: String,
    pub pos: Vec3,
    #[serde(default)]
    pub rotation: EulerDeg,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
}

/// A simple positioned box, reused for the authored service volumes.
pub use crate::checkpoint::ZoneBox;

/// Everything needed to build the town. Serializable so the whole scenario
/// can be dumped and diffed as an artefact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownContent {
    #[serde(default)]
    pub scenery: Vec<SceneryDef>,
    pub npcs: Vec<NpcConfig>,
    pub girl_house_zone: ZoneBox,
    pub candle_spawns: Vec<CollectableSpawn>,
    pub jar_spawn: CollectableSpawn,
    pub whisper_spawn: CollectableSpawn,
    pub checkpoints: CheckpointPlan,
    pub intro_video: VideoConfig,
    /// Where the intro drops the player, and what they face.
    pub intro_exit_pos: Vec3,
    pub intro_exit_look_at: Vec3,
}

impl TownContent {
    pub fn validate(&self) -> Result<(), ContentError> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for npc in &self.npcs {
            if !seen.insert(npc.id.as_str()) {
                return Err(ContentError::DuplicateNpc {
                    npc: npc.id.clone(),
                });
            }
            npc.validate()?;
        }
        Ok(())
    }
}

pub struct Town {
    stage: WorldStage,
    npcs: BTreeMap<String, Npc>,
    npc_order: Vec<String>,
    director: MissionDirector,
    zones: ZoneRuntime,
    checkpoints: CheckpointTracker,
    plan: CheckpointPlan,
    video: VideoGate,
    events: EventLog,
    picker: Box<dyn LinePicker>,
    candle_spawns: Vec<CollectableSpawn>,
    jar_spawn: CollectableSpawn,
    whisper_spawn: CollectableSpawn,
    intro_exit: (Vec3, Vec3),
    jar_entity: Option<EntityId>,
    whisper_entity: Option<EntityId>,
}

impl Town {
    pub fn new(content: TownContent, picker: Box<dyn LinePicker>) -> Result<Town, ContentError> {
        content.validate()?;
        let mut stage = WorldStage::new();
        let mut events = EventLog::new();
        let mut zones = ZoneRuntime::new();

        for piece in &content.scenery {
            stage.spawn(
                EntityKind::Scenery,
                piece.name.clone(),
                piece.pos,
                piece.rotation,
                piece.scale,
            );
            events.push(format!("scenery.place {}", piece.name));
        }

        let mut npcs = BTreeMap::new();
        let mut npc_order = Vec::new();
        for config in content.npcs {
            npc_order.push(config.id.clone());
            let npc = Npc::spawn(config, &mut stage, &mut events);
            npcs.insert(npc.id().to_string(), npc);
        }

        zones.install(
            &mut stage,
            "girlHouse",
            content.girl_house_zone.pos,
            content.girl_house_zone.scale,
            ZoneTrigger::GirlHouse,
        );

        let mut video = VideoGate::new();
        video.set_video(&content.intro_video);
        events.push(format!("video.queued {}", content.intro_video.src));

        let mut town = Town {
            stage,
            npcs,
            npc_order,
            director: MissionDirector::new(),
            zones,
            checkpoints: CheckpointTracker::new(),
            plan: content.checkpoints,
            video,
            events,
            picker,
            candle_spawns: content.candle_spawns,
            jar_spawn: content.jar_spawn,
            whisper_spawn: content.whisper_spawn,
            intro_exit: (content.intro_exit_pos, content.intro_exit_look_at),
            jar_entity: None,
            whisper_entity: None,
        };
        town.install_climb();
        town.events.push("town.ready".to_string());
        Ok(town)
    }

    // -- frame loop -------------------------------------------------------

    pub fn update(&mut self, dt: f32) {
        let phase_before = self.video.phase();
        let video_done = self.video.update(dt);
        let phase_after = self.video.phase();
        if phase_before != phase_after {
            match phase_after {
                VideoPhase::Playing => {
                    self.events.push(format!("video.play {}", self.video.src()));
                }
                VideoPhase::WaitingAfterEnd if self.video.ended_by_fallback() => {
                    self.events
                        .push(format!("video.fallback {}", self.video.src()));
                }
                _ => {}
            }
        }
        if video_done {
            self.video_complete();
        }

        let player = self.stage.player().pose.position;
        for entry in self.zones.update(player) {
            self.on_zone_entry(entry);
        }

        for id in self.npc_order.clone() {
            let mut proximity_hooks = Vec::new();
            if let Some(npc) = self.npcs.get_mut(&id) {
                if let Some(radius) = npc.proximity_radius {
                    let player = self.stage.player().pose.position;
                    let d = npc.pose.position;
                    let inside = (player.x - d.x).abs() <= radius
                        && (player.z - d.z).abs() <= radius
                        && (player.y - d.y).abs() <= radius * 2.0;
                    if inside && !npc.player_inside {
                        self.events.push(format!("npc.proximity {id}"));
                        proximity_hooks = npc.on_proximity.clone();
                    }
                    npc.player_inside = inside;
                }
            }
            for hook in proximity_hooks {
                self.dispatch_hook(hook);
            }
            let hooks = match self.npcs.get_mut(&id) {
                Some(npc) => npc.update(dt, &mut self.stage, &mut self.events),
                None => Vec::new(),
            };
            for hook in hooks {
                self.dispatch_hook(hook);
            }
        }
    }

    // -- player input -----------------------------------------------------

    pub fn set_player_position(&mut self, position: Vec3) {
        self.stage.player_mut().pose.position = position;
    }

    pub fn resolve_player(&mut self, display_name: &str) {
        self.stage.player_mut().resolve_identity(display_name);
        self.events.push(format!("player.identity {display_name}"));
    }

    pub fn click_npc(&mut self, npc_id: &str) {
        let outcome = match self.npcs.get_mut(npc_id) {
            Some(npc) => npc.on_clicked(self.picker.as_mut(), &mut self.events),
            None => {
                self.unknown_npc(npc_id);
                return;
            }
        };
        match outcome {
            ClickOutcome::Conversation(effects) => self.apply_effects(npc_id, effects),
            ClickOutcome::Flavor { text } => {
                let needs_close = self
                    .director
                    .dialog_owner()
                    .map_or(false, |owner| owner != npc_id);
                if needs_close {
                    self.close_dialog();
                }
                let name = self.npc_display_name(npc_id);
                self.director.open_flavor(npc_id, &name, &text);
                self.events.push(format!("dialog.flavor {npc_id}"));
            }
            ClickOutcome::Ignored => {}
        }
    }

    /// The mailbox "next" button.
    pub fn advance_dialog(&mut self) {
        if !self.director.dialog().active {
            return;
        }
        let Some(owner) = self.director.dialog_owner().map(str::to_string) else {
            return;
        };
        let effects = match self.npcs.get_mut(&owner) {
            Some(npc) => crate::npc::Conversant::show_next_dialog(npc, &mut self.events),
            None => vec![ConversationEffect::Close],
        };
        self.apply_effects(&owner, effects);
    }

    /// A player choice button; jumps the owning conversation.
    pub fn select_dialog_choice(&mut self, next_dialog_id: &str) {
        if !self.director.dialog().active {
            return;
        }
        let Some(owner) = self.director.dialog_owner().map(str::to_string) else {
            return;
        };
        self.events.push(format!("dialog.choice {next_dialog_id}"));
        let effects = match self.npcs.get_mut(&owner) {
            Some(npc) => {
                crate::npc::Conversant::jump_to_dialog(npc, next_dialog_id, &mut self.events)
            }
            None => vec![ConversationEffect::Close],
        };
        self.apply_effects(&owner, effects);
    }

    /// The mailbox close button. The owning conversation is ended first,
    /// then snapshot and ownership clear together.
    pub fn close_dialog(&mut self) {
        let Some(owner) = self.director.take_dialog_owner() else {
            if self.director.dialog().active {
                self.director.clear_dialog();
                self.events.push("dialog.close".to_string());
            }
            return;
        };
        let effects = match self.npcs.get_mut(&owner) {
            Some(npc) => crate::npc::Conversant::end_conversation(npc, &mut self.events),
            None => Vec::new(),
        };
        self.director.clear_dialog();
        self.events.push("dialog.close".to_string());
        for effect in effects {
            match effect {
                ConversationEffect::Hooks(hooks) => {
                    for hook in hooks {
                        self.dispatch_hook(hook);
                    }
                }
                ConversationEffect::Line(_) | ConversationEffect::Close => {}
            }
        }
    }

    pub fn click_candle(&mut self, index: usize) {
        match self.director.record_candle(index) {
            CandleOutcome::Collected {
                entity,
                count,
                complete,
            } => {
                self.stage.remove(entity);
                self.events
                    .push(format!("candle.collected {index} ({count}/{CANDLE_TARGET})"));
                if complete {
                    self.candle_mission_complete();
                }
            }
            CandleOutcome::Ignored => {
                debug!("ignoring candle click {index}");
            }
        }
    }

    pub fn click_jar(&mut self) {
        let Some(entity) = self.jar_entity.take() else {
            return;
        };
        self.stage.remove(entity);
        self.events.push("jar.collected".to_string());
        if self
            .director
            .advance(MissionState::HaveTheJar, Some("TALK TO THE GIRL"), &mut self.events)
        {
            self.prepare_npc_conversation(GIRL, "tellAboutJar");
        }
    }

    pub fn click_whisper(&mut self) {
        let Some(entity) = self.whisper_entity.take() else {
            return;
        };
        self.stage.remove(entity);
        self.events.push("whisper.collected".to_string());
        if self.director.advance(
            MissionState::HaveTheWhisper,
            Some("GTFO THIS GRAVEYARD!"),
            &mut self.events,
        ) {
            self.start_npc_route(GIRL, "runOutOfGraveyard");
        }
    }

    pub fn note_video_report(&mut self, session: u64, report: VideoReport) {
        self.video.note_report(session, report);
    }

    // -- named story beats ------------------------------------------------

    /// The player reached the girl's house; she bolts.
    fn found_girl(&mut self) {
        self.start_npc_route(GIRL, "runOutOfHouse");
    }

    fn candle_mission_init(&mut self) {
        let mut entities = Vec::new();
        for (index, spawn) in self.candle_spawns.iter().enumerate() {
            let entity = self.stage.spawn(
                EntityKind::Collectable,
                format!("{}{index}", spawn.name),
                spawn.pos,
                spawn.rotation,
                spawn.scale,
            );
            entities.push(entity);
        }
        self.events
            .push(format!("candle.spawn {}", entities.len()));
        self.director.register_candles(entities);
        self.start_npc_route(GIRL, "walkToChurch");
    }

    fn candle_mission_complete(&mut self) {
        if self.director.advance(
            MissionState::CandlesCollected,
            Some("TALK TO THE GIRL"),
            &mut self.events,
        ) {
            self.start_npc_route(GIRL, "endTheSearch");
        }
    }

    fn spawn_jar(&mut self) {
        if self.jar_entity.is_some() {
            return;
        }
        let spawn = self.jar_spawn.clone();
        let entity = self.stage.spawn(
            EntityKind::Collectable,
            spawn.name,
            spawn.pos,
            spawn.rotation,
            spawn.scale,
        );
        self.jar_entity = Some(entity);
        self.events.push("jar.spawn".to_string());
    }

    fn spawn_whisper(&mut self) {
        if self.whisper_entity.is_some() {
            return;
        }
        let spawn = self.whisper_spawn.clone();
        let entity = self.stage.spawn(
            EntityKind::Collectable,
            spawn.name,
            spawn.pos,
            spawn.rotation,
            spawn.scale,
        );
        self.whisper_entity = Some(entity);
        self.events.push("whisper.spawn".to_string());
    }

    fn video_complete(&mut self) {
        self.events
            .push(format!("video.complete {}", self.video.src()));
        if self.director.state() == MissionState::IntroPlaying {
            self.director
                .advance(MissionState::ExploringTown, None, &mut self.events);
            let (pos, look_at) = self.intro_exit;
            self.stage.move_player(pos, look_at);
            self.events
                .push(format!("player.move {} {} {}", pos.x, pos.y, pos.z));
        }
    }

    // -- hook and cue dispatch --------------------------------------------

    fn dispatch_hook(&mut self, hook: Hook) {
        match hook {
            Hook::StartWaypointSet { npc, set } => self.start_npc_route(&npc, &set),
            Hook::PrepareConversation { npc, set } => self.prepare_npc_conversation(&npc, &set),
            Hook::StartConversation { npc, set } => {
                let effects = match self.npcs.get_mut(&npc) {
                    Some(actor) => actor.start_conversation(&set, &mut self.events),
                    None => {
                        self.unknown_npc(&npc);
                        return;
                    }
                };
                self.apply_effects(&npc, effects);
            }
            Hook::PlayAnimation { npc, clip, restart } => match self.npcs.get_mut(&npc) {
                Some(actor) => actor.play_clip(&clip, restart, &mut self.events),
                None => self.unknown_npc(&npc),
            },
            Hook::TriggerEmote { emote } => {
                self.stage.trigger_emote(emote.clone());
                self.events.push(format!("player.emote {emote}"));
            }
            Hook::Mission { cue } => self.dispatch_cue(cue),
        }
    }

    fn dispatch_cue(&mut self, cue: MissionCue) {
        match cue {
            MissionCue::FirstMeetingComplete => {
                if self.director.advance(
                    MissionState::FollowingGirl,
                    Some("FOLLOW THE GIRL"),
                    &mut self.events,
                ) {
                    self.start_npc_route(GIRL, "walkToFountain");
                }
            }
            MissionCue::RitualPlanned => {
                if self.director.advance(
                    MissionState::CollectingCandles,
                    Some("COLLECT 7 CANDLES FROM THE CHURCH"),
                    &mut self.events,
                ) {
                    self.candle_mission_init();
                }
            }
            MissionCue::CandlesDelivered => {
                if self.director.advance(
                    MissionState::HeadingToShop,
                    Some("HEAD TO THE SHOP"),
                    &mut self.events,
                ) {
                    self.start_npc_route(GIRL, "walkToShop");
                }
            }
            MissionCue::WaitingOutsideShop => {
                if self.director.advance(
                    MissionState::CheckForFood,
                    Some("TALK TO THE SHOPKEEPER"),
                    &mut self.events,
                ) {
                    self.prepare_npc_conversation(SHOP_KEEPER, "initialShopTalk");
                }
            }
            MissionCue::ShopKeeperGivingJar => {
                if self.director.advance(
                    MissionState::TakeTheJar,
                    Some("TAKE THE JAR"),
                    &mut self.events,
                ) {
                    self.spawn_jar();
                }
            }
            MissionCue::PrepareTheGraveyard => {
                if self.director.advance(
                    MissionState::HeadedToGraveyard,
                    Some("COLLECT THE WHISPER"),
                    &mut self.events,
                ) {
                    self.start_npc_route(GIRL, "walkToGraveyard");
                }
            }
            MissionCue::ArrivedAtGraveyard => {
                if self
                    .director
                    .advance(MissionState::ArrivedAtGraveyard, None, &mut self.events)
                {
                    self.spawn_whisper();
                }
            }
            MissionCue::ThatWasClose => {
                if self.director.advance(
                    MissionState::BackToTheShop,
                    Some("RETURN TO THE SHOP"),
                    &mut self.events,
                ) {
                    self.start_npc_route(GIRL, "backToTheShop");
                }
            }
            MissionCue::CatFoodSecured => {
                if self.director.advance(
                    MissionState::HaveTheCatFood,
                    Some("FOLLOW THE GIRL"),
                    &mut self.events,
                ) {
                    self.director.items_mut().has_food = true;
                    self.events.push("item.collected catFood".to_string());
                    self.director.item_check(&mut self.events);
                    self.start_npc_route(GIRL, "outsideTheShop");
                }
            }
            MissionCue::WriterLead => {
                if self.director.advance(
                    MissionState::HeadedToApartments,
                    Some("FIND THE WRITER"),
                    &mut self.events,
                ) {
                    self.start_npc_route(GIRL, "toTheApartmentBuilding");
                }
            }
            MissionCue::Met { npc } => {
                self.director.record_encounter(&npc, &mut self.events);
            }
        }
    }

    fn apply_effects(&mut self, owner: &str, effects: Vec<ConversationEffect>) {
        for effect in effects {
            match effect {
                ConversationEffect::Line(view) => {
                    let needs_close = self
                        .director
                        .dialog_owner()
                        .map_or(false, |current| current != owner);
                    if needs_close {
                        self.close_dialog();
                    }
                    let name = self.npc_display_name(owner);
                    self.events
                        .push(format!("dialog.show {owner} {}", view.dialog_id));
                    self.director.open_dialog(owner, &name, &view);
                }
                ConversationEffect::Hooks(hooks) => {
                    for hook in hooks {
                        self.dispatch_hook(hook);
                    }
                }
                ConversationEffect::Close => {
                    // A completion hook may already have opened another NPC's
                    // conversation; the stale close must not take it down.
                    let still_owner = self
                        .director
                        .dialog_owner()
                        .map_or(true, |current| current == owner);
                    if still_owner {
                        self.close_dialog();
                    }
                }
            }
        }
    }

    // -- zones and checkpoints --------------------------------------------

    fn on_zone_entry(&mut self, entry: ZoneEntry) {
        self.events.push(format!("zone.enter {}", entry.name));
        match entry.trigger {
            ZoneTrigger::GirlHouse => {
                // One-shot: the zone removes itself before the girl moves.
                self.zones.remove(&mut self.stage, entry.entity);
                self.found_girl();
            }
            ZoneTrigger::Checkpoint {
                id,
                respawn_pos,
                respawn_look_at,
            } => self.touch_checkpoint(&id, respawn_pos, respawn_look_at),
            ZoneTrigger::Fall => self.respawn_player(),
            ZoneTrigger::DisableCheckpoints => self.disable_checkpoints(),
            ZoneTrigger::ReverseCheckpoints => self.reverse_checkpoints(),
            ZoneTrigger::ToggleUpperFallZone => self.adjust_upper_fall_zone(),
        }
    }

    fn touch_checkpoint(&mut self, id: &str, respawn_pos: Vec3, respawn_look_at: Vec3) {
        let first = !self.checkpoints.armed();
        if self
            .checkpoints
            .set_checkpoint(id, respawn_pos, respawn_look_at)
        {
            self.events.push(format!("checkpoint.set {id}"));
            if first {
                self.turn_on_fall_zone();
            }
        }
    }

    fn respawn_player(&mut self) {
        // Never refuses: with no checkpoint stored this teleports to the
        // tracker's zeroed default pose.
        let (pos, look_at) = self.checkpoints.respawn_pose();
        self.stage.move_player(pos, look_at);
        self.events.push(format!(
            "checkpoint.respawn {}",
            self.checkpoints.current().unwrap_or("none")
        ));
    }

    fn turn_on_fall_zone(&mut self) {
        if self
            .zones
            .find_entity(|t| matches!(t, ZoneTrigger::Fall))
            .is_some()
        {
            return;
        }
        let fall_pos = if self.checkpoints.upper_fall_active() {
            self.plan.fall_upper_pos
        } else {
            self.plan.fall.pos
        };
        self.zones.install(
            &mut self.stage,
            "fall",
            fall_pos,
            self.plan.fall.scale,
            ZoneTrigger::Fall,
        );
        self.zones.install(
            &mut self.stage,
            "leaveClimb",
            self.plan.disable.pos,
            self.plan.disable.scale,
            ZoneTrigger::DisableCheckpoints,
        );
        self.zones.install(
            &mut self.stage,
            "upperPath",
            self.plan.upper_toggle.pos,
            self.plan.upper_toggle.scale,
            ZoneTrigger::ToggleUpperFallZone,
        );
        self.events.push("checkpoint.fallzone on".to_string());
    }

    fn disable_checkpoints(&mut self) {
        self.zones.remove_where(&mut self.stage, |t| {
            matches!(
                t,
                ZoneTrigger::Fall
                    | ZoneTrigger::DisableCheckpoints
                    | ZoneTrigger::ToggleUpperFallZone
            )
        });
        self.checkpoints.disarm();
        self.events.push("checkpoint.fallzone off".to_string());
    }

    /// Rips out the climb volumes for the old direction and installs the
    /// other set. Reversing twice restores the original layout.
    fn reverse_checkpoints(&mut self) {
        let headed_up = self.checkpoints.reverse();
        self.events.push(format!(
            "checkpoint.reverse {}",
            if headed_up { "up" } else { "down" }
        ));
        self.install_climb();
    }

    fn install_climb(&mut self) {
        self.zones.remove_where(&mut self.stage, |t| {
            matches!(
                t,
                ZoneTrigger::Checkpoint { .. } | ZoneTrigger::ReverseCheckpoints
            )
        });
        let (defs, reverse) = if self.checkpoints.headed_up() {
            (self.plan.up.clone(), self.plan.reverse_up)
        } else {
            (self.plan.down.clone(), self.plan.reverse_down)
        };
        for def in &defs {
            self.zones.install(
                &mut self.stage,
                def.name.clone(),
                def.pos,
                def.scale,
                ZoneTrigger::Checkpoint {
                    id: def.name.clone(),
                    respawn_pos: def.respawn_pos,
                    respawn_look_at: def.respawn_look_at,
                },
            );
        }
        self.zones.install(
            &mut self.stage,
            "turnAround",
            reverse.pos,
            reverse.scale,
            ZoneTrigger::ReverseCheckpoints,
        );
    }

    /// The upper path has its own drop; walking its toggle volume moves the
    /// fall zone up, and walking the relocated volume moves it back down.
    fn adjust_upper_fall_zone(&mut self) {
        let active = !self.checkpoints.upper_fall_active();
        self.checkpoints.set_upper_fall_active(active);
        if let Some(fall) = self.zones.find_entity(|t| matches!(t, ZoneTrigger::Fall)) {
            let pos = if active {
                self.plan.fall_upper_pos
            } else {
                self.plan.fall.pos
            };
            self.zones.set_center(&mut self.stage, fall, pos);
        }
        if let Some(toggle) = self
            .zones
            .find_entity(|t| matches!(t, ZoneTrigger::ToggleUpperFallZone))
        {
            let pos = if active {
                self.plan.upper_toggle_alt_pos
            } else {
                self.plan.upper_toggle.pos
            };
            self.zones.set_center(&mut self.stage, toggle, pos);
        }
        self.events.push(format!(
            "checkpoint.upperfall {}",
            if active { "on" } else { "off" }
        ));
    }

    // -- helpers ----------------------------------------------------------

    fn start_npc_route(&mut self, npc_id: &str, set: &str) {
        match self.npcs.get_mut(npc_id) {
            Some(npc) => {
                npc.start_waypoint_set(set, &mut self.events);
            }
            None => self.unknown_npc(npc_id),
        }
    }

    fn prepare_npc_conversation(&mut self, npc_id: &str, set: &str) {
        match self.npcs.get_mut(npc_id) {
            Some(npc) => {
                npc.prepare_conversation(set, &mut self.events);
            }
            None => self.unknown_npc(npc_id),
        }
    }

    fn npc_display_name(&self, npc_id: &str) -> String {
        self.npcs
            .get(npc_id)
            .map(|npc| npc.name().to_string())
            .unwrap_or_else(|| npc_id.to_string())
    }

    fn unknown_npc(&mut self, npc_id: &str) {
        warn!("hook referenced unknown npc `{npc_id}`");
        self.events.push(format!("hook.unknown {npc_id}"));
    }

    // -- observers --------------------------------------------------------

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn dialog(&self) -> &DialogSnapshot {
        self.director.dialog()
    }

    pub fn mission_state(&self) -> MissionState {
        self.director.state()
    }

    pub fn mission_title(&self) -> &str {
        self.director.title()
    }

    pub fn candle_count(&self) -> usize {
        self.director.candle_count()
    }

    pub fn ritual_items(&self) -> RitualItems {
        self.director.items()
    }

    pub fn video_phase(&self) -> VideoPhase {
        self.video.phase()
    }

    pub fn video_session(&self) -> u64 {
        self.video.session()
    }

    pub fn stage(&self) -> &WorldStage {
        &self.stage
    }

    pub fn drain_commands(&mut self) -> Vec<HostCommand> {
        self.stage.drain_commands()
    }

    pub fn checkpoint_tracker(&self) -> &CheckpointTracker {
        &self.checkpoints
    }

    pub fn zone_count(&self, pred: impl Fn(&ZoneTrigger) -> bool) -> usize {
        self.zones.count_where(pred)
    }

    pub fn npc_state(&self, npc_id: &str) -> Option<NpcState> {
        self.npcs.get(npc_id).map(|npc| npc.state())
    }

    pub fn npc_route(&self, npc_id: &str) -> Option<&str> {
        self.npcs.get(npc_id).and_then(|npc| npc.active_waypoint_set())
    }

    pub fn npc_position(&self, npc_id: &str) -> Option<Vec3> {
        self.npcs.get(npc_id).map(|npc| npc.pose.position)
    }

    pub fn npc_has_pending_conversation(&self, npc_id: &str) -> bool {
        self.npcs
            .get(npc_id)
            .map(|npc| npc.has_conversation_pending())
            .unwrap_or(false)
    }

    pub fn player_position(&self) -> Vec3 {
        self.stage.player().pose.position
    }
}
