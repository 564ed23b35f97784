//! Global mission progression: the single story-state machine, the shared
//! dialog mailbox, and the collectable ledgers. The director is pure
//! bookkeeping; stage and NPC side effects happen in [`crate::town::Town`],
//! which owns the named story-beat methods.

use std::collections::BTreeSet;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::conversation::{LineView, PlayerChoice, Speaker};
use crate::events::EventLog;
use crate::stage::EntityId;

/// How many church candles the ritual needs.
pub const CANDLE_TARGET: usize = 7;

/// Every story state the town can be in, in progression order. Transitions
/// only move forward along this chain; [`MissionState::may_follow`] is the
/// single source of truth for what counts as forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissionState {
    IntroPlaying,
    ExploringTown,
    FollowingGirl,
    CollectingCandles,
    CandlesCollected,
    HeadingToShop,
    CheckForFood,
    TakeTheJar,
    HaveTheJar,
    HeadedToGraveyard,
    ArrivedAtGraveyard,
    HaveTheWhisper,
    BackToTheShop,
    HaveTheCatFood,
    HeadedToApartments,
}

impl MissionState {
    pub fn token(self) -> &'static str {
        match self {
            MissionState::IntroPlaying => "introPlaying",
            MissionState::ExploringTown => "exploringTown",
            MissionState::FollowingGirl => "followingGirl",
            MissionState::CollectingCandles => "collectingCandles",
            MissionState::CandlesCollected => "candlesCollected",
            MissionState::HeadingToShop => "headingToShop",
            MissionState::CheckForFood => "checkForFood",
            MissionState::TakeTheJar => "takeTheJar",
            MissionState::HaveTheJar => "haveTheJar",
            MissionState::HeadedToGraveyard => "headedToGraveyard",
            MissionState::ArrivedAtGraveyard => "arrivedAtGraveyard",
            MissionState::HaveTheWhisper => "haveTheWhisper",
            MissionState::BackToTheShop => "backToTheShop",
            MissionState::HaveTheCatFood => "haveTheCatFood",
            MissionState::HeadedToApartments => "headedToApartments",
        }
    }

    /// True when `self` is the legal successor of `prev`. The chain is
    /// strictly linear; a cue arriving out of order is refused rather than
    /// rewinding the story.
    pub fn may_follow(self, prev: MissionState) -> bool {
        use MissionState::*;
        let expected_prev = match self {
            IntroPlaying => return false,
            ExploringTown => IntroPlaying,
            FollowingGirl => ExploringTown,
            CollectingCandles => FollowingGirl,
            CandlesCollected => CollectingCandles,
            HeadingToShop => CandlesCollected,
            CheckForFood => HeadingToShop,
            TakeTheJar => CheckForFood,
            HaveTheJar => TakeTheJar,
            HeadedToGraveyard => HaveTheJar,
            ArrivedAtGraveyard => HeadedToGraveyard,
            HaveTheWhisper => ArrivedAtGraveyard,
            BackToTheShop => HaveTheWhisper,
            HaveTheCatFood => BackToTheShop,
            HeadedToApartments => HaveTheCatFood,
        };
        prev == expected_prev
    }
}

impl std::fmt::Display for MissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Story beats content can raise through hooks. Each maps to one named
/// method on the town.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "beat", rename_all = "camelCase")]
pub enum MissionCue {
    FirstMeetingComplete,
    RitualPlanned,
    CandlesDelivered,
    WaitingOutsideShop,
    ShopKeeperGivingJar,
    PrepareTheGraveyard,
    ArrivedAtGraveyard,
    ThatWasClose,
    CatFoodSecured,
    WriterLead,
    /// Marks a side character as met without touching the story chain.
    Met { npc: String },
}

/// The one shared dialog surface. At most one conversation may hold it; the
/// UI layer renders exactly this snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogSnapshot {
    pub active: bool,
    pub npc_name: String,
    pub text: String,
    pub speaker: Option<Speaker>,
    pub has_next: bool,
    pub player_choices: Vec<PlayerChoice>,
}

/// What became of a candle click.
#[derive(Debug, PartialEq)]
pub enum CandleOutcome {
    /// Remove this stage entity; `count` candles are now lit out of
    /// [`CANDLE_TARGET`]. `complete` is true exactly when the last one
    /// landed.
    Collected {
        entity: EntityId,
        count: usize,
        complete: bool,
    },
    /// Already collected, or the ritual already has enough. Ignore quietly.
    Ignored,
}

/// The four things the old lady asks after for the ritual.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RitualItems {
    pub has_pen_and_paper: bool,
    pub has_food: bool,
    pub has_toy: bool,
    pub has_picture: bool,
}

impl RitualItems {
    pub fn all_collected(&self) -> bool {
        self.has_pen_and_paper && self.has_food && self.has_toy && self.has_picture
    }
}

#[derive(Debug)]
pub struct MissionDirector {
    state: MissionState,
    title: String,
    dialog: DialogSnapshot,
    dialog_owner: Option<String>,
    encounters: BTreeSet<String>,
    candle_entities: Vec<EntityId>,
    collected_candles: BTreeSet<usize>,
    items: RitualItems,
    ritual_ready: bool,
}

impl MissionDirector {
    pub fn new() -> Self {
        MissionDirector {
            state: MissionState::IntroPlaying,
            title: "EXPLORE THE TOWN".to_string(),
            dialog: DialogSnapshot::default(),
            dialog_owner: None,
            encounters: BTreeSet::new(),
            candle_entities: Vec::new(),
            collected_candles: BTreeSet::new(),
            items: RitualItems::default(),
            ritual_ready: false,
        }
    }

    pub fn state(&self) -> MissionState {
        self.state
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> RitualItems {
        self.items
    }

    pub fn items_mut(&mut self) -> &mut RitualItems {
        &mut self.items
    }

    /// The all-items gate on the ritual: the full candle set plus every item
    /// flag. Run after an item flag changes; the first frame the gate holds,
    /// the macro title moves on. Later calls are no-ops.
    pub fn item_check(&mut self, events: &mut EventLog) -> bool {
        if self.ritual_ready
            || self.collected_candles.len() < CANDLE_TARGET
            || !self.items.all_collected()
        {
            return false;
        }
        self.ritual_ready = true;
        self.title = "FIND THE RITUAL TREE".to_string();
        events.push("mission.title FIND THE RITUAL TREE".to_string());
        true
    }

    /// Moves the story forward. An out-of-order `next` is refused and
    /// logged; the title only changes when the transition lands.
    pub fn advance(
        &mut self,
        next: MissionState,
        title: Option<&str>,
        events: &mut EventLog,
    ) -> bool {
        if !next.may_follow(self.state) {
            warn!(
                "refused mission transition {} -> {}",
                self.state.token(),
                next.token()
            );
            events.push(format!(
                "mission.refused {} -> {}",
                self.state.token(),
                next.token()
            ));
            return false;
        }
        self.state = next;
        events.push(format!("mission.state {}", next.token()));
        if let Some(title) = title {
            self.title = title.to_string();
            events.push(format!("mission.title {title}"));
        }
        true
    }

    pub fn record_encounter(&mut self, npc: &str, events: &mut EventLog) {
        if self.encounters.insert(npc.to_string()) {
            events.push(format!("mission.encounter {npc}"));
        }
    }

    pub fn has_met(&self, npc: &str) -> bool {
        self.encounters.contains(npc)
    }

    // -- candle ledger ----------------------------------------------------

    /// Registers the stage entities for the seven church candles, in
    /// placement order.
    pub fn register_candles(&mut self, entities: Vec<EntityId>) {
        self.candle_entities = entities;
        self.collected_candles.clear();
    }

    pub fn candle_count(&self) -> usize {
        self.collected_candles.len()
    }

    /// Idempotent per index and capped at [`CANDLE_TARGET`]: re-clicks and
    /// clicks past the target change nothing.
    pub fn record_candle(&mut self, index: usize) -> CandleOutcome {
        if index >= self.candle_entities.len()
            || self.collected_candles.len() >= CANDLE_TARGET
            || self.collected_candles.contains(&index)
        {
            return CandleOutcome::Ignored;
        }
        self.collected_candles.insert(index);
        let count = self.collected_candles.len();
        CandleOutcome::Collected {
            entity: self.candle_entities[index],
            count,
            complete: count == CANDLE_TARGET,
        }
    }

    // -- dialog mailbox ---------------------------------------------------

    pub fn dialog(&self) -> &DialogSnapshot {
        &self.dialog
    }

    pub fn dialog_owner(&self) -> Option<&str> {
        self.dialog_owner.as_deref()
    }

    /// Takes ownership away so a close in progress cannot re-enter.
    pub fn take_dialog_owner(&mut self) -> Option<String> {
        self.dialog_owner.take()
    }

    /// Publishes a line on behalf of `owner`. The caller is responsible for
    /// closing out any previous owner first.
    pub fn open_dialog(&mut self, owner: &str, npc_name: &str, view: &LineView) {
        self.dialog_owner = Some(owner.to_string());
        self.dialog = DialogSnapshot {
            active: true,
            npc_name: npc_name.to_string(),
            text: view.text.clone(),
            speaker: Some(view.speaker),
            has_next: view.has_next,
            player_choices: view.choices.clone(),
        };
    }

    /// Shows a one-shot flavor line. Owned like a conversation so a close
    /// routes back through the NPC, where it is a harmless no-op.
    pub fn open_flavor(&mut self, owner: &str, npc_name: &str, text: &str) {
        self.dialog_owner = Some(owner.to_string());
        self.dialog = DialogSnapshot {
            active: true,
            npc_name: npc_name.to_string(),
            text: text.to_string(),
            speaker: Some(Speaker::Npc),
            has_next: false,
            player_choices: Vec::new(),
        };
    }

    /// Clears snapshot and owner together; the mailbox is never half-closed.
    pub fn clear_dialog(&mut self) {
        self.dialog_owner = None;
        self.dialog = DialogSnapshot::default();
    }
}

impl Default for MissionDirector {
    fn default() -> Self {
        MissionDirector::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_only_moves_forward() {
        use MissionState::*;
        assert!(ExploringTown.may_follow(IntroPlaying));
        assert!(CandlesCollected.may_follow(CollectingCandles));
        assert!(!CollectingCandles.may_follow(CandlesCollected));
        assert!(!HaveTheJar.may_follow(ExploringTown));
        assert!(!IntroPlaying.may_follow(HeadedToApartments));
    }

    #[test]
    fn refused_transition_keeps_state_and_title() {
        let mut director = MissionDirector::new();
        let mut events = EventLog::new();
        assert!(!director.advance(MissionState::HaveTheJar, Some("NOPE"), &mut events));
        assert_eq!(director.state(), MissionState::IntroPlaying);
        assert_eq!(director.title(), "EXPLORE THE TOWN");
        assert!(events.contains("mission.refused introPlaying -> haveTheJar"));
    }

    #[test]
    fn advance_logs_state_and_title() {
        let mut director = MissionDirector::new();
        let mut events = EventLog::new();
        assert!(director.advance(MissionState::ExploringTown, None, &mut events));
        assert!(director.advance(
            MissionState::FollowingGirl,
            Some("FOLLOW THE GIRL"),
            &mut events
        ));
        assert!(events.contains("mission.state followingGirl"));
        assert!(events.contains("mission.title FOLLOW THE GIRL"));
    }

    #[test]
    fn candles_are_idempotent_and_capped() {
        let mut director = MissionDirector::new();
        director.register_candles((0..7).map(|i| 100 + i as EntityId).collect());
        assert!(matches!(
            director.record_candle(3),
            CandleOutcome::Collected {
                entity: 103,
                count: 1,
                complete: false
            }
        ));
        // Same candle again: ignored.
        assert_eq!(director.record_candle(3), CandleOutcome::Ignored);
        for i in [0usize, 1, 2, 4, 5] {
            assert!(matches!(
                director.record_candle(i),
                CandleOutcome::Collected { complete: false, .. }
            ));
        }
        assert!(matches!(
            director.record_candle(6),
            CandleOutcome::Collected {
                count: 7,
                complete: true,
                ..
            }
        ));
        // Out-of-range index once full: still ignored.
        assert_eq!(director.record_candle(0), CandleOutcome::Ignored);
        assert_eq!(director.candle_count(), 7);
    }

    #[test]
    fn item_check_fires_once_when_everything_is_collected() {
        let mut director = MissionDirector::new();
        let mut events = EventLog::new();
        director.register_candles((0..7).map(|i| 200 + i as EntityId).collect());
        for i in 0..7 {
            director.record_candle(i);
        }
        director.items_mut().has_food = true;
        assert!(!director.item_check(&mut events));
        director.items_mut().has_pen_and_paper = true;
        director.items_mut().has_toy = true;
        director.items_mut().has_picture = true;
        assert!(director.item_check(&mut events));
        assert_eq!(director.title(), "FIND THE RITUAL TREE");
        assert!(!director.item_check(&mut events));
        assert_eq!(events.count_of("mission.title FIND THE RITUAL TREE"), 1);
    }

    #[test]
    fn encounters_log_once() {
        let mut director = MissionDirector::new();
        let mut events = EventLog::new();
        director.record_encounter("templeShaman", &mut events);
        director.record_encounter("templeShaman", &mut events);
        assert!(director.has_met("templeShaman"));
        assert_eq!(events.count_of("mission.encounter templeShaman"), 1);
    }

    #[test]
    fn clear_dialog_resets_owner_and_snapshot_together() {
        let mut director = MissionDirector::new();
        director.open_flavor("girl", "Girl", "Hey.");
        assert!(director.dialog().active);
        assert_eq!(director.dialog_owner(), Some("girl"));
        director.clear_dialog();
        assert!(!director.dialog().active);
        assert_eq!(director.dialog_owner(), None);
        assert_eq!(director.dialog(), &DialogSnapshot::default());
    }
}
