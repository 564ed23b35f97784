//! Scripted playthrough driver. Stands in for the interactive host: advances
//! the town frame by frame, feeds it the clicks and player moves a real
//! session would produce, and collects the event log as an artefact. The
//! regression tests run the whole story through this and grep the transcript.

use anyhow::{bail, Context, Result};
use log::info;
use serde::Serialize;
use veil_runtime::math::vec3;
use veil_runtime::mission::{MissionState, RitualItems};
use veil_runtime::npc::RandomPicker;
use veil_runtime::town::Town;
use veil_runtime::video::{VideoPhase, VideoReport};

use crate::content;

/// Frame step fed to the town, in seconds.
pub const TICK: f32 = 0.1;

/// Reported length of the intro video, in seconds. The gate only cares that
/// the offset reaches the end of whatever length the host reports.
const INTRO_VIDEO_LENGTH: f32 = 42.0;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaythroughReport {
    pub ticks: u32,
    pub final_state: MissionState,
    pub final_title: String,
    pub candles: usize,
    pub items: RitualItems,
    pub events: Vec<String>,
}

pub struct Playthrough {
    town: Town,
    ticks: u32,
    budget: u32,
}

impl Playthrough {
    pub fn new(seed: u64, budget: u32) -> Result<Self> {
        let town = Town::new(
            content::town_content(),
            Box::new(RandomPicker::seeded(seed)),
        )
        .context("loading the authored town manifest")?;
        Ok(Playthrough {
            town,
            ticks: 0,
            budget,
        })
    }

    pub fn town(&self) -> &Town {
        &self.town
    }

    pub fn town_mut(&mut self) -> &mut Town {
        &mut self.town
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn tick(&mut self) -> Result<()> {
        if self.ticks >= self.budget {
            bail!("tick budget exhausted after {} ticks", self.ticks);
        }
        self.town.update(TICK);
        self.ticks += 1;
        Ok(())
    }

    /// Ticks until `pred` holds, or fails once the budget runs out. `what`
    /// names the missing condition in the error.
    pub fn run_until(&mut self, what: &str, pred: impl Fn(&Town) -> bool) -> Result<()> {
        while !pred(&self.town) {
            self.tick()
                .with_context(|| format!("waiting for {what}"))?;
        }
        Ok(())
    }

    /// Plays the intro video from the host's side: waits for the gate to ask
    /// for playback, reports the stream reaching its end, then waits out the
    /// tail padding.
    pub fn finish_intro(&mut self) -> Result<()> {
        self.run_until("the intro video to start", |t| {
            t.video_phase() == VideoPhase::Playing
        })?;
        let session = self.town.video_session();
        self.town.note_video_report(
            session,
            VideoReport {
                current_offset: INTRO_VIDEO_LENGTH - 0.2,
                video_length: INTRO_VIDEO_LENGTH,
                playing: true,
            },
        );
        self.run_until("the intro video to complete", |t| {
            t.mission_state() == MissionState::ExploringTown
        })?;
        Ok(())
    }

    /// Clicks the NPC and pushes the conversation to its end, taking the
    /// first choice whenever one is offered.
    pub fn talk_through(&mut self, npc: &str) -> Result<()> {
        self.town.click_npc(npc);
        if !self.town.dialog().active {
            bail!("clicking `{npc}` did not open a dialog");
        }
        for _ in 0..64 {
            if !self.town.dialog().active {
                return Ok(());
            }
            let choice = self
                .town
                .dialog()
                .player_choices
                .first()
                .map(|c| c.next_dialog_id.clone());
            match choice {
                Some(next) => self.town.select_dialog_choice(&next),
                None => self.town.advance_dialog(),
            }
            self.tick()?;
        }
        bail!("conversation with `{npc}` never ended");
    }

    pub fn expect_state(&self, state: MissionState) -> Result<()> {
        if self.town.mission_state() != state {
            bail!(
                "expected mission state {state}, town is at {}",
                self.town.mission_state()
            );
        }
        Ok(())
    }

    /// The whole story, intro to the apartment building.
    pub fn run_story(&mut self) -> Result<()> {
        self.finish_intro()?;

        // Knock on the girl's house and wait for her to run out.
        self.town.set_player_position(vec3(34.0, 16.0, 57.0));
        self.tick()?;
        self.run_until("the girl to leave her house", |t| {
            t.npc_has_pending_conversation("girl")
        })?;
        self.town.set_player_position(vec3(32.25, 12.35, 46.0));
        self.talk_through("girl")?;
        self.expect_state(MissionState::FollowingGirl)?;
        info!("first meeting done after {} ticks", self.ticks);

        // Follow her to the fountain and hear the ritual plan.
        self.run_until("the girl to reach the fountain", |t| {
            t.npc_has_pending_conversation("girl")
        })?;
        self.town.set_player_position(vec3(2.2, 12.6, 12.0));
        self.talk_through("girl")?;
        self.expect_state(MissionState::CollectingCandles)?;

        // She searches the church while the player clears the shelf.
        self.run_until("the girl to start searching the church", |t| {
            t.npc_route("girl") == Some("searchInsideChurch")
        })?;
        self.town.set_player_position(vec3(22.25, 16.0, 13.5));
        for index in 0..7 {
            self.town.click_candle(index);
            self.tick()?;
        }
        self.expect_state(MissionState::CandlesCollected)?;
        self.run_until("the girl to end the search", |t| {
            t.npc_has_pending_conversation("girl")
        })?;
        self.talk_through("girl")?;
        self.expect_state(MissionState::HeadingToShop)?;

        // Down to the shop; she waits outside while the player goes in.
        self.run_until("the girl to reach the shop", |t| {
            t.npc_has_pending_conversation("girl")
        })?;
        self.talk_through("girl")?;
        self.expect_state(MissionState::CheckForFood)?;
        self.town.set_player_position(vec3(-23.65, 11.85, 16.55));
        self.talk_through("shopKeeper")?;
        self.expect_state(MissionState::TakeTheJar)?;
        self.town.click_jar();
        self.expect_state(MissionState::HaveTheJar)?;
        self.talk_through("girl")?;
        self.expect_state(MissionState::HeadedToGraveyard)?;

        // The graveyard: she distracts the shadows, the player jars the
        // whisper, and both bolt.
        self.run_until("the girl to reach the graveyard gate", |t| {
            t.npc_has_pending_conversation("girl")
        })?;
        self.talk_through("girl")?;
        self.run_until("the girl to start distracting the shadows", |t| {
            t.npc_route("girl") == Some("distractShadows")
        })?;
        self.town.set_player_position(vec3(1.85, 12.3, 34.0));
        self.town.click_whisper();
        self.expect_state(MissionState::HaveTheWhisper)?;
        self.run_until("the girl to escape the graveyard", |t| {
            t.npc_has_pending_conversation("girl")
        })?;
        self.talk_through("girl")?;
        self.expect_state(MissionState::BackToTheShop)?;

        // Trade the whisper for the cat food, then on to the apartments.
        self.run_until("the shop keeper to be ready for the trade", |t| {
            t.npc_has_pending_conversation("shopKeeper")
        })?;
        self.town.set_player_position(vec3(-23.65, 11.85, 16.55));
        self.talk_through("shopKeeper")?;
        self.expect_state(MissionState::HaveTheCatFood)?;
        self.run_until("the girl to stop outside the shop", |t| {
            t.npc_has_pending_conversation("girl")
        })?;
        self.talk_through("girl")?;
        self.expect_state(MissionState::HeadedToApartments)?;
        self.run_until("the girl to reach the apartment building", |t| {
            t.npc_route("girl").is_none()
        })?;
        info!("story complete after {} ticks", self.ticks);
        Ok(())
    }

    pub fn report(&self) -> PlaythroughReport {
        PlaythroughReport {
            ticks: self.ticks,
            final_state: self.town.mission_state(),
            final_title: self.town.mission_title().to_string(),
            candles: self.town.candle_count(),
            items: self.town.ritual_items(),
            events: self.town.events().lines().to_vec(),
        }
    }
}

/// One-call wrapper used by the binary and the regression tests.
pub fn run_playthrough(seed: u64, budget: u32) -> Result<PlaythroughReport> {
    let mut play = Playthrough::new(seed, budget)?;
    play.run_story()?;
    Ok(play.report())
}
