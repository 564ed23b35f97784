//! Timed video gate for cutscenes. The host streams the actual video and
//! feeds playback reports back in; the gate decides when the scene may move
//! on, with a wall-clock fallback in case the reports stop arriving.

use serde::{Deserialize, Serialize};

/// Offsets within this many seconds of the reported length count as the end.
const END_EPSILON: f32 = 0.5;

/// Extra wall-clock seconds past the reported length before the gate gives
/// up waiting for an end-of-stream report.
const FALLBACK_BUFFER: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VideoPhase {
    Idle,
    WaitingToStart,
    Playing,
    WaitingAfterEnd,
    Complete,
}

/// A playback status report from the host's video player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoReport {
    pub current_offset: f32,
    pub video_length: f32,
    pub playing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConfig {
    pub src: String,
    /// Seconds of black before playback starts.
    #[serde(default)]
    pub wait_before: f32,
    /// Seconds of black after playback ends, before the gate completes.
    #[serde(default)]
    pub wait_after: f32,
}

#[derive(Debug)]
pub struct VideoGate {
    phase: VideoPhase,
    src: String,
    wait_before: f32,
    wait_after: f32,
    elapsed: f32,
    played: f32,
    reported_length: Option<f32>,
    session: u64,
    started: bool,
    ended_by_fallback: bool,
}

impl Default for VideoGate {
    fn default() -> Self {
        VideoGate {
            phase: VideoPhase::Idle,
            src: String::new(),
            wait_before: 0.0,
            wait_after: 0.0,
            elapsed: 0.0,
            played: 0.0,
            reported_length: None,
            session: 0,
            started: false,
            ended_by_fallback: false,
        }
    }
}

impl VideoGate {
    pub fn new() -> Self {
        VideoGate::default()
    }

    pub fn phase(&self) -> VideoPhase {
        self.phase
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn ended_by_fallback(&self) -> bool {
        self.ended_by_fallback
    }

    /// Arms the gate with a new video. Returns the session token; reports
    /// carrying any other token are stale and ignored.
    pub fn set_video(&mut self, config: &VideoConfig) -> u64 {
        self.session += 1;
        self.phase = VideoPhase::WaitingToStart;
        self.src = config.src.clone();
        self.wait_before = config.wait_before;
        self.wait_after = config.wait_after;
        self.elapsed = 0.0;
        self.played = 0.0;
        self.reported_length = None;
        self.started = false;
        self.ended_by_fallback = false;
        self.session
    }

    /// Invalidates whatever is armed. A later stale report cannot revive it.
    pub fn stop(&mut self) {
        self.session += 1;
        self.phase = VideoPhase::Idle;
    }

    /// Feeds a playback report. Only reports for the current session while
    /// playing are honored.
    pub fn note_report(&mut self, session: u64, report: VideoReport) {
        if session != self.session || self.phase != VideoPhase::Playing {
            return;
        }
        self.reported_length = Some(report.video_length);
        let at_end = report.current_offset >= report.video_length - END_EPSILON;
        if at_end || (self.started && !report.playing) {
            self.enter_after_wait();
        }
        if report.playing {
            self.started = true;
        }
    }

    /// One frame of gate time. Returns true exactly once, on the frame the
    /// gate completes.
    pub fn update(&mut self, dt: f32) -> bool {
        match self.phase {
            VideoPhase::Idle | VideoPhase::Complete => false,
            VideoPhase::WaitingToStart => {
                self.elapsed += dt;
                if self.elapsed >= self.wait_before {
                    self.phase = VideoPhase::Playing;
                    self.elapsed = 0.0;
                }
                false
            }
            VideoPhase::Playing => {
                self.played += dt;
                // Reports stopped coming: give the stream a grace window
                // past its reported length, then move on anyway.
                if let Some(length) = self.reported_length {
                    if self.played >= length + FALLBACK_BUFFER {
                        self.ended_by_fallback = true;
                        self.enter_after_wait();
                    }
                }
                false
            }
            VideoPhase::WaitingAfterEnd => {
                self.elapsed += dt;
                if self.elapsed >= self.wait_after {
                    self.phase = VideoPhase::Complete;
                    return true;
                }
                false
            }
        }
    }

    fn enter_after_wait(&mut self) {
        self.phase = VideoPhase::WaitingAfterEnd;
        self.elapsed = 0.0;
    }
}
