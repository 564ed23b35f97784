//! Per-NPC clip registry. At most one clip plays at a time; requesting the
//! clip that is already playing is a no-op unless a restart is asked for.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_speed() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipConfig {
    pub name: String,
    #[serde(rename = "loop", default = "default_true")]
    pub looping: bool,
    #[serde(default = "default_speed")]
    pub speed: f32,
}

impl ClipConfig {
    pub fn named(name: &str) -> Self {
        ClipConfig {
            name: name.into(),
            looping: true,
            speed: 1.0,
        }
    }
}

/// Which configured clip plays for each locomotion state. Roles left unset
/// simply never switch the clip; a scenery-like NPC can get by with none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationRoles {
    pub idle: Option<String>,
    pub walk: Option<String>,
    pub run: Option<String>,
    pub talk: Option<String>,
}

#[derive(Debug, Clone)]
struct ClipState {
    looping: bool,
    speed: f32,
    restarts: u32,
}

#[derive(Debug, Default)]
pub struct AnimationSelector {
    clips: BTreeMap<String, ClipState>,
    defaults: BTreeMap<String, ClipConfig>,
    current: Option<String>,
}

impl AnimationSelector {
    pub fn new(configs: &[ClipConfig]) -> Self {
        let mut defaults = BTreeMap::new();
        for config in configs {
            defaults.insert(config.name.clone(), config.clone());
        }
        AnimationSelector {
            clips: BTreeMap::new(),
            defaults,
            current: None,
        }
    }

    pub fn has_clip(&self, name: &str) -> bool {
        self.defaults.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Starts `name`, stopping whatever was playing. Unknown clips are a
    /// no-op and return false; so is re-requesting the current clip without
    /// `restart`. Overrides missing from the call fall back to the clip's
    /// configured loop flag and speed.
    pub fn play(
        &mut self,
        name: &str,
        looping: Option<bool>,
        speed: Option<f32>,
        restart: bool,
    ) -> bool {
        let Some(config) = self.defaults.get(name) else {
            return false;
        };
        if self.current.as_deref() == Some(name) && !restart {
            return false;
        }
        let looping = looping.unwrap_or(config.looping);
        let speed = speed.unwrap_or(config.speed);
        let restarts = self
            .clips
            .get(name)
            .map(|state| state.restarts + 1)
            .unwrap_or(0);
        self.clips.insert(
            name.to_string(),
            ClipState {
                looping,
                speed,
                restarts,
            },
        );
        self.current = Some(name.to_string());
        true
    }

    /// Stops `name`, or whatever is playing when `name` is `None`.
    pub fn stop(&mut self, name: Option<&str>) {
        match name {
            Some(name) => {
                if self.current.as_deref() == Some(name) {
                    self.current = None;
                }
            }
            None => self.current = None,
        }
    }

    pub fn is_playing(&self, name: &str) -> bool {
        self.current.as_deref() == Some(name)
    }

    #[cfg(test)]
    fn restarts(&self, name: &str) -> u32 {
        self.clips.get(name).map(|state| state.restarts).unwrap_or(0)
    }

    #[cfg(test)]
    fn playback(&self, name: &str) -> Option<(bool, f32)> {
        self.clips.get(name).map(|state| (state.looping, state.speed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> AnimationSelector {
        AnimationSelector::new(&[
            ClipConfig {
                name: "Idle".into(),
                looping: true,
                speed: 1.0,
            },
            ClipConfig {
                name: "Bored".into(),
                looping: false,
                speed: 0.6,
            },
        ])
    }

    #[test]
    fn unknown_clip_is_a_no_op() {
        let mut clips = selector();
        assert!(!clips.play("Moonwalk", None, None, false));
        assert_eq!(clips.current(), None);
    }

    #[test]
    fn only_one_clip_plays_at_a_time() {
        let mut clips = selector();
        assert!(clips.play("Idle", None, None, false));
        assert!(clips.play("Bored", None, None, false));
        assert!(clips.is_playing("Bored"));
        assert!(!clips.is_playing("Idle"));
    }

    #[test]
    fn replaying_current_clip_needs_restart() {
        let mut clips = selector();
        clips.play("Idle", None, None, false);
        assert!(!clips.play("Idle", None, None, false));
        assert_eq!(clips.restarts("Idle"), 0);
        assert!(clips.play("Idle", None, None, true));
        assert_eq!(clips.restarts("Idle"), 1);
    }

    #[test]
    fn overrides_fall_back_to_configured_defaults() {
        let mut clips = selector();
        clips.play("Bored", None, None, false);
        assert_eq!(clips.playback("Bored"), Some((false, 0.6)));
        clips.play("Bored", Some(true), Some(2.0), true);
        assert_eq!(clips.playback("Bored"), Some((true, 2.0)));
    }

    #[test]
    fn stop_clears_only_the_named_clip() {
        let mut clips = selector();
        clips.play("Idle", None, None, false);
        clips.stop(Some("Bored"));
        assert!(clips.is_playing("Idle"));
        clips.stop(Some("Idle"));
        assert_eq!(clips.current(), None);
    }
}
