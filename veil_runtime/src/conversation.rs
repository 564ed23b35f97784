//! Branching conversation sets and the per-NPC engine that walks them.
//!
//! A conversation set is a named graph of dialog lines: linear `next` links,
//! player choice fan-outs, and per-line hooks. The engine owns the cursor and
//! returns [`ConversationEffect`] values for the orchestrator to apply; it
//! never touches the mailbox or other NPCs itself.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::events::Hook;
use crate::ContentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Speaker {
    Player,
    Npc,
}

impl Default for Speaker {
    fn default() -> Self {
        Speaker::Npc
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerChoice {
    pub text: String,
    pub next_dialog_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogLine {
    pub speaker: Speaker,
    pub text: String,
    #[serde(default)]
    pub next_dialog_id: Option<String>,
    /// Hooks fired when this line is shown, after it reaches the mailbox.
    #[serde(default)]
    pub actions: Vec<Hook>,
    #[serde(default)]
    pub player_choices: Vec<PlayerChoice>,
}

impl DialogLine {
    /// Terminal lines end the conversation on the next advance.
    pub fn is_terminal(&self) -> bool {
        self.next_dialog_id.is_none() && self.player_choices.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSet {
    pub id: String,
    pub start_dialog_id: String,
    pub dialogs: BTreeMap<String, DialogLine>,
    /// Fired exactly once when the conversation ends, before the mailbox
    /// closes.
    #[serde(default)]
    pub on_complete: Vec<Hook>,
}

impl ConversationSet {
    /// Checks that every link lands on a real line and every line is
    /// reachable from the start.
    pub fn validate(&self) -> Result<(), ContentError> {
        if !self.dialogs.contains_key(&self.start_dialog_id) {
            return Err(ContentError::UnknownStartDialog {
                set: self.id.clone(),
                dialog: self.start_dialog_id.clone(),
            });
        }
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(self.start_dialog_id.as_str());
        seen.insert(self.start_dialog_id.as_str());
        while let Some(id) = queue.pop_front() {
            let line = &self.dialogs[id];
            let mut targets: Vec<&str> = Vec::new();
            if let Some(next) = line.next_dialog_id.as_deref() {
                targets.push(next);
            }
            for choice in &line.player_choices {
                targets.push(choice.next_dialog_id.as_str());
            }
            for target in targets {
                if !self.dialogs.contains_key(target) {
                    return Err(ContentError::UnknownDialogTarget {
                        set: self.id.clone(),
                        dialog: id.to_string(),
                        target: target.to_string(),
                    });
                }
                if seen.insert(target) {
                    queue.push_back(target);
                }
            }
        }
        for id in self.dialogs.keys() {
            if !seen.contains(id.as_str()) {
                return Err(ContentError::UnreachableDialog {
                    set: self.id.clone(),
                    dialog: id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A dialog line as published to the mailbox.
#[derive(Debug, Clone, PartialEq)]
pub struct LineView {
    pub dialog_id: String,
    pub speaker: Speaker,
    pub text: String,
    pub has_next: bool,
    pub choices: Vec<PlayerChoice>,
}

/// What the orchestrator should do after touching the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationEffect {
    /// Publish this line to the shared mailbox.
    Line(LineView),
    /// Dispatch these hooks now, in order.
    Hooks(Vec<Hook>),
    /// Close the mailbox.
    Close,
}

#[derive(Debug, Default)]
pub struct ConversationEngine {
    sets: BTreeMap<String, ConversationSet>,
    current_set: Option<String>,
    /// Next line to show within the current set; `None` once the last shown
    /// line was terminal.
    cursor: Option<String>,
    prepared: bool,
}

impl ConversationEngine {
    pub fn new(sets: Vec<ConversationSet>) -> Self {
        let mut by_id = BTreeMap::new();
        for set in sets {
            by_id.insert(set.id.clone(), set);
        }
        ConversationEngine {
            sets: by_id,
            current_set: None,
            cursor: None,
            prepared: false,
        }
    }

    pub fn knows_set(&self, set_id: &str) -> bool {
        self.sets.contains_key(set_id)
    }

    pub fn active_set(&self) -> Option<&str> {
        self.current_set.as_deref()
    }

    /// A prepared or in-flight conversation takes priority over flavor lines
    /// when the NPC is clicked.
    pub fn has_pending(&self) -> bool {
        self.current_set.is_some()
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Arms `set_id` without showing anything. Returns false for an unknown
    /// set.
    pub fn prepare(&mut self, set_id: &str) -> bool {
        let Some(set) = self.sets.get(set_id) else {
            return false;
        };
        self.current_set = Some(set.id.clone());
        self.cursor = Some(set.start_dialog_id.clone());
        self.prepared = true;
        true
    }

    /// Starts `set_id` and shows its first line. Returns `None` for an
    /// unknown set.
    pub fn start(&mut self, set_id: &str) -> Option<Vec<ConversationEffect>> {
        if !self.prepare(set_id) {
            return None;
        }
        Some(self.show_next())
    }

    /// Shows the line under the cursor, or ends the conversation when the
    /// previous line was terminal. With no conversation at all this just asks
    /// for a close.
    pub fn show_next(&mut self) -> Vec<ConversationEffect> {
        if self.current_set.is_none() {
            return vec![ConversationEffect::Close];
        }
        match self.cursor.take() {
            Some(id) => self.show_line(&id),
            None => self.end_conversation(),
        }
    }

    /// Jumps the cursor to `dialog_id` in the current set and shows it.
    /// Unknown lines and a missing conversation are no-ops.
    pub fn jump_to(&mut self, dialog_id: &str) -> Vec<ConversationEffect> {
        if self.current_set.is_none() {
            return Vec::new();
        }
        self.show_line(dialog_id)
    }

    /// Ends the current conversation: fires its completion hooks exactly
    /// once, clears the cursor, and asks for a close. Idempotent.
    pub fn end_conversation(&mut self) -> Vec<ConversationEffect> {
        let Some(set_id) = self.current_set.take() else {
            return Vec::new();
        };
        self.cursor = None;
        self.prepared = false;
        let mut effects = Vec::new();
        if let Some(set) = self.sets.get(&set_id) {
            if !set.on_complete.is_empty() {
                effects.push(ConversationEffect::Hooks(set.on_complete.clone()));
            }
        }
        effects.push(ConversationEffect::Close);
        effects
    }

    fn show_line(&mut self, dialog_id: &str) -> Vec<ConversationEffect> {
        let Some(set_id) = self.current_set.clone() else {
            return Vec::new();
        };
        let Some(line) = self
            .sets
            .get(&set_id)
            .and_then(|set| set.dialogs.get(dialog_id))
        else {
            // Validation makes this unreachable for loaded content, but a
            // stray jump target should not kill the frame loop.
            return Vec::new();
        };
        self.prepared = false;
        self.cursor = line.next_dialog_id.clone();
        let mut effects = vec![ConversationEffect::Line(LineView {
            dialog_id: dialog_id.to_string(),
            speaker: line.speaker,
            text: line.text.clone(),
            has_next: line.next_dialog_id.is_some(),
            choices: line.player_choices.clone(),
        })];
        if !line.actions.is_empty() {
            effects.push(ConversationEffect::Hooks(line.actions.clone()));
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::MissionCue;

    fn line(speaker: Speaker, text: &str, next: Option<&str>) -> DialogLine {
        DialogLine {
            speaker,
            text: text.into(),
            next_dialog_id: next.map(str::to_string),
            actions: vec![],
            player_choices: vec![],
        }
    }

    fn chat() -> ConversationSet {
        let mut dialogs = BTreeMap::new();
        dialogs.insert("a".into(), line(Speaker::Npc, "Hello there.", Some("b")));
        dialogs.insert("b".into(), line(Speaker::Player, "Hi.", Some("c")));
        dialogs.insert("c".into(), line(Speaker::Npc, "Goodbye.", None));
        ConversationSet {
            id: "greeting".into(),
            start_dialog_id: "a".into(),
            dialogs,
            on_complete: vec![Hook::Mission {
                cue: MissionCue::FirstMeetingComplete,
            }],
        }
    }

    fn shown_ids(effects: &[ConversationEffect]) -> Vec<String> {
        effects
            .iter()
            .filter_map(|e| match e {
                ConversationEffect::Line(view) => Some(view.dialog_id.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn linear_conversation_walks_next_links_then_completes() {
        let mut engine = ConversationEngine::new(vec![chat()]);
        let effects = engine.start("greeting").unwrap();
        assert_eq!(shown_ids(&effects), vec!["a"]);
        assert_eq!(shown_ids(&engine.show_next()), vec!["b"]);
        let last = engine.show_next();
        assert_eq!(shown_ids(&last), vec!["c"]);
        // One advance past the terminal line ends the conversation.
        let end = engine.show_next();
        assert!(matches!(end[0], ConversationEffect::Hooks(_)));
        assert_eq!(end[1], ConversationEffect::Close);
        assert!(!engine.has_pending());
        // Ending again fires nothing.
        assert!(engine.end_conversation().is_empty());
    }

    #[test]
    fn unknown_set_is_reported_not_started() {
        let mut engine = ConversationEngine::new(vec![chat()]);
        assert!(engine.start("smalltalk").is_none());
        assert!(!engine.has_pending());
    }

    #[test]
    fn prepare_arms_without_showing() {
        let mut engine = ConversationEngine::new(vec![chat()]);
        assert!(engine.prepare("greeting"));
        assert!(engine.is_prepared());
        assert!(engine.has_pending());
        let effects = engine.show_next();
        assert_eq!(shown_ids(&effects), vec!["a"]);
        assert!(!engine.is_prepared());
    }

    #[test]
    fn jump_bypasses_the_next_link() {
        let mut engine = ConversationEngine::new(vec![chat()]);
        engine.start("greeting").unwrap();
        assert_eq!(shown_ids(&engine.jump_to("c")), vec!["c"]);
        // The jumped-to line is terminal, so the next advance ends the set.
        let end = engine.show_next();
        assert_eq!(*end.last().unwrap(), ConversationEffect::Close);
    }

    #[test]
    fn advance_without_conversation_just_closes() {
        let mut engine = ConversationEngine::new(vec![chat()]);
        assert_eq!(engine.show_next(), vec![ConversationEffect::Close]);
    }

    #[test]
    fn validation_catches_dangling_and_orphaned_lines() {
        let mut broken = chat();
        broken
            .dialogs
            .insert("d".into(), line(Speaker::Npc, "Unreachable.", None));
        assert!(matches!(
            broken.validate(),
            Err(ContentError::UnreachableDialog { .. })
        ));

        let mut dangling = chat();
        dangling.dialogs.get_mut("c").unwrap().next_dialog_id = Some("nowhere".into());
        assert!(matches!(
            dangling.validate(),
            Err(ContentError::UnknownDialogTarget { .. })
        ));

        let mut no_start = chat();
        no_start.start_dialog_id = "zz".into();
        assert!(matches!(
            no_start.validate(),
            Err(ContentError::UnknownStartDialog { .. })
        ));

        assert!(chat().validate().is_ok());
    }
}
