//! Timed input playback for the headless viewer.
//!
//! A script is a JSON array of steps, each either a typed [`Intent`] or a
//! raw host event, stamped with the frame it fires on:
//!
//! ```json
//! [
//!   { "at_frame": 0, "host": "enter_scene" },
//!   { "at_frame": 120, "intent": "select_node", "id": "l1-2" }
//! ]
//! ```

use std::fs;
use std::path::Path;

use anyhow::Context;
use scene::Intent;
use serde::{Deserialize, Serialize};

/// Events that come from the embedding host rather than from a label click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "host", rename_all = "snake_case")]
pub enum HostEvent {
    /// The viewer pressed "enter"; starts the entrance fly-in.
    EnterScene,
    Resize { width: f64, height: f64 },
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    Wheel { delta: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptAction {
    Intent(Intent),
    Host(HostEvent),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub at_frame: u64,
    #[serde(flatten)]
    pub action: ScriptAction,
}

/// Steps ordered by frame; steps on the same frame keep file order.
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    steps: Vec<ScriptStep>,
    cursor: usize,
}

impl InputScript {
    pub fn new(mut steps: Vec<ScriptStep>) -> Self {
        steps.sort_by_key(|s| s.at_frame);
        Self { steps, cursor: 0 }
    }

    pub fn from_json_str(payload: &str) -> anyhow::Result<Self> {
        let steps: Vec<ScriptStep> =
            serde_json::from_str(payload).context("parsing input script")?;
        Ok(Self::new(steps))
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let payload = fs::read_to_string(path)
            .with_context(|| format!("reading input script {}", path.display()))?;
        Self::from_json_str(&payload)
            .with_context(|| format!("in {}", path.display()))
    }

    /// Just the entrance, for runs without a script.
    pub fn entrance_only() -> Self {
        Self::new(vec![ScriptStep {
            at_frame: 0,
            action: ScriptAction::Host(HostEvent::EnterScene),
        }])
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn remaining(&self) -> usize {
        self.steps.len() - self.cursor
    }

    /// Takes every not-yet-played step due at or before `frame`.
    pub fn due(&mut self, frame: u64) -> Vec<ScriptAction> {
        let start = self.cursor;
        while self.cursor < self.steps.len() && self.steps[self.cursor].at_frame <= frame {
            self.cursor += 1;
        }
        self.steps[start..self.cursor]
            .iter()
            .map(|s| s.action.clone())
            .collect()
    }
}
