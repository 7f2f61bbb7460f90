//! Expand/collapse/overlay state machine.
//!
//! The machine owns the hierarchy's mutable flags and the single
//! [`InteractionState`]. Operations validate first and mutate second, so a
//! rejected intent leaves everything untouched. Side effects for the camera,
//! overlay host and rotation controller are queued as [`Command`]s.

use catalog::ContentLookup;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::command::{Command, FocusKind, FocusRequest, UiIntent};
use crate::error::SceneError;
use crate::hierarchy::NodeHierarchy;
use crate::intent::Intent;
use crate::node::{NodeIndex, NodeKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Level-1 node whose click opens the About modal instead of expanding.
    pub about_slot: Option<String>,
    pub focus_duration_s: f64,
    pub overlay_focus_duration_s: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            about_slot: Some("l1-1".to_string()),
            focus_duration_s: 1.0,
            overlay_focus_duration_s: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionState {
    pub current_overlay: Option<NodeIndex>,
    pub detail_open: bool,
    pub about_open: bool,
    /// Set while the user is interacting; the globe holds still.
    pub camera_busy: bool,
    pub ambient_rotation_enabled: bool,
    /// A manual drag paused orbit auto-rotation.
    pub drag_suppressed: bool,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            current_overlay: None,
            detail_open: false,
            about_open: false,
            camera_busy: false,
            ambient_rotation_enabled: true,
            drag_suppressed: false,
        }
    }
}

impl InteractionState {
    pub fn globe_spinning(&self) -> bool {
        !self.camera_busy
    }

    pub fn orbit_auto_rotate(&self) -> bool {
        self.ambient_rotation_enabled && !self.drag_suppressed
    }
}

/// Composite phase, derived from state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Expanded(NodeIndex),
    OverlayOpen(NodeIndex),
    DetailOpen(NodeIndex),
    AboutOpen,
}

#[derive(Debug, Clone)]
pub struct InteractionMachine {
    hierarchy: NodeHierarchy,
    state: InteractionState,
    config: InteractionConfig,
    pending: Vec<Command>,
}

impl InteractionMachine {
    pub fn new(
        hierarchy: NodeHierarchy,
        state: InteractionState,
        config: InteractionConfig,
    ) -> Self {
        Self {
            hierarchy,
            state,
            config,
            pending: Vec::new(),
        }
    }

    pub fn hierarchy(&self) -> &NodeHierarchy {
        &self.hierarchy
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        if self.state.about_open {
            return Phase::AboutOpen;
        }
        if let Some(overlay) = self.state.current_overlay {
            return if self.state.detail_open {
                Phase::DetailOpen(overlay)
            } else {
                Phase::OverlayOpen(overlay)
            };
        }
        match self.hierarchy.expanded_level1() {
            Some(node) => Phase::Expanded(node),
            None => Phase::Idle,
        }
    }

    pub fn pending_commands(&self) -> &[Command] {
        &self.pending
    }

    pub fn drain_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.pending)
    }

    pub fn apply(
        &mut self,
        intent: &Intent,
        content: &dyn ContentLookup,
    ) -> Result<(), SceneError> {
        match intent {
            Intent::SelectNode { id } => self.select_node(id, content),
            Intent::ToggleLevel1 { id } => self.toggle_level1(id, content),
            Intent::CollapseLevel1 { id } => self.collapse_level1(id),
            Intent::OpenOverlay { id } => self.open_overlay(id, content),
            Intent::CloseOverlay => {
                self.close_overlay();
                Ok(())
            }
            Intent::ShowDetail { node, card } => self.show_detail(node, *card, content),
            Intent::CloseDetail => {
                self.close_detail();
                Ok(())
            }
            Intent::OpenAbout => {
                self.open_about(content);
                Ok(())
            }
            Intent::CloseAbout => {
                self.close_about();
                Ok(())
            }
            Intent::DragStart => {
                self.manual_drag_started();
                Ok(())
            }
        }
    }

    /// Label click, routed by the node's kind.
    pub fn select_node(&mut self, id: &str, content: &dyn ContentLookup) -> Result<(), SceneError> {
        let index = self.hierarchy.index_of(id)?;
        match self.kind_of(index) {
            NodeKind::Root => self.select_root_node(),
            NodeKind::Level1 => self.toggle_level1(id, content),
            NodeKind::Level2 => self.open_overlay(id, content),
        }
    }

    pub fn select_root_node(&mut self) -> Result<(), SceneError> {
        self.push_focus(NodeIndex::ROOT, FocusKind::Node);
        Ok(())
    }

    pub fn toggle_level1(
        &mut self,
        id: &str,
        content: &dyn ContentLookup,
    ) -> Result<(), SceneError> {
        let index = self.expect_kind(id, NodeKind::Level1)?;
        if self.config.about_slot.as_deref() == Some(id) {
            self.open_about(content);
            return Ok(());
        }

        self.suspend_rotation();
        let expanding = !self.is_expanded(index);
        if expanding {
            let others: Vec<NodeIndex> = self
                .hierarchy
                .level1()
                .filter(|(i, n)| *i != index && n.is_expanded())
                .map(|(i, _)| i)
                .collect();
            for other in others {
                self.set_expanded(other, false);
            }
        }
        self.set_expanded(index, expanding);
        debug!(node = id, expanded = expanding, "toggled level-1 node");

        self.push_focus(index, FocusKind::Node);
        self.check_resume_rotation();
        Ok(())
    }

    /// Collapses `id` if it is expanded; otherwise does nothing.
    pub fn collapse_level1(&mut self, id: &str) -> Result<(), SceneError> {
        let index = self.expect_kind(id, NodeKind::Level1)?;
        if !self.is_expanded(index) {
            return Ok(());
        }

        self.suspend_rotation();
        self.set_expanded(index, false);
        debug!(node = id, "collapsed level-1 node");
        self.push_focus(index, FocusKind::Node);
        self.check_resume_rotation();
        Ok(())
    }

    pub fn open_overlay(
        &mut self,
        id: &str,
        content: &dyn ContentLookup,
    ) -> Result<(), SceneError> {
        let index = self.expect_kind(id, NodeKind::Level2)?;
        let cards = content.project_cards(id).to_vec();
        let title = self
            .hierarchy
            .node(index)
            .map(|n| n.label().to_string())
            .unwrap_or_default();

        if self.state.detail_open {
            self.state.detail_open = false;
            self.push_ui(UiIntent::HideModal);
        }
        self.state.current_overlay = Some(index);
        self.suspend_rotation();
        debug!(node = id, cards = cards.len(), "opened overlay");

        self.push_focus(index, FocusKind::Overlay);
        self.push_ui(UiIntent::BlurScene);
        self.push_ui(UiIntent::ShowOverlay { title, cards });
        Ok(())
    }

    pub fn close_overlay(&mut self) {
        self.dismiss_overlay();
        self.check_resume_rotation();
    }

    pub fn show_detail(
        &mut self,
        id: &str,
        card_index: usize,
        content: &dyn ContentLookup,
    ) -> Result<(), SceneError> {
        let index = self.expect_kind(id, NodeKind::Level2)?;
        if self.state.current_overlay != Some(index) {
            return Err(SceneError::OverlayNotOpen(id.to_string()));
        }
        let cards = content.project_cards(id);
        let card = cards
            .get(card_index)
            .cloned()
            .ok_or_else(|| SceneError::CardOutOfRange {
                id: id.to_string(),
                index: card_index,
                len: cards.len(),
            })?;

        self.state.detail_open = true;
        self.suspend_rotation();
        debug!(node = id, card = card_index, "opened detail");
        self.push_ui(UiIntent::ShowDetail(card));
        Ok(())
    }

    pub fn close_detail(&mut self) {
        if self.state.detail_open {
            self.state.detail_open = false;
            self.push_ui(UiIntent::HideModal);
        }
        self.check_resume_rotation();
    }

    pub fn open_about(&mut self, content: &dyn ContentLookup) {
        if self.state.about_open {
            return;
        }
        let about = content.about_info().cloned().unwrap_or_default();

        self.state.about_open = true;
        self.suspend_rotation();
        debug!("opened about");
        self.push_ui(UiIntent::BlurScene);
        self.push_ui(UiIntent::ShowAbout(about));
    }

    pub fn close_about(&mut self) {
        if self.state.about_open {
            self.state.about_open = false;
            self.push_ui(UiIntent::HideModal);
            self.push_ui(UiIntent::UnblurScene);
        }
        self.check_resume_rotation();
    }

    pub fn manual_drag_started(&mut self) {
        self.state.drag_suppressed = true;
    }

    /// Re-derives ambient rotation from the current state. The only path
    /// that turns rotation back on.
    pub fn check_resume_rotation(&mut self) {
        let quiet = self.hierarchy.expanded_level1().is_none()
            && self.state.current_overlay.is_none()
            && !self.state.detail_open
            && !self.state.about_open;

        if quiet {
            self.state.camera_busy = false;
            self.state.drag_suppressed = false;
        }
        if self.state.ambient_rotation_enabled != quiet {
            self.state.ambient_rotation_enabled = quiet;
            debug!(enabled = quiet, "ambient rotation changed");
            self.pending.push(Command::AmbientRotation { enabled: quiet });
        }
    }

    fn suspend_rotation(&mut self) {
        self.state.camera_busy = true;
        if self.state.ambient_rotation_enabled {
            self.state.ambient_rotation_enabled = false;
            self.pending.push(Command::AmbientRotation { enabled: false });
        }
    }

    /// Sets expansion and cascades visibility to the node's children.
    fn set_expanded(&mut self, index: NodeIndex, expanded: bool) {
        let node = self.hierarchy.node_mut(index);
        node.expanded = expanded;
        let children = node.children.clone();

        let mut closes_overlay = false;
        for child in children {
            let child_node = self.hierarchy.node_mut(child);
            child_node.visible = expanded;
            child_node.connector_visible = expanded;
            if !expanded {
                child_node.expanded = false;
                closes_overlay |= self.state.current_overlay == Some(child);
            }
        }
        if closes_overlay {
            self.dismiss_overlay();
        }
    }

    /// Closes the overlay (and a detail opened from it) without touching
    /// rotation.
    fn dismiss_overlay(&mut self) {
        let Some(node) = self.state.current_overlay.take() else {
            return;
        };
        if self.state.detail_open {
            self.state.detail_open = false;
            self.push_ui(UiIntent::HideModal);
        }
        debug!(node = ?node, "closed overlay");
        self.push_ui(UiIntent::HideOverlay);
        self.push_ui(UiIntent::UnblurScene);
    }

    fn expect_kind(&self, id: &str, expected: NodeKind) -> Result<NodeIndex, SceneError> {
        let index = self.hierarchy.index_of(id)?;
        let actual = self.kind_of(index);
        if actual != expected {
            return Err(SceneError::UnexpectedKind {
                id: id.to_string(),
                expected,
                actual,
            });
        }
        Ok(index)
    }

    fn is_expanded(&self, index: NodeIndex) -> bool {
        self.hierarchy.node(index).is_some_and(|n| n.is_expanded())
    }

    fn kind_of(&self, index: NodeIndex) -> NodeKind {
        self.hierarchy
            .node(index)
            .map(|n| n.kind())
            .unwrap_or(NodeKind::Root)
    }

    fn push_focus(&mut self, node: NodeIndex, kind: FocusKind) {
        let duration_s = match kind {
            FocusKind::Node => self.config.focus_duration_s,
            FocusKind::Overlay => self.config.overlay_focus_duration_s,
        };
        self.pending.push(Command::Focus(FocusRequest {
            node,
            duration_s,
            kind,
        }));
    }

    fn push_ui(&mut self, intent: UiIntent) {
        self.pending.push(Command::Ui(intent));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::DEFAULT_GLOBE_RADIUS;
    use crate::node::NodeSpec;
    use catalog::{AboutRecord, Card, CardLayout, InMemoryContentStore, NoContent};
    use pretty_assertions::assert_eq;

    fn portfolio() -> NodeSpec {
        NodeSpec::root("root", "Root", 60.0, 0.0)
            .with_identity("Ada", "Builder")
            .with_children(vec![
                NodeSpec::level1("l1-1", "About Me", 20.0, -60.0),
                NodeSpec::level1("l1-2", "Research", 0.0, 0.0).with_children(vec![
                    NodeSpec::level2("l2-1", "Social Computing", -10.0, -25.0),
                    NodeSpec::level2("l2-2", "Social Interaction", -20.0, 0.0),
                    NodeSpec::level2("l2-3", "Self Interaction", -10.0, 25.0),
                ]),
                NodeSpec::level1("l1-3", "Artist", 20.0, 60.0).with_children(vec![
                    NodeSpec::level2("l2-4", "Dance", 10.0, 80.0),
                    NodeSpec::level2("l2-5", "Music", 30.0, 80.0),
                    NodeSpec::level2("l2-6", "Photo", 10.0, 40.0),
                ]),
            ])
    }

    fn machine() -> InteractionMachine {
        let hierarchy = NodeHierarchy::build(&portfolio(), DEFAULT_GLOBE_RADIUS).expect("valid");
        InteractionMachine::new(
            hierarchy,
            InteractionState::default(),
            InteractionConfig::default(),
        )
    }

    fn card(title: &str) -> Card {
        Card {
            title: title.to_string(),
            thumb: String::new(),
            short_intro: String::new(),
            layout: CardLayout::Academic,
            details: Default::default(),
        }
    }

    fn content() -> InMemoryContentStore {
        let mut store = InMemoryContentStore::new();
        store.insert_cards("l2-4", vec![card("Night"), card("Day")]);
        store.set_about(AboutRecord {
            name: "Ada".into(),
            ..Default::default()
        });
        store
    }

    fn expanded(m: &InteractionMachine, id: &str) -> bool {
        m.hierarchy().get(id).is_some_and(|n| n.is_expanded())
    }

    fn visible(m: &InteractionMachine, id: &str) -> bool {
        m.hierarchy().get(id).is_some_and(|n| n.is_visible())
    }

    fn assert_invariants(m: &InteractionMachine) {
        let h = m.hierarchy();
        let expanded_count = h.level1().filter(|(_, n)| n.is_expanded()).count();
        assert!(expanded_count <= 1, "{expanded_count} level-1 nodes expanded");

        for (_, parent) in h.level1() {
            for &child in parent.children() {
                let child = h.node(child).expect("child");
                assert_eq!(child.is_visible(), parent.is_expanded(), "{}", child.id());
                assert_eq!(child.is_connector_visible(), parent.is_expanded());
            }
        }

        let s = m.state();
        let quiet = expanded_count == 0
            && s.current_overlay.is_none()
            && !s.detail_open
            && !s.about_open;
        assert_eq!(s.ambient_rotation_enabled, quiet);
    }

    fn focus_targets(commands: &[Command]) -> Vec<(NodeIndex, FocusKind)> {
        commands
            .iter()
            .filter_map(|c| match c {
                Command::Focus(f) => Some((f.node, f.kind)),
                _ => None,
            })
            .collect()
    }

    fn ui(commands: &[Command]) -> Vec<UiIntent> {
        commands
            .iter()
            .filter_map(|c| match c {
                Command::Ui(u) => Some(u.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn expanding_reveals_children_and_focuses() {
        let mut m = machine();
        m.toggle_level1("l1-2", &NoContent).expect("toggle");

        assert!(expanded(&m, "l1-2"));
        assert!(visible(&m, "l2-1") && visible(&m, "l2-3"));
        assert!(!visible(&m, "l2-4"));
        assert_eq!(m.phase(), Phase::Expanded(m.hierarchy().index_of("l1-2").unwrap()));

        let commands = m.drain_commands();
        let l12 = m.hierarchy().index_of("l1-2").unwrap();
        assert_eq!(focus_targets(&commands), vec![(l12, FocusKind::Node)]);
        assert!(commands.contains(&Command::AmbientRotation { enabled: false }));
        assert!(m.state().camera_busy);
        assert_invariants(&m);
    }

    #[test]
    fn toggling_twice_restores_idle() {
        let mut m = machine();
        m.toggle_level1("l1-3", &NoContent).expect("expand");
        m.toggle_level1("l1-3", &NoContent).expect("collapse");

        assert!(!expanded(&m, "l1-3"));
        assert!(!visible(&m, "l2-4"));
        assert_eq!(m.phase(), Phase::Idle);
        assert!(m.state().ambient_rotation_enabled);
        assert!(!m.state().camera_busy);
        assert_invariants(&m);
    }

    #[test]
    fn auto_collapse_keeps_one_level1_open() {
        let mut m = machine();
        m.toggle_level1("l1-2", &NoContent).expect("expand l1-2");
        m.drain_commands();
        m.toggle_level1("l1-3", &NoContent).expect("expand l1-3");

        assert!(!expanded(&m, "l1-2"));
        assert!(expanded(&m, "l1-3"));
        assert!(!visible(&m, "l2-1") && !visible(&m, "l2-2") && !visible(&m, "l2-3"));
        assert!(visible(&m, "l2-4") && visible(&m, "l2-5") && visible(&m, "l2-6"));
        assert!(!m.state().ambient_rotation_enabled);

        // Only the newly expanded node gets a focus.
        let l13 = m.hierarchy().index_of("l1-3").unwrap();
        assert_eq!(focus_targets(&m.drain_commands()), vec![(l13, FocusKind::Node)]);
        assert_invariants(&m);
    }

    #[test]
    fn overlay_without_content_is_empty() {
        let mut m = machine();
        m.toggle_level1("l1-3", &NoContent).expect("expand");
        m.drain_commands();
        m.open_overlay("l2-5", &NoContent).expect("open");

        let l25 = m.hierarchy().index_of("l2-5").unwrap();
        assert_eq!(m.state().current_overlay, Some(l25));
        assert_eq!(m.phase(), Phase::OverlayOpen(l25));

        let commands = m.drain_commands();
        assert_eq!(focus_targets(&commands), vec![(l25, FocusKind::Overlay)]);
        assert!(matches!(
            commands.iter().find_map(|c| match c {
                Command::Focus(f) => Some(f.duration_s),
                _ => None,
            }),
            Some(d) if (d - 1.5).abs() < 1e-12
        ));
        assert_eq!(
            ui(&commands),
            vec![
                UiIntent::BlurScene,
                UiIntent::ShowOverlay {
                    title: "Music".into(),
                    cards: Vec::new()
                },
            ]
        );
        assert!(!m.state().ambient_rotation_enabled);
        assert_invariants(&m);
    }

    #[test]
    fn overlay_lists_cards_from_content() {
        let mut m = machine();
        let store = content();
        m.toggle_level1("l1-3", &store).expect("expand");
        m.drain_commands();
        m.open_overlay("l2-4", &store).expect("open");

        let shown = ui(&m.drain_commands());
        assert_eq!(
            shown[1],
            UiIntent::ShowOverlay {
                title: "Dance".into(),
                cards: vec![card("Night"), card("Day")],
            }
        );
    }

    #[test]
    fn close_overlay_resumes_only_when_quiet() {
        let mut m = machine();
        m.toggle_level1("l1-3", &NoContent).expect("expand");
        m.open_overlay("l2-6", &NoContent).expect("open");
        m.drain_commands();

        m.close_overlay();
        assert_eq!(
            ui(&m.drain_commands()),
            vec![UiIntent::HideOverlay, UiIntent::UnblurScene]
        );
        // l1-3 is still expanded.
        assert!(!m.state().ambient_rotation_enabled);
        assert_invariants(&m);

        m.toggle_level1("l1-3", &NoContent).expect("collapse");
        assert!(m.state().ambient_rotation_enabled);
        assert_invariants(&m);
    }

    #[test]
    fn close_overlay_without_overlay_emits_no_ui() {
        let mut m = machine();
        m.close_overlay();
        assert!(ui(&m.drain_commands()).is_empty());
        assert_invariants(&m);
    }

    #[test]
    fn collapsing_parent_closes_child_overlay() {
        let mut m = machine();
        m.toggle_level1("l1-2", &NoContent).expect("expand");
        m.open_overlay("l2-2", &NoContent).expect("open");
        m.drain_commands();

        m.toggle_level1("l1-2", &NoContent).expect("collapse");
        assert_eq!(m.state().current_overlay, None);
        let shown = ui(&m.drain_commands());
        assert!(shown.contains(&UiIntent::HideOverlay));
        assert!(m.state().ambient_rotation_enabled);
        assert_eq!(m.phase(), Phase::Idle);
        assert_invariants(&m);
    }

    #[test]
    fn collapse_is_idempotent() {
        let mut m = machine();
        m.collapse_level1("l1-2").expect("noop");
        assert!(m.drain_commands().is_empty());

        m.toggle_level1("l1-2", &NoContent).expect("expand");
        m.collapse_level1("l1-2").expect("collapse");
        m.drain_commands();
        let before = m.hierarchy().iter().map(|(_, n)| n.is_visible()).collect::<Vec<_>>();

        m.collapse_level1("l1-2").expect("noop again");
        assert!(m.drain_commands().is_empty());
        let after = m.hierarchy().iter().map(|(_, n)| n.is_visible()).collect::<Vec<_>>();
        assert_eq!(before, after);
        assert_invariants(&m);
    }

    #[test]
    fn about_slot_opens_about_instead_of_expanding() {
        let mut m = machine();
        let store = content();
        m.toggle_level1("l1-1", &store).expect("about");

        assert!(!expanded(&m, "l1-1"));
        assert!(m.state().about_open);
        assert_eq!(m.phase(), Phase::AboutOpen);
        let shown = ui(&m.drain_commands());
        assert_eq!(shown[0], UiIntent::BlurScene);
        assert!(matches!(&shown[1], UiIntent::ShowAbout(a) if a.name == "Ada"));
        assert_invariants(&m);

        m.close_about();
        assert_eq!(
            ui(&m.drain_commands()),
            vec![UiIntent::HideModal, UiIntent::UnblurScene]
        );
        assert!(m.state().ambient_rotation_enabled);
        assert_invariants(&m);
    }

    #[test]
    fn about_without_content_shows_default_record() {
        let mut m = machine();
        m.open_about(&NoContent);
        let shown = ui(&m.drain_commands());
        assert_eq!(shown[1], UiIntent::ShowAbout(AboutRecord::default()));
    }

    #[test]
    fn detail_counts_as_modal() {
        let mut m = machine();
        let store = content();
        m.toggle_level1("l1-3", &store).expect("expand");
        m.open_overlay("l2-4", &store).expect("open");
        m.show_detail("l2-4", 1, &store).expect("detail");
        let l24 = m.hierarchy().index_of("l2-4").unwrap();
        assert_eq!(m.phase(), Phase::DetailOpen(l24));
        assert!(ui(&m.drain_commands()).contains(&UiIntent::ShowDetail(card("Day"))));

        m.close_detail();
        assert_eq!(ui(&m.drain_commands()), vec![UiIntent::HideModal]);
        assert_eq!(m.phase(), Phase::OverlayOpen(l24));
        assert_invariants(&m);
    }

    #[test]
    fn detail_errors_leave_state_untouched() {
        let mut m = machine();
        let store = content();
        assert_eq!(
            m.show_detail("l2-4", 0, &store).unwrap_err(),
            SceneError::OverlayNotOpen("l2-4".into())
        );

        m.toggle_level1("l1-3", &store).expect("expand");
        m.open_overlay("l2-4", &store).expect("open");
        m.drain_commands();
        let before = m.state().clone();

        assert_eq!(
            m.show_detail("l2-4", 2, &store).unwrap_err(),
            SceneError::CardOutOfRange {
                id: "l2-4".into(),
                index: 2,
                len: 2
            }
        );
        assert_eq!(m.state(), &before);
        assert!(m.drain_commands().is_empty());
    }

    #[test]
    fn unknown_and_mistyped_ids_are_rejected() {
        let mut m = machine();
        assert_eq!(
            m.apply(&Intent::SelectNode { id: "ghost".into() }, &NoContent)
                .unwrap_err(),
            SceneError::InvalidNodeId("ghost".into())
        );
        assert!(matches!(
            m.toggle_level1("l2-1", &NoContent),
            Err(SceneError::UnexpectedKind {
                expected: NodeKind::Level1,
                actual: NodeKind::Level2,
                ..
            })
        ));
        assert!(m.drain_commands().is_empty());
        assert_eq!(m.state(), &InteractionState::default());
        assert_invariants(&m);
    }

    #[test]
    fn select_routes_by_kind() {
        let mut m = machine();
        m.apply(&Intent::SelectNode { id: "root".into() }, &NoContent)
            .expect("root");
        assert_eq!(
            focus_targets(&m.drain_commands()),
            vec![(NodeIndex::ROOT, FocusKind::Node)]
        );
        assert_eq!(m.phase(), Phase::Idle);
        assert!(m.state().ambient_rotation_enabled);

        m.apply(&Intent::SelectNode { id: "l1-2".into() }, &NoContent)
            .expect("level-1");
        assert!(expanded(&m, "l1-2"));

        m.apply(&Intent::SelectNode { id: "l2-1".into() }, &NoContent)
            .expect("level-2");
        assert!(m.state().current_overlay.is_some());
        assert_invariants(&m);
    }

    #[test]
    fn drag_suppresses_auto_rotate_until_resume() {
        let mut m = machine();
        m.apply(&Intent::DragStart, &NoContent).expect("drag");
        assert!(m.state().ambient_rotation_enabled);
        assert!(!m.state().orbit_auto_rotate());
        assert!(m.state().globe_spinning());

        m.toggle_level1("l1-2", &NoContent).expect("expand");
        assert!(!m.state().globe_spinning());
        m.toggle_level1("l1-2", &NoContent).expect("collapse");
        assert!(m.state().orbit_auto_rotate());
        assert!(m.state().globe_spinning());
    }

    fn alphabet() -> Vec<Intent> {
        vec![
            Intent::ToggleLevel1 { id: "l1-2".into() },
            Intent::ToggleLevel1 { id: "l1-3".into() },
            Intent::CollapseLevel1 { id: "l1-3".into() },
            // The about slot, so this opens the About modal.
            Intent::SelectNode { id: "l1-1".into() },
            Intent::OpenOverlay { id: "l2-4".into() },
            Intent::ShowDetail {
                node: "l2-4".into(),
                card: 0,
            },
            Intent::CloseOverlay,
            Intent::CloseDetail,
            Intent::CloseAbout,
            Intent::DragStart,
        ]
    }

    /// Depth-first over every sequence of `alphabet` up to `depth` long,
    /// checking invariants after each step. Returns the number of steps.
    fn walk_every_sequence(
        m: &InteractionMachine,
        alphabet: &[Intent],
        store: &InMemoryContentStore,
        depth: usize,
        path: &mut Vec<usize>,
    ) -> usize {
        if depth == 0 {
            return 0;
        }
        let mut steps = 0;
        for (i, intent) in alphabet.iter().enumerate() {
            path.push(i);
            let mut next = m.clone();
            let before = next.state().clone();
            if next.apply(intent, store).is_err() {
                assert_eq!(next.state(), &before, "rejected step changed state: {path:?}");
                assert!(next.pending_commands().is_empty(), "{path:?}");
            }
            next.drain_commands();
            assert_invariants(&next);
            steps += 1 + walk_every_sequence(&next, alphabet, store, depth - 1, path);
            path.pop();
        }
        steps
    }

    #[test]
    fn invariants_hold_for_every_short_sequence() {
        let store = content();
        let alphabet = alphabet();
        let mut path = Vec::new();
        let steps = walk_every_sequence(&machine(), &alphabet, &store, 5, &mut path);

        let n = alphabet.len();
        let expected: usize = (1..=5).map(|len| n.pow(len)).sum();
        assert_eq!(steps, expected);
    }

    #[test]
    fn closing_everything_always_returns_to_idle() {
        let store = content();
        let alphabet = alphabet();
        let n = alphabet.len();
        for a in 0..n {
            for b in 0..n {
                for c in 0..n {
                    let mut m = machine();
                    for &i in &[a, b, c] {
                        let _ = m.apply(&alphabet[i], &store);
                    }
                    for close in [Intent::CloseDetail, Intent::CloseOverlay, Intent::CloseAbout] {
                        m.apply(&close, &store).expect("close never fails");
                    }
                    if let Some(open) = m.hierarchy().expanded_level1() {
                        let id = m.hierarchy().node(open).expect("node").id().to_string();
                        m.collapse_level1(&id).expect("collapse");
                    }
                    assert_eq!(m.phase(), Phase::Idle, "after {a} {b} {c}");
                    assert!(m.state().ambient_rotation_enabled);
                    assert!(!m.state().camera_busy);
                    assert!(m.state().orbit_auto_rotate());
                }
            }
        }
    }
}
