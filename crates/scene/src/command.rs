use catalog::{AboutRecord, Card};

use crate::node::NodeIndex;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FocusKind {
    Node,
    Overlay,
}

/// Ask the camera to bring a node to face the viewer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FocusRequest {
    pub node: NodeIndex,
    pub duration_s: f64,
    pub kind: FocusKind,
}

/// Presentation work for the 2D overlay host.
#[derive(Debug, Clone, PartialEq)]
pub enum UiIntent {
    ShowOverlay { title: String, cards: Vec<Card> },
    HideOverlay,
    ShowDetail(Card),
    ShowAbout(AboutRecord),
    HideModal,
    BlurScene,
    UnblurScene,
}

/// Output of the interaction machine, drained by the frame driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Focus(FocusRequest),
    Ui(UiIntent),
    AmbientRotation { enabled: bool },
}

/// DOM-side collaborator that draws overlays and modals.
pub trait OverlayHost {
    fn show_overlay(&mut self, title: &str, cards: &[Card]);
    fn hide_overlay(&mut self);
    fn show_detail(&mut self, card: &Card);
    fn show_about(&mut self, about: &AboutRecord);
    fn hide_modal(&mut self);
    fn blur_scene(&mut self);
    fn unblur_scene(&mut self);
}

impl UiIntent {
    pub fn apply_to(&self, host: &mut dyn OverlayHost) {
        match self {
            UiIntent::ShowOverlay { title, cards } => host.show_overlay(title, cards),
            UiIntent::HideOverlay => host.hide_overlay(),
            UiIntent::ShowDetail(card) => host.show_detail(card),
            UiIntent::ShowAbout(about) => host.show_about(about),
            UiIntent::HideModal => host.hide_modal(),
            UiIntent::BlurScene => host.blur_scene(),
            UiIntent::UnblurScene => host.unblur_scene(),
        }
    }
}
