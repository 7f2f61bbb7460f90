use catalog::{AboutRecord, Card};
use scene::OverlayHost;
use tracing::info;

/// What the headless host is currently showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostView {
    pub overlay_title: Option<String>,
    pub overlay_cards: usize,
    pub modal: Option<String>,
    pub blurred: bool,
}

/// Overlay host that logs every presentation call and tracks the result.
#[derive(Debug, Default)]
pub struct LoggingOverlayHost {
    view: HostView,
    calls: usize,
}

impl LoggingOverlayHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &HostView {
        &self.view
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl OverlayHost for LoggingOverlayHost {
    fn show_overlay(&mut self, title: &str, cards: &[Card]) {
        info!(title, cards = cards.len(), "overlay shown");
        self.calls += 1;
        self.view.overlay_title = Some(title.to_string());
        self.view.overlay_cards = cards.len();
    }

    fn hide_overlay(&mut self) {
        info!("overlay hidden");
        self.calls += 1;
        self.view.overlay_title = None;
        self.view.overlay_cards = 0;
    }

    fn show_detail(&mut self, card: &Card) {
        info!(title = %card.title, layout = ?card.layout, "detail shown");
        self.calls += 1;
        self.view.modal = Some(card.title.clone());
    }

    fn show_about(&mut self, about: &AboutRecord) {
        info!(name = %about.name, "about shown");
        self.calls += 1;
        self.view.modal = Some(about.name.clone());
    }

    fn hide_modal(&mut self) {
        info!("modal hidden");
        self.calls += 1;
        self.view.modal = None;
    }

    fn blur_scene(&mut self) {
        self.calls += 1;
        self.view.blurred = true;
    }

    fn unblur_scene(&mut self) {
        self.calls += 1;
        self.view.blurred = false;
    }
}
