use serde::{Deserialize, Serialize};

/// Typed user intent, translated from raw clicks and drags by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Click on a node label; routed by node kind.
    SelectNode { id: String },
    ToggleLevel1 { id: String },
    CollapseLevel1 { id: String },
    OpenOverlay { id: String },
    CloseOverlay,
    ShowDetail { node: String, card: usize },
    CloseDetail,
    OpenAbout,
    CloseAbout,
    DragStart,
}

#[cfg(test)]
mod tests {
    use super::Intent;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_tagged_json() {
        let parsed: Vec<Intent> = serde_json::from_str(
            r#"[
                { "intent": "select_node", "id": "l1-2" },
                { "intent": "show_detail", "node": "l2-1", "card": 0 },
                { "intent": "close_overlay" },
                { "intent": "drag_start" }
            ]"#,
        )
        .expect("parse");

        assert_eq!(
            parsed,
            vec![
                Intent::SelectNode { id: "l1-2".into() },
                Intent::ShowDetail {
                    node: "l2-1".into(),
                    card: 0
                },
                Intent::CloseOverlay,
                Intent::DragStart,
            ]
        );
    }
}
