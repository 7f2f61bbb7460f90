//! Content behind the globe's leaf nodes: project cards and the About record.
//!
//! The interaction engine only ever reads through [`ContentLookup`]. Missing
//! or not-yet-loaded content is never an error for the reader; it resolves to
//! an empty presentation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardLayout {
    Academic,
    #[default]
    #[serde(other)]
    Leisure,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Outcome {
    pub title: String,
    pub link: String,
    pub icon: String,
    pub source: String,
    pub status: String,
    pub authors: String,
    pub intro: String,
}

/// Layout-specific detail payload. Academic cards use `full_desc` and
/// `outcomes`; leisure cards use the date/location/story/gallery fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardDetails {
    pub full_desc: Option<String>,
    pub outcomes: Vec<Outcome>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub story: Option<String>,
    pub gallery: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub title: String,
    #[serde(default)]
    pub thumb: String,
    #[serde(default)]
    pub short_intro: String,
    #[serde(default, rename = "layoutType")]
    pub layout: CardLayout,
    #[serde(default)]
    pub details: CardDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutRecord {
    pub name: String,
    pub tagline: String,
    pub portrait: String,
    pub cv_link: String,
    #[serde(rename = "rctupd")]
    pub recent_update: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub socials: Vec<SocialLink>,
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Read side of the content collaborator.
pub trait ContentLookup {
    /// Cards for a leaf node. Unknown ids resolve to no cards.
    fn project_cards(&self, node_id: &str) -> &[Card];

    /// The About record, if it has been loaded.
    fn about_info(&self) -> Option<&AboutRecord>;
}

/// Lookup that never has anything; stands in until content arrives.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoContent;

impl ContentLookup for NoContent {
    fn project_cards(&self, _node_id: &str) -> &[Card] {
        &[]
    }

    fn about_info(&self) -> Option<&AboutRecord> {
        None
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSnapshot {
    pub projects: BTreeMap<String, Vec<Card>>,
    pub about: Option<AboutRecord>,
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryContentStore {
    snapshot: ContentSnapshot,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: ContentSnapshot) -> Self {
        Self { snapshot }
    }

    /// Parses the projects document (`{ node_id: [card, ...] }`) and the
    /// About document.
    pub fn from_json_strs(projects: &str, about: &str) -> Result<Self, ContentError> {
        let projects: BTreeMap<String, Vec<Card>> =
            serde_json::from_str(projects).map_err(|source| ContentError::Parse {
                what: "projects",
                source,
            })?;
        let about: AboutRecord =
            serde_json::from_str(about).map_err(|source| ContentError::Parse {
                what: "about",
                source,
            })?;

        debug!(nodes = projects.len(), "parsed content documents");
        Ok(Self::from_snapshot(ContentSnapshot {
            projects,
            about: Some(about),
        }))
    }

    pub fn load(
        projects_path: impl AsRef<Path>,
        about_path: impl AsRef<Path>,
    ) -> Result<Self, ContentError> {
        let projects = read_file(projects_path.as_ref())?;
        let about = read_file(about_path.as_ref())?;
        Self::from_json_strs(&projects, &about)
    }

    pub fn insert_cards(&mut self, node_id: impl Into<String>, cards: Vec<Card>) {
        self.snapshot.projects.insert(node_id.into(), cards);
    }

    pub fn set_about(&mut self, about: AboutRecord) {
        self.snapshot.about = Some(about);
    }

    pub fn node_count(&self) -> usize {
        self.snapshot.projects.len()
    }

    pub fn snapshot(&self) -> &ContentSnapshot {
        &self.snapshot
    }
}

impl ContentLookup for InMemoryContentStore {
    fn project_cards(&self, node_id: &str) -> &[Card] {
        self.snapshot
            .projects
            .get(node_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn about_info(&self) -> Option<&AboutRecord> {
        self.snapshot.about.as_ref()
    }
}

fn read_file(path: &Path) -> Result<String, ContentError> {
    fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PROJECTS: &str = r#"{
        "l2-1": [
            {
                "title": "Crowd Signals",
                "thumb": "img/crowd.jpg",
                "shortIntro": "Reading a room at scale",
                "layoutType": "academic",
                "details": {
                    "fullDesc": "Long form",
                    "outcomes": [
                        { "title": "Paper", "link": "https://example.org", "icon": "*",
                          "source": "CHI", "status": "Published", "authors": "A, B", "intro": "..." }
                    ]
                }
            }
        ],
        "l2-4": [
            {
                "title": "Night Dance",
                "layoutType": "leisure",
                "details": { "date": "2024", "location": "Tokyo", "story": "...", "gallery": ["a.jpg"] }
            }
        ]
    }"#;

    const ABOUT: &str = r#"{
        "name": "Ada",
        "tagline": "Builder",
        "rctupd": "New paper",
        "skills": ["rust", "hci"],
        "socials": [{ "platform": "web", "url": "https://example.org", "icon": "@" }]
    }"#;

    #[test]
    fn parses_both_layouts() {
        let store = InMemoryContentStore::from_json_strs(PROJECTS, ABOUT).expect("parse");
        let academic = &store.project_cards("l2-1")[0];
        assert_eq!(academic.layout, CardLayout::Academic);
        assert_eq!(academic.short_intro, "Reading a room at scale");
        assert_eq!(academic.details.outcomes.len(), 1);

        let leisure = &store.project_cards("l2-4")[0];
        assert_eq!(leisure.layout, CardLayout::Leisure);
        assert_eq!(leisure.details.gallery, vec!["a.jpg".to_string()]);
        assert_eq!(leisure.details.location.as_deref(), Some("Tokyo"));
    }

    #[test]
    fn about_record_maps_renamed_fields() {
        let store = InMemoryContentStore::from_json_strs("{}", ABOUT).expect("parse");
        let about = store.about_info().expect("about loaded");
        assert_eq!(about.recent_update, "New paper");
        assert_eq!(about.skills, vec!["rust".to_string(), "hci".to_string()]);
        assert_eq!(about.portrait, "");
    }

    #[test]
    fn unknown_layout_falls_back_to_leisure() {
        let cards: Vec<Card> =
            serde_json::from_str(r#"[{ "title": "x", "layoutType": "poster" }]"#).expect("parse");
        assert_eq!(cards[0].layout, CardLayout::Leisure);
    }

    #[test]
    fn missing_content_resolves_to_empty() {
        let store = InMemoryContentStore::new();
        assert!(store.project_cards("l2-9").is_empty());
        assert!(store.about_info().is_none());
        assert!(NoContent.project_cards("anything").is_empty());
    }

    #[test]
    fn malformed_documents_report_which_one_failed() {
        let err = InMemoryContentStore::from_json_strs("[", ABOUT).unwrap_err();
        assert!(matches!(err, ContentError::Parse { what: "projects", .. }));
        let err = InMemoryContentStore::from_json_strs("{}", "nope").unwrap_err();
        assert!(matches!(err, ContentError::Parse { what: "about", .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = InMemoryContentStore::load("/nonexistent/data.json", "/nonexistent/about.json")
            .unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
    }
}
