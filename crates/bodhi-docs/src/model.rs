use serde::{Deserialize, Serialize};

/// Order assigned to documents and folders without explicit metadata.
pub const DEFAULT_ORDER: i64 = 999;

/// Metadata for a single markdown document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocDetails {
    pub title: String,
    pub description: String,
    /// Path relative to the docs root, `/`-separated, without the `.md` extension.
    pub slug: String,
    pub order: i64,
}

/// A sidebar entry. Folders carry `children`; plain documents do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub title: String,
    pub slug: String,
    #[serde(skip)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NavItem>>,
}

/// One entry of a `_meta.json` sidecar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

/// Documents sharing a parent folder, as listed on a docs index page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocGroup {
    pub title: String,
    /// Folder slug; empty for the docs root.
    pub slug: String,
    pub order: i64,
    pub entries: Vec<DocDetails>,
}

/// A rendered document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocPage {
    pub details: DocDetails,
    pub html: String,
}
