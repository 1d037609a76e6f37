use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::frontmatter::{self, FrontMatter};
use crate::model::{DocDetails, DocGroup, MetaEntry, DEFAULT_ORDER};

pub const META_FILE: &str = "_meta.json";
const DOC_EXTENSION: &str = "md";

/// Lists every markdown document under `root` as a slug, sorted.
///
/// Hidden entries and `_`-prefixed files are skipped. Unreadable entries are logged and
/// skipped; a missing root yields an empty list.
pub fn get_all_doc_paths(root: &Path) -> Vec<String> {
    let mut paths: Vec<String> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(|entry| {
            entry
                .inspect_err(|e| warn!(error = %e, "skipping unreadable docs entry"))
                .ok()
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry.path().extension().and_then(|e| e.to_str()) == Some(DOC_EXTENSION)
                && !entry.file_name().to_string_lossy().starts_with('_')
        })
        .filter_map(|entry| slug_for(root, entry.path()))
        .collect();
    paths.sort();
    paths
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn slug_for(root: &Path, file: &Path) -> Option<String> {
    let rel = file.strip_prefix(root).ok()?.with_extension("");
    let segments: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

/// Resolves a slug to its markdown file, refusing anything that would leave `root`.
pub fn doc_file_path(root: &Path, slug: &str) -> Option<PathBuf> {
    let segments: Vec<&str> = slug_segments(slug).collect();
    if segments.is_empty() || segments.iter().any(|s| *s == ".." || *s == ".") {
        return None;
    }
    let (file, folders) = segments.split_last()?;
    let mut path = root.to_path_buf();
    for segment in folders {
        path.push(segment);
    }
    path.push(format!("{file}.{DOC_EXTENSION}"));
    Some(path)
}

pub(crate) fn slug_segments(slug: &str) -> impl Iterator<Item = &str> {
    slug.split('/').filter(|s| !s.is_empty())
}

fn last_segment(slug: &str) -> &str {
    slug_segments(slug).last().unwrap_or(slug)
}

fn parent_slug(slug: &str) -> String {
    let segments: Vec<&str> = slug_segments(slug).collect();
    match segments.split_last() {
        Some((_, parents)) => parents.join("/"),
        None => String::new(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MetaValue {
    Order(i64),
    Entry(MetaEntry),
}

/// `_meta.json` sidecar entries keyed by the slug they describe.
///
/// A sidecar in folder `guides/` with key `install` describes slug `guides/install`, which may
/// be a document or a subfolder.
#[derive(Debug, Clone, Default)]
pub struct Sidecars {
    entries: HashMap<String, MetaEntry>,
}

impl Sidecars {
    /// Loads the sidecars of every folder the given slugs live in, including ancestors.
    pub fn load<'a>(root: &Path, slugs: impl IntoIterator<Item = &'a str>) -> Self {
        let mut folders: Vec<String> = vec![String::new()];
        for slug in slugs {
            if slug_segments(slug).any(|s| s == ".." || s == ".") {
                continue;
            }
            let mut folder = parent_slug(slug);
            while !folder.is_empty() {
                folders.push(folder.clone());
                folder = parent_slug(&folder);
            }
        }
        folders.sort();
        folders.dedup();

        let mut entries = HashMap::new();
        for folder in folders {
            for (name, entry) in read_sidecar(&root.join(&folder)) {
                let slug = if folder.is_empty() {
                    name
                } else {
                    format!("{folder}/{name}")
                };
                entries.insert(slug, entry);
            }
        }
        Self { entries }
    }

    #[cfg(test)]
    pub fn from_entries(entries: impl IntoIterator<Item = (String, MetaEntry)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn entry(&self, slug: &str) -> Option<&MetaEntry> {
        self.entries.get(slug)
    }

    pub fn title(&self, slug: &str) -> Option<&str> {
        self.entry(slug).and_then(|e| e.title.as_deref())
    }

    pub fn order(&self, slug: &str) -> Option<i64> {
        self.entry(slug).and_then(|e| e.order)
    }

    /// Title for a folder node: sidecar title, else the humanized folder name.
    pub fn folder_title(&self, slug: &str) -> String {
        self.title(slug)
            .map(str::to_string)
            .unwrap_or_else(|| frontmatter::humanize(last_segment(slug)))
    }

    pub fn folder_order(&self, slug: &str) -> i64 {
        self.order(slug).unwrap_or(DEFAULT_ORDER)
    }
}

fn read_sidecar(dir: &Path) -> Vec<(String, MetaEntry)> {
    let path = dir.join(META_FILE);
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!(error = %e, path = %path.display(), "failed to read sidecar, ignoring");
            return Vec::new();
        }
    };
    match serde_json::from_str::<BTreeMap<String, MetaValue>>(&raw) {
        Ok(map) => map
            .into_iter()
            .map(|(name, value)| {
                let entry = match value {
                    MetaValue::Order(order) => MetaEntry {
                        title: None,
                        order: Some(order),
                    },
                    MetaValue::Entry(entry) => entry,
                };
                (name, entry)
            })
            .collect(),
        Err(e) => {
            warn!(error = %e, path = %path.display(), "malformed sidecar, ignoring");
            Vec::new()
        }
    }
}

fn read_front_matter(root: &Path, slug: &str) -> Option<FrontMatter> {
    let path = doc_file_path(root, slug)?;
    let content = std::fs::read_to_string(&path)
        .inspect_err(|e| debug!(error = %e, path = %path.display(), "document not readable"))
        .ok()?;
    frontmatter::parse(&content)
        .map(|(front, _)| front)
        .inspect_err(|e| warn!(error = %e, slug, "malformed front-matter, using defaults"))
        .ok()
}

/// Order of a document or folder: front-matter, then sidecar, then [`DEFAULT_ORDER`].
pub fn get_path_order(root: &Path, slug: &str) -> i64 {
    if let Some(order) = read_front_matter(root, slug).and_then(|f| f.order) {
        return order;
    }
    Sidecars::load(root, [slug])
        .order(slug)
        .unwrap_or(DEFAULT_ORDER)
}

/// Reads a document's metadata. Never fails: anything unreadable falls back to defaults.
pub fn get_doc_details(root: &Path, slug: &str) -> DocDetails {
    let sidecars = Sidecars::load(root, [slug]);
    doc_details_with(root, slug, &sidecars)
}

pub(crate) fn doc_details_with(root: &Path, slug: &str, sidecars: &Sidecars) -> DocDetails {
    let front = read_front_matter(root, slug).unwrap_or_default();
    DocDetails {
        title: front
            .title
            .or_else(|| sidecars.title(slug).map(str::to_string))
            .unwrap_or_else(|| frontmatter::humanize(last_segment(slug))),
        description: front.description.unwrap_or_default(),
        slug: slug.to_string(),
        order: front
            .order
            .or_else(|| sidecars.order(slug))
            .unwrap_or(DEFAULT_ORDER),
    }
}

/// Metadata for every document under `root`, in slug order.
pub fn load_all_details(root: &Path) -> (Vec<DocDetails>, Sidecars) {
    let paths = get_all_doc_paths(root);
    let sidecars = Sidecars::load(root, paths.iter().map(String::as_str));
    let details = paths
        .iter()
        .map(|slug| doc_details_with(root, slug, &sidecars))
        .collect();
    (details, sidecars)
}

/// Documents under the folder `slug` (everything when `None`), grouped by parent folder.
///
/// Groups are sorted by folder order then title; entries inside a group by order then title.
/// Documents sitting directly in the requested folder form a group whose slug is that folder.
pub fn get_docs_for_slug(root: &Path, slug: Option<&str>) -> Vec<DocGroup> {
    let prefix = slug
        .map(|s| slug_segments(s).collect::<Vec<_>>().join("/"))
        .filter(|s| !s.is_empty());
    let (details, sidecars) = load_all_details(root);

    let mut grouped: BTreeMap<String, Vec<DocDetails>> = BTreeMap::new();
    for doc in details {
        let in_scope = match &prefix {
            Some(p) => doc.slug.starts_with(&format!("{p}/")),
            None => true,
        };
        if in_scope {
            grouped.entry(parent_slug(&doc.slug)).or_default().push(doc);
        }
    }

    let mut groups: Vec<DocGroup> = grouped
        .into_iter()
        .map(|(folder, mut entries)| {
            entries.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.title.cmp(&b.title)));
            let (title, order) = if folder.is_empty() {
                ("Overview".to_string(), i64::MIN)
            } else if prefix.as_deref() == Some(folder.as_str()) {
                (sidecars.folder_title(&folder), i64::MIN)
            } else {
                (sidecars.folder_title(&folder), sidecars.folder_order(&folder))
            };
            DocGroup {
                title,
                slug: folder,
                order,
                entries,
            }
        })
        .collect();
    groups.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.title.cmp(&b.title)));
    groups
}
