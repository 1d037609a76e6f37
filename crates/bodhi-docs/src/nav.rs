use std::cmp::Ordering;
use std::path::Path;

use tracing::info;

use crate::docs::{self, slug_segments, Sidecars};
use crate::model::{DocDetails, NavItem};

/// Builds the sidebar tree for every document under `root`.
pub fn build_nav_tree(root: &Path) -> Vec<NavItem> {
    let (details, sidecars) = docs::load_all_details(root);
    let items = build_nav_from_details(&details, &sidecars);
    info!(
        documents = details.len(),
        top_level = items.len(),
        "navigation tree built"
    );
    items
}

/// Inserts each document by splitting its slug on `/`, creating folder nodes the first time a
/// prefix is seen. A document whose slug matches a folder becomes that folder's page and lends
/// it its title and order.
///
/// Children at every level end up sorted by order, then title, then slug.
pub fn build_nav_from_details(details: &[DocDetails], sidecars: &Sidecars) -> Vec<NavItem> {
    let mut roots: Vec<NavItem> = Vec::new();

    for doc in details {
        let segments: Vec<&str> = slug_segments(&doc.slug).collect();
        let Some((_, folders)) = segments.split_last() else {
            continue;
        };

        let mut level = &mut roots;
        for depth in 0..folders.len() {
            let prefix = segments[..=depth].join("/");
            let idx = match level.iter().position(|item| item.slug == prefix) {
                Some(idx) => idx,
                None => {
                    level.push(NavItem {
                        title: sidecars.folder_title(&prefix),
                        slug: prefix.clone(),
                        order: sidecars.folder_order(&prefix),
                        children: None,
                    });
                    level.len() - 1
                }
            };
            level = level[idx].children.get_or_insert_with(Vec::new);
        }

        let slug = segments.join("/");
        match level.iter_mut().find(|item| item.slug == slug) {
            Some(folder) => {
                folder.title = doc.title.clone();
                folder.order = doc.order;
            }
            None => level.push(NavItem {
                title: doc.title.clone(),
                slug,
                order: doc.order,
                children: None,
            }),
        }
    }

    sort_items(&mut roots);
    roots
}

fn compare_items(a: &NavItem, b: &NavItem) -> Ordering {
    a.order
        .cmp(&b.order)
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.slug.cmp(&b.slug))
}

fn sort_items(items: &mut [NavItem]) {
    items.sort_by(compare_items);
    for item in items.iter_mut() {
        if let Some(children) = item.children.as_mut() {
            sort_items(children);
        }
    }
}
