//! Site state for the page hierarchy.
//!
//! Pages are stored in a flat `Vec<Page>` with parent/children relationships
//! tracked by indices. This provides:
//! - O(1) URL path lookups via `path_index`
//! - O(d) breadcrumb building where d is the page depth
//!
//! Besides its tree children, a page may list `include`d pages. Includes are
//! kept apart from the tree: they appear as extra search children but never
//! in navigation or breadcrumbs, so they may form cycles.

use std::collections::HashMap;

use serde::Serialize;

use crate::page::Page;

/// Navigation item with children for UI tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Display title.
    pub title: String,
    /// URL path without leading slash.
    pub path: String,
    /// Child navigation items.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

/// Breadcrumb navigation item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BreadcrumbItem {
    /// Display title.
    pub title: String,
    /// URL path without leading slash.
    pub path: String,
}

/// Immutable snapshot of the page hierarchy.
#[derive(Debug)]
pub struct SiteState {
    pages: Vec<Page>,
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
    includes: Vec<Vec<usize>>,
    path_index: HashMap<String, usize>,
    root: usize,
    loaded_at: i64,
}

impl SiteState {
    /// Page by URL path without leading slash.
    #[must_use]
    pub fn get_page(&self, path: &str) -> Option<&Page> {
        self.index_of(path).map(|i| &self.pages[i])
    }

    pub(crate) fn index_of(&self, path: &str) -> Option<usize> {
        self.path_index.get(path).copied()
    }

    pub(crate) fn page(&self, index: usize) -> &Page {
        &self.pages[index]
    }

    /// All pages in load order.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub(crate) fn root_index(&self) -> usize {
        self.root
    }

    /// Tree children of a page, in display order.
    pub(crate) fn children_of(&self, index: usize) -> &[usize] {
        &self.children[index]
    }

    /// Included pages of a page, in listed order.
    pub(crate) fn includes_of(&self, index: usize) -> &[usize] {
        &self.includes[index]
    }

    /// Load time in milliseconds since the Unix epoch.
    #[must_use]
    pub fn loaded_at(&self) -> i64 {
        self.loaded_at
    }

    /// Navigation tree below the root page.
    #[must_use]
    pub fn navigation(&self) -> Vec<NavItem> {
        self.children[self.root]
            .iter()
            .map(|&i| self.build_nav_item(i))
            .collect()
    }

    fn build_nav_item(&self, index: usize) -> NavItem {
        let page = &self.pages[index];
        NavItem {
            title: page.title.clone(),
            path: page.path.clone(),
            children: self.children[index]
                .iter()
                .map(|&i| self.build_nav_item(i))
                .collect(),
        }
    }

    /// Breadcrumbs for a page: the root followed by its ancestors.
    ///
    /// The page itself is not included. The root has no breadcrumbs, and an
    /// unknown path gets only the root.
    #[must_use]
    pub fn breadcrumbs(&self, path: &str) -> Vec<BreadcrumbItem> {
        if path.is_empty() {
            return Vec::new();
        }

        let root = &self.pages[self.root];
        let home = BreadcrumbItem {
            title: root.title.clone(),
            path: String::new(),
        };

        let Some(index) = self.index_of(path) else {
            return vec![home];
        };

        let mut ancestors = Vec::new();
        let mut current = self.parents[index];
        while let Some(i) = current {
            if i != self.root {
                ancestors.push(&self.pages[i]);
            }
            current = self.parents[i];
        }
        ancestors.reverse();

        let mut breadcrumbs = vec![home];
        breadcrumbs.extend(ancestors.into_iter().map(|page| BreadcrumbItem {
            title: page.title.clone(),
            path: page.path.clone(),
        }));
        breadcrumbs
    }
}

/// Builder for [`SiteState`].
pub(crate) struct SiteStateBuilder {
    pages: Vec<Page>,
    parents: Vec<Option<usize>>,
    path_index: HashMap<String, usize>,
}

impl SiteStateBuilder {
    pub(crate) fn new() -> Self {
        Self {
            pages: Vec::new(),
            parents: Vec::new(),
            path_index: HashMap::new(),
        }
    }

    /// Index of an already added page.
    pub(crate) fn index_of(&self, path: &str) -> Option<usize> {
        self.path_index.get(path).copied()
    }

    /// Add a page and return its index.
    ///
    /// A page with an already known path replaces nothing and returns the
    /// existing index.
    pub(crate) fn add_page(&mut self, page: Page, parent: Option<usize>) -> usize {
        if let Some(existing) = self.index_of(&page.path) {
            tracing::warn!(path = %page.path, "Duplicate page path, keeping first");
            return existing;
        }
        let index = self.pages.len();
        self.path_index.insert(page.path.clone(), index);
        self.pages.push(page);
        self.parents.push(parent);
        index
    }

    /// Finish the state.
    ///
    /// Children are ordered landing pages first, then by title. Unknown
    /// include paths are skipped with a warning. `root` must be the index of
    /// an added page.
    pub(crate) fn build(self, root: usize, loaded_at: i64) -> SiteState {
        let mut children = vec![Vec::new(); self.pages.len()];
        for (index, parent) in self.parents.iter().enumerate() {
            if let Some(parent) = parent {
                children[*parent].push(index);
            }
        }
        for list in &mut children {
            list.sort_by(|&a, &b| {
                let (a, b) = (&self.pages[a], &self.pages[b]);
                b.is_landing
                    .cmp(&a.is_landing)
                    .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
                    .then_with(|| a.path.cmp(&b.path))
            });
        }

        let includes = self
            .pages
            .iter()
            .map(|page| {
                page.metadata
                    .include
                    .iter()
                    .filter_map(|target| {
                        let target = target.trim_matches('/');
                        let resolved = self.path_index.get(target).copied();
                        if resolved.is_none() {
                            tracing::warn!(page = %page.path, include = %target, "Unknown include, skipping");
                        }
                        resolved
                    })
                    .collect()
            })
            .collect();

        SiteState {
            pages: self.pages,
            children,
            parents: self.parents,
            includes,
            path_index: self.path_index,
            root,
            loaded_at,
        }
    }
}
