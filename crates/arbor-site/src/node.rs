//! Searchable views of the page tree.
//!
//! Nodes are small handles (`Arc<SiteState>` plus an index) created on
//! demand, so the state itself never holds references to nodes and shared
//! or cyclic includes cannot leak memory.

use std::fmt::Write;
use std::sync::Arc;

use arbor_search::{
    ContentNode, CustomSearch, NodeError, NodeFields, NodeId, NodeIndex, Query, SearchBehavior,
    SearchEngine, SearchError, SearchResult, probability, total_matches,
};

use crate::markdown::escape_html;
use crate::metadata::SearchMode;
use crate::page::Page;
use crate::site_state::SiteState;

/// URL path of the generated sitemap.
pub const SITEMAP_PATH: &str = "_sitemap";

/// A page of a [`SiteState`] snapshot.
pub struct PageNode {
    state: Arc<SiteState>,
    index: usize,
}

impl PageNode {
    pub(crate) fn new(state: Arc<SiteState>, index: usize) -> Self {
        Self { state, index }
    }

    fn page(&self) -> &Page {
        self.state.page(self.index)
    }

    fn is_root(&self) -> bool {
        self.index == self.state.root_index()
    }
}

impl ContentNode for PageNode {
    fn id(&self) -> NodeId {
        NodeId::new(self.page().url())
    }

    fn type_name(&self) -> &'static str {
        if self.page().has_content() {
            "page"
        } else {
            "virtual-page"
        }
    }

    fn url(&self) -> String {
        self.page().url()
    }

    fn render_body(&self) -> Result<String, NodeError> {
        self.page().render_html()
    }

    fn title(&self) -> Option<String> {
        Some(self.page().title.clone())
    }

    fn description(&self) -> Option<String> {
        self.page().metadata.description.clone()
    }

    fn keywords(&self) -> Option<String> {
        self.page().metadata.keywords.clone()
    }

    fn author(&self) -> Option<String> {
        self.page().metadata.author.clone()
    }

    fn author_url(&self) -> Option<String> {
        self.page().metadata.author_url.clone()
    }

    fn freshness_stamp(&self) -> i64 {
        self.page().freshness_stamp()
    }

    /// Tree children, then included pages; the root ends with the sitemap.
    fn children(&self) -> Vec<Arc<dyn ContentNode>> {
        let tree = self.state.children_of(self.index);
        let includes = self.state.includes_of(self.index);

        let mut children: Vec<Arc<dyn ContentNode>> = tree
            .iter()
            .chain(includes)
            .map(|&i| Arc::new(Self::new(Arc::clone(&self.state), i)) as Arc<dyn ContentNode>)
            .collect();
        if self.is_root() {
            children.push(Arc::new(SitemapNode::new(Arc::clone(&self.state))));
        }
        children
    }

    fn search_behavior(&self) -> SearchBehavior {
        match self.page().metadata.search_mode() {
            SearchMode::Default => SearchBehavior::Default,
            SearchMode::Exclude => SearchBehavior::Excluded,
            SearchMode::TitleOnly => SearchBehavior::Custom(Arc::new(TitleOnlySearch)),
        }
    }
}

/// Generated page listing every page of the site.
///
/// Never returned by search.
pub struct SitemapNode {
    state: Arc<SiteState>,
}

impl SitemapNode {
    pub(crate) fn new(state: Arc<SiteState>) -> Self {
        Self { state }
    }
}

impl ContentNode for SitemapNode {
    fn id(&self) -> NodeId {
        NodeId::new(format!("/{SITEMAP_PATH}"))
    }

    fn type_name(&self) -> &'static str {
        "sitemap"
    }

    fn url(&self) -> String {
        format!("/{SITEMAP_PATH}")
    }

    fn render_body(&self) -> Result<String, NodeError> {
        let mut html = String::from("<h1>Sitemap</h1>\n<ul>\n");
        for page in self.state.pages() {
            let _ = writeln!(
                html,
                "<li><a href=\"{}\">{}</a></li>",
                escape_html(&page.url()),
                escape_html(&page.title)
            );
        }
        html.push_str("</ul>\n");
        Ok(html)
    }

    fn title(&self) -> Option<String> {
        Some("Sitemap".to_owned())
    }

    fn freshness_stamp(&self) -> i64 {
        self.state.loaded_at()
    }

    fn children(&self) -> Vec<Arc<dyn ContentNode>> {
        Vec::new()
    }

    fn search_behavior(&self) -> SearchBehavior {
        SearchBehavior::Excluded
    }
}

/// Scores a node on its metadata alone, without rendering the body.
///
/// Uses the standard field weights and scoring.
pub struct TitleOnlySearch;

impl CustomSearch for TitleOnlySearch {
    fn evaluate(
        &self,
        node: &dyn ContentNode,
        query: &Query,
        _engine: &SearchEngine,
    ) -> Result<Option<SearchResult>, SearchError> {
        let index = NodeIndex::from_parts(node.freshness_stamp(), &NodeFields::of(node), "");
        let total = total_matches(index.weights(), query);
        if total == 0 {
            return Ok(None);
        }
        Ok(Some(SearchResult::for_node(
            node,
            probability(total, index.size()),
        )))
    }
}
