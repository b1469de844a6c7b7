//! Search coordinator.
//!
//! [`SearchEngine`] walks the content tree depth-first in pre-order from a
//! start node, indexing and scoring each node it has not seen yet during the
//! current search.
//!
//! # Thread Safety
//!
//! One engine is shared by all requests:
//! - index cells live in an `RwLock<HashMap>` registry with double-checked
//!   insertion and are never evicted
//! - each cell serializes its own rebuilds, so unrelated nodes never contend
//! - visited-sets are local to one call to [`SearchEngine::search`]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::cell::IndexCell;
use crate::error::SearchError;
use crate::index::NodeIndex;
use crate::node::{ContentNode, NodeId, SearchBehavior, UNCACHEABLE};
use crate::query::Query;
use crate::result::{SearchOutcome, SearchResult};
use crate::score;

/// How nodes are identified in the visited-set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdentityMode {
    /// Each node instance is visited once (by [`ContentNode::id`]).
    #[default]
    Instance,
    /// Each node type is visited once (by [`ContentNode::type_name`]).
    ///
    /// Distinct siblings of the same type collapse into one entry, so only
    /// the first one reached is searched.
    Type,
}

/// Configuration for [`SearchEngine`].
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Longest time to wait for another request's rebuild of the same node.
    pub rebuild_timeout: Duration,
    /// Visited-set identity.
    pub identity: IdentityMode,
    /// Lower-case query terms before matching.
    pub normalize_query: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            rebuild_timeout: Duration::from_secs(30),
            identity: IdentityMode::Instance,
            normalize_query: true,
        }
    }
}

/// Visited-set entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum VisitKey {
    Instance(NodeId),
    Type(&'static str),
}

/// Full-text search over a tree of [`ContentNode`]s.
pub struct SearchEngine {
    config: SearchConfig,
    cells: RwLock<HashMap<NodeId, Arc<IndexCell>>>,
}

impl SearchEngine {
    /// Create an engine with an empty index cache.
    #[must_use]
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            cells: RwLock::new(HashMap::new()),
        }
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search the tree below `start` (inclusive).
    ///
    /// A query without terms returns an empty outcome without visiting any
    /// node.
    ///
    /// # Errors
    ///
    /// Returns the first indexing error; no partial results are returned.
    pub fn search(
        &self,
        raw_query: &str,
        start: &Arc<dyn ContentNode>,
    ) -> Result<SearchOutcome, SearchError> {
        let query = Query::parse(raw_query, self.config.normalize_query);
        if query.is_empty() {
            return Ok(SearchOutcome::default());
        }

        let started = Instant::now();
        let mut visited = HashSet::new();
        let mut results = Vec::new();
        self.walk(start, &query, &mut visited, &mut results)?;

        let outcome = SearchOutcome::ranked(query, results);
        tracing::debug!(
            start = %start.id(),
            terms = ?outcome.terms,
            visited = visited.len(),
            results = outcome.results.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Search completed"
        );
        Ok(outcome)
    }

    /// Score one node with the standard algorithm.
    ///
    /// Returns `None` unless every query term matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the node's index cannot be built.
    pub fn score_node(
        &self,
        node: &dyn ContentNode,
        query: &Query,
    ) -> Result<Option<SearchResult>, SearchError> {
        let index = self.index_for(node)?;
        let total = score::total_matches(index.weights(), query);
        if total == 0 {
            return Ok(None);
        }
        let probability = score::probability(total, index.size());
        Ok(Some(SearchResult::for_node(node, probability)))
    }

    /// Index of `node` at its current freshness stamp.
    ///
    /// Uncacheable nodes get a throwaway index built for this call only.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Render`] if rendering fails, or
    /// [`SearchError::RebuildTimeout`] if another rebuild does not finish in
    /// time.
    pub fn index_for(&self, node: &dyn ContentNode) -> Result<Arc<NodeIndex>, SearchError> {
        let stamp = node.freshness_stamp();
        let id = node.id();

        if stamp == UNCACHEABLE {
            return build_index(node, &id, stamp).map(Arc::new);
        }

        self.cell(&id)
            .get_or_rebuild(&id, stamp, self.config.rebuild_timeout, || {
                build_index(node, &id, stamp)
            })
    }

    /// Number of completed index rebuilds for a node.
    #[must_use]
    pub fn rebuild_count(&self, id: &NodeId) -> u64 {
        self.cells
            .read()
            .get(id)
            .map_or(0, |cell| cell.rebuild_count())
    }

    /// Number of nodes holding a cached index.
    #[must_use]
    pub fn cached_nodes(&self) -> usize {
        self.cells.read().len()
    }

    /// Get or create the cache cell of a node.
    fn cell(&self, id: &NodeId) -> Arc<IndexCell> {
        // Fast path: cell exists
        if let Some(cell) = self.cells.read().get(id) {
            return Arc::clone(cell);
        }

        // Slow path: the entry API rechecks under the write lock
        let mut cells = self.cells.write();
        Arc::clone(cells.entry(id.clone()).or_default())
    }

    fn visit_key(&self, node: &dyn ContentNode) -> VisitKey {
        match self.config.identity {
            IdentityMode::Instance => VisitKey::Instance(node.id()),
            IdentityMode::Type => VisitKey::Type(node.type_name()),
        }
    }

    /// Depth-first pre-order traversal.
    ///
    /// Children are pushed in reverse so they pop in listed order; the
    /// visited check happens when a node is popped, which matches a
    /// recursive walk without growing the call stack.
    fn walk(
        &self,
        start: &Arc<dyn ContentNode>,
        query: &Query,
        visited: &mut HashSet<VisitKey>,
        results: &mut Vec<SearchResult>,
    ) -> Result<(), SearchError> {
        let mut stack = vec![Arc::clone(start)];

        while let Some(node) = stack.pop() {
            if !visited.insert(self.visit_key(node.as_ref())) {
                continue;
            }

            let result = match node.search_behavior() {
                SearchBehavior::Default => self.score_node(node.as_ref(), query)?,
                SearchBehavior::Excluded => None,
                SearchBehavior::Custom(handler) => handler.evaluate(node.as_ref(), query, self)?,
            };
            results.extend(result);

            stack.extend(node.children().into_iter().rev());
        }

        Ok(())
    }
}

fn build_index(node: &dyn ContentNode, id: &NodeId, stamp: i64) -> Result<NodeIndex, SearchError> {
    NodeIndex::build(node, stamp).map_err(|source| SearchError::Render {
        node: id.clone(),
        source,
    })
}
