//! In-memory content nodes for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::error::NodeError;
use crate::node::{ContentNode, NodeId, SearchBehavior};

/// Shared record of visited node ids, in visit order.
#[derive(Clone, Debug, Default)]
pub(crate) struct VisitLog(Arc<Mutex<Vec<String>>>);

impl VisitLog {
    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    fn push(&self, id: &str) {
        self.0.lock().push(id.to_owned());
    }
}

/// Content node whose fields, stamp, and children can be changed in place.
///
/// Visits are logged from `children()`, which the engine calls exactly once
/// per visited node.
pub(crate) struct TestNode {
    id: String,
    kind: &'static str,
    title: Option<String>,
    description: Option<String>,
    keywords: Option<String>,
    author: Option<String>,
    body: RwLock<String>,
    stamp: AtomicI64,
    renders: AtomicUsize,
    failing: bool,
    behavior: SearchBehavior,
    children: RwLock<Vec<Arc<dyn ContentNode>>>,
    log: Option<VisitLog>,
}

impl TestNode {
    pub(crate) fn new(id: &str, stamp: i64) -> Self {
        Self {
            id: id.to_owned(),
            kind: "test",
            title: None,
            description: None,
            keywords: None,
            author: None,
            body: RwLock::new(String::new()),
            stamp: AtomicI64::new(stamp),
            renders: AtomicUsize::new(0),
            failing: false,
            behavior: SearchBehavior::Default,
            children: RwLock::new(Vec::new()),
            log: None,
        }
    }

    pub(crate) fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_owned());
        self
    }

    pub(crate) fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    pub(crate) fn with_keywords(mut self, keywords: &str) -> Self {
        self.keywords = Some(keywords.to_owned());
        self
    }

    pub(crate) fn with_author(mut self, author: &str) -> Self {
        self.author = Some(author.to_owned());
        self
    }

    pub(crate) fn with_body(self, body: &str) -> Self {
        self.set_body(body);
        self
    }

    pub(crate) fn with_kind(mut self, kind: &'static str) -> Self {
        self.kind = kind;
        self
    }

    pub(crate) fn with_behavior(mut self, behavior: SearchBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub(crate) fn logging(mut self, log: &VisitLog) -> Self {
        self.log = Some(log.clone());
        self
    }

    /// Make `render_body` fail.
    pub(crate) fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub(crate) fn set_body(&self, body: &str) {
        *self.body.write() = body.to_owned();
    }

    pub(crate) fn set_stamp(&self, stamp: i64) {
        self.stamp.store(stamp, Ordering::SeqCst);
    }

    pub(crate) fn add_child(&self, child: Arc<dyn ContentNode>) {
        self.children.write().push(child);
    }

    /// Drop all children, breaking reference cycles built by a test.
    pub(crate) fn clear_children(&self) {
        self.children.write().clear();
    }

    pub(crate) fn render_count(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl ContentNode for TestNode {
    fn id(&self) -> NodeId {
        NodeId::new(self.id.as_str())
    }

    fn type_name(&self) -> &'static str {
        self.kind
    }

    fn url(&self) -> String {
        format!("/{}", self.id)
    }

    fn render_body(&self) -> Result<String, NodeError> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(NodeError::NotFound(self.id.clone()));
        }
        Ok(self.body.read().clone())
    }

    fn title(&self) -> Option<String> {
        self.title.clone()
    }

    fn description(&self) -> Option<String> {
        self.description.clone()
    }

    fn keywords(&self) -> Option<String> {
        self.keywords.clone()
    }

    fn author(&self) -> Option<String> {
        self.author.clone()
    }

    fn freshness_stamp(&self) -> i64 {
        self.stamp.load(Ordering::SeqCst)
    }

    fn children(&self) -> Vec<Arc<dyn ContentNode>> {
        if let Some(log) = &self.log {
            log.push(&self.id);
        }
        self.children.read().clone()
    }

    fn search_behavior(&self) -> SearchBehavior {
        self.behavior.clone()
    }
}
