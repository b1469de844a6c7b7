//! Benchmarks for tree search.

use std::sync::Arc;

use arbor_search::{ContentNode, NodeError, NodeId, SearchConfig, SearchEngine, UNCACHEABLE};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

/// Static in-memory page.
struct BenchNode {
    id: String,
    title: String,
    body: String,
    stamp: i64,
    children: Vec<Arc<dyn ContentNode>>,
}

impl ContentNode for BenchNode {
    fn id(&self) -> NodeId {
        NodeId::new(self.id.as_str())
    }

    fn type_name(&self) -> &'static str {
        "bench"
    }

    fn url(&self) -> String {
        format!("/{}", self.id)
    }

    fn render_body(&self) -> Result<String, NodeError> {
        Ok(self.body.clone())
    }

    fn title(&self) -> Option<String> {
        Some(self.title.clone())
    }

    fn freshness_stamp(&self) -> i64 {
        self.stamp
    }

    fn children(&self) -> Vec<Arc<dyn ContentNode>> {
        self.children.clone()
    }
}

/// Build a tree with the given depth and breadth.
fn create_tree(id: &str, depth: usize, breadth: usize, stamp: i64) -> Arc<dyn ContentNode> {
    let children = if depth == 0 {
        Vec::new()
    } else {
        (0..breadth)
            .map(|i| create_tree(&format!("{id}/s{i}"), depth - 1, breadth, stamp))
            .collect()
    };
    let body = format!(
        "<h2>Overview</h2><p>Section {id} describes installation, configuration \
         and deployment of the service at depth {depth}.</p>"
    )
    .repeat(20);

    Arc::new(BenchNode {
        id: id.to_owned(),
        title: format!("Section {id}"),
        body,
        stamp,
        children,
    })
}

fn bench_search_cached(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_cached");

    for (depth, breadth) in [(2, 5), (3, 5), (4, 4)] {
        let root = create_tree("root", depth, breadth, 1);
        let engine = SearchEngine::new(SearchConfig::default());
        engine.search("warmup", &root).unwrap();

        group.bench_with_input(
            BenchmarkId::new("two_terms", format!("{depth}x{breadth}")),
            &root,
            |b, root| b.iter(|| engine.search("installation deployment", root).unwrap()),
        );
    }

    group.finish();
}

fn bench_search_uncacheable(c: &mut Criterion) {
    let root = create_tree("root", 3, 5, UNCACHEABLE);
    let engine = SearchEngine::new(SearchConfig::default());

    c.bench_function("search_uncacheable", |b| {
        b.iter(|| engine.search("configuration", &root).unwrap());
    });
}

criterion_group!(benches, bench_search_cached, bench_search_uncacheable);
criterion_main!(benches);
