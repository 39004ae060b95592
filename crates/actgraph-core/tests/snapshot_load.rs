//! Snapshot loading against files on disk.

use std::path::Path;

use actgraph_core::snapshot::{self, EdgeRecord};
use actgraph_core::{
    CostAction, DiGraphStore, Element, FirstNodeAssembler, GraphError, GraphStore, ValueGraph,
};

type Store = DiGraphStore<String, CostAction>;

fn node(id: &str) -> Element<String, CostAction> {
    Element::Node(id.to_string())
}

fn edge(a: &str, b: &str, cost: f64) -> Element<String, CostAction> {
    Element::Edge {
        source: a.to_string(),
        target: b.to_string(),
        action: CostAction::new(cost),
    }
}

fn write_snapshot(dir: &Path, name: &str, elements: &[Element<String, CostAction>]) {
    let bytes = serde_json::to_vec(elements).expect("serialize");
    std::fs::write(dir.join(name), bytes).expect("write snapshot");
}

#[test]
fn interleaved_records_round_out_a_graph() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_snapshot(
        dir.path(),
        "level.json",
        &[
            node("start"),
            edge("start", "mid", 1.5),
            node("mid"),
            node("end"),
            edge("mid", "end", 2.0),
        ],
    );

    let g: ValueGraph<Store> =
        snapshot::load("level.json", dir.path(), &mut FirstNodeAssembler).expect("loaded");

    assert_eq!(g.initial_state(), "start");
    assert_eq!(g.total_nodes(), 3);
    assert_eq!(g.total_edges(), 2);
    assert_eq!(
        g.store().nodes(),
        vec!["start".to_string(), "mid".to_string(), "end".to_string()]
    );
    let d = g.distances().expect("distances");
    assert!((d["end"] - 3.5).abs() < 1e-9);
}

#[test]
fn nonexistent_identifier_is_absent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let g: Option<ValueGraph<Store>> =
        snapshot::load("missing.json", dir.path(), &mut FirstNodeAssembler);
    assert!(g.is_none());
}

#[test]
fn nonexistent_location_is_absent() {
    let g: Option<ValueGraph<Store>> = snapshot::load(
        "level.json",
        "/definitely/not/a/real/actgraph/location",
        &mut FirstNodeAssembler,
    );
    assert!(g.is_none());
}

#[test]
fn format_mismatch_is_absent() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("bad.json"), br#"[{"vertex":"a"}]"#).expect("write");
    let g: Option<ValueGraph<Store>> =
        snapshot::load("bad.json", dir.path(), &mut FirstNodeAssembler);
    assert!(g.is_none());
}

#[test]
fn empty_snapshot_fails_assembly() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_snapshot(dir.path(), "empty.json", &[]);
    let g: Option<ValueGraph<Store>> =
        snapshot::load("empty.json", dir.path(), &mut FirstNodeAssembler);
    assert!(g.is_none());
}

#[test]
fn closure_assembler_picks_its_own_initial_state() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_snapshot(
        dir.path(),
        "level.json",
        &[node("a"), node("b"), edge("b", "a", 1.0)],
    );

    let mut seen_edges = 0;
    let mut by_name = |nodes: Vec<String>, edges: Vec<EdgeRecord<String, CostAction>>| {
        seen_edges = edges.len();
        let store: Store = DiGraphStore::from_parts(nodes, edges);
        ValueGraph::new(store, "b".to_string())
    };
    let g: ValueGraph<Store> =
        snapshot::load("level.json", dir.path(), &mut by_name).expect("loaded");

    assert_eq!(g.initial_state(), "b");
    assert!(g.unreachable_nodes().orphans.is_empty());
    assert_eq!(seen_edges, 1);
}

#[test]
fn assembler_rejection_is_absent() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_snapshot(dir.path(), "level.json", &[node("a")]);

    let mut reject = |_: Vec<String>, _: Vec<EdgeRecord<String, CostAction>>| {
        Err::<ValueGraph<Store>, _>(GraphError::InitialStateMissing)
    };
    let g: Option<ValueGraph<Store>> = snapshot::load("level.json", dir.path(), &mut reject);
    assert!(g.is_none());
}
