//! Integration tests for manifest-driven assignment.
//!
//! These tests run the same flow as the CLI:
//! 1. Parse options and a graph manifest from JSON
//! 2. Assign IDs to every module
//! 3. Inspect the updated graph

use hashed_module_ids::{
    HashedModuleIdAssigner, HashedModuleIdsOptions, InMemoryModuleGraph, ModuleGraph,
};

const MANIFEST: &str = r#"{
    "context": "/project",
    "modules": [
        {"identifier": "/project/src/index.js", "preOrderIndex": 0, "postOrderIndex": 4, "chunks": 1,
         "source": {"type": "normal", "request": "/project/src/index.js"}},
        {"identifier": "/project/src/module41.js", "preOrderIndex": 1, "postOrderIndex": 0, "chunks": 1,
         "source": {"type": "normal", "request": "/project/src/module41.js"}},
        {"identifier": "/project/src/module42.js", "preOrderIndex": 2, "postOrderIndex": 1, "chunks": 2,
         "source": {"type": "normal", "request": "/project/src/module42.js"}},
        {"identifier": "/project/src/unused.js", "preOrderIndex": 3, "postOrderIndex": 2, "chunks": 0,
         "source": {"type": "normal", "request": "/project/src/unused.js"}},
        {"identifier": "webpack/runtime/make namespace object", "chunks": 1,
         "source": {"type": "generated"}},
        {"identifier": "/project/src/locales", "preOrderIndex": 4, "postOrderIndex": 3, "chunks": 1, "id": "0",
         "source": {"type": "context", "directory": "/project/src/locales", "mode": "lazy", "recursive": true}}
    ]
}"#;

const OPTIONS: &str = r#"{"hashFunction": "sha256", "hashDigest": "hex", "hashDigestLength": 4}"#;

#[test]
fn test_manifest_flow() {
    let options = HashedModuleIdsOptions::from_json(OPTIONS).unwrap();
    let assigner = HashedModuleIdAssigner::new(&options).unwrap();
    let mut graph = InMemoryModuleGraph::from_json(MANIFEST).unwrap();

    let keys = graph.keys();
    let assignment = assigner.assign(&mut graph, &keys).unwrap();

    let ids: Vec<(&str, &str)> = assignment
        .entries
        .iter()
        .map(|e| (e.identifier.as_str(), e.id.as_str()))
        .collect();
    // sha256 hex of ./src/index.js = 31778454...
    assert_eq!(
        ids,
        vec![
            ("/project/src/index.js", "3177"),
            ("/project/src/module41.js", "1047"),
            ("/project/src/module42.js", "10477"),
        ]
    );

    let stats = assignment.stats;
    assert_eq!(stats.candidates, 6);
    assert_eq!(stats.assigned, 3);
    assert_eq!(stats.extended, 1);
    assert_eq!(stats.skipped_no_chunks, 1);
    assert_eq!(stats.skipped_existing_id, 1);
    assert_eq!(stats.skipped_no_identity, 1);

    let locales = graph.find("/project/src/locales").unwrap();
    assert_eq!(graph.module_id(locales).unwrap().as_str(), "0");
    let unused = graph.find("/project/src/unused.js").unwrap();
    assert!(graph.module_id(unused).is_none());
}

#[test]
fn test_manifest_flow_is_reproducible() {
    let options = HashedModuleIdsOptions::from_json(OPTIONS).unwrap();
    let assigner = HashedModuleIdAssigner::new(&options).unwrap();

    let mut first = InMemoryModuleGraph::from_json(MANIFEST).unwrap();
    let mut second = InMemoryModuleGraph::from_json(MANIFEST).unwrap();
    let keys = first.keys();

    let a = assigner.assign(&mut first, &keys).unwrap();
    let b = assigner.assign(&mut second, &keys).unwrap();

    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(first.to_manifest(), second.to_manifest());
}

#[test]
fn test_params_hash_tracks_options() {
    let a = HashedModuleIdAssigner::new(&HashedModuleIdsOptions::from_json(OPTIONS).unwrap()).unwrap();
    let b = HashedModuleIdAssigner::new(&HashedModuleIdsOptions::from_json(OPTIONS).unwrap()).unwrap();
    let c = HashedModuleIdAssigner::new(&HashedModuleIdsOptions::default()).unwrap();

    assert_eq!(a.params_hash(), b.params_hash());
    assert_ne!(a.params_hash(), c.params_hash());
}
