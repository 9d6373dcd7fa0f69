//! Fuzz target for building a tree from arbitrary entry-name lists.
//!
//! Run with: cargo +nightly fuzz run tree_build
//!
//! Input is split on NUL into entry names.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let names: Vec<&str> = text.split('\0').collect();

    let Ok(tree) = tiwut::ArchiveTree::build(&names) else {
        return;
    };

    // Every node is reachable exactly once and sits under its parent directory
    assert_eq!(tree.walk().len(), tree.len());
    for node in tree.iter() {
        assert!(tree.contains(node.full_path()));
        if let Some(parent) = node.parent() {
            let parent = tree.node(parent);
            assert!(parent.is_directory());
            assert!(node.full_path().starts_with(parent.full_path()));
        }
    }
});
