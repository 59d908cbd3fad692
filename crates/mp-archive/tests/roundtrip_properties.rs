//! Property-based tests for the packer/splitter pair.
//!
//! Uses proptest to check that packing a tree and splitting the result
//! reproduces the tree, and that the write-count equals the entry count.

use mp_archive::{split_file, ArchiveError, MarkerSet, MemorySink, Packer, SplitOptions, Splitter};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

/// Relative file paths: one to three directory segments, always ending in `.txt`
/// so no generated file can collide with a generated directory.
fn path_strategy() -> impl Strategy<Value = String> {
    (prop::collection::vec("[a-z]{1,6}", 0..3), "[a-z]{1,6}").prop_map(|(dirs, name)| {
        let mut parts = dirs;
        parts.push(format!("{name}.txt"));
        parts.join("/")
    })
}

/// Newline-terminated, non-empty content.
fn content_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z0-9 ,.;]{0,24}", 1..8).prop_map(|lines| {
        let mut content = lines.join("\n");
        content.push('\n');
        content
    })
}

fn tree_strategy() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(path_strategy(), content_strategy(), 1..8)
}

fn materialize(tree: &BTreeMap<String, String>) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    for (rel, content) in tree {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, content).expect("write");
    }
    dir
}

fn roundtrip(tree: &BTreeMap<String, String>, markers: MarkerSet) -> (usize, MemorySink) {
    let src = materialize(tree);
    let entries: Vec<String> = tree.keys().cloned().collect();

    let mut archive = Vec::new();
    Packer::new(markers.clone())
        .pack(src.path(), &entries, &mut archive)
        .expect("pack");

    let mut sink = MemorySink::new();
    let report = Splitter::new(SplitOptions::new(markers))
        .split(Cursor::new(archive), &mut sink)
        .expect("split");

    (report.files_written(), sink)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Pack then split reproduces every path and byte.
    #[test]
    fn pack_split_roundtrip(tree in tree_strategy()) {
        let (written, sink) = roundtrip(&tree, MarkerSet::default());

        prop_assert_eq!(written, tree.len());
        prop_assert_eq!(sink.len(), tree.len());
        for (rel, content) in &tree {
            prop_assert_eq!(sink.get_str(rel), Some(content.as_str()));
        }
    }

    /// Same law holds when boundaries come only from start markers.
    #[test]
    fn pack_split_roundtrip_without_end_markers(tree in tree_strategy()) {
        let (written, sink) = roundtrip(&tree, MarkerSet::default().without_end());

        prop_assert_eq!(written, tree.len());
        for (rel, content) in &tree {
            prop_assert_eq!(sink.get_str(rel), Some(content.as_str()));
        }
    }

    /// Splitting the same archive twice into one directory leaves the same
    /// bytes on disk, even over files edited in between.
    #[test]
    fn split_is_idempotent_on_disk(tree in tree_strategy()) {
        let src = materialize(&tree);
        let entries: Vec<String> = tree.keys().cloned().collect();
        let out = TempDir::new().expect("tempdir");
        let archive = out.path().join("combined.txt");
        Packer::default()
            .pack_to_file(src.path(), &entries, &archive)
            .expect("pack");

        let restored = out.path().join("restored");
        let options = SplitOptions::default();
        split_file(&archive, &restored, &options).expect("first split");
        let first = read_tree(&restored, &tree);

        for rel in tree.keys() {
            fs::write(restored.join(rel), "stale content that is longer than most lines\n")
                .expect("overwrite");
        }
        let report = split_file(&archive, &restored, &options).expect("second split");
        let second = read_tree(&restored, &tree);

        prop_assert_eq!(report.files_written(), tree.len());
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&second, &tree);
    }

    /// CRLF content never makes it into an archive.
    #[test]
    fn crlf_content_is_rejected(
        tree in tree_strategy(),
        crlf in content_strategy().prop_map(|c| c.replace('\n', "\r\n")),
    ) {
        let mut tree = tree;
        let victim = tree.keys().next().cloned().expect("non-empty tree");
        tree.insert(victim.clone(), crlf);
        let src = materialize(&tree);
        let entries: Vec<String> = tree.keys().cloned().collect();

        let mut archive = Vec::new();
        let err = Packer::default()
            .pack(src.path(), &entries, &mut archive)
            .expect_err("CRLF must be refused");

        let refused_victim = matches!(
            err,
            ArchiveError::CarriageReturn { ref path, line: 1 } if *path == victim
        );
        prop_assert!(refused_victim);
        prop_assert!(archive.is_empty());
    }
}

fn read_tree(root: &Path, tree: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    tree.keys()
        .map(|rel| {
            let content = fs::read_to_string(root.join(rel)).expect("read back");
            (rel.clone(), content)
        })
        .collect()
}
