//! End-to-end repository workflow tests.
//!
//! These drive the four caller-facing operations (init, stage, commit,
//! reset) against a real temporary directory and check the on-disk
//! result.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use simplegit_repo::{
    InitStatus, ObjectId, ObjectKind, RepoConfig, RepoError, Repository, StageOutcome, Worktree,
};
use tempfile::TempDir;

fn setup() -> (TempDir, Repository) {
    let dir = TempDir::new().unwrap();
    let config = RepoConfig::default();
    assert_eq!(
        Repository::init(dir.path(), &config).unwrap(),
        InitStatus::Created
    );
    let repo = Repository::open(dir.path(), config).unwrap();
    (dir, repo)
}

fn write(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full, content).unwrap();
}

/// Every file outside the metadata directory with its content.
fn working_files(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    Worktree::new(root, ".simplegit")
        .files()
        .unwrap()
        .into_iter()
        .map(|rel| {
            let content = fs::read(root.join(&rel)).unwrap();
            (rel, content)
        })
        .collect()
}

/// Every file inside the metadata directory with its content.
fn metadata_files(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn collect(dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                collect(&path, out);
            } else {
                let content = fs::read(&path).unwrap();
                out.insert(path, content);
            }
        }
    }

    let mut files = BTreeMap::new();
    collect(&root.join(".simplegit"), &mut files);
    files
}

#[test]
fn scenario_reset_to_first_commit() {
    let (dir, repo) = setup();
    let root = dir.path();

    write(root, "a.txt", "hello");
    repo.stage("a.txt").unwrap();
    let c1 = repo.commit("first").unwrap();

    write(root, "b.txt", "world");
    repo.stage("b.txt").unwrap();
    let c2 = repo.commit("second").unwrap();

    // The second snapshot only records what was staged for it.
    let second = repo.read_tree(&repo.read_commit(&c2).unwrap().tree).unwrap();
    let paths: Vec<&str> = second.entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["b.txt"]);

    repo.reset(&c1.to_hex()).unwrap();

    assert!(!root.join("b.txt").exists());
    assert_eq!(fs::read_to_string(root.join("a.txt")).unwrap(), "hello");
    assert_eq!(repo.head().unwrap(), Some(c1));
    assert!(repo.staged().unwrap().is_empty());
}

#[test]
fn scenario_second_commit_carrying_both_files() {
    let (dir, repo) = setup();
    let root = dir.path();

    write(root, "a.txt", "hello");
    repo.stage("a.txt").unwrap();
    let c1 = repo.commit("first").unwrap();

    write(root, "b.txt", "world");
    repo.stage_all(&["a.txt", "b.txt"]).unwrap();
    let c2 = repo.commit("second").unwrap();

    let tree = repo.read_tree(&repo.read_commit(&c2).unwrap().tree).unwrap();
    let paths: Vec<&str> = tree.entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["a.txt", "b.txt"]);

    repo.reset(&c1.to_hex()).unwrap();
    assert!(!root.join("b.txt").exists());
    assert_eq!(fs::read_to_string(root.join("a.txt")).unwrap(), "hello");

    repo.reset(&c2.to_hex()).unwrap();
    assert_eq!(fs::read_to_string(root.join("b.txt")).unwrap(), "world");
    assert_eq!(repo.head().unwrap(), Some(c2));
}

#[test]
fn reset_restores_exact_file_set() {
    let (dir, repo) = setup();
    let root = dir.path();

    write(root, "src/main.rs", "fn main() {}\n");
    write(root, "README.md", "# readme\n");
    write(root, "data/blob.bin", "\u{0}\u{1}binary");
    repo.stage_all(&["src/main.rs", "README.md", "data/blob.bin"])
        .unwrap();
    let snapshot = working_files(root);
    let commit = repo.commit("snapshot").unwrap();

    write(root, "src/main.rs", "fn main() { changed(); }\n");
    write(root, "untracked.txt", "scratch");
    write(root, "nested/deeper/tmp.log", "log");
    fs::remove_file(root.join("README.md")).unwrap();

    repo.reset(&commit.to_hex()).unwrap();

    assert_eq!(working_files(root), snapshot);
    assert_eq!(repo.head().unwrap(), Some(commit));
    assert!(root.join(".simplegit/HEAD").is_file());
    assert!(repo.objects().exists(&commit));
}

#[test]
fn reset_clears_pending_staging() {
    let (dir, repo) = setup();
    let root = dir.path();

    write(root, "a.txt", "hello");
    repo.stage("a.txt").unwrap();
    let c1 = repo.commit("first").unwrap();

    write(root, "b.txt", "pending");
    repo.stage("b.txt").unwrap();
    assert_eq!(repo.staged().unwrap().len(), 1);

    repo.reset(&c1.to_hex()).unwrap();

    assert!(repo.staged().unwrap().is_empty());
    assert_eq!(
        fs::read_to_string(root.join(".simplegit/index.json")).unwrap(),
        "{}"
    );
    assert!(!root.join("b.txt").exists());
    assert_eq!(repo.head().unwrap(), Some(c1));
}

#[test]
fn reset_unknown_digest_changes_nothing() {
    let (dir, repo) = setup();
    let root = dir.path();

    write(root, "a.txt", "hello");
    repo.stage("a.txt").unwrap();
    let c1 = repo.commit("first").unwrap();
    write(root, "b.txt", "pending");
    repo.stage("b.txt").unwrap();
    write(root, "c.txt", "untracked");

    let files_before = working_files(root);
    let meta_before = metadata_files(root);

    for digest in ["deadbeefdeadbeefdeadbeefdeadbeefdeadbeef", "deadbeef", ""] {
        let result = repo.reset(digest);
        assert!(matches!(result, Err(RepoError::NotFound(_))), "{digest}");
    }

    assert_eq!(working_files(root), files_before);
    assert_eq!(metadata_files(root), meta_before);
    assert_eq!(repo.head().unwrap(), Some(c1));
    assert_eq!(repo.staged().unwrap().len(), 1);
}

#[test]
fn reset_to_blob_digest_is_rejected_without_changes() {
    let (dir, repo) = setup();
    let root = dir.path();

    write(root, "a.txt", "hello");
    let blob = repo.stage("a.txt").unwrap();
    write(root, "other.txt", "keep me");

    let result = repo.reset(&blob.to_hex());

    assert!(matches!(result, Err(RepoError::CorruptObject(_))));
    assert!(root.join("other.txt").exists());
    assert_eq!(repo.head().unwrap(), None);
    assert_eq!(repo.staged().unwrap().get("a.txt"), Some(blob));
}

#[test]
fn commit_with_empty_staging_writes_nothing() {
    let (dir, repo) = setup();
    let meta_before = metadata_files(dir.path());

    let result = repo.commit("nothing");

    assert!(matches!(result, Err(RepoError::EmptyStaging)));
    assert_eq!(metadata_files(dir.path()), meta_before);
    assert_eq!(repo.head().unwrap(), None);
}

#[test]
fn commit_clears_staging_and_moves_branch() {
    let (dir, repo) = setup();
    write(dir.path(), "a.txt", "hello");
    repo.stage("a.txt").unwrap();

    let commit = repo.commit("first").unwrap();

    assert!(repo.staged().unwrap().is_empty());
    assert_eq!(repo.head().unwrap(), Some(commit));
    assert_eq!(
        fs::read_to_string(dir.path().join(".simplegit/refs/heads/master")).unwrap(),
        commit.to_hex()
    );
    assert!(matches!(repo.commit("again"), Err(RepoError::EmptyStaging)));
}

#[test]
fn commit_payload_layout() {
    let (dir, repo) = setup();
    write(dir.path(), "a.txt", "hello");
    let blob = repo.stage("a.txt").unwrap();

    let commit_id = repo.commit_at("first", 1_700_000_000).unwrap();

    let commit = repo.objects().get(&commit_id).unwrap();
    let tree_id = repo.read_commit(&commit_id).unwrap().tree;
    assert_eq!(
        String::from_utf8(commit.data.to_vec()).unwrap(),
        format!(
            "\ntree {tree_id}\n\
             author User <user@example.com> 1700000000 +0000\n\
             committer User <user@example.com> 1700000000 +0000\n\
             \n\
             first\n"
        )
    );

    let tree = repo.objects().get(&tree_id).unwrap();
    assert_eq!(
        String::from_utf8(tree.data.to_vec()).unwrap(),
        format!("100644 0 blob {blob} a.txt")
    );
}

#[test]
fn staging_does_not_touch_refs_or_history() {
    let (dir, repo) = setup();
    let root = dir.path();

    write(root, "a.txt", "v1");
    repo.stage("a.txt").unwrap();
    let c1 = repo.commit("first").unwrap();
    let tree_before = repo.read_tree(&repo.read_commit(&c1).unwrap().tree).unwrap();

    write(root, "a.txt", "v2");
    let staged = repo.stage("a.txt").unwrap();

    assert_eq!(repo.head().unwrap(), Some(c1));
    let tree_after = repo.read_tree(&repo.read_commit(&c1).unwrap().tree).unwrap();
    assert_eq!(tree_after, tree_before);
    assert_ne!(tree_after.entries[0].id, staged);
}

#[test]
fn stage_missing_file_reports_and_keeps_index() {
    let (dir, repo) = setup();
    write(dir.path(), "a.txt", "hello");
    repo.stage("a.txt").unwrap();
    let index_before = repo.staged().unwrap();

    assert!(matches!(repo.stage("nope.txt"), Err(RepoError::NotFound(_))));
    assert_eq!(repo.staged().unwrap(), index_before);

    let outcomes = repo.stage_all(&["nope.txt", "a.txt"]).unwrap();
    assert_eq!(outcomes[0], ("nope.txt".to_string(), StageOutcome::Missing));
    assert!(matches!(outcomes[1].1, StageOutcome::Staged(_)));
}

#[test]
fn identical_content_shares_one_blob() {
    let (dir, repo) = setup();
    write(dir.path(), "one.txt", "same");
    write(dir.path(), "two.txt", "same");

    let a = repo.stage("one.txt").unwrap();
    let b = repo.stage("two.txt").unwrap();

    assert_eq!(a, b);
    assert_eq!(a, ObjectId::hash_object(ObjectKind::Blob, b"same"));
}

#[test]
fn reopened_handle_sees_persisted_state() {
    let (dir, repo) = setup();
    write(dir.path(), "a.txt", "hello");
    repo.stage("a.txt").unwrap();
    drop(repo);

    let repo = Repository::open(dir.path(), RepoConfig::default()).unwrap();
    assert_eq!(repo.staged().unwrap().len(), 1);
    let commit = repo.commit("after reopen").unwrap();

    let repo = Repository::open(dir.path(), RepoConfig::default()).unwrap();
    assert_eq!(repo.head().unwrap(), Some(commit));
}
