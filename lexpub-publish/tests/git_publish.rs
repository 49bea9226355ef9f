//! End-to-end publish against throwaway git repositories.
//!
//! Requires the `git` binary on PATH for fetch/push.

use std::fs;
use std::path::Path;

use git2::Repository;
use lexpub_core::{config::PublishConfig, types::BranchName};
use lexpub_publish::{
    pipeline::{self, PublishScope},
    BranchOutcome, GitSink, OutputSink,
};
use tempfile::TempDir;

const CATALOG: &str = r#"
deed_languages: [en, nl]
translation_branches:
  - id: 3
    branch_name: nl-4.0
    language_code: nl
    version: "4.0"
    complete: false
legal_codes:
  - unit: by-sa
    version: "4.0"
    language_code: en
    title: Attribution-ShareAlike 4.0 International
  - unit: by-sa
    version: "4.0"
    language_code: nl
    title: Naamsvermelding-GelijkDelen 4.0 Internationaal
  - unit: zero
    version: "1.0"
    language_code: en
    title: CC0 1.0 Universal
"#;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct Workspace {
    _tmp: TempDir,
    remote: std::path::PathBuf,
    work: std::path::PathBuf,
}

/// A bare `remote.git` and a working clone-alike `work` whose `main` branch
/// holds the catalog and legacy tree and has been pushed.
fn workspace() -> Workspace {
    let tmp = TempDir::new().unwrap();
    let remote = tmp.path().join("remote.git");
    let work = tmp.path().join("work");
    Repository::init_bare(&remote).unwrap();

    let repo = Repository::init(&work).unwrap();
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Publisher").unwrap();
    config.set_str("user.email", "publisher@example.org").unwrap();
    repo.remote("origin", remote.to_str().unwrap()).unwrap();

    fs::write(work.join("catalog.yaml"), CATALOG).unwrap();
    for dir in ["legacy/rdf-licenses", "legacy/rdf-meta", "legacy/legalcode", "static", "docs"] {
        fs::create_dir_all(work.join(dir)).unwrap();
    }
    fs::write(work.join("legacy/rdf-licenses/by-sa_4.0.rdf"), "<rdf/>").unwrap();
    fs::write(work.join("legacy/rdf-meta/index.rdf"), "<index/>").unwrap();
    fs::write(work.join("legacy/legalcode/zero_1.0.txt"), "cc0").unwrap();
    fs::write(work.join("static/site.css"), "body {}").unwrap();
    fs::write(work.join("docs/CNAME"), "licenses.example.org").unwrap();

    let mut sink = GitSink::open(&work, "origin", "main").unwrap();
    sink.checkout_branch(&BranchName::from("main")).unwrap();
    sink.commit_all(Path::new("."), "Initial data").unwrap();
    sink.push(&BranchName::from("main")).unwrap();

    Workspace {
        _tmp: tmp,
        remote,
        work,
    }
}

fn config(work: &Path) -> PublishConfig {
    PublishConfig {
        repository_dir: work.to_path_buf(),
        output_dir: work.join("docs"),
        legacy_dir: work.join("legacy"),
        static_root: work.join("static"),
        catalog_path: work.join("catalog.yaml"),
        templates_dir: None,
        remote: "origin".to_string(),
        default_branch: "main".to_string(),
    }
}

#[test]
#[cfg(unix)]
fn first_publish_commits_and_pushes_then_second_is_unchanged() {
    init_logging();
    let ws = workspace();
    let scope = PublishScope::Branch(BranchName::from("nl-4.0"));

    let reports = pipeline::run(config(&ws.work), scope.clone(), true).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].outcome, BranchOutcome::Committed { pushed: true });
    assert_eq!(reports[0].distill.deeds_skipped, 0);

    let remote = Repository::open_bare(&ws.remote).unwrap();
    let pushed = remote
        .find_reference("refs/heads/nl-4.0")
        .unwrap()
        .peel_to_commit()
        .unwrap();
    assert_eq!(pushed.message(), Some("Updated built HTML files"));
    let tree = pushed.tree().unwrap();
    assert!(tree
        .get_path(Path::new("docs/licenses/by-sa/4.0/deed.nl.html"))
        .is_ok());
    assert!(tree.get_path(Path::new("docs/licenses/index.rdf")).is_ok());
    assert!(tree.get_path(Path::new("docs/CNAME")).is_ok());

    let reports = pipeline::run(config(&ws.work), scope, true).unwrap();
    assert_eq!(reports[0].outcome, BranchOutcome::Unchanged);
    let after = remote
        .find_reference("refs/heads/nl-4.0")
        .unwrap()
        .target()
        .unwrap();
    assert_eq!(after, pushed.id(), "no new commit on an unchanged rebuild");
}

#[test]
#[cfg(unix)]
fn nopush_leaves_remote_untouched() {
    init_logging();
    let ws = workspace();

    let reports = pipeline::run(config(&ws.work), PublishScope::All, false).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].outcome, BranchOutcome::Committed { pushed: false });

    let remote = Repository::open_bare(&ws.remote).unwrap();
    assert!(remote.find_reference("refs/heads/nl-4.0").is_err());

    let work = Repository::open(&ws.work).unwrap();
    assert_eq!(work.head().unwrap().shorthand(), Some("nl-4.0"));
}

#[test]
#[cfg(unix)]
fn new_branch_tracks_remote_branch_when_it_exists() {
    init_logging();
    let ws = workspace();
    let scope = PublishScope::Branch(BranchName::from("nl-4.0"));
    pipeline::run(config(&ws.work), scope.clone(), true).unwrap();

    // Drop the local branch; the next run recreates it from origin/nl-4.0.
    let work = Repository::open(&ws.work).unwrap();
    let main = work.find_branch("main", git2::BranchType::Local).unwrap();
    let main_commit = main.get().peel_to_commit().unwrap();
    work.checkout_tree(main_commit.as_object(), None).unwrap();
    work.set_head("refs/heads/main").unwrap();
    work.find_branch("nl-4.0", git2::BranchType::Local)
        .unwrap()
        .delete()
        .unwrap();

    let reports = pipeline::run(config(&ws.work), scope, true).unwrap();
    assert_eq!(reports[0].outcome, BranchOutcome::Unchanged);

    let local = work.find_branch("nl-4.0", git2::BranchType::Local).unwrap();
    let upstream = local.upstream().unwrap();
    assert_eq!(upstream.name().unwrap(), Some("origin/nl-4.0"));
}

/// Second working copy of `remote` at `dest`, via the `git` binary.
fn clone(remote: &Path, dest: &Path) -> Repository {
    let status = std::process::Command::new("git")
        .args(["clone", "--branch", "main"])
        .arg(remote)
        .arg(dest)
        .output()
        .expect("run git clone");
    assert!(status.status.success(), "git clone failed: {status:?}");
    let repo = Repository::open(dest).unwrap();
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Translator").unwrap();
    config.set_str("user.email", "translator@example.org").unwrap();
    repo
}

#[test]
#[cfg(unix)]
fn local_branch_fast_forwards_when_remote_is_ahead() {
    init_logging();
    let ws = workspace();
    let branch = BranchName::from("nl-4.0");
    pipeline::run(config(&ws.work), PublishScope::Branch(branch.clone()), true).unwrap();

    // Another working copy adds a commit on top and pushes it.
    let other_dir = ws.work.parent().unwrap().join("other");
    let other = clone(&ws.remote, &other_dir);
    let mut other_sink = GitSink::open(&other_dir, "origin", "main").unwrap();
    other_sink.checkout_branch(&branch).unwrap();
    fs::write(other_dir.join("NOTES.md"), "reviewed").unwrap();
    other_sink.commit_all(Path::new("."), "Review notes").unwrap();
    other_sink.push(&branch).unwrap();
    let ahead = other.head().unwrap().target().unwrap();

    let mut sink = GitSink::open(&ws.work, "origin", "main").unwrap();
    sink.checkout_branch(&branch).unwrap();

    let work = Repository::open(&ws.work).unwrap();
    let head = work.head().unwrap();
    assert_eq!(head.shorthand(), Some("nl-4.0"));
    assert_eq!(head.target(), Some(ahead));
    assert_eq!(fs::read_to_string(ws.work.join("NOTES.md")).unwrap(), "reviewed");
    assert!(!sink.is_dirty().unwrap());
}

#[test]
#[cfg(unix)]
fn local_branch_ahead_of_remote_is_kept() {
    init_logging();
    let ws = workspace();
    let branch = BranchName::from("nl-4.0");
    pipeline::run(config(&ws.work), PublishScope::Branch(branch.clone()), true).unwrap();

    let mut sink = GitSink::open(&ws.work, "origin", "main").unwrap();
    fs::write(ws.work.join("NOTES.md"), "local only").unwrap();
    sink.commit_all(Path::new("."), "Local notes").unwrap();
    let work = Repository::open(&ws.work).unwrap();
    let local = work.head().unwrap().target().unwrap();

    sink.checkout_branch(&branch).unwrap();

    assert_eq!(work.head().unwrap().target(), Some(local));
    assert!(ws.work.join("NOTES.md").exists());
    assert!(!sink.is_dirty().unwrap());
    let remote = Repository::open_bare(&ws.remote).unwrap();
    let pushed = remote
        .find_reference("refs/heads/nl-4.0")
        .unwrap()
        .target()
        .unwrap();
    assert_ne!(pushed, local, "checkout must not push");
}
