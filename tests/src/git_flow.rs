use hangar_core::git::GitRepo;
use tempfile::TempDir;

use crate::common::{commit_file, git, git_stdout, init_repo};

#[test]
fn detects_non_repositories() {
    let tmp = TempDir::new().unwrap();
    assert!(!GitRepo::open(tmp.path()).is_repo());
    init_repo(tmp.path());
    assert!(GitRepo::open(tmp.path()).is_repo());
}

#[test]
fn stage_commit_status_cycle() {
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    let repo = GitRepo::open(tmp.path());

    std::fs::write(tmp.path().join("notes.txt"), b"hello").unwrap();
    assert_eq!(repo.pending_changes(None).unwrap().len(), 1);

    repo.stage_all(None).unwrap();
    repo.commit("add notes").unwrap();
    assert!(repo.pending_changes(None).unwrap().is_empty());
    assert_eq!(repo.tracked_paths().unwrap(), vec!["notes.txt".to_string()]);
}

#[test]
fn exclude_pathspec_hides_files_from_status_and_staging() {
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    let repo = GitRepo::open(tmp.path());

    std::fs::create_dir_all(tmp.path().join(".hangar")).unwrap();
    std::fs::write(tmp.path().join(".hangar/publish.log"), b"log line\n").unwrap();
    std::fs::write(tmp.path().join("notes.txt"), b"hello").unwrap();

    let exclude = Some(":(exclude).hangar/publish.log");
    assert_eq!(repo.pending_changes(exclude).unwrap().len(), 1);

    repo.stage_all(exclude).unwrap();
    repo.commit("add notes").unwrap();
    assert_eq!(repo.tracked_paths().unwrap(), vec!["notes.txt".to_string()]);
    // The excluded file is still on disk, just never staged.
    assert!(tmp.path().join(".hangar/publish.log").exists());
}

#[test]
fn push_to_a_local_bare_remote_returns_a_transcript() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("source");
    std::fs::create_dir(&source).unwrap();
    init_repo(&source);
    commit_file(&source, "notes.txt", b"hello", "seed");

    git(
        tmp.path(),
        &["init", "--bare", "-q", "--initial-branch", "main", "remote.git"],
    );
    let bare = tmp.path().join("remote.git");
    git(&source, &["remote", "add", "origin", bare.to_str().unwrap()]);

    let transcript = GitRepo::open(&source).push("origin").unwrap();
    assert!(!transcript.trim().is_empty());

    // The commit actually arrived on the remote.
    assert_eq!(git_stdout(&bare, &["rev-list", "--count", "HEAD"]), "1");
}

#[test]
fn remote_url_absent_then_present() {
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    let repo = GitRepo::open(tmp.path());

    assert_eq!(repo.remote_url("origin").unwrap(), None);
    git(
        tmp.path(),
        &["remote", "add", "origin", "git@github.com:org/repo.git"],
    );
    assert_eq!(
        repo.remote_url("origin").unwrap(),
        Some("git@github.com:org/repo.git".to_string())
    );
}

#[test]
fn mirror_and_local_clones() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("source");
    std::fs::create_dir(&source).unwrap();
    init_repo(&source);
    commit_file(&source, "notes.txt", b"hello", "seed");

    let mirror = tmp.path().join("mirror.git");
    GitRepo::clone_mirror(&source, &mirror).unwrap();
    // A mirror clone is bare: HEAD sits at the top level.
    assert!(mirror.join("HEAD").exists());
    assert!(!mirror.join(".git").exists());

    let work = tmp.path().join("work");
    GitRepo::clone_local(&source, &work).unwrap();
    assert!(work.join(".git").exists());
    assert!(work.join("notes.txt").exists());
}
