use std::path::Path;

use hangar_core::publish::{self, PublishError, PublishOutcome, PublishRequest};
use tempfile::TempDir;

use crate::common::{commit_file, git, git_stdout, init_repo};

fn request(dir: &Path) -> PublishRequest {
    PublishRequest {
        repo_dir: dir.to_path_buf(),
        remote: "origin".to_string(),
        message: "test publish".to_string(),
        disallowed: publish::DEFAULT_DISALLOWED
            .iter()
            .map(|s| s.to_string())
            .collect(),
        log_path: publish::DEFAULT_LOG_FILE.into(),
    }
}

fn read_log(dir: &Path) -> String {
    std::fs::read_to_string(dir.join(publish::DEFAULT_LOG_FILE)).unwrap_or_default()
}

#[test]
fn refuses_tracked_model_weights() {
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    commit_file(tmp.path(), "models/weights.bin", b"\x00\x01", "seed");

    let err = publish::run(&request(tmp.path())).unwrap_err();
    match &err {
        PublishError::DisallowedTracked(paths) => {
            assert_eq!(paths, &vec!["models/weights.bin".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.exit_code(), 2);
    assert!(read_log(tmp.path()).contains("models/weights.bin"));

    // Refused before committing anything new: the seed commit is still alone.
    assert_eq!(git_stdout(tmp.path(), &["rev-list", "--count", "HEAD"]), "1");
}

#[test]
fn refuses_tracked_secrets() {
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    commit_file(tmp.path(), "secrets/hub_token.txt", b"hf_abc", "oops");

    let err = publish::run(&request(tmp.path())).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn missing_remote_is_exit_3() {
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    commit_file(tmp.path(), "src/main.rs", b"fn main() {}\n", "seed");

    let err = publish::run(&request(tmp.path())).unwrap_err();
    assert!(matches!(err, PublishError::NoRemote(_)));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn https_remote_is_refused_before_any_push() {
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    commit_file(tmp.path(), "src/main.rs", b"fn main() {}\n", "seed");
    git(
        tmp.path(),
        &["remote", "add", "origin", "https://github.com/org/repo.git"],
    );

    let err = publish::run(&request(tmp.path())).unwrap_err();
    match &err {
        PublishError::InsecureRemote(remote, url) => {
            assert_eq!(remote, "origin");
            assert_eq!(url, "https://github.com/org/repo.git");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.exit_code(), 4);
    assert!(read_log(tmp.path()).contains("not SSH"));
}

#[test]
fn clean_tree_is_a_logged_noop() {
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    commit_file(tmp.path(), "src/main.rs", b"fn main() {}\n", "seed");
    git(
        tmp.path(),
        &["remote", "add", "origin", "git@github.com:org/repo.git"],
    );

    let outcome = publish::run(&request(tmp.path())).unwrap();
    assert_eq!(outcome, PublishOutcome::NothingToCommit);
    assert!(read_log(tmp.path()).contains("nothing to commit"));

    // No commit was created for the no-op.
    assert_eq!(git_stdout(tmp.path(), &["rev-list", "--count", "HEAD"]), "1");
}

#[test]
fn leftover_log_alone_is_still_a_noop() {
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    commit_file(tmp.path(), "src/main.rs", b"fn main() {}\n", "seed");
    git(
        tmp.path(),
        &["remote", "add", "origin", "git@github.com:org/repo.git"],
    );

    // The first no-op leaves the log behind, untracked.
    assert_eq!(
        publish::run(&request(tmp.path())).unwrap(),
        PublishOutcome::NothingToCommit
    );
    assert!(tmp.path().join(publish::DEFAULT_LOG_FILE).exists());

    // The log by itself must not look like a pending change.
    assert_eq!(
        publish::run(&request(tmp.path())).unwrap(),
        PublishOutcome::NothingToCommit
    );
    assert_eq!(git_stdout(tmp.path(), &["rev-list", "--count", "HEAD"]), "1");
}

#[test]
fn commit_never_includes_the_publish_log() {
    // Make ssh fail instantly so the push error is deterministic.
    std::env::set_var("GIT_SSH_COMMAND", "false");

    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    commit_file(tmp.path(), "src/main.rs", b"fn main() {}\n", "seed");
    git(
        tmp.path(),
        &["remote", "add", "origin", "git@github.com:org/repo.git"],
    );

    // Seed the log with a no-op entry, then make a real change.
    assert_eq!(
        publish::run(&request(tmp.path())).unwrap(),
        PublishOutcome::NothingToCommit
    );
    std::fs::write(tmp.path().join("src/lib.rs"), b"pub fn noop() {}\n").unwrap();

    // The unreachable remote fails the push, but the commit lands first.
    let err = publish::run(&request(tmp.path())).unwrap_err();
    assert!(matches!(err, PublishError::Git(_)));

    let committed = git_stdout(tmp.path(), &["show", "--name-only", "--format=", "HEAD"]);
    assert!(committed.contains("src/lib.rs"));
    assert!(!committed.contains("publish.log"));
}
