use std::path::Path;

use hangar_core::scrub::{self, ScrubError, ScrubRequest};
use tempfile::TempDir;

use crate::common::{commit_file, init_repo};

fn request(repo: &Path, backup: &Path, work: &Path) -> ScrubRequest {
    ScrubRequest {
        repo_dir: repo.to_path_buf(),
        paths: vec!["models/".to_string()],
        backup_dir: Some(backup.to_path_buf()),
        work_dir: Some(work.to_path_buf()),
    }
}

fn seeded_repo(tmp: &TempDir) -> std::path::PathBuf {
    let repo = tmp.path().join("aurora");
    std::fs::create_dir(&repo).unwrap();
    init_repo(&repo);
    commit_file(&repo, "models/weights.bin", b"\x00\x01", "add weights");
    commit_file(&repo, "src/main.py", b"print('hi')\n", "add code");
    repo
}

#[test]
fn refuses_existing_backup_dir() {
    let tmp = TempDir::new().unwrap();
    let repo = seeded_repo(&tmp);
    let backup = tmp.path().join("backup.git");
    let work = tmp.path().join("rewrite");
    std::fs::create_dir(&backup).unwrap();

    let err = scrub::run(&request(&repo, &backup, &work)).unwrap_err();
    assert!(matches!(err, ScrubError::BackupExists(_)));
    // Nothing was cloned anywhere.
    assert!(!work.exists());
}

#[test]
fn refuses_existing_work_dir() {
    let tmp = TempDir::new().unwrap();
    let repo = seeded_repo(&tmp);
    let backup = tmp.path().join("backup.git");
    let work = tmp.path().join("rewrite");
    std::fs::create_dir(&work).unwrap();

    let err = scrub::run(&request(&repo, &backup, &work)).unwrap_err();
    assert!(matches!(err, ScrubError::WorkExists(_)));
    // The refusal came before the backup step.
    assert!(!backup.exists());
}

#[test]
fn refuses_non_repositories() {
    let tmp = TempDir::new().unwrap();
    let plain = tmp.path().join("plain");
    std::fs::create_dir(&plain).unwrap();

    let err = scrub::run(&request(
        &plain,
        &tmp.path().join("backup.git"),
        &tmp.path().join("rewrite"),
    ))
    .unwrap_err();
    assert!(matches!(err, ScrubError::NotARepo(_)));
}

#[test]
fn backup_is_taken_before_the_rewrite_runs() {
    let tmp = TempDir::new().unwrap();
    let repo = seeded_repo(&tmp);
    let backup = tmp.path().join("backup.git");
    let work = tmp.path().join("rewrite");

    // git filter-repo may or may not be installed where this test runs;
    // either way the mirror backup and working clone must exist afterwards.
    match scrub::run(&request(&repo, &backup, &work)) {
        Ok(report) => {
            assert_eq!(report.backup_dir, backup);
            assert_eq!(report.work_dir, work);
        }
        Err(ScrubError::FilterRepoMissing(_)) | Err(ScrubError::FilterRepoFailed(_)) => {}
        Err(other) => panic!("unexpected error: {other:?}"),
    }
    assert!(backup.join("HEAD").exists());
    assert!(work.join(".git").exists());
}
