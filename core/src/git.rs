//! Thin typed wrapper over the `git` command line.
//!
//! Every operation captures output; stderr from a failing git invocation is
//! carried inside the error so callers can surface it verbatim.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run `git {args}`: {source}")]
    Spawn {
        args: String,
        source: std::io::Error,
    },
    #[error("`git {args}` failed: {stderr}")]
    Failed { args: String, stderr: String },
}

/// A local repository addressed through `git -C <dir>`.
pub struct GitRepo {
    dir: PathBuf,
}

impl GitRepo {
    pub fn open(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn run(&self, args: &[&str]) -> Result<Output, GitError> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.dir)
            .args(args)
            .output()
            .map_err(|source| GitError::Spawn {
                args: args.join(" "),
                source,
            })?;
        ensure_success(&args.join(" "), output)
    }

    fn run_stdout(&self, args: &[&str]) -> Result<String, GitError> {
        let output = self.run(args)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    pub fn is_repo(&self) -> bool {
        self.run(&["rev-parse", "--git-dir"]).is_ok()
    }

    /// Paths currently tracked by version control, one per line of `ls-files`.
    pub fn tracked_paths(&self) -> Result<Vec<String>, GitError> {
        let stdout = self.run_stdout(&["ls-files"])?;
        Ok(stdout.lines().map(str::to_string).collect())
    }

    /// URL of the named remote, or `None` when the remote does not exist.
    pub fn remote_url(&self, remote: &str) -> Result<Option<String>, GitError> {
        match self.run_stdout(&["remote", "get-url", remote]) {
            Ok(stdout) => Ok(Some(stdout.trim().to_string())),
            Err(GitError::Failed { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Pending working-tree changes as `status --porcelain` lines.
    ///
    /// `exclude` is a pathspec (e.g. `:(exclude).hangar/publish.log`) for
    /// files that should not count as changes.
    pub fn pending_changes(&self, exclude: Option<&str>) -> Result<Vec<String>, GitError> {
        let mut args = vec!["status", "--porcelain"];
        if let Some(spec) = exclude {
            args.extend(["--", ".", spec]);
        }
        let stdout = self.run_stdout(&args)?;
        Ok(stdout
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Stages everything, minus an optional exclude pathspec.
    pub fn stage_all(&self, exclude: Option<&str>) -> Result<(), GitError> {
        let mut args = vec!["add", "-A"];
        if let Some(spec) = exclude {
            args.extend(["--", ".", spec]);
        }
        self.run(&args)?;
        Ok(())
    }

    pub fn commit(&self, message: &str) -> Result<String, GitError> {
        self.run_stdout(&["commit", "-m", message])
    }

    /// Pushes the current branch and returns the full transcript.
    ///
    /// Git writes push progress to stderr even on success, so both streams
    /// are combined for the publish log.
    pub fn push(&self, remote: &str) -> Result<String, GitError> {
        let output = self.run(&["push", remote, "HEAD"])?;
        let mut transcript = String::from_utf8_lossy(&output.stdout).into_owned();
        transcript.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(transcript)
    }

    /// Full mirror clone, the backup taken before any history rewrite.
    pub fn clone_mirror(source: &Path, dest: &Path) -> Result<(), GitError> {
        run_plain(
            "clone --mirror",
            Command::new("git")
                .arg("clone")
                .arg("--mirror")
                .arg("--quiet")
                .arg(source)
                .arg(dest),
        )?;
        Ok(())
    }

    /// Plain local clone used as the rewrite working copy.
    pub fn clone_local(source: &Path, dest: &Path) -> Result<(), GitError> {
        run_plain(
            "clone",
            Command::new("git")
                .arg("clone")
                .arg("--quiet")
                .arg(source)
                .arg(dest),
        )?;
        Ok(())
    }
}

fn run_plain(args: &str, cmd: &mut Command) -> Result<Output, GitError> {
    let output = cmd.output().map_err(|source| GitError::Spawn {
        args: args.to_string(),
        source,
    })?;
    ensure_success(args, output)
}

fn ensure_success(args: &str, output: Output) -> Result<Output, GitError> {
    if !output.status.success() {
        return Err(GitError::Failed {
            args: args.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}
