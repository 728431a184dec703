use std::path::Path;
use std::process::{Command, Stdio};

use camino::Utf8Path;
use color_eyre::eyre::{ensure, Result};
use pretty_assertions::assert_eq;
use tempdir::TempDir;

use crate::error::{Error, StoreError};
use crate::repo::Repo;
use crate::store::command::GitCommand;
use crate::store::loose::LooseStore;
use crate::test::{COMMIT_EMAIL, COMMIT_NAME};

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str], date: &str) -> Result<()> {
    let git_command_args = [
        "-c",
        &format!("user.name={}", COMMIT_NAME),
        "-c",
        &format!("user.email={}", COMMIT_EMAIL),
        "-c",
        "commit.gpgsign=false",
        "-c",
        "tag.gpgsign=false",
    ];
    let status = Command::new("git")
        .args(git_command_args)
        .args(args)
        .env("GIT_AUTHOR_DATE", date)
        .env("GIT_COMMITTER_DATE", date)
        .current_dir(dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    ensure!(status.success(), "git {:?} failed", args);
    Ok(())
}

#[test]
/// Create a repository with git: two commits, a lightweight tag on each and two annotated
/// tags created at known times. Both stores should see the same tags in the same orders.
fn git_created_tags() -> Result<()> {
    if !git_available() {
        eprintln!("git not found, skipping");
        return Ok(());
    }

    let dir = TempDir::new("rit-tags")?;
    let root = dir.path();

    git(root, &["init", "--quiet"], "1600000000 +0000")?;
    git(root, &["commit", "--allow-empty", "-m", "first"], "1600000000 +0000")?;
    git(root, &["tag", "v1.2.0"], "1600000000 +0000")?;
    git(
        root,
        &["tag", "-a", "v1.10.0", "-m", "Ten\n\nwith body"],
        "1600000300 +0200",
    )?;
    git(root, &["commit", "--allow-empty", "-m", "second"], "1600000100 +0000")?;
    git(root, &["tag", "v1.9.0"], "1600000100 +0000")?;
    git(root, &["tag", "-a", "v0.1.0", "-m", "Old"], "1600000200 -0500")?;

    let root = Utf8Path::from_path(root).unwrap();
    let command = Repo::new(GitCommand::new(root));

    assert_eq!(
        command.list_names()?,
        ["v1.10.0", "v1.9.0", "v1.2.0", "v0.1.0"]
    );

    let tags = command.list_full()?;
    assert_eq!(
        tags.iter().map(|t| t.name()).collect::<Vec<_>>(),
        ["v1.10.0", "v0.1.0", "v1.9.0", "v1.2.0"]
    );

    let ten = &tags[0];
    let annotation = ten.annotation().unwrap();
    assert_eq!(annotation.tag, "v1.10.0");
    assert_eq!(annotation.object_type, "commit");
    assert_eq!(annotation.tagger.name, COMMIT_NAME);
    assert_eq!(annotation.tagger.email, COMMIT_EMAIL);
    assert_eq!(annotation.tagger.when.to_string(), "1600000300 +0200");
    assert_eq!(annotation.message, "Ten\n\nwith body");
    assert_eq!(ten.target_id(), tags[3].id());

    // Freshly created repositories keep everything loose.
    let loose = Repo::new(LooseStore::open(root)?);
    assert_eq!(loose.list_names()?, command.list_names()?);
    assert_eq!(loose.list_full()?, tags);

    assert!(matches!(
        command.resolve_by_name("nonexistent"),
        Err(Error::NotFound(_))
    ));
    Ok(())
}

#[test]
fn not_a_repository() -> Result<()> {
    if !git_available() {
        return Ok(());
    }

    let dir = TempDir::new("rit-tags")?;
    let repo = Repo::new(GitCommand::new(Utf8Path::from_path(dir.path()).unwrap()));

    assert!(matches!(
        repo.list_names(),
        Err(Error::StoreUnavailable(StoreError::Command { .. }))
    ));
    Ok(())
}
