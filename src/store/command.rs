use std::process::{Command, Output, Stdio};
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::*;

use crate::digest::Digest;
use crate::error::StoreError;

use super::loose::is_valid_ref_name;
use super::{ObjectKind, ObjectStore};

/// Answers store queries by running `git` in a repository directory.
///
/// Slower than [`LooseStore`](super::loose::LooseStore) (one process per call) but understands
/// everything git does, including pack files.
pub struct GitCommand {
    dir: Utf8PathBuf,
    program: String,
}

impl GitCommand {
    pub fn new(dir: impl AsRef<Utf8Path>) -> Self {
        Self {
            dir: dir.as_ref().to_owned(),
            program: "git".to_owned(),
        }
    }

    /// Use a different git executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn output(&self, args: &[&str]) -> Result<Output, StoreError> {
        trace!(dir = %self.dir, ?args, "Running git");
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.dir)
            .stdin(Stdio::null())
            .output()?;

        if !output.status.success() {
            return Err(StoreError::Command {
                args: args.join(" "),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        Ok(output)
    }

    fn stdout(&self, args: &[&str]) -> Result<String, StoreError> {
        let output = self.output(args)?;
        String::from_utf8(output.stdout)
            .map_err(|_| StoreError::Corrupt(format!("non UTF-8 output from `git {}`", args.join(" "))))
    }
}

impl ObjectStore for GitCommand {
    fn resolve_reference(&self, name: &str) -> Result<Option<Digest>, StoreError> {
        if !is_valid_ref_name(name) {
            return Ok(None);
        }

        let stdout = self.stdout(&["for-each-ref", "--format=%(objectname) %(refname)", name])?;

        stdout
            .lines()
            .filter_map(|line| line.split_once(' '))
            .find(|(_, refname)| *refname == name)
            .map(|(oid, _)| {
                Digest::from_str(oid)
                    .map_err(|_| StoreError::Corrupt(format!("bad object name for {name}: {oid}")))
            })
            .transpose()
    }

    fn object_type(&self, id: &Digest) -> Result<ObjectKind, StoreError> {
        let stdout = self.stdout(&["cat-file", "-t", &id.to_hex()])?;
        Ok(ObjectKind::from_name(stdout.trim()))
    }

    fn read_object(&self, id: &Digest) -> Result<Vec<u8>, StoreError> {
        Ok(self.output(&["cat-file", "-p", &id.to_hex()])?.stdout)
    }

    fn list_references(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let stdout = self.stdout(&[
            "for-each-ref",
            "--format=%(refname)",
            prefix.trim_end_matches('/'),
        ])?;

        Ok(stdout
            .lines()
            .filter(|name| name.starts_with(prefix))
            .map(str::to_owned)
            .collect())
    }
}
