use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use flate2::read::ZlibDecoder;
use tracing::*;
use walkdir::WalkDir;

use crate::digest::Digest;
use crate::error::StoreError;

use super::{ObjectKind, ObjectStore};

/// Symbolic refs are followed at most this many times.
const MAX_SYMREF_DEPTH: usize = 5;
/// Upper bound on what a declared object size may reserve up front.
const MAX_PREALLOC: usize = 1 << 20;

/// Contains all characters that cannot appear in a ref name.
///
/// Git uses C-Strings; the character `'\0'` denotes the end of a ref name. We disallow it
/// entirely.
///
/// See: <https://github.com/git/git/blob/795ea8776befc95ea2becd8020c7a284677b4161/refs.c#L48-L57>
const DISALLOWED_CHARACTERS: [char; 41] = [
    '\0', '\x01', '\x02', '\x03', '\x04', '\x05', '\x06', '\x07', '\x08', '\t', '\n', '\x0b',
    '\x0c', '\r', '\x0e', '\x0f', '\x10', '\x11', '\x12', '\x13', '\x14', '\x15', '\x16', '\x17',
    '\x18', '\x19', '\x1a', '\x1b', '\x1c', '\x1d', '\x1e', '\x1f', ' ', '*', ':', '?', '[', '\\',
    '^', '~', '\x7f',
];

/// Check whether a string is a valid ref name.
///
/// Disallowed paths are any path where:
/// - it (or any path component) begins with `'.'`
/// - it contains double dots `".."`
/// - it contains ASCII control characters
/// - it contains `':'`, `'?'`, `'['`, `'\\'`, `'^'`, `'~'`, `' '`, or `'\t'`
/// - it contains `'*'`
/// - it ends with `'/'`
/// - it ends with `".lock"`
/// - it contains `"@{"`
///
/// See: <https://github.com/git/git/blob/795ea8776befc95ea2becd8020c7a284677b4161/refs.c#L59-L77>
pub fn is_valid_ref_name(name: &str) -> bool {
    !(name.is_empty()
        || (name.chars().any(|c| DISALLOWED_CHARACTERS.contains(&c)))
        || name.starts_with('.')
        || name.starts_with('/')
        || name.contains("/.")
        || name.contains("..")
        || name.contains("//")
        || name.ends_with('/')
        || name.ends_with(".lock")
        || name.contains("@{"))
}

/// Reads a repository straight from its `.git` directory.
///
/// Supports loose objects, loose refs and `packed-refs`. Objects that only exist inside pack
/// files are reported as [`StoreError::Packed`]; use [`GitCommand`](super::command::GitCommand)
/// for those repositories.
pub struct LooseStore {
    git_dir: Utf8PathBuf,
    objects: Utf8PathBuf,
}

impl LooseStore {
    /// Open a repository given either its work tree or its git directory.
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let git_dir = if path.join(".git").is_dir() {
            path.join(".git")
        } else if path.join("objects").is_dir() && path.join("refs").is_dir() {
            path.to_owned()
        } else {
            return Err(StoreError::Corrupt(format!("not a git repository: {path}")));
        };
        trace!(%git_dir, "Opened loose store");

        Ok(Self {
            objects: git_dir.join("objects"),
            git_dir,
        })
    }

    pub fn git_dir(&self) -> &Utf8Path {
        &self.git_dir
    }

    fn object_path(&self, oid: &Digest) -> Utf8PathBuf {
        let mut x = self.objects.to_owned();
        let oid = oid.to_hex();
        let (prefix, suffix) = oid.split_at(2);
        debug_assert_eq!(prefix.len(), 2);
        x.push(prefix);
        x.push(suffix);
        x
    }

    fn has_packs(&self) -> bool {
        std::fs::read_dir(self.objects.join("pack"))
            .map(|entries| {
                entries
                    .flatten()
                    .any(|e| e.path().extension().map_or(false, |ext| ext == "pack"))
            })
            .unwrap_or(false)
    }

    /// Open a loose object and consume its header, leaving the reader at the contents.
    fn open_object(
        &self,
        oid: &Digest,
    ) -> Result<(ObjectKind, usize, BufReader<ZlibDecoder<File>>), StoreError> {
        let object_path = self.object_path(oid);

        let file = match File::open(&object_path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(if self.has_packs() {
                    StoreError::Packed(*oid)
                } else {
                    StoreError::MissingObject(*oid)
                });
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = BufReader::new(ZlibDecoder::new(file));
        let mut header = Vec::new();
        reader.read_until(b'\0', &mut header)?;

        let corrupt = || StoreError::Corrupt(format!("bad object header in {oid:x}"));
        let header = header.strip_suffix(b"\0").ok_or_else(corrupt)?;
        let space_idx = memchr::memchr(b' ', header).ok_or_else(corrupt)?;
        let kind = std::str::from_utf8(&header[..space_idx]).map_err(|_| corrupt())?;
        let len = std::str::from_utf8(&header[space_idx + 1..])
            .ok()
            .and_then(|len| len.parse::<usize>().ok())
            .ok_or_else(corrupt)?;

        Ok((ObjectKind::from_name(kind), len, reader))
    }

    fn read_loose_ref(&self, name: &str) -> Result<Option<String>, StoreError> {
        let path = self.git_dir.join(name);
        if !path.is_file() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(Some(contents.trim().to_owned()))
    }

    /// Entries of `packed-refs`, skipping comments and peeled (`^`) lines.
    fn packed_refs(&self) -> Result<Vec<(String, Digest)>, StoreError> {
        let contents = match std::fs::read_to_string(self.git_dir.join("packed-refs")) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        contents
            .lines()
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('^'))
            .map(|line| {
                let (oid, name) = line
                    .split_once(' ')
                    .ok_or_else(|| StoreError::Corrupt(format!("bad packed-refs line: {line}")))?;
                let oid = Digest::from_str(oid)
                    .map_err(|_| StoreError::Corrupt(format!("bad packed-refs line: {line}")))?;
                Ok((name.to_owned(), oid))
            })
            .collect()
    }

    fn resolve_at_depth(&self, name: &str, depth: usize) -> Result<Option<Digest>, StoreError> {
        if !is_valid_ref_name(name) {
            trace!(%name, "Invalid ref name");
            return Ok(None);
        }

        let contents = match self.read_loose_ref(name)? {
            Some(contents) => contents,
            None => {
                return Ok(self
                    .packed_refs()?
                    .into_iter()
                    .find(|(packed, _)| packed == name)
                    .map(|(_, oid)| oid))
            }
        };

        if let Some(target) = contents.strip_prefix("ref: ") {
            if depth >= MAX_SYMREF_DEPTH {
                return Err(StoreError::Corrupt(format!("symbolic ref loop at {name}")));
            }
            return self.resolve_at_depth(target.trim(), depth + 1);
        }

        Digest::from_str(&contents)
            .map(Some)
            .map_err(|_| StoreError::Corrupt(format!("unexpected contents in {name}: {contents}")))
    }
}

impl ObjectStore for LooseStore {
    fn resolve_reference(&self, name: &str) -> Result<Option<Digest>, StoreError> {
        trace!(%name, "Resolving reference");
        self.resolve_at_depth(name, 0)
    }

    fn object_type(&self, id: &Digest) -> Result<ObjectKind, StoreError> {
        trace!(object = %id, "Reading object type");
        let (kind, _, _) = self.open_object(id)?;
        Ok(kind)
    }

    fn read_object(&self, id: &Digest) -> Result<Vec<u8>, StoreError> {
        trace!(object = %id, "Reading object from database");
        let (_, len, reader) = self.open_object(id)?;

        // The header is untrusted: reserve at most MAX_PREALLOC and stop one byte past `len`.
        let mut contents = Vec::with_capacity(len.min(MAX_PREALLOC));
        reader
            .take((len as u64).saturating_add(1))
            .read_to_end(&mut contents)?;
        if contents.len() != len {
            return Err(StoreError::Corrupt(format!(
                "object {id:x} declares {len} bytes but holds {}",
                contents.len()
            )));
        }
        Ok(contents)
    }

    fn list_references(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut names = BTreeSet::new();

        let root = self.git_dir.join(prefix.trim_end_matches('/'));
        if root.is_dir() {
            for entry in WalkDir::new(&root) {
                let entry = entry.map_err(|e| StoreError::Io(e.into()))?;
                if entry.file_type().is_dir() {
                    continue;
                }
                let path = match Utf8Path::from_path(entry.path()) {
                    Some(path) => path,
                    None => {
                        warn!(path = ?entry.path(), "Skipping non UTF-8 ref");
                        continue;
                    }
                };
                let name = match path.strip_prefix(&self.git_dir) {
                    Ok(name) => name.components().map(|c| c.as_str()).collect::<Vec<_>>().join("/"),
                    Err(_) => continue,
                };
                if !is_valid_ref_name(&name) {
                    warn!(%name, "Skipping invalid ref");
                    continue;
                }
                names.insert(name);
            }
        }

        names.extend(
            self.packed_refs()?
                .into_iter()
                .map(|(name, _)| name)
                .filter(|name| name.starts_with(prefix)),
        );

        trace!(%prefix, count = names.len(), "Listed references");
        Ok(names.into_iter().collect())
    }
}
