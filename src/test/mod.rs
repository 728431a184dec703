mod command;

use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use camino::Utf8Path;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::digest::Digest;
use crate::error::StoreError;
use crate::store::{ObjectKind, ObjectStore};
use crate::tag::{Annotation, Signature};
use crate::timestamp::Timestamp;

pub const COMMIT_NAME: &str = "Jamie Quigley";
pub const COMMIT_EMAIL: &str = "jamie@quigley.xyz";

/// `"{type} {len}\0{data}"`
fn formatted(kind: &str, data: &[u8]) -> Vec<u8> {
    let mut formatted = Vec::new();
    formatted.extend_from_slice(kind.as_bytes());
    formatted.push(b' ');
    formatted.extend_from_slice(format!("{}", data.len()).as_bytes());
    formatted.push(b'\0');
    formatted.extend_from_slice(data);
    formatted
}

pub fn commit_contents(unix: i64, message: &str) -> Vec<u8> {
    format!(
        "\
        tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n\
        author {COMMIT_NAME} <{COMMIT_EMAIL}> {unix} +0000\n\
        committer {COMMIT_NAME} <{COMMIT_EMAIL}> {unix} +0000\n\
        \n\
        {message}\n"
    )
    .into_bytes()
}

pub fn annotation(target: Digest, name: &str, unix: i64, message: &str) -> Annotation {
    Annotation {
        object: target,
        object_type: "commit".into(),
        tag: name.into(),
        tagger: Signature {
            name: COMMIT_NAME.into(),
            email: COMMIT_EMAIL.into(),
            when: Timestamp::from_git(&unix.to_string(), "+0100").unwrap(),
        },
        message: message.into(),
    }
}

/// An in-memory repository that counts how often it is asked things.
#[derive(Default)]
pub struct MemoryStore {
    refs: Vec<(String, Digest)>,
    objects: HashMap<Digest, (ObjectKind, Vec<u8>)>,
    pub resolve_calls: AtomicUsize,
    pub type_calls: AtomicUsize,
    pub read_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn object(&mut self, kind: ObjectKind, data: Vec<u8>) -> Digest {
        let oid = Digest::new(&formatted(kind.as_str(), &data));
        self.objects.insert(oid, (kind, data));
        oid
    }

    pub fn commit(&mut self, unix: i64) -> Digest {
        self.object(ObjectKind::Commit, commit_contents(unix, "commit"))
    }

    pub fn tag_object(&mut self, target: Digest, name: &str, unix: i64) -> Digest {
        let data = annotation(target, name, unix, &format!("Release {name}")).format();
        self.object(ObjectKind::Tag, data)
    }

    /// Add `refs/tags/{name}`. References are listed in the order they were added.
    pub fn tag_ref(&mut self, name: &str, oid: Digest) {
        self.refs.push((format!("refs/tags/{name}"), oid));
    }

    pub fn reads(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    pub fn types(&self) -> usize {
        self.type_calls.load(Ordering::SeqCst)
    }

    fn check(&self, counter: &AtomicUsize) -> Result<(), StoreError> {
        counter.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "store went away",
            )));
        }
        Ok(())
    }
}

impl ObjectStore for MemoryStore {
    fn resolve_reference(&self, name: &str) -> Result<Option<Digest>, StoreError> {
        self.check(&self.resolve_calls)?;
        Ok(self
            .refs
            .iter()
            .find(|(refname, _)| refname == name)
            .map(|(_, oid)| *oid))
    }

    fn object_type(&self, id: &Digest) -> Result<ObjectKind, StoreError> {
        self.check(&self.type_calls)?;
        self.objects
            .get(id)
            .map(|(kind, _)| kind.clone())
            .ok_or(StoreError::MissingObject(*id))
    }

    fn read_object(&self, id: &Digest) -> Result<Vec<u8>, StoreError> {
        self.check(&self.read_calls)?;
        self.objects
            .get(id)
            .map(|(_, data)| data.clone())
            .ok_or(StoreError::MissingObject(*id))
    }

    fn list_references(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        self.check(&self.list_calls)?;
        Ok(self
            .refs
            .iter()
            .map(|(name, _)| name.clone())
            .filter(|name| name.starts_with(prefix))
            .collect())
    }
}

/// Create the skeleton of a `.git` directory under `root`.
pub fn init_git_dir(root: &Utf8Path) -> std::io::Result<()> {
    for d in ["objects", "refs/heads", "refs/tags"] {
        std::fs::create_dir_all(root.join(".git").join(d))?;
    }
    std::fs::write(root.join(".git/HEAD"), "ref: refs/heads/main\n")?;
    Ok(())
}

/// Write a zlib-compressed loose object and return its id.
pub fn write_loose(root: &Utf8Path, kind: &str, data: &[u8]) -> std::io::Result<Digest> {
    let content = formatted(kind, data);
    let oid = Digest::new(&content);
    write_raw_object(root, oid, &content)?;
    Ok(oid)
}

/// Write `content`, header included, as the loose object `oid` without checking either.
pub fn write_raw_object(root: &Utf8Path, oid: Digest, content: &[u8]) -> std::io::Result<()> {
    let hex = oid.to_hex();
    let (prefix, suffix) = hex.split_at(2);
    let dirname = root.join(".git/objects").join(prefix);
    std::fs::create_dir_all(&dirname)?;

    let mut e = ZlibEncoder::new(Vec::with_capacity(content.len()), Compression::fast());
    e.write_all(content)?;
    std::fs::write(dirname.join(suffix), e.finish()?)
}

pub fn write_ref(root: &Utf8Path, name: &str, contents: &str) -> std::io::Result<()> {
    let path = root.join(".git").join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    writeln!(std::fs::File::create(path)?, "{contents}")
}
