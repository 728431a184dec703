use std::str::{self, FromStr};

use memchr::memmem;
use thiserror::Error;

use crate::digest::Digest;
use crate::timestamp::{Timestamp, TimestampError};

use super::{Annotation, Signature};

/// A structural defect in a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("missing `{0}` header")]
    MissingHeader(&'static str),

    #[error("duplicate `{0}` header")]
    DuplicateHeader(&'static str),

    #[error("invalid object id: {0:?}")]
    InvalidObjectId(String),

    #[error("invalid signature: {0:?}")]
    InvalidTagger(String),

    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("invalid timezone offset: {0:?}")]
    InvalidOffset(String),

    #[error("`{0}` is not valid UTF-8")]
    InvalidUtf8(&'static str),
}

/// Split an object into its header block and message. The message starts after the first blank
/// line; without one the whole object is headers.
fn split_message(bytes: &[u8]) -> (&[u8], &[u8]) {
    match memmem::find(bytes, b"\n\n") {
        Some(idx) => (&bytes[..idx], &bytes[idx + 2..]),
        None => (
            bytes.strip_suffix(b"\n").unwrap_or(bytes),
            &bytes[bytes.len()..],
        ),
    }
}

/// Iterate `(key, value)` pairs of a header block. Continuation lines (leading space) belong to
/// the previous header and are skipped.
fn headers(block: &[u8]) -> impl Iterator<Item = (&[u8], &[u8])> {
    block
        .split(|b| *b == b'\n')
        .filter(|line| !line.is_empty() && !line.starts_with(b" "))
        .map(|line| match memchr::memchr(b' ', line) {
            Some(idx) => (&line[..idx], &line[idx + 1..]),
            None => (line, &line[line.len()..]),
        })
}

fn utf8<'a>(bytes: &'a [u8], what: &'static str) -> Result<&'a str, ParseError> {
    str::from_utf8(bytes).map_err(|_| ParseError::InvalidUtf8(what))
}

fn set_once<'a>(
    slot: &mut Option<&'a [u8]>,
    value: &'a [u8],
    key: &'static str,
) -> Result<(), ParseError> {
    if slot.replace(value).is_some() {
        return Err(ParseError::DuplicateHeader(key));
    }
    Ok(())
}

impl Annotation {
    /// Parse the contents of a tag object (without the `"tag {len}\0"` header).
    ///
    /// ## Example
    /// ```text
    /// object e6a49274aa0893ce2e2928589100387aee220c5b
    /// type commit
    /// tag v0.3.0
    /// tagger Jamie Quigley <jamie@quigley.xyz> 1658312219 +0100
    ///
    /// Release v0.3.0
    /// ```
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        let (header, message) = split_message(bytes);

        let mut object = None;
        let mut object_type = None;
        let mut tag = None;
        let mut tagger = None;

        for (key, value) in headers(header) {
            match key {
                b"object" => set_once(&mut object, value, "object")?,
                b"type" => set_once(&mut object_type, value, "type")?,
                b"tag" => set_once(&mut tag, value, "tag")?,
                b"tagger" => set_once(&mut tagger, value, "tagger")?,
                _ => {}
            }
        }

        let object = object.ok_or(ParseError::MissingHeader("object"))?;
        let object = utf8(object, "object")?;
        let object = Digest::from_str(object)
            .map_err(|_| ParseError::InvalidObjectId(object.to_owned()))?;

        let object_type = utf8(
            object_type.ok_or(ParseError::MissingHeader("type"))?,
            "type",
        )?
        .to_owned();
        let tag = utf8(tag.ok_or(ParseError::MissingHeader("tag"))?, "tag")?.to_owned();
        let tagger = Signature::parse(utf8(
            tagger.ok_or(ParseError::MissingHeader("tagger"))?,
            "tagger",
        )?)?;

        let message = message.strip_suffix(b"\n").unwrap_or(message);
        let message = utf8(message, "message")?.to_owned();

        Ok(Self {
            object,
            object_type,
            tag,
            tagger,
            message,
        })
    }
}

impl Signature {
    /// Parse the value of a signature header.
    ///
    /// ## Example
    /// `Jamie Quigley <jamie@quigley.xyz> 1658312219 +0100`
    ///
    /// The last two tokens are the time, so names may contain spaces.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidTagger(line.to_owned());

        let (rest, offset) = line
            .trim_end()
            .rsplit_once(char::is_whitespace)
            .ok_or_else(invalid)?;
        let (ident, unix) = rest
            .trim_end()
            .rsplit_once(char::is_whitespace)
            .ok_or_else(invalid)?;

        let (name, email) = ident
            .trim()
            .strip_suffix('>')
            .and_then(|ident| ident.split_once('<'))
            .ok_or_else(invalid)?;

        let when = Timestamp::from_git(unix, offset).map_err(|e| match e {
            TimestampError::Seconds => ParseError::InvalidTimestamp(unix.to_owned()),
            TimestampError::Offset => ParseError::InvalidOffset(offset.to_owned()),
        })?;

        Ok(Self {
            name: name.trim().to_owned(),
            email: email.to_owned(),
            when,
        })
    }
}

/// Read the committer time out of the contents of a commit object.
pub fn commit_time(bytes: &[u8]) -> Result<Timestamp, ParseError> {
    let (header, _) = split_message(bytes);
    let (_, committer) = headers(header)
        .find(|(key, _)| *key == b"committer")
        .ok_or(ParseError::MissingHeader("committer"))?;
    Ok(Signature::parse(utf8(committer, "committer")?)?.when)
}
