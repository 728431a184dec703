pub mod cache;
pub mod parse;
mod write;

use crate::digest::Digest;
use crate::timestamp::Timestamp;

/// A tag, as reached through a `refs/tags/` reference.
///
/// `id` is whatever the reference stores: the commit itself for a lightweight tag, the tag
/// object for an annotated one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: String,
    id: Digest,
    kind: TagKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    /// The reference points straight at a commit.
    Lightweight,
    /// The reference points at a stored tag object.
    Annotated(Annotation),
}

/// The contents of a tag object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub object: Digest,
    pub object_type: String,
    /// The name recorded inside the object. May differ from the reference name.
    pub tag: String,
    pub tagger: Signature,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub when: Timestamp,
}

impl Tag {
    pub fn lightweight(id: Digest) -> Self {
        Self {
            name: String::new(),
            id,
            kind: TagKind::Lightweight,
        }
    }

    pub fn annotated(id: Digest, annotation: Annotation) -> Self {
        Self {
            name: String::new(),
            id,
            kind: TagKind::Annotated(annotation),
        }
    }

    /// The reference name, without `refs/tags/`. Empty when the tag was looked up by id.
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    pub(crate) fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_owned();
        self
    }

    pub fn id(&self) -> &Digest {
        &self.id
    }

    /// The object this tag points at. For lightweight tags this is the id itself.
    pub fn target_id(&self) -> &Digest {
        match &self.kind {
            TagKind::Lightweight => &self.id,
            TagKind::Annotated(annotation) => &annotation.object,
        }
    }

    pub fn kind(&self) -> &TagKind {
        &self.kind
    }

    pub fn annotation(&self) -> Option<&Annotation> {
        match &self.kind {
            TagKind::Lightweight => None,
            TagKind::Annotated(annotation) => Some(annotation),
        }
    }

    /// Returns `true` if the tag is [`TagKind::Annotated`].
    #[must_use]
    pub fn is_annotated(&self) -> bool {
        matches!(self.kind, TagKind::Annotated(..))
    }

    /// When the tag object was created. Lightweight tags carry no time of their own.
    pub fn created_at(&self) -> Option<&Timestamp> {
        self.annotation().map(|a| &a.tagger.when)
    }

    pub fn pretty_print(&self) -> String {
        match &self.kind {
            TagKind::Lightweight => {
                format!("{}\tcommit {:x}\n", self.display_name(), self.id)
            }
            TagKind::Annotated(annotation) => {
                let mut out = format!(
                    "{}\ttag {:x}\n\
                     object {:x}\n\
                     type {}\n\
                     tagger {} <{}> {}\n",
                    self.display_name(),
                    self.id,
                    annotation.object,
                    annotation.object_type,
                    annotation.tagger.name,
                    annotation.tagger.email,
                    annotation.tagger.when,
                );
                if !annotation.message.is_empty() {
                    out.push('\n');
                    out.push_str(&annotation.message);
                    out.push('\n');
                }
                out
            }
        }
    }

    fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "(unnamed)"
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn annotation() -> Annotation {
        Annotation {
            object: Digest::from_str("e6a49274aa0893ce2e2928589100387aee220c5b").unwrap(),
            object_type: "commit".into(),
            tag: "v1.0.0".into(),
            tagger: Signature {
                name: "Jamie Quigley".into(),
                email: "jamie@quigley.xyz".into(),
                when: Timestamp::from_git("1658312219", "+0100").unwrap(),
            },
            message: "First release".into(),
        }
    }

    #[test]
    fn test_lightweight_targets_itself() {
        let id = Digest::from_str("14a9d8464caef987f3b5c3cf26f56db825459abd").unwrap();
        let tag = Tag::lightweight(id);
        assert_eq!(tag.target_id(), &id);
        assert!(!tag.is_annotated());
        assert!(tag.created_at().is_none());
        assert_eq!(tag.name(), "");
    }

    #[test]
    fn test_annotated_targets_object() {
        let id = Digest::from_str("14a9d8464caef987f3b5c3cf26f56db825459abd").unwrap();
        let tag = Tag::annotated(id, annotation()).with_name("v1.0.0");
        assert_eq!(tag.id(), &id);
        assert_eq!(tag.target_id(), &annotation().object);
        assert_eq!(tag.created_at().unwrap().unix(), 1658312219);
        assert_eq!(
            tag.pretty_print(),
            "v1.0.0\ttag 14a9d8464caef987f3b5c3cf26f56db825459abd\n\
             object e6a49274aa0893ce2e2928589100387aee220c5b\n\
             type commit\n\
             tagger Jamie Quigley <jamie@quigley.xyz> 1658312219 +0100\n\
             \n\
             First release\n"
        );
    }
}
