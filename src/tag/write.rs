use super::{Annotation, Signature};

impl Signature {
    /// `Name <email> unix ±HHMM`
    pub fn format(&self) -> String {
        format!("{} <{}> {}", self.name, self.email, self.when)
    }
}

impl Annotation {
    /// Serialise the tag object contents, without the `"tag {len}\0"` header.
    pub fn format(&self) -> Vec<u8> {
        let mut data = format!(
            "\
            object {:x}\n\
            type {}\n\
            tag {}\n\
            tagger {}\n",
            self.object,
            self.object_type,
            self.tag,
            self.tagger.format(),
        );
        if !self.message.is_empty() {
            data.push('\n');
            data.push_str(&self.message);
            data.push('\n');
        }
        data.into_bytes()
    }
}
