//! Version-aware ordering of tag names.
//!
//! A name is a version if it matches (informally):
//! `[v|V]<num>(.<num>)*[-<prerelease>][+<build>]`
//!
//! Versions compare component by component as numbers, with missing components counting as
//! zero, so `v1.10.0 > v1.9.0` and `1.2 == 1.2.0`. Prerelease identifiers follow semver.org:
//! a release outranks any of its prereleases, numeric identifiers compare as numbers and rank
//! below alphanumeric ones. Build metadata is ignored.
//!
//! Names that are not versions rank below every version and compare by bytes among themselves.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Identifier {
    Numeric(u64),
    Alpha(String),
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Identifier::Numeric(a), Identifier::Numeric(b)) => a.cmp(b),
            (Identifier::Numeric(_), Identifier::Alpha(_)) => Ordering::Less,
            (Identifier::Alpha(_), Identifier::Numeric(_)) => Ordering::Greater,
            (Identifier::Alpha(a), Identifier::Alpha(b)) => a.cmp(b),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    components: Vec<u64>,
    prerelease: Vec<Identifier>,
}

impl Version {
    pub fn parse(name: &str) -> Option<Self> {
        static REGEX: Lazy<Regex> = Lazy::new(|| {
            Regex::new(
                r"^[vV]?([0-9]+(?:\.[0-9]+)*)(?:-([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?(?:\+[0-9A-Za-z.-]+)?$",
            )
            .expect("version regex is valid")
        });

        let groups = REGEX.captures(name)?;

        let components = groups[1]
            .split('.')
            .map(|c| c.parse().ok())
            .collect::<Option<Vec<u64>>>()?;

        let prerelease = match groups.get(2) {
            Some(pre) => pre
                .as_str()
                .split('.')
                .map(|id| {
                    if id.bytes().all(|b| b.is_ascii_digit()) {
                        id.parse().ok().map(Identifier::Numeric)
                    } else {
                        Some(Identifier::Alpha(id.to_owned()))
                    }
                })
                .collect::<Option<Vec<_>>>()?,
            None => Vec::new(),
        };

        Some(Self {
            components,
            prerelease,
        })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        let component = |v: &Version, i: usize| v.components.get(i).copied().unwrap_or(0);

        (0..len)
            .map(|i| component(self, i).cmp(&component(other, i)))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| {
                match (self.prerelease.is_empty(), other.prerelease.is_empty()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => self.prerelease.cmp(&other.prerelease),
                }
            })
    }
}

/// Ascending order over tag names.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    match (Version::parse(a), Version::parse(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.as_bytes().cmp(b.as_bytes()),
    }
}

/// Sort names highest version first. Names of equal precedence keep their relative order.
pub fn sort_descending<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| compare_names(b.as_ref(), a.as_ref()));
}
