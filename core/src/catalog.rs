//! Species and color lists, looked up by id or by name.

use std::fmt;

use crate::error::MalformedResponseError;
use crate::models::{Color, Species};
use crate::payload::{Fields, FromPayload};

/// Every species and color DTI knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub species: Vec<Species>,
    pub colors: Vec<Color>,
}

impl FromPayload for Catalog {
    fn from_payload(fields: &Fields<'_>) -> Result<Self, MalformedResponseError> {
        Ok(Self {
            species: fields.list("allSpecies")?,
            colors: fields.list("allColors")?,
        })
    }
}

/// Something with an id and a display name.
pub trait Named {
    fn id(&self) -> u32;
    fn name(&self) -> &str;
}

impl Named for Species {
    fn id(&self) -> u32 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Color {
    fn id(&self) -> u32 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

/// A species or color reference supplied by a caller.
///
/// Names are matched case-insensitively; a name that is all digits is
/// tried as an id first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Id(u32),
    Name(String),
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Id(id) => write!(f, "{id}"),
            Lookup::Name(name) => f.write_str(name),
        }
    }
}

impl From<u32> for Lookup {
    fn from(id: u32) -> Self {
        Lookup::Id(id)
    }
}

impl From<&str> for Lookup {
    fn from(name: &str) -> Self {
        Lookup::Name(name.to_string())
    }
}

impl From<String> for Lookup {
    fn from(name: String) -> Self {
        Lookup::Name(name)
    }
}

impl From<&Species> for Lookup {
    fn from(species: &Species) -> Self {
        Lookup::Id(species.id)
    }
}

impl From<&Color> for Lookup {
    fn from(color: &Color) -> Self {
        Lookup::Id(color.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameIndex<T> {
    entries: Vec<T>,
}

impl<T: Named> NameIndex<T> {
    pub fn new(mut entries: Vec<T>) -> Self {
        entries.sort_by_key(|entry| entry.id());
        Self { entries }
    }

    pub fn get(&self, key: impl Into<Lookup>) -> Option<&T> {
        match key.into() {
            Lookup::Id(id) => self.by_id(id),
            Lookup::Name(name) => {
                if let Some(found) = name.trim().parse().ok().and_then(|id| self.by_id(id)) {
                    return Some(found);
                }
                self.entries
                    .iter()
                    .find(|entry| entry.name().eq_ignore_ascii_case(name.trim()))
            }
        }
    }

    pub fn by_id(&self, id: u32) -> Option<&T> {
        self.entries
            .binary_search_by_key(&id, |entry| entry.id())
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
