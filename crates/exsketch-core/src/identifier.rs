//! Element and group identifiers.
//!
//! Every element in a sketch gets an [`ElementId`] when it is created, and
//! every group gets a [`GroupId`]. Bindings and group memberships refer to
//! elements by these identifiers, never by reference.
//!
//! Identifiers are minted by an [`IdGenerator`] owned by a single builder, so
//! two sketches never share generator state.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Identifier of a single sketch element.
///
/// # Examples
///
/// ```
/// use exsketch_core::identifier::{ElementId, IdGenerator};
///
/// let mut ids = IdGenerator::sequential();
/// let first: ElementId = ids.next_element_id();
/// assert_eq!(first, "00000000-0000-0000-0000-000000000001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ElementId(String);

/// Identifier shared by all members of a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GroupId(String);

macro_rules! impl_id_common {
    ($name:ident) => {
        impl $name {
            /// Wraps an existing identifier string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

impl_id_common!(ElementId);
impl_id_common!(GroupId);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Random,
    Sequential,
}

/// Mints unique element and group identifiers for one sketch.
///
/// - [`IdGenerator::random`] produces version 4 UUIDs, matching what the
///   Excalidraw editor itself generates.
/// - [`IdGenerator::sequential`] produces `Uuid::from_u128(1)`,
///   `Uuid::from_u128(2)`, ... which are still UUID-shaped but reproducible,
///   so documents can be compared byte for byte.
///
/// Element and group identifiers are drawn from the same counter, so they
/// never collide within a sketch.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    strategy: Strategy,
    counter: u128,
}

impl IdGenerator {
    /// Creates a generator producing random version 4 UUIDs.
    pub fn random() -> Self {
        Self {
            strategy: Strategy::Random,
            counter: 0,
        }
    }

    /// Creates a generator producing deterministic, increasing UUIDs.
    pub fn sequential() -> Self {
        Self {
            strategy: Strategy::Sequential,
            counter: 0,
        }
    }

    /// Returns how many identifiers have been minted so far.
    pub fn issued(&self) -> u128 {
        self.counter
    }

    /// Mints a new element identifier.
    pub fn next_element_id(&mut self) -> ElementId {
        ElementId(self.next_uuid().to_string())
    }

    /// Mints a new group identifier.
    pub fn next_group_id(&mut self) -> GroupId {
        GroupId(self.next_uuid().to_string())
    }

    fn next_uuid(&mut self) -> Uuid {
        self.counter += 1;
        match self.strategy {
            Strategy::Random => Uuid::new_v4(),
            Strategy::Sequential => Uuid::from_u128(self.counter),
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::random()
    }
}
