// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Id kinds that live in a canvas namespace (`shape:` / `binding:`).
pub trait Namespace {
    const PREFIX: &'static str;
}

/// A stable, opaque identifier.
///
/// Ids are never empty. Ids of a namespaced kind may omit their own prefix (the applier adds it
/// later) but must not carry the prefix of a *different* kind, so a shape id can never alias a
/// binding id after rewriting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T: IdKind> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id::<T>(&value)?;
        Ok(Self { value, _marker: PhantomData })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T: IdKind + Namespace> Id<T> {
    /// Builds `<prefix><local>`; always valid because the prefix is non-empty.
    pub fn namespaced(local: impl AsRef<str>) -> Self {
        Self { value: format!("{}{}", T::PREFIX, local.as_ref()), _marker: PhantomData }
    }

    pub fn has_namespace(&self) -> bool {
        self.value.starts_with(T::PREFIX)
    }

    /// Returns the id with its namespace prefix, adding it when missing.
    pub fn with_namespace(self) -> Self {
        if self.has_namespace() {
            self
        } else {
            Self::namespaced(self.value)
        }
    }

    /// The id without its namespace prefix.
    pub fn local_part(&self) -> &str {
        self.value.strip_prefix(T::PREFIX).unwrap_or(&self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        &self.value
    }
}

impl<T: IdKind> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl<T: IdKind> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T: IdKind> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("id must not be empty")]
    Empty,
    #[error("id '{id}' uses the foreign namespace '{prefix}'")]
    ForeignNamespace { id: String, prefix: &'static str },
}

/// Marker for id tag types; `FOREIGN` lists the prefixes an id of this kind must not carry.
pub trait IdKind {
    const FOREIGN: &'static [&'static str];
}

fn validate_id<T: IdKind>(value: &str) -> Result<(), IdError> {
    if value.trim().is_empty() {
        return Err(IdError::Empty);
    }
    if let Some(prefix) = T::FOREIGN.iter().find(|prefix| value.starts_with(*prefix)) {
        return Err(IdError::ForeignNamespace { id: value.to_owned(), prefix });
    }
    Ok(())
}

pub const SHAPE_PREFIX: &str = "shape:";
pub const BINDING_PREFIX: &str = "binding:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeIdTag {}
pub type ShapeId = Id<ShapeIdTag>;

impl IdKind for ShapeIdTag {
    const FOREIGN: &'static [&'static str] = &[BINDING_PREFIX];
}

impl Namespace for ShapeIdTag {
    const PREFIX: &'static str = SHAPE_PREFIX;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BindingIdTag {}
pub type BindingId = Id<BindingIdTag>;

impl IdKind for BindingIdTag {
    const FOREIGN: &'static [&'static str] = &[SHAPE_PREFIX];
}

impl Namespace for BindingIdTag {
    const PREFIX: &'static str = BINDING_PREFIX;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactIdTag {}
pub type ArtifactId = Id<ArtifactIdTag>;

impl IdKind for ArtifactIdTag {
    const FOREIGN: &'static [&'static str] = &[];
}

#[cfg(test)]
mod tests {
    use super::{ArtifactId, BindingId, IdError, ShapeId};

    #[test]
    fn id_rejects_empty() {
        assert_eq!(ArtifactId::new(""), Err(IdError::Empty));
        assert_eq!(ShapeId::new("  "), Err(IdError::Empty));
    }

    #[test]
    fn shape_id_rejects_binding_namespace() {
        let err = ShapeId::new("binding:arrow-1").unwrap_err();
        assert!(matches!(err, IdError::ForeignNamespace { prefix: "binding:", .. }));
        let err = BindingId::new("shape:box").unwrap_err();
        assert!(matches!(err, IdError::ForeignNamespace { prefix: "shape:", .. }));
    }

    #[test]
    fn with_namespace_is_idempotent() {
        let bare = ShapeId::new("box-1").expect("shape id");
        assert!(!bare.has_namespace());
        let prefixed = bare.with_namespace();
        assert_eq!(prefixed.as_str(), "shape:box-1");
        assert_eq!(prefixed.clone().with_namespace(), prefixed);
        assert_eq!(prefixed.local_part(), "box-1");
    }

    #[test]
    fn ids_round_trip_through_json_as_plain_strings() {
        let id: BindingId = serde_json::from_str("\"binding:a\"").expect("binding id");
        assert_eq!(serde_json::to_string(&id).expect("json"), "\"binding:a\"");
        serde_json::from_str::<BindingId>("\"shape:a\"").unwrap_err();
    }
}
