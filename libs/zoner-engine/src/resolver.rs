use std::borrow::Cow;
use std::collections::HashMap;

use serde::Deserialize;
use zoner_api::{FieldDescriptor, FieldMeta, TargetDecl, TypeInfo};

/// Configuration-supplied replacement for elements of a field's metadata.
///
/// Only the elements that are set replace the declared ones.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FieldOverride {
    /// Declaring type name, as reported by `TypeInfo::name`.
    #[serde(rename = "type")]
    pub type_name: String,
    pub field: String,
    #[serde(default)]
    pub rename: Option<String>,
    #[serde(default)]
    pub read_cache: Option<String>,
    #[serde(default)]
    pub write_cache: Option<String>,
    #[serde(default)]
    pub skip: Option<bool>,
}

impl FieldOverride {
    fn apply(&self, meta: &mut FieldMeta) {
        if self.rename.is_some() {
            meta.rename.clone_from(&self.rename);
        }
        if self.read_cache.is_some() {
            meta.read_cache.clone_from(&self.read_cache);
        }
        if self.write_cache.is_some() {
            meta.write_cache.clone_from(&self.write_cache);
        }
        if let Some(skip) = self.skip {
            meta.skip = skip;
        }
    }
}

/// Read-only projection over declared metadata plus configured overrides.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    /// type name → field name → override
    overrides: HashMap<String, HashMap<String, FieldOverride>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: impl IntoIterator<Item = FieldOverride>) -> Self {
        let mut resolver = Self::new();
        for o in overrides {
            resolver.insert(o);
        }
        resolver
    }

    /// Later overrides for the same field replace earlier ones.
    pub fn insert(&mut self, o: FieldOverride) {
        self.overrides
            .entry(o.type_name.clone())
            .or_default()
            .insert(o.field.clone(), o);
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Effective metadata of `field`; borrowed unless an override applies.
    pub fn metadata_for<'a>(&'a self, field: &'a FieldDescriptor) -> Cow<'a, FieldMeta> {
        match self
            .overrides
            .get(field.owner_name())
            .and_then(|fields| fields.get(field.name()))
        {
            Some(o) => {
                let mut meta = field.meta().clone();
                o.apply(&mut meta);
                Cow::Owned(meta)
            }
            None => Cow::Borrowed(field.meta()),
        }
    }

    pub fn target_type_for(&self, source: &TypeInfo) -> Option<TargetDecl> {
        source.target().copied()
    }
}
