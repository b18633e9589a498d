//! Shader Define System
//!
//! An ordered collection of preprocessor defines handed to the shader
//! compiler. Uses interned [`Symbol`]s for keys and values so that identical
//! define sets compare and hash as integer slices.
//!
//! A define set selects one permutation of a shared shader source: the
//! lighting-model variants differ only in their `LIGHTING_MODEL` value, and
//! the stage markers `VERTEX_SHADER` / `PIXEL_SHADER` gate stage-specific
//! declarations inside shared include chunks.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use crate::utils::interner::{self, Symbol};

/// A collection of shader define pairs, kept sorted by key symbol.
///
/// Identical define sets always produce identical hashes, which makes the set
/// usable as part of a compiled-program identity.
#[derive(Debug, Clone, Default)]
pub struct ShaderDefines {
    defines: Vec<(Symbol, Symbol)>,
}

impl ShaderDefines {
    /// Creates an empty define set.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            defines: Vec::new(),
        }
    }

    /// Sets a define, replacing the value if the key is already present.
    pub fn set(&mut self, key: &str, value: &str) {
        let key_sym = interner::intern(key);
        let value_sym = interner::intern(value);
        match self.defines.binary_search_by_key(&key_sym, |&(k, _)| k) {
            Ok(idx) => self.defines[idx].1 = value_sym,
            Err(idx) => self.defines.insert(idx, (key_sym, value_sym)),
        }
    }

    /// Returns the value of a define, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'static str> {
        let key_sym = interner::get(key)?;
        self.defines
            .binary_search_by_key(&key_sym, |&(k, _)| k)
            .ok()
            .map(|idx| interner::resolve(self.defines[idx].1))
    }

    /// Returns `true` when the key is defined.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        interner::get(key).is_some_and(|key_sym| {
            self.defines
                .binary_search_by_key(&key_sym, |&(k, _)| k)
                .is_ok()
        })
    }

    /// Number of defines in the set.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.defines.len()
    }

    /// Returns `true` when the set is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }

    /// Iterates the defines as resolved strings.
    pub fn iter_strings(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.defines
            .iter()
            .map(|&(k, v)| (interner::resolve(k), interner::resolve(v)))
    }

    /// Converts the set to a `BTreeMap` for template rendering.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.iter_strings()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Merges another set into this one; conflicting keys take the other's
    /// value.
    pub fn merge(&mut self, other: &ShaderDefines) {
        for &(key, value) in &other.defines {
            match self.defines.binary_search_by_key(&key, |&(k, _)| k) {
                Ok(idx) => self.defines[idx].1 = value,
                Err(idx) => self.defines.insert(idx, (key, value)),
            }
        }
    }

    /// Content hash of the define set.
    #[must_use]
    pub fn compute_hash(&self) -> u64 {
        use std::hash::BuildHasher;

        rustc_hash::FxBuildHasher.hash_one(self)
    }
}

impl Hash for ShaderDefines {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.defines.hash(state);
    }
}

impl PartialEq for ShaderDefines {
    fn eq(&self, other: &Self) -> bool {
        self.defines == other.defines
    }
}

impl Eq for ShaderDefines {}

impl From<&[(&str, &str)]> for ShaderDefines {
    fn from(defines: &[(&str, &str)]) -> Self {
        let mut result = Self::new();
        for (k, v) in defines {
            result.set(k, v);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut defines = ShaderDefines::new();
        defines.set("VERTEX_SHADER", "1");
        defines.set("LIGHTING_MODEL", "3");

        assert!(defines.contains("VERTEX_SHADER"));
        assert!(!defines.contains("PIXEL_SHADER"));
        assert_eq!(defines.get("LIGHTING_MODEL"), Some("3"));
    }

    #[test]
    fn test_set_replaces_value() {
        let mut defines = ShaderDefines::new();
        defines.set("LIGHTING_MODEL", "1");
        defines.set("LIGHTING_MODEL", "4");

        assert_eq!(defines.len(), 1);
        assert_eq!(defines.get("LIGHTING_MODEL"), Some("4"));
    }

    #[test]
    fn test_merge() {
        let mut d1 = ShaderDefines::from(&[("A", "1"), ("B", "2")][..]);
        let d2 = ShaderDefines::from(&[("B", "3"), ("C", "4")][..]);

        d1.merge(&d2);

        assert_eq!(d1.get("A"), Some("1"));
        assert_eq!(d1.get("B"), Some("3")); // Overwritten
        assert_eq!(d1.get("C"), Some("4"));
    }

    #[test]
    fn test_hash_is_insertion_order_independent() {
        let mut d1 = ShaderDefines::new();
        d1.set("A", "1");
        d1.set("B", "2");

        let mut d2 = ShaderDefines::new();
        d2.set("B", "2");
        d2.set("A", "1");

        assert_eq!(d1.compute_hash(), d2.compute_hash());
        assert_eq!(d1, d2);
    }
}
