//! Global string interner.
//!
//! Converts strings into compact integer [`Symbol`]s for cheap comparison and
//! hashing. This backs the shader define system: define names and values are
//! interned once and compared as integers afterwards.

use std::sync::OnceLock;

use lasso::{Spur, ThreadedRodeo};

static INTERNER: OnceLock<ThreadedRodeo> = OnceLock::new();

/// Compact integer identifier for an interned string.
pub type Symbol = Spur;

fn interner() -> &'static ThreadedRodeo {
    INTERNER.get_or_init(ThreadedRodeo::new)
}

/// Interns a string, returning its [`Symbol`].
#[inline]
pub fn intern(s: &str) -> Symbol {
    interner().get_or_intern(s)
}

/// Returns the [`Symbol`] of an already-interned string, without allocating.
#[inline]
#[must_use]
pub fn get(s: &str) -> Option<Symbol> {
    interner().get(s)
}

/// Resolves a [`Symbol`] back to its string.
#[inline]
#[must_use]
pub fn resolve(sym: Symbol) -> &'static str {
    interner().resolve(&sym)
}

/// Pre-interns the define names the shader pipeline touches every compile,
/// keeping interner traffic off the hot-reload scan path.
pub fn preload_common_defines() {
    let common = [
        // Stage markers
        "VERTEX_SHADER",
        "PIXEL_SHADER",
        // Variant selection
        "LIGHTING_MODEL",
        // Common values
        "0",
        "1",
        "2",
        "3",
        "4",
    ];

    for name in common {
        intern(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_resolve() {
        let s1 = intern("hello");
        let s2 = intern("hello");
        let s3 = intern("world");

        assert_eq!(s1, s2);
        assert_ne!(s1, s3);

        assert_eq!(resolve(s1), "hello");
        assert_eq!(resolve(s3), "world");
    }

    #[test]
    fn test_get() {
        let _ = intern("existing");

        assert!(get("existing").is_some());
        assert!(get("never_interned_anywhere").is_none());
    }
}
