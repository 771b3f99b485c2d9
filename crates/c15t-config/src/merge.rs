//! # Typed Recursive Merge
//!
//! Configuration layers (library defaults, file config, code overrides)
//! combine through one trait with one precedence rule: the overlay wins
//! field-by-field, an absent overlay field preserves the base, and maps
//! merge key-wise. Each config type states how it merges in its `Merge`
//! impl; there is no reflective deep merge.

use std::collections::BTreeMap;

/// Combine a base value with an overlay of the same type.
pub trait Merge: Sized {
    /// Merge `overlay` over `self`, with `overlay` taking precedence.
    fn merge(self, overlay: Self) -> Self;
}

/// `None` in the overlay preserves the base; `Some` replaces it wholesale.
///
/// Note this intentionally does not recurse into the payload: an optional
/// field is an atomic choice. Types whose partial forms must merge deeply
/// hold their sub-structure as a non-optional field with its own `Merge`
/// impl.
impl<T> Merge for Option<T> {
    fn merge(self, overlay: Self) -> Self {
        overlay.or(self)
    }
}

/// Key-wise merge: overlay entries replace base entries with the same key,
/// base entries without an overlay counterpart survive.
impl<K: Ord, V> Merge for BTreeMap<K, V> {
    fn merge(mut self, overlay: Self) -> Self {
        self.extend(overlay);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_overlay_wins() {
        assert_eq!(Some(1).merge(Some(2)), Some(2));
    }

    #[test]
    fn test_option_none_preserves_base() {
        assert_eq!(Some(1).merge(None), Some(1));
        assert_eq!(None::<i32>.merge(None), None);
    }

    #[test]
    fn test_map_merges_keywise() {
        let base: BTreeMap<_, _> = [("a", 1), ("b", 2)].into_iter().collect();
        let overlay: BTreeMap<_, _> = [("b", 20), ("c", 30)].into_iter().collect();
        let merged = base.merge(overlay);
        assert_eq!(
            merged,
            [("a", 1), ("b", 20), ("c", 30)].into_iter().collect()
        );
    }
}
