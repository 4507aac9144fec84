//! Java modifier flags.
//!
//! [`Modifiers`] is a small bit set covering the source modifiers of Java
//! declarations plus the engine-level [`Modifiers::BINARY`] marker for
//! elements read from libraries without source.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// A set of Java modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers(u32);

impl Modifiers {
    pub const PUBLIC: Modifiers = Modifiers(1 << 0);
    pub const PROTECTED: Modifiers = Modifiers(1 << 1);
    pub const PRIVATE: Modifiers = Modifiers(1 << 2);
    pub const ABSTRACT: Modifiers = Modifiers(1 << 3);
    pub const STATIC: Modifiers = Modifiers(1 << 4);
    pub const FINAL: Modifiers = Modifiers(1 << 5);
    pub const TRANSIENT: Modifiers = Modifiers(1 << 6);
    pub const VOLATILE: Modifiers = Modifiers(1 << 7);
    pub const SYNCHRONIZED: Modifiers = Modifiers(1 << 8);
    pub const NATIVE: Modifiers = Modifiers(1 << 9);
    pub const STRICTFP: Modifiers = Modifiers(1 << 10);
    pub const DEFAULT: Modifiers = Modifiers(1 << 11);
    /// Element was read from a library without source text.
    pub const BINARY: Modifiers = Modifiers(1 << 16);

    /// Source modifiers in the order the Java Language Specification recommends.
    const KEYWORDS: [(Modifiers, &'static str); 12] = [
        (Modifiers::PUBLIC, "public"),
        (Modifiers::PROTECTED, "protected"),
        (Modifiers::PRIVATE, "private"),
        (Modifiers::ABSTRACT, "abstract"),
        (Modifiers::STATIC, "static"),
        (Modifiers::FINAL, "final"),
        (Modifiers::TRANSIENT, "transient"),
        (Modifiers::VOLATILE, "volatile"),
        (Modifiers::SYNCHRONIZED, "synchronized"),
        (Modifiers::NATIVE, "native"),
        (Modifiers::STRICTFP, "strictfp"),
        (Modifiers::DEFAULT, "default"),
    ];

    /// The empty set.
    pub const fn empty() -> Self {
        Modifiers(0)
    }

    /// Raw bit value.
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Check if no modifier is set.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Check if all modifiers in `other` are set.
    pub const fn contains(&self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check if any modifier in `other` is set.
    pub const fn intersects(&self, other: Modifiers) -> bool {
        self.0 & other.0 != 0
    }

    /// Add the modifiers in `other`.
    pub fn insert(&mut self, other: Modifiers) {
        self.0 |= other.0;
    }

    /// Remove the modifiers in `other`.
    pub fn remove(&mut self, other: Modifiers) {
        self.0 &= !other.0;
    }

    /// Return a copy with `other` added.
    #[must_use]
    pub const fn with(self, other: Modifiers) -> Self {
        Modifiers(self.0 | other.0)
    }

    /// Return a copy with `other` removed.
    #[must_use]
    pub const fn without(self, other: Modifiers) -> Self {
        Modifiers(self.0 & !other.0)
    }

    /// Map a source keyword to its modifier.
    pub fn from_keyword(keyword: &str) -> Option<Modifiers> {
        Self::KEYWORDS
            .iter()
            .find(|(_, kw)| *kw == keyword)
            .map(|(m, _)| *m)
    }

    /// The source keywords of this set, in canonical order.
    ///
    /// [`Modifiers::BINARY`] has no keyword and is never listed.
    pub fn keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        Self::KEYWORDS
            .iter()
            .filter(move |(m, _)| self.contains(*m))
            .map(|(_, kw)| *kw)
    }

    /// The visibility subset (`public`, `protected`, `private`).
    pub fn visibility(&self) -> Modifiers {
        Modifiers(self.0 & (Self::PUBLIC.0 | Self::PROTECTED.0 | Self::PRIVATE.0))
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Modifiers) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for kw in self.keywords() {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(kw)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_canonical_order() {
        let mods = Modifiers::FINAL | Modifiers::STATIC | Modifiers::PUBLIC;
        assert_eq!(mods.to_string(), "public static final");
    }

    #[test]
    fn test_binary_has_no_keyword() {
        let mods = Modifiers::BINARY | Modifiers::PRIVATE;
        assert_eq!(mods.keywords().collect::<Vec<_>>(), vec!["private"]);
    }

    #[test]
    fn test_from_keyword() {
        assert_eq!(Modifiers::from_keyword("abstract"), Some(Modifiers::ABSTRACT));
        assert_eq!(Modifiers::from_keyword("class"), None);
    }

    #[test]
    fn test_insert_remove() {
        let mut mods = Modifiers::empty();
        mods.insert(Modifiers::STATIC);
        assert!(mods.contains(Modifiers::STATIC));
        mods.remove(Modifiers::STATIC);
        assert!(mods.is_empty());
    }

    #[test]
    fn test_visibility() {
        let mods = Modifiers::PROTECTED | Modifiers::FINAL;
        assert_eq!(mods.visibility(), Modifiers::PROTECTED);
        assert!(mods.intersects(Modifiers::FINAL | Modifiers::NATIVE));
    }
}
