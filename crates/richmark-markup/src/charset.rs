//! Character sets used by the [`Scanner`](crate::Scanner) search operations.

/// A set of unicode scalars the scanner can test membership against.
///
/// Implemented for single characters, arrays and slices of characters,
/// string slices (every scalar of the string is a member), and the named
/// sets in this module.
///
/// # Example
///
/// ```
/// use richmark_markup::{Alphanumeric, CharSet};
///
/// assert!('<'.contains('<'));
/// assert!(['<', '&'].contains('&'));
/// assert!(CharSet::contains("<&", '&'));
/// assert!(Alphanumeric.contains('7'));
/// ```
pub trait CharSet {
    /// Returns `true` if `c` belongs to the set.
    fn contains(&self, c: char) -> bool;
}

impl CharSet for char {
    fn contains(&self, c: char) -> bool {
        *self == c
    }
}

impl<const N: usize> CharSet for [char; N] {
    fn contains(&self, c: char) -> bool {
        self.as_slice().contains(&c)
    }
}

impl CharSet for [char] {
    fn contains(&self, c: char) -> bool {
        self.iter().any(|&m| m == c)
    }
}

impl CharSet for str {
    fn contains(&self, c: char) -> bool {
        self.chars().any(|m| m == c)
    }
}

impl<T: CharSet + ?Sized> CharSet for &T {
    fn contains(&self, c: char) -> bool {
        (**self).contains(c)
    }
}

/// Unicode letters and digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Alphanumeric;

impl CharSet for Alphanumeric {
    fn contains(&self, c: char) -> bool {
        c.is_alphanumeric()
    }
}

/// Unicode whitespace, including newlines.
#[derive(Debug, Clone, Copy, Default)]
pub struct Whitespace;

impl CharSet for Whitespace {
    fn contains(&self, c: char) -> bool {
        c.is_whitespace()
    }
}

/// Membership decided by an arbitrary predicate.
#[derive(Debug, Clone, Copy)]
pub struct Predicate<F>(pub F);

impl<F: Fn(char) -> bool> CharSet for Predicate<F> {
    fn contains(&self, c: char) -> bool {
        (self.0)(c)
    }
}
