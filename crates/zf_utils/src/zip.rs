//! Lock-step iteration over containers that must have equal lengths.
//!
//! Unlike [`Iterator::zip`], which silently stops at the shorter input,
//! these helpers reject a length mismatch before yielding a single item.

// -----------------------------------------------------------------------------
// zip

/// Iterates two containers in lock step.
///
/// # Panics
///
/// Panics if the inputs have different lengths. No item is yielded in
/// that case.
///
/// # Examples
///
/// ```
/// use zf_utils::zip;
///
/// let names = ["a", "b", "c"];
/// let values = [1, 2, 3];
///
/// let pairs: Vec<_> = zip(&names, &values).collect();
/// assert_eq!(pairs, [(&"a", &1), (&"b", &2), (&"c", &3)]);
/// ```
///
/// ```should_panic
/// use zf_utils::zip;
///
/// let _ = zip(&[1, 2, 3], &[1, 2]); // container size mismatch
/// ```
pub fn zip<A, B>(a: A, b: B) -> core::iter::Zip<A::IntoIter, B::IntoIter>
where
    A: IntoIterator,
    B: IntoIterator,
    A::IntoIter: ExactSizeIterator,
    B::IntoIter: ExactSizeIterator,
{
    let a = a.into_iter();
    let b = b.into_iter();
    assert_eq!(
        a.len(),
        b.len(),
        "zip: container size mismatch ({} != {})",
        a.len(),
        b.len(),
    );
    a.zip(b)
}

// -----------------------------------------------------------------------------
// zip3

/// Iterates three containers in lock step.
///
/// # Panics
///
/// Panics if any two inputs have different lengths. No item is yielded
/// in that case.
///
/// # Examples
///
/// ```
/// use zf_utils::zip3;
///
/// let triples: Vec<_> = zip3(&[1, 2], &["x", "y"], &[true, false]).collect();
/// assert_eq!(triples, [(&1, &"x", &true), (&2, &"y", &false)]);
/// ```
pub fn zip3<A, B, C>(a: A, b: B, c: C) -> impl Iterator<Item = (A::Item, B::Item, C::Item)>
where
    A: IntoIterator,
    B: IntoIterator,
    C: IntoIterator,
    A::IntoIter: ExactSizeIterator,
    B::IntoIter: ExactSizeIterator,
    C::IntoIter: ExactSizeIterator,
{
    let a = a.into_iter();
    let b = b.into_iter();
    let c = c.into_iter();
    assert!(
        a.len() == b.len() && b.len() == c.len(),
        "zip3: container size mismatch ({} / {} / {})",
        a.len(),
        b.len(),
        c.len(),
    );
    a.zip(b).zip(c).map(|((a, b), c)| (a, b, c))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{zip, zip3};

    #[test]
    fn equal_lengths() {
        let mut it = zip([1, 2], ["a", "b"]);
        assert_eq!(it.next(), Some((1, "a")));
        assert_eq!(it.next(), Some((2, "b")));
        assert_eq!(it.next(), None);
    }

    #[test]
    fn empty_inputs() {
        let mut it = zip::<[i32; 0], [i32; 0]>([], []);
        assert_eq!(it.next(), None);
    }

    #[test]
    #[should_panic(expected = "container size mismatch")]
    fn rejects_mismatch() {
        let _ = zip(&[1, 2, 3], &[1, 2]);
    }

    #[test]
    #[should_panic(expected = "container size mismatch")]
    fn rejects_mismatch_three_way() {
        let _ = zip3(&[1, 2], &[1, 2], &[1]);
    }
}
