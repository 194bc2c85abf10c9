use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, ops};

/// A range between two numeric values, inclusive on both ends. Used for axis
/// extents, e.g. the x span of a lattice or of an enabled design.
#[derive(Copy, Clone, Debug, Display, PartialEq, Serialize, Deserialize)]
#[display(fmt = "[{}, {}]", min, max)]
pub struct NumRange<T: Display = f64> {
    pub min: T,
    pub max: T,
}

impl<T> NumRange<T>
where
    T: Copy
        + Display
        + PartialOrd
        + ops::Add<Output = T>
        + ops::Sub<Output = T>
        + ops::Div<f64, Output = T>,
{
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Build the smallest range that contains every given value. Returns
    /// `None` for an empty iterator, since there's nothing to bound.
    pub fn bounding(values: impl IntoIterator<Item = T>) -> Option<Self> {
        let mut values = values.into_iter();
        let first = values.next()?;
        Some(
            values.fold(Self::new(first, first), |range, value| {
                range.include(value)
            }),
        )
    }

    /// Grow this range (if necessary) so that it contains the given value
    pub fn include(self, value: T) -> Self {
        Self {
            min: if value < self.min { value } else { self.min },
            max: if value > self.max { value } else { self.max },
        }
    }

    /// Max minus min
    pub fn span(&self) -> T {
        self.max - self.min
    }

    /// The value halfway between min and max
    pub fn midpoint(&self) -> T {
        (self.min + self.max) / 2.0
    }

    /// Check if a value is in this range. Ranges are inclusive on both ends.
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_bounding() {
        assert_eq!(NumRange::<f64>::bounding(vec![]), None);
        assert_eq!(
            NumRange::bounding(vec![3.0, -1.0, 2.0]),
            Some(NumRange::new(-1.0, 3.0))
        );
        // A single value makes a zero-length range
        assert_eq!(
            NumRange::bounding(vec![4.5]),
            Some(NumRange::new(4.5, 4.5))
        );
    }

    #[test]
    fn test_span_and_midpoint() {
        let range: NumRange = NumRange::new(1.0, 3.0);
        assert_approx_eq!(range.span(), 2.0);
        assert_approx_eq!(range.midpoint(), 2.0);

        let range: NumRange = NumRange::new(-3.0, -3.0);
        assert_approx_eq!(range.span(), 0.0);
        assert_approx_eq!(range.midpoint(), -3.0);
    }

    #[test]
    fn test_contains() {
        let range: NumRange = NumRange::new(1.0, 3.0);
        assert!(!range.contains(0.9));
        assert!(range.contains(1.0));
        assert!(range.contains(2.0));
        assert!(range.contains(3.0));
        assert!(!range.contains(3.1));

        // Test a zero-length span, it should contain exactly one value
        let range: NumRange = NumRange::new(1.0, 1.0);
        assert!(!range.contains(0.9));
        assert!(range.contains(1.0));
        assert!(!range.contains(1.1));
    }
}
