use std::fmt;

/// Identifies a single unit (statistical area, census tract, etc.) within a
/// contiguity graph.
///
/// Units are assigned contiguous indices starting from `0`, in the order the
/// geometries were handed to the builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u32);

impl UnitId {
    /// The position of this unit in the input geometry slice.
    #[inline] pub fn index(self) -> usize { self.0 as usize }
}

impl From<usize> for UnitId {
    fn from(index: usize) -> Self {
        assert!(index <= u32::MAX as usize, "unit index {index} exceeds u32 range");
        Self(index as u32)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_through_usize() {
        assert_eq!(UnitId::from(17).index(), 17);
    }

    #[test]
    fn display_normal() {
        assert_eq!(UnitId(42).to_string(), "UnitId(42)");
    }

    #[test]
    fn ordering() {
        assert!(UnitId(0) < UnitId(1));
        assert!(UnitId(9) < UnitId(10));
    }
}
