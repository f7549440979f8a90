//! Typed handles into the equation model.
//!
//! Each handle wraps a `NonZeroU32` holding `index + 1`, so `Option<VarId>`
//! costs nothing extra and a variable handle can never be passed where a
//! constraint handle is expected.

use core::fmt;
use core::num::NonZeroU32;

macro_rules! model_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            pub fn from_index(index: u32) -> Self {
                Self(NonZeroU32::MIN.saturating_add(index))
            }

            /// 0-based position in the owning table.
            pub fn index(self) -> u32 {
                self.0.get() - 1
            }

            pub fn slot(self) -> usize {
                self.index() as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.index())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.index())
            }
        }
    };
}

model_id!(
    /// A variable in a `Model`.
    VarId
);
model_id!(
    /// A residual constraint in a `Model`.
    ConstraintId
);
model_id!(
    /// A unit registered on a flowsheet.
    UnitId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_follow_insertion_order() {
        let ids: Vec<VarId> = (0..5).map(VarId::from_index).collect();
        let slots: Vec<usize> = ids.iter().map(|id| id.slot()).collect();
        assert_eq!(slots, vec![0, 1, 2, 3, 4]);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn debug_names_the_kind() {
        assert_eq!(format!("{:?}", ConstraintId::from_index(7)), "ConstraintId(7)");
        assert_eq!(UnitId::from_index(2).to_string(), "2");
    }

    #[test]
    fn optional_handle_has_no_overhead() {
        assert_eq!(
            core::mem::size_of::<Option<VarId>>(),
            core::mem::size_of::<u32>()
        );
    }
}
