//! Arena indices for the declaration tree.

use std::fmt;

macro_rules! arena_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create an ID from a raw index.
            #[inline]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Get the raw `u32` value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Get the index as `usize` (for indexing into `Vec`s).
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            pub(crate) fn from_len(len: usize) -> Self {
                let raw = u32::try_from(len)
                    .unwrap_or_else(|_| panic!("{} count exceeds u32::MAX", stringify!($name)));
                Self(raw)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Declaration index within a [`DeclTree`](crate::DeclTree).
    ///
    /// IDs are allocated sequentially in construction order, which is also
    /// the stable declaration order every pass iterates in.
    DeclId,
    "d"
);

arena_id!(
    /// Loop index within a [`DeclTree`](crate::DeclTree).
    LoopId,
    "loop"
);

arena_id!(
    /// Package fragment index within a [`DeclTree`](crate::DeclTree).
    PackageId,
    "pkg"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_raw() {
        let id = DeclId::new(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(id.index(), 7);
        assert_eq!(DeclId::from_len(3), DeclId::new(3));
    }

    #[test]
    fn ids_debug_with_prefix() {
        assert_eq!(format!("{:?}", DeclId::new(4)), "d4");
        assert_eq!(format!("{:?}", LoopId::new(0)), "loop0");
        assert_eq!(format!("{:?}", PackageId::new(2)), "pkg2");
    }

    #[test]
    fn ids_order_by_allocation() {
        assert!(DeclId::new(1) < DeclId::new(2));
    }
}
