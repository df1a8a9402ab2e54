//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` because
//! external trace files carry raw node numbers; callers should still prefer
//! the typed wrapper everywhere past the ingestion boundary.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[derive(serde::Serialize, serde::Deserialize)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — the type's maximum value.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// `true` unless this is the `INVALID` sentinel.
            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Network node number of a connected vehicle, as assigned by the
    /// communication simulator's identity map.
    pub struct VehicleId(u32);
}

typed_id! {
    /// Index of a lane within its edge (0 = rightmost).  The communication
    /// trace encodes "no lane declared" as a negative number; that maps to
    /// `LaneIndex::INVALID` here.
    pub struct LaneIndex(u8);
}

impl LaneIndex {
    /// Convert a raw trace value.  Negative or out-of-range values (the
    /// trace's "none" encoding) become `INVALID`.
    pub fn from_raw(raw: i64) -> Self {
        match u8::try_from(raw) {
            Ok(v) if v != u8::MAX => LaneIndex(v),
            _ => LaneIndex::INVALID,
        }
    }
}
