//! Type-safe integer handle wrappers.
//!
//! Every pooled entity in the world has a strongly-typed handle to prevent
//! accidental mixing of identifiers at compile time. Handles are small
//! integers handed out by their owning pool: stable for the lifetime of the
//! entity and reused only after the entity has been fully torn down.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around an unsigned integer with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident($repr:ty)
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $repr);

        impl $name {
            /// Wrap a raw handle value.
            pub const fn new(raw: $repr) -> Self {
                Self(raw)
            }

            /// Return the inner raw value.
            pub const fn into_inner(self) -> $repr {
                self.0
            }

            /// Return the handle as a slot index into its pool.
            pub fn index(self) -> usize {
                usize::from(self.0)
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$repr> for $name {
            fn from(raw: $repr) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for $repr {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Handle of a station (or waypoint) in the station pool.
    StationId(u16)
}

define_id! {
    /// Handle of a town.
    TownId(u16)
}

define_id! {
    /// Handle of an industry.
    IndustryId(u16)
}

define_id! {
    /// Handle of a vehicle.
    VehicleId(u16)
}

define_id! {
    /// Handle of a company (station owner).
    CompanyId(u8)
}

define_id! {
    /// Handle of a cargo kind.
    CargoId(u8)
}

define_id! {
    /// Handle of a link graph (one connected routing component per cargo).
    LinkGraphId(u16)
}

define_id! {
    /// Handle of a node inside a single link graph.
    NodeId(u16)
}
