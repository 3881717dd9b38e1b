//! Opaque identifier types.
//!
//! Identifiers are issued by the store (or the seed catalog) and carry no
//! internal structure; distinct newtypes keep a `BusId` from ever being
//! passed where a `RouteId` is expected.

use std::fmt;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier string.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_type! {
    /// Identifier of a route in the catalog.
    RouteId
}

id_type! {
    /// Identifier of a bus in the catalog.
    BusId
}

id_type! {
    /// Identifier of a booking, issued by the store at commit time.
    BookingId
}

id_type! {
    /// Opaque user identity supplied by the authentication collaborator.
    /// Trusted as-is; this core never re-validates it.
    UserId
}
