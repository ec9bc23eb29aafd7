//! Store-assigned record identifiers.
//!
//! Every table uses an autoincrementing integer key. Each record type gets its own
//! newtype so an account id cannot be passed where a product id is expected.

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                $name(id)
            }

            pub fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of an account (a user of the API).
    AccountId
);
record_id!(
    /// Identifier of a customer record.
    CustomerId
);
record_id!(
    /// Identifier of a product record.
    ProductId
);
