//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `TransactionId` where an `AccountId` is
//! expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user.");
typed_id!(AccountId, "Unique identifier for an account.");
typed_id!(TransactionId, "Unique identifier for a transaction.");
typed_id!(
    TransferDetailsId,
    "Unique identifier for a transfer details row."
);
typed_id!(
    ExchangeDetailsId,
    "Unique identifier for an exchange details row."
);
typed_id!(LedgerRecordId, "Unique identifier for a ledger record.");

/// The reserved user ID owning both cashbook accounts.
#[must_use]
pub fn cashbook_user_id() -> UserId {
    UserId::from_uuid(uuid::uuid!("00000000-0000-0000-0000-000000000001"))
}

/// The reserved USD cashbook account ID.
#[must_use]
pub fn usd_cashbook_account_id() -> AccountId {
    AccountId::from_uuid(uuid::uuid!("00000000-0000-0000-0000-000000000010"))
}

/// The reserved EUR cashbook account ID.
#[must_use]
pub fn eur_cashbook_account_id() -> AccountId {
    AccountId::from_uuid(uuid::uuid!("00000000-0000-0000-0000-000000000011"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_ids_round_trip_through_display_and_from_str() {
        let id = AccountId::new();
        let parsed: AccountId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn typed_ids_are_distinct_types_even_with_identical_uuids() {
        let raw = Uuid::now_v7();
        let account = AccountId::from_uuid(raw);
        let transaction = TransactionId::from_uuid(raw);
        assert_eq!(account.into_inner(), transaction.into_inner());
    }

    #[test]
    fn reserved_ids_are_stable() {
        assert_eq!(
            usd_cashbook_account_id().to_string(),
            "00000000-0000-0000-0000-000000000010"
        );
        assert_eq!(
            eur_cashbook_account_id().to_string(),
            "00000000-0000-0000-0000-000000000011"
        );
        assert_eq!(
            cashbook_user_id().to_string(),
            "00000000-0000-0000-0000-000000000001"
        );
    }
}
