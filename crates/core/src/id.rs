//! Unique identifiers for Cuidar de Mim records.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

macro_rules! ulid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Ulid);

        impl $name {
            /// Generate a new identifier.
            pub fn new() -> Self {
                Self(Ulid::new())
            }

            /// Wrap an existing ULID.
            pub fn from_ulid(ulid: Ulid) -> Self {
                Self(ulid)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ulid::DecodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

ulid_id!(
    /// Identifier of a user (and of the user's profile record).
    UserId
);

ulid_id!(
    /// Identifier of a reference practice.
    PracticeId
);

ulid_id!(
    /// Identifier of a completion record.
    CompletionId
);

ulid_id!(
    /// Identifier of a per-dimension progress snapshot.
    ProgressId
);

ulid_id!(
    /// Identifier of a motivational quote.
    QuoteId
);

ulid_id!(
    /// Identifier of an emotional check-in.
    CheckinId
);

ulid_id!(
    /// Identifier of a daily habit row.
    HabitId
);
