//! Domain types stored through a placeholder type.
//!
//! A domain type is first mapped to a plain storable placeholder (a UUID to
//! its text form, a timestamp to milliseconds since the epoch) and then
//! cast like that placeholder. Parsing the placeholder back can fail, and
//! that failure is reported as [`CastError::Malformed`] instead of being
//! papered over with a default.
//!
//! Enumerations use the same route with an integer placeholder, which gives
//! them the affinity of their underlying integer:
//!
//! ```
//! use unikv::cast::DomainType;
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum Level {
//!     Low = 1,
//!     High = 2,
//! }
//!
//! impl DomainType for Level {
//!     type Placeholder = u8;
//!     const NAME: &'static str = "level";
//!
//!     fn to_placeholder(&self) -> u8 {
//!         *self as u8
//!     }
//!
//!     fn from_placeholder(raw: u8) -> Option<Self> {
//!         match raw {
//!             1 => Some(Level::Low),
//!             2 => Some(Level::High),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! unikv::impl_domain_storage!(Level);
//! ```

use std::path::{Path, PathBuf};

use super::{FromStorage, ToStorage};
use crate::value::Value;

/// A type stored as another, simpler storable type.
pub trait DomainType: Sized {
    /// The storable type this domain type is mapped to.
    type Placeholder: ToStorage + FromStorage;

    /// Name used in [`CastError::Malformed`](super::CastError::Malformed).
    const NAME: &'static str;

    fn to_placeholder(&self) -> Self::Placeholder;

    /// Parse the placeholder back. `None` means the stored data does not
    /// describe a valid value of this type.
    fn from_placeholder(placeholder: Self::Placeholder) -> Option<Self>;
}

/// Implement [`ToStorage`] and [`FromStorage`] for types implementing
/// [`DomainType`].
#[macro_export]
macro_rules! impl_domain_storage {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::cast::ToStorage for $ty {
                fn into_storage(self) -> $crate::Value {
                    $crate::cast::ToStorage::into_storage(
                        <$ty as $crate::cast::DomainType>::to_placeholder(&self),
                    )
                }
            }

            impl $crate::cast::FromStorage for $ty {
                const KIND: $crate::ValueKind = <<$ty as $crate::cast::DomainType>::Placeholder
                    as $crate::cast::FromStorage>::KIND;

                fn from_storage(
                    value: $crate::Value,
                ) -> ::std::result::Result<Self, $crate::cast::CastError> {
                    let placeholder = <<$ty as $crate::cast::DomainType>::Placeholder
                        as $crate::cast::FromStorage>::from_storage(value)?;
                    <$ty as $crate::cast::DomainType>::from_placeholder(placeholder).ok_or(
                        $crate::cast::CastError::Malformed {
                            domain: <$ty as $crate::cast::DomainType>::NAME,
                        },
                    )
                }
            }
        )*
    };
}

impl DomainType for PathBuf {
    type Placeholder = String;
    const NAME: &'static str = "path";

    fn to_placeholder(&self) -> String {
        self.to_string_lossy().into_owned()
    }

    fn from_placeholder(placeholder: String) -> Option<Self> {
        Some(PathBuf::from(placeholder))
    }
}

impl_domain_storage!(PathBuf);

impl ToStorage for &Path {
    fn into_storage(self) -> Value {
        Value::Text(self.to_string_lossy().into_owned())
    }
}

#[cfg(feature = "domain")]
mod types {
    use chrono::{DateTime, Local, Utc};
    use sha2::{Digest, Sha256};
    use uuid::Uuid;

    use super::DomainType;

    impl DomainType for Uuid {
        type Placeholder = String;
        const NAME: &'static str = "uuid";

        fn to_placeholder(&self) -> String {
            self.hyphenated().to_string()
        }

        fn from_placeholder(placeholder: String) -> Option<Self> {
            Uuid::parse_str(&placeholder).ok()
        }
    }

    /// A SHA-256 digest, stored as lowercase hex text.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Sha256Digest([u8; 32]);

    impl Sha256Digest {
        /// Hash `data`.
        pub fn digest(data: impl AsRef<[u8]>) -> Self {
            Self(Sha256::digest(data.as_ref()).into())
        }

        pub const fn from_bytes(bytes: [u8; 32]) -> Self {
            Self(bytes)
        }

        pub const fn as_bytes(&self) -> &[u8; 32] {
            &self.0
        }

        pub fn to_hex(&self) -> String {
            hex::encode(self.0)
        }
    }

    impl std::fmt::Display for Sha256Digest {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.to_hex())
        }
    }

    impl DomainType for Sha256Digest {
        type Placeholder = String;
        const NAME: &'static str = "sha256 digest";

        fn to_placeholder(&self) -> String {
            self.to_hex()
        }

        fn from_placeholder(placeholder: String) -> Option<Self> {
            let bytes: [u8; 32] = hex::decode(placeholder).ok()?.try_into().ok()?;
            Some(Self(bytes))
        }
    }

    impl DomainType for DateTime<Utc> {
        type Placeholder = i64;
        const NAME: &'static str = "utc timestamp";

        fn to_placeholder(&self) -> i64 {
            self.timestamp_millis()
        }

        fn from_placeholder(millis: i64) -> Option<Self> {
            DateTime::from_timestamp_millis(millis)
        }
    }

    impl DomainType for DateTime<Local> {
        type Placeholder = i64;
        const NAME: &'static str = "local timestamp";

        fn to_placeholder(&self) -> i64 {
            self.timestamp_millis()
        }

        fn from_placeholder(millis: i64) -> Option<Self> {
            DateTime::from_timestamp_millis(millis).map(|utc| utc.with_timezone(&Local))
        }
    }

    impl_domain_storage!(Uuid, Sha256Digest, DateTime<Utc>, DateTime<Local>);
}

#[cfg(feature = "domain")]
pub use types::Sha256Digest;
