//! [`Property`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Latitude, Longitude};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use xxhash_rust::xxh3;

#[cfg(doc)]
use super::SiteSubmit;

/// Location a [`SiteSubmit`] presents.
///
/// Raw coordinates are the geocoded system of record; the verified pair is
/// a human correction made via map interaction.
#[derive(Clone, Debug)]
pub struct Property {
    /// ID of this [`Property`].
    pub id: Id,

    /// [`Hash`] of this [`Property`] used for deduplication.
    ///
    /// [`Hash`]: struct@Hash
    pub hash: Hash,

    /// [`Address`] of this [`Property`].
    pub address: Address,

    /// Geocoded [`Latitude`] of this [`Property`].
    pub latitude: Option<Latitude>,

    /// Geocoded [`Longitude`] of this [`Property`].
    pub longitude: Option<Longitude>,

    /// Human-verified [`Latitude`] of this [`Property`].
    pub verified_latitude: Option<Latitude>,

    /// Human-verified [`Longitude`] of this [`Property`].
    pub verified_longitude: Option<Longitude>,

    /// [`DateTime`] when this [`Property`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Property`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Hash of a [`Property`] used for deduplication.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Hash(Uuid);

impl Hash {
    /// Calculates a new [`Hash`] for a [`Property`] with the provided
    /// [`Address`].
    ///
    /// [`Hash`]: struct@Hash
    #[must_use]
    pub fn new(address: &Address) -> Self {
        use std::hash::Hash as _;

        // WARNING: Avoid changing the hashed representation, because it
        //          will be a breaking change requiring to migrate all
        //          existing hashes in the database to the new format.
        let mut hasher = xxh3::Xxh3Builder::new().build();
        AsRef::<str>::as_ref(address)
            .to_ascii_lowercase()
            .hash(&mut hasher);

        Self(Uuid::from_u128(hasher.digest128()))
    }
}

/// Full postal address of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Address(String);

impl Address {
    /// Creates a new [`Address`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Address`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Address`].
    fn check(address: impl AsRef<str>) -> bool {
        let address = address.as_ref();
        address.trim() == address && !address.is_empty() && address.len() <= 512
    }
}

impl FromStr for Address {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `property::Address`")
    }
}

/// [`DateTime`] when a [`Property`] was created.
pub type CreationDateTime = DateTimeOf<(Property, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Address, Hash};

    #[test]
    fn hash_ignores_address_case() {
        let a = Address::new("100 Main St, Birmingham, AL").unwrap();
        let b = Address::new("100 MAIN ST, BIRMINGHAM, AL").unwrap();
        let c = Address::new("200 Main St, Birmingham, AL").unwrap();

        assert_eq!(Hash::new(&a), Hash::new(&b));
        assert_ne!(Hash::new(&a), Hash::new(&c));
    }
}
