//! [`SiteSubmit`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, Coordinate, DateTimeOf, Latitude, Longitude};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use super::Deal;
use super::{deal, property, Property};

/// Client-facing presentation of a [`Property`] for a [`Deal`].
///
/// References its [`Property`], never vice versa. May carry its own
/// human-verified coordinate pair taking precedence over the
/// [`Property`]'s.
#[derive(Clone, Debug)]
pub struct SiteSubmit {
    /// ID of this [`SiteSubmit`].
    pub id: Id,

    /// ID of the [`Deal`] this [`SiteSubmit`] belongs to.
    pub deal_id: deal::Id,

    /// ID of the [`Property`] this [`SiteSubmit`] presents.
    pub property_id: property::Id,

    /// [`Name`] of this [`SiteSubmit`].
    pub name: Name,

    /// Human-verified [`Latitude`] of this [`SiteSubmit`].
    pub verified_latitude: Option<Latitude>,

    /// Human-verified [`Longitude`] of this [`SiteSubmit`].
    pub verified_longitude: Option<Longitude>,

    /// [`DateTime`] when this [`SiteSubmit`] was created.
    pub created_at: CreationDateTime,
}

impl SiteSubmit {
    /// Resolves the single authoritative [`Coordinate`] to render this
    /// [`SiteSubmit`] with, against its [`Property`].
    ///
    /// The first fully populated pair wins, strictly in this order:
    /// 1. this [`SiteSubmit`]'s verified coordinates;
    /// 2. the [`Property`]'s verified coordinates;
    /// 3. the [`Property`]'s raw coordinates.
    ///
    /// A pair with only one component present is treated as absent. [`None`]
    /// is returned when no tier yields a complete pair: such submits never
    /// reach a rendering or export surface.
    #[must_use]
    pub fn display_coordinate(
        &self,
        property: &Property,
    ) -> Option<DisplayCoordinate> {
        Coordinate::pair(self.verified_latitude, self.verified_longitude)
            .map(|coordinate| DisplayCoordinate {
                coordinate,
                verified: true,
            })
            .or_else(|| {
                Coordinate::pair(
                    property.verified_latitude,
                    property.verified_longitude,
                )
                .or_else(|| {
                    Coordinate::pair(property.latitude, property.longitude)
                })
                .map(|coordinate| DisplayCoordinate {
                    coordinate,
                    verified: false,
                })
            })
    }

    /// Pins the provided verified [`Coordinate`] onto this [`SiteSubmit`].
    ///
    /// The [`Property`] is never written to: a dragged map pin corrects the
    /// [`SiteSubmit`] presentation only.
    pub fn verify_location(&mut self, coordinate: Coordinate) {
        self.verified_latitude = Some(coordinate.latitude);
        self.verified_longitude = Some(coordinate.longitude);
    }

    /// Clears the verified coordinates of this [`SiteSubmit`], so that
    /// [`display_coordinate()`] falls through to the [`Property`] tiers on
    /// the next read.
    ///
    /// [`display_coordinate()`]: SiteSubmit::display_coordinate
    pub fn reset_location(&mut self) {
        self.verified_latitude = None;
        self.verified_longitude = None;
    }
}

/// Authoritative display [`Coordinate`] of a [`SiteSubmit`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayCoordinate {
    /// Resolved [`Coordinate`] pair.
    pub coordinate: Coordinate,

    /// Indicator whether the pair came from the [`SiteSubmit`]'s own
    /// verified coordinates.
    pub verified: bool,
}

/// ID of a [`SiteSubmit`].
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

/// Name of a [`SiteSubmit`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `site_submit::Name`")
    }
}

/// [`DateTime`] when a [`SiteSubmit`] was created.
pub type CreationDateTime = DateTimeOf<(SiteSubmit, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{Coordinate, DateTime, Latitude, Longitude};

    use crate::domain::{deal, property, Property};

    use super::SiteSubmit;

    fn lat(v: f64) -> Option<Latitude> {
        Some(Latitude::new(v).unwrap())
    }

    fn lng(v: f64) -> Option<Longitude> {
        Some(Longitude::new(v).unwrap())
    }

    fn property(
        latitude: Option<Latitude>,
        longitude: Option<Longitude>,
        verified_latitude: Option<Latitude>,
        verified_longitude: Option<Longitude>,
    ) -> Property {
        let address =
            property::Address::new("100 Main St, Birmingham, AL").unwrap();
        Property {
            id: property::Id::new(),
            hash: property::Hash::new(&address),
            address,
            latitude,
            longitude,
            verified_latitude,
            verified_longitude,
            created_at: DateTime::now().coerce(),
        }
    }

    fn site_submit(
        verified_latitude: Option<Latitude>,
        verified_longitude: Option<Longitude>,
    ) -> SiteSubmit {
        SiteSubmit {
            id: super::Id::new(),
            deal_id: deal::Id::new(),
            property_id: property::Id::new(),
            name: super::Name::new("Main St outparcel").unwrap(),
            verified_latitude,
            verified_longitude,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn verified_submit_pair_wins_over_everything() {
        let submit = site_submit(lat(1.0), lng(2.0));
        let prop = property(lat(5.0), lng(6.0), lat(3.0), lng(4.0));

        let resolved = submit.display_coordinate(&prop).unwrap();
        assert_eq!(
            resolved.coordinate,
            Coordinate::pair(lat(1.0), lng(2.0)).unwrap(),
        );
        assert!(resolved.verified);
    }

    #[test]
    fn verified_property_pair_is_second_tier() {
        let submit = site_submit(None, None);
        let prop = property(lat(5.0), lng(6.0), lat(3.0), lng(4.0));

        let resolved = submit.display_coordinate(&prop).unwrap();
        assert_eq!(
            resolved.coordinate,
            Coordinate::pair(lat(3.0), lng(4.0)).unwrap(),
        );
        assert!(!resolved.verified);
    }

    #[test]
    fn raw_property_pair_is_last_tier() {
        let submit = site_submit(None, None);
        let prop = property(lat(5.0), lng(6.0), None, None);

        let resolved = submit.display_coordinate(&prop).unwrap();
        assert_eq!(
            resolved.coordinate,
            Coordinate::pair(lat(5.0), lng(6.0)).unwrap(),
        );
        assert!(!resolved.verified);
    }

    #[test]
    fn partial_pairs_never_resolve() {
        // A lone component at every tier is treated as absent.
        let submit = site_submit(lat(1.0), None);
        let prop = property(lat(5.0), None, None, lng(4.0));

        assert_eq!(submit.display_coordinate(&prop), None);
    }

    #[test]
    fn partial_first_tier_falls_through() {
        let submit = site_submit(None, lng(2.0));
        let prop = property(lat(5.0), lng(6.0), None, None);

        let resolved = submit.display_coordinate(&prop).unwrap();
        assert_eq!(
            resolved.coordinate,
            Coordinate::pair(lat(5.0), lng(6.0)).unwrap(),
        );
        assert!(!resolved.verified);
    }

    #[test]
    fn reset_falls_back_to_property_tiers() {
        let mut submit = site_submit(None, None);
        let prop = property(lat(5.0), lng(6.0), None, None);

        submit
            .verify_location(Coordinate::pair(lat(1.0), lng(2.0)).unwrap());
        assert!(submit.display_coordinate(&prop).unwrap().verified);

        submit.reset_location();
        let resolved = submit.display_coordinate(&prop).unwrap();
        assert_eq!(
            resolved.coordinate,
            Coordinate::pair(lat(5.0), lng(6.0)).unwrap(),
        );
        assert!(!resolved.verified);
    }
}
