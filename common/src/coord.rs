//! Geographic [`Coordinate`] definitions.

use std::str::FromStr;

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

/// Geographic coordinate pair.
///
/// Constructed only from a fully populated pair: a latitude without a
/// longitude (or vice versa) never becomes a [`Coordinate`].
#[derive(Clone, Copy, Debug, Display, PartialEq)]
#[display("({latitude}, {longitude})")]
pub struct Coordinate {
    /// [`Latitude`] of this [`Coordinate`].
    pub latitude: Latitude,

    /// [`Longitude`] of this [`Coordinate`].
    pub longitude: Longitude,
}

impl Coordinate {
    /// Pairs the provided optional components into a [`Coordinate`].
    ///
    /// [`None`] is returned unless both components are present.
    #[must_use]
    pub fn pair(
        latitude: Option<Latitude>,
        longitude: Option<Longitude>,
    ) -> Option<Self> {
        Some(Self {
            latitude: latitude?,
            longitude: longitude?,
        })
    }
}

/// Latitude of a geographic [`Coordinate`], in `-90..=90` degrees.
#[derive(Clone, Copy, Debug, Display, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Latitude(f64);

impl Latitude {
    /// Creates a new [`Latitude`] by checking the provided value is within
    /// `-90..=90` degrees.
    #[must_use]
    pub fn new(degrees: f64) -> Option<Self> {
        ((-90.0..=90.0).contains(&degrees)).then_some(Self(degrees))
    }

    /// Returns this [`Latitude`] in degrees.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl FromStr for Latitude {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        f64::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid latitude value")
    }
}

/// Longitude of a geographic [`Coordinate`], in `-180..=180` degrees.
#[derive(Clone, Copy, Debug, Display, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Longitude(f64);

impl Longitude {
    /// Creates a new [`Longitude`] by checking the provided value is within
    /// `-180..=180` degrees.
    #[must_use]
    pub fn new(degrees: f64) -> Option<Self> {
        ((-180.0..=180.0).contains(&degrees)).then_some(Self(degrees))
    }

    /// Returns this [`Longitude`] in degrees.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl FromStr for Longitude {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        f64::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid longitude value")
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Latitude of a geographic coordinate, in `-90..=90` degrees.
    #[graphql_scalar(with = Self, parse_token(f64))]
    type Latitude = super::Latitude;

    impl Latitude {
        fn to_output<S: ScalarValue>(l: &Latitude) -> Value<S> {
            Value::scalar(l.get())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_float_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Latitude` input scalar from \
                         non-float value: {input}",
                    )
                })
                .and_then(|v| {
                    Self::new(v).ok_or_else(|| {
                        format!(
                            "`Latitude` must be within `-90..=90` degrees, \
                             got: {v}",
                        )
                    })
                })
        }
    }

    /// Longitude of a geographic coordinate, in `-180..=180` degrees.
    #[graphql_scalar(with = Self, parse_token(f64))]
    type Longitude = super::Longitude;

    impl Longitude {
        fn to_output<S: ScalarValue>(l: &Longitude) -> Value<S> {
            Value::scalar(l.get())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_float_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Longitude` input scalar from \
                         non-float value: {input}",
                    )
                })
                .and_then(|v| {
                    Self::new(v).ok_or_else(|| {
                        format!(
                            "`Longitude` must be within `-180..=180` degrees, \
                             got: {v}",
                        )
                    })
                })
        }
    }

    #[cfg(test)]
    mod spec {
        use juniper::{DefaultScalarValue, InputValue};

        use super::{Latitude, Longitude};

        #[test]
        fn from_input_accepts_in_range_floats() {
            let lat: InputValue<DefaultScalarValue> =
                InputValue::scalar(33.52);
            let lng: InputValue<DefaultScalarValue> =
                InputValue::scalar(-86.81);

            assert_eq!(
                Latitude::from_input(&lat),
                Ok(Latitude::new(33.52).unwrap()),
            );
            assert_eq!(
                Longitude::from_input(&lng),
                Ok(Longitude::new(-86.81).unwrap()),
            );
        }

        #[test]
        fn from_input_rejects_out_of_range_and_non_floats() {
            let too_far: InputValue<DefaultScalarValue> =
                InputValue::scalar(91.0);
            let not_float: InputValue<DefaultScalarValue> =
                InputValue::scalar("33.52");

            assert!(Latitude::from_input(&too_far).is_err());
            assert!(Latitude::from_input(&not_float).is_err());
            assert!(Longitude::from_input(&not_float).is_err());
        }
    }
}

#[cfg(test)]
mod spec {
    use super::{Coordinate, Latitude, Longitude};

    #[test]
    fn latitude_rejects_out_of_range() {
        assert!(Latitude::new(33.52).is_some());
        assert!(Latitude::new(-90.0).is_some());
        assert!(Latitude::new(90.0).is_some());

        assert!(Latitude::new(90.01).is_none());
        assert!(Latitude::new(-120.0).is_none());
    }

    #[test]
    fn longitude_rejects_out_of_range() {
        assert!(Longitude::new(-86.81).is_some());
        assert!(Longitude::new(180.0).is_some());

        assert!(Longitude::new(180.5).is_none());
        assert!(Longitude::new(-200.0).is_none());
    }

    #[test]
    fn pair_requires_both_components() {
        let lat = Latitude::new(33.52);
        let lng = Longitude::new(-86.81);

        assert!(Coordinate::pair(lat, lng).is_some());
        assert!(Coordinate::pair(lat, None).is_none());
        assert!(Coordinate::pair(None, lng).is_none());
        assert!(Coordinate::pair(None, None).is_none());
    }
}
