//! [`Deal`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money, Percent};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use super::{CommissionSplit, Payment};

/// Brokerage transaction.
///
/// A [`Deal`] owns zero or more [`Payment`]s and zero or more
/// [`CommissionSplit`]s (one per participating broker).
#[derive(Clone, Debug)]
pub struct Deal {
    /// ID of this [`Deal`].
    pub id: Id,

    /// [`Name`] of this [`Deal`].
    pub name: Name,

    /// [`Kind`] of this [`Deal`].
    pub kind: Kind,

    /// Gross commission owed on this [`Deal`].
    pub fee: Money,

    /// Commission percentage of the transaction price.
    pub commission_percent: Percent,

    /// Origination share of the commission.
    ///
    /// Together with [`site_percent`], [`deal_percent`] and
    /// [`house_percent`] this is expected to sum up to 100, though never
    /// enforced at write time: percentages are trusted input and may be
    /// partial during data entry.
    ///
    /// [`site_percent`]: Deal::site_percent
    /// [`deal_percent`]: Deal::deal_percent
    /// [`house_percent`]: Deal::house_percent
    pub origination_percent: Percent,

    /// Site share of the commission.
    pub site_percent: Percent,

    /// Deal share of the commission.
    pub deal_percent: Percent,

    /// House share of the commission.
    pub house_percent: Percent,

    /// Referral fee share of every [`Payment`]'s amount.
    pub referral_fee_percent: Percent,

    /// Number of installment [`Payment`]s this [`Deal`] is paid out in.
    pub number_of_payments: NumPayments,

    /// [`DateTime`] when this [`Deal`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Deal`].
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

/// Name of a [`Deal`].
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
        Self::new(s).ok_or("invalid `deal::Name`")
    }
}

define_kind! {
    #[doc = "Kind of a [`Deal`]."]
    enum Kind {
        #[doc = "A property sale."]
        Sale = 1,

        #[doc = "A lease of a property."]
        Lease = 2,
    }
}

/// Number of installment [`Payment`]s of a [`Deal`].
pub type NumPayments = u16;

/// [`DateTime`] when a [`Deal`] was created.
pub type CreationDateTime = DateTimeOf<(Deal, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::Kind;

    #[test]
    fn kind_round_trips_via_screaming_snake_case() {
        assert_eq!(Kind::Sale.to_string(), "SALE");
        assert_eq!("LEASE".parse::<Kind>(), Ok(Kind::Lease));

        assert!("Lease".parse::<Kind>().is_err());
    }

    #[test]
    fn kind_keeps_stable_discriminants() {
        assert_eq!(Kind::Sale.u8(), 1);
        assert_eq!(Kind::Lease.u8(), 2);
    }
}
