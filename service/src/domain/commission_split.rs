//! [`CommissionSplit`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money, Percent};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use super::Deal;
use super::{broker, deal};

/// A broker's percentage share of a [`Deal`]'s total commission,
/// independent of the payment schedule.
///
/// The dollar fields are derived caches of `percent × deal.fee`, not
/// independently authoritative: [`recalculate()`] always starts from the
/// percentages and a base amount, never adjusts a stored dollar value
/// incrementally.
///
/// [`recalculate()`]: CommissionSplit::recalculate
#[derive(Clone, Debug, PartialEq)]
pub struct CommissionSplit {
    /// ID of this [`CommissionSplit`].
    pub id: Id,

    /// ID of the [`Deal`] this [`CommissionSplit`] belongs to.
    pub deal_id: deal::Id,

    /// ID of the broker this [`CommissionSplit`] is for.
    pub broker_id: broker::Id,

    /// Origination share of the broker.
    pub split_origination_percent: Percent,

    /// Site share of the broker.
    pub split_site_percent: Percent,

    /// Deal share of the broker.
    pub split_deal_percent: Percent,

    /// Derived origination dollars.
    pub split_origination_usd: Money,

    /// Derived site dollars.
    pub split_site_usd: Money,

    /// Derived deal dollars.
    pub split_deal_usd: Money,

    /// Derived total dollars of the broker.
    pub split_broker_total: Money,

    /// [`DateTime`] when this [`CommissionSplit`] was created.
    pub created_at: CreationDateTime,
}

impl CommissionSplit {
    /// Creates a new [`CommissionSplit`] with its dollar caches derived
    /// from the provided [`Deal`] fee.
    #[must_use]
    pub fn new(
        deal_id: deal::Id,
        broker_id: broker::Id,
        fee: Money,
        split_origination_percent: Percent,
        split_site_percent: Percent,
        split_deal_percent: Percent,
    ) -> Self {
        let mut this = Self {
            id: Id::new(),
            deal_id,
            broker_id,
            split_origination_percent,
            split_site_percent,
            split_deal_percent,
            split_origination_usd: Money::zero(fee.currency),
            split_site_usd: Money::zero(fee.currency),
            split_deal_usd: Money::zero(fee.currency),
            split_broker_total: Money::zero(fee.currency),
            created_at: DateTimeOf::now(),
        };
        this.recalculate(fee);
        this
    }

    /// Re-derives the dollar caches of this [`CommissionSplit`] from its
    /// percentages and the provided [`Deal`] fee.
    pub fn recalculate(&mut self, fee: Money) {
        self.split_origination_usd =
            self.split_origination_percent.of_money(fee);
        self.split_site_usd = self.split_site_percent.of_money(fee);
        self.split_deal_usd = self.split_deal_percent.of_money(fee);
        self.split_broker_total = fee.with_amount(
            self.split_origination_usd.amount
                + self.split_site_usd.amount
                + self.split_deal_usd.amount,
        );
    }
}

/// ID of a [`CommissionSplit`].
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

/// [`DateTime`] when a [`CommissionSplit`] was created.
pub type CreationDateTime = DateTimeOf<(CommissionSplit, unit::Creation)>;

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{
        money::{Currency, Money},
        Percent,
    };
    use rust_decimal::Decimal;

    use crate::domain::{broker, deal};

    use super::CommissionSplit;

    fn usd(s: &str) -> Money {
        Money {
            amount: Decimal::from_str(s).unwrap(),
            currency: Currency::Usd,
        }
    }

    fn pct(s: &str) -> Percent {
        Percent::from_str(s).unwrap()
    }

    #[test]
    fn derives_dollar_caches_from_fee() {
        let split = CommissionSplit::new(
            deal::Id::new(),
            broker::Id::new(),
            usd("100000"),
            pct("50"),
            pct("30"),
            pct("20"),
        );

        assert_eq!(split.split_origination_usd, usd("50000"));
        assert_eq!(split.split_site_usd, usd("30000"));
        assert_eq!(split.split_deal_usd, usd("20000"));
        assert_eq!(split.split_broker_total, usd("100000"));
    }

    #[test]
    fn recalculate_starts_from_percentages() {
        let mut split = CommissionSplit::new(
            deal::Id::new(),
            broker::Id::new(),
            usd("100000"),
            pct("50"),
            pct("30"),
            pct("20"),
        );

        // A changed fee replaces the caches entirely.
        split.recalculate(usd("50000"));
        assert_eq!(split.split_origination_usd, usd("25000"));
        assert_eq!(split.split_site_usd, usd("15000"));
        assert_eq!(split.split_deal_usd, usd("10000"));
        assert_eq!(split.split_broker_total, usd("50000"));

        // Recalculating twice with the same fee is idempotent.
        let before = split.clone();
        split.recalculate(usd("50000"));
        assert_eq!(split, before);
    }

    #[test]
    fn partial_percentages_are_not_rejected() {
        // Splits summing below 100 are trusted input, not an error.
        let split = CommissionSplit::new(
            deal::Id::new(),
            broker::Id::new(),
            usd("10000"),
            pct("25"),
            pct("25"),
            Percent::ZERO,
        );

        assert_eq!(split.split_broker_total, usd("5000"));
    }
}
