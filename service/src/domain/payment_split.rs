//! [`PaymentSplit`] definitions.

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
use super::{broker, commission_split, payment, CommissionSplit, Payment};

/// Per-broker breakdown of a single [`Payment`], derived from the
/// [`Payment`]'s amount and the [`Deal`]'s [`CommissionSplit`] percentages
/// for that broker.
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentSplit {
    /// ID of this [`PaymentSplit`].
    pub id: Id,

    /// ID of the [`Payment`] this [`PaymentSplit`] breaks down.
    pub payment_id: payment::Id,

    /// ID of the [`CommissionSplit`] this [`PaymentSplit`] realizes.
    pub commission_split_id: commission_split::Id,

    /// ID of the broker this [`PaymentSplit`] is for.
    pub broker_id: broker::Id,

    /// Origination percent source of this [`PaymentSplit`].
    pub split_origination_percent: PercentSource,

    /// Site percent source of this [`PaymentSplit`].
    pub split_site_percent: PercentSource,

    /// Deal percent source of this [`PaymentSplit`].
    pub split_deal_percent: PercentSource,

    /// Derived origination dollars.
    pub split_origination_usd: Money,

    /// Derived site dollars.
    pub split_site_usd: Money,

    /// Derived deal dollars.
    pub split_deal_usd: Money,

    /// Derived total dollars of the broker for this [`Payment`].
    pub split_broker_total: Money,

    /// [`DateTime`] when this [`PaymentSplit`] was created.
    pub created_at: CreationDateTime,
}

impl PaymentSplit {
    /// Derives a fresh [`PaymentSplit`] of the provided [`Payment`] for the
    /// provided [`CommissionSplit`], with every percent inherited from the
    /// [`Deal`] level.
    #[must_use]
    pub fn derive(payment: &Payment, split: &CommissionSplit) -> Self {
        let mut this = Self {
            id: Id::new(),
            payment_id: payment.id,
            commission_split_id: split.id,
            broker_id: split.broker_id,
            split_origination_percent: PercentSource::Inherited,
            split_site_percent: PercentSource::Inherited,
            split_deal_percent: PercentSource::Inherited,
            split_origination_usd: Money::zero(payment.payment_amount.currency),
            split_site_usd: Money::zero(payment.payment_amount.currency),
            split_deal_usd: Money::zero(payment.payment_amount.currency),
            split_broker_total: Money::zero(payment.payment_amount.currency),
            created_at: DateTimeOf::now(),
        };
        this.rederive(payment, split);
        this
    }

    /// Re-derives the dollar caches of this [`PaymentSplit`] against the
    /// provided [`Payment`] amount, resolving every percent through its
    /// [`PercentSource`].
    pub fn rederive(&mut self, payment: &Payment, split: &CommissionSplit) {
        let amount = payment.payment_amount;
        self.split_origination_usd = self
            .split_origination_percent
            .resolve(split.split_origination_percent)
            .of_money(amount);
        self.split_site_usd = self
            .split_site_percent
            .resolve(split.split_site_percent)
            .of_money(amount);
        self.split_deal_usd = self
            .split_deal_percent
            .resolve(split.split_deal_percent)
            .of_money(amount);
        self.split_broker_total = amount.with_amount(
            self.split_origination_usd.amount
                + self.split_site_usd.amount
                + self.split_deal_usd.amount,
        );
    }
}

/// Regenerates the [`PaymentSplit`] rows of the provided [`Payment`] from
/// the [`Deal`]'s current [`CommissionSplit`]s.
///
/// Existing rows keep their identity and pinned percent overrides; rows for
/// splits that no longer exist are dropped, rows for new splits appear with
/// every percent inherited. Given unchanged inputs the result is identical
/// to `existing`.
///
/// [`None`] is returned when the [`Payment`] is locked or soft-deleted:
/// such payments are left byte-for-byte untouched.
#[must_use]
pub fn regenerate(
    payment: &Payment,
    splits: &[CommissionSplit],
    existing: &[PaymentSplit],
) -> Option<Vec<PaymentSplit>> {
    if payment.locked || payment.deleted_at.is_some() {
        return None;
    }

    Some(
        splits
            .iter()
            .map(|split| {
                existing
                    .iter()
                    .find(|ps| ps.commission_split_id == split.id)
                    .map_or_else(
                        || PaymentSplit::derive(payment, split),
                        |ps| {
                            let mut ps = ps.clone();
                            ps.rederive(payment, split);
                            ps
                        },
                    )
            })
            .collect(),
    )
}

/// Source of a percentage applied to one [`Payment`]: either the
/// [`Deal`]-level [`CommissionSplit`] percent, or a value pinned for this
/// [`Payment`] only.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PercentSource {
    /// Use the [`Deal`]-level split percent.
    Inherited,

    /// Use the pinned per-[`Payment`] percent.
    Overridden(Percent),
}

impl PercentSource {
    /// Resolves this [`PercentSource`] against the provided inherited
    /// [`Deal`]-level percent.
    #[must_use]
    pub fn resolve(self, inherited: Percent) -> Percent {
        match self {
            Self::Inherited => inherited,
            Self::Overridden(pct) => pct,
        }
    }

    /// Returns the pinned percent, if any.
    #[must_use]
    pub fn overridden(self) -> Option<Percent> {
        match self {
            Self::Inherited => None,
            Self::Overridden(pct) => Some(pct),
        }
    }
}

impl From<Option<Percent>> for PercentSource {
    fn from(pct: Option<Percent>) -> Self {
        pct.map_or(Self::Inherited, Self::Overridden)
    }
}

/// ID of a [`PaymentSplit`].
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

/// [`DateTime`] when a [`PaymentSplit`] was created.
pub type CreationDateTime = DateTimeOf<(PaymentSplit, unit::Creation)>;

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{
        money::{Currency, Money},
        Percent,
    };
    use rust_decimal::Decimal;

    use crate::domain::{broker, deal, CommissionSplit, Payment};

    use super::{regenerate, PaymentSplit, PercentSource};

    fn usd(s: &str) -> Money {
        Money {
            amount: Decimal::from_str(s).unwrap(),
            currency: Currency::Usd,
        }
    }

    fn pct(s: &str) -> Percent {
        Percent::from_str(s).unwrap()
    }

    fn fixture() -> (Payment, CommissionSplit) {
        let deal_id = deal::Id::new();
        let split = CommissionSplit::new(
            deal_id,
            broker::Id::new(),
            usd("100000"),
            pct("50"),
            pct("30"),
            pct("20"),
        );
        let payment = Payment::new(deal_id, 1, usd("10000"), pct("10"));
        (payment, split)
    }

    #[test]
    fn derives_broker_share_of_one_payment() {
        let (payment, split) = fixture();

        let ps = PaymentSplit::derive(&payment, &split);

        assert_eq!(ps.split_origination_usd, usd("5000"));
        assert_eq!(ps.split_site_usd, usd("3000"));
        assert_eq!(ps.split_deal_usd, usd("2000"));
        assert_eq!(ps.split_broker_total, usd("10000"));
    }

    #[test]
    fn pinned_percent_replaces_inherited_one() {
        let (payment, split) = fixture();

        let mut ps = PaymentSplit::derive(&payment, &split);
        ps.split_deal_percent = PercentSource::Overridden(pct("40"));
        ps.rederive(&payment, &split);

        assert_eq!(ps.split_origination_usd, usd("5000"));
        assert_eq!(ps.split_site_usd, usd("3000"));
        assert_eq!(ps.split_deal_usd, usd("4000"));
        assert_eq!(ps.split_broker_total, usd("12000"));
    }

    #[test]
    fn locked_payment_is_left_untouched() {
        let (mut payment, split) = fixture();
        let existing = vec![PaymentSplit::derive(&payment, &split)];

        payment.locked = true;
        assert_eq!(
            regenerate(&payment, &[split.clone()], &existing),
            None,
        );

        payment.locked = false;
        payment.deleted_at = Some(common::DateTime::now().coerce());
        assert_eq!(regenerate(&payment, &[split], &existing), None);
    }

    #[test]
    fn regeneration_is_idempotent() {
        let (payment, split) = fixture();
        let splits = vec![split];

        let first = regenerate(&payment, &splits, &[]).unwrap();
        let second = regenerate(&payment, &splits, &first).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn regeneration_keeps_pinned_overrides() {
        let (mut payment, split) = fixture();
        let splits = vec![split];

        let mut existing = regenerate(&payment, &splits, &[]).unwrap();
        existing[0].split_site_percent = PercentSource::Overridden(pct("10"));

        payment.payment_amount = usd("20000");
        let regenerated = regenerate(&payment, &splits, &existing).unwrap();

        assert_eq!(regenerated[0].id, existing[0].id);
        assert_eq!(regenerated[0].split_origination_usd, usd("10000"));
        assert_eq!(regenerated[0].split_site_usd, usd("2000"));
        assert_eq!(regenerated[0].split_deal_usd, usd("4000"));
        assert_eq!(regenerated[0].split_broker_total, usd("16000"));
    }
}
