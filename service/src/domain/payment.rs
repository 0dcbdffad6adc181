//! [`Payment`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money, Percent};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use super::{Deal, PaymentSplit};
use super::deal;

/// One installment of a [`Deal`]'s total fee.
///
/// Generated in bulk when a [`Deal`] is booked, individually editable
/// afterwards, and soft-deleted via [`deleted_at`].
///
/// [`deleted_at`]: Payment::deleted_at
#[derive(Clone, Debug, PartialEq)]
pub struct Payment {
    /// ID of this [`Payment`].
    pub id: Id,

    /// ID of the [`Deal`] this [`Payment`] belongs to.
    pub deal_id: deal::Id,

    /// Position of this [`Payment`] in the [`Deal`]'s installment schedule.
    pub payment_sequence: Sequence,

    /// Amount of this installment.
    ///
    /// Non-deleted [`Payment`]s of a [`Deal`] are expected to sum up to the
    /// [`Deal`]'s fee, though this is trusted input and never enforced.
    pub payment_amount: Money,

    /// Derived AGCI (adjusted gross commission income) of this [`Payment`].
    pub agci: Money,

    /// Derived referral fee dollars of this [`Payment`].
    pub referral_fee_usd: Money,

    /// Per-[`Payment`] replacement for the [`Deal`]'s referral fee percent.
    pub referral_fee_percent_override: Option<Percent>,

    /// Veto flag excluding this [`Payment`] from automatic [`PaymentSplit`]
    /// recomputation.
    ///
    /// Not a concurrency primitive: it only tells the regeneration routine
    /// to skip this row.
    pub locked: bool,

    /// Indicator that [`payment_amount`] was manually set rather than
    /// computed from the [`Deal`]'s fee and number of payments.
    ///
    /// [`payment_amount`]: Payment::payment_amount
    pub amount_override: bool,

    /// [`DateTime`] when this [`Payment`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Payment`] was soft-deleted, if it was.
    pub deleted_at: Option<DeletionDateTime>,
}

impl Payment {
    /// Creates a new scheduled [`Payment`] with its referral fee and AGCI
    /// derived from the provided amount and the [`Deal`]'s referral fee
    /// percent.
    #[must_use]
    pub fn new(
        deal_id: deal::Id,
        payment_sequence: Sequence,
        payment_amount: Money,
        referral_fee_percent: Percent,
    ) -> Self {
        let mut this = Self {
            id: Id::new(),
            deal_id,
            payment_sequence,
            payment_amount,
            agci: Money::zero(payment_amount.currency),
            referral_fee_usd: Money::zero(payment_amount.currency),
            referral_fee_percent_override: None,
            locked: false,
            amount_override: false,
            created_at: DateTimeOf::now(),
            deleted_at: None,
        };
        this.rederive_fees(referral_fee_percent);
        this
    }

    /// Returns the referral fee [`Percent`] effective for this [`Payment`]:
    /// its own override when present, the [`Deal`]-level percent otherwise.
    #[must_use]
    pub fn effective_referral_fee_percent(
        &self,
        deal_percent: Percent,
    ) -> Percent {
        self.referral_fee_percent_override.unwrap_or(deal_percent)
    }

    /// Overrides the amount of this [`Payment`] with the provided manual
    /// value, re-deriving its referral fee and AGCI against the new amount.
    ///
    /// [`PaymentSplit`]s of this [`Payment`] are deliberately left alone:
    /// callers regenerate them separately. Changing this asymmetry changes
    /// financial output.
    pub fn override_amount(
        &mut self,
        amount: Money,
        deal_referral_fee_percent: Percent,
    ) {
        self.payment_amount = amount;
        self.amount_override = true;
        self.rederive_fees(deal_referral_fee_percent);
    }

    /// Overrides the referral fee percent of this [`Payment`], re-deriving
    /// its referral fee and AGCI.
    pub fn override_referral_fee(&mut self, percent: Percent) {
        self.referral_fee_percent_override = Some(percent);
        self.rederive_fees(percent);
    }

    /// Re-derives [`referral_fee_usd`] and [`agci`] of this [`Payment`]
    /// against the provided [`Deal`]-level referral fee [`Percent`],
    /// honoring this [`Payment`]'s own override if pinned.
    ///
    /// [`referral_fee_usd`]: Payment::referral_fee_usd
    /// [`agci`]: Payment::agci
    pub fn apply_referral_fee_percent(
        &mut self,
        deal_referral_fee_percent: Percent,
    ) {
        self.rederive_fees(deal_referral_fee_percent);
    }

    /// Re-derives [`referral_fee_usd`] and [`agci`] of this [`Payment`]
    /// from its current amount.
    ///
    /// [`referral_fee_usd`]: Payment::referral_fee_usd
    /// [`agci`]: Payment::agci
    fn rederive_fees(&mut self, deal_referral_fee_percent: Percent) {
        let pct =
            self.effective_referral_fee_percent(deal_referral_fee_percent);
        self.referral_fee_usd = pct.of_money(self.payment_amount);
        self.agci = self.payment_amount.with_amount(
            self.payment_amount.amount - self.referral_fee_usd.amount,
        );
    }
}

/// ID of a [`Payment`].
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

/// Position of a [`Payment`] in a [`Deal`]'s installment schedule,
/// starting from `1`.
pub type Sequence = u16;

/// [`DateTime`] when a [`Payment`] was created.
pub type CreationDateTime = DateTimeOf<(Payment, unit::Creation)>;

/// [`DateTime`] when a [`Payment`] was soft-deleted.
pub type DeletionDateTime = DateTimeOf<(Payment, unit::Deletion)>;

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{
        money::{Currency, Money},
        Percent,
    };
    use rust_decimal::Decimal;

    use crate::domain::deal;

    use super::Payment;

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
    fn new_derives_referral_fee_and_agci() {
        let payment =
            Payment::new(deal::Id::new(), 1, usd("10000"), pct("10"));

        assert_eq!(payment.referral_fee_usd, usd("1000"));
        assert_eq!(payment.agci, usd("9000"));
        assert!(!payment.amount_override);
        assert!(!payment.locked);
    }

    #[test]
    fn override_amount_rederives_fees_against_new_amount() {
        let mut payment =
            Payment::new(deal::Id::new(), 1, usd("10000"), pct("10"));

        payment.override_amount(usd("5000"), pct("10"));

        assert_eq!(payment.payment_amount, usd("5000"));
        assert_eq!(payment.referral_fee_usd, usd("500"));
        assert_eq!(payment.agci, usd("4500"));
        assert!(payment.amount_override);
    }

    #[test]
    fn referral_fee_override_replaces_deal_percent() {
        let mut payment =
            Payment::new(deal::Id::new(), 1, usd("10000"), pct("10"));

        payment.override_referral_fee(pct("20"));
        assert_eq!(payment.referral_fee_usd, usd("2000"));
        assert_eq!(payment.agci, usd("8000"));

        // A later amount override keeps honoring the payment-level percent.
        payment.override_amount(usd("5000"), pct("10"));
        assert_eq!(payment.referral_fee_usd, usd("1000"));
        assert_eq!(payment.agci, usd("4000"));
    }

    #[test]
    fn zero_referral_percent_makes_agci_equal_amount() {
        let payment =
            Payment::new(deal::Id::new(), 3, usd("2500"), Percent::ZERO);

        assert_eq!(payment.referral_fee_usd, usd("0"));
        assert_eq!(payment.agci, usd("2500"));
    }
}
