//! [`Command`] for generating the [`Payment`] schedule of a [`Deal`].

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{deal, payment, payment_split, CommissionSplit, Deal, Payment},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for generating the [`Payment`] schedule of a [`Deal`] from
/// its fee and number of installments.
///
/// Previously generated payments are replaced, except locked ones and ones
/// with a manually overridden amount, which are kept as they are. Every
/// freshly generated [`Payment`] receives its [`PaymentSplit`]s derived from
/// the [`Deal`]'s [`CommissionSplit`]s.
///
/// The fresh schedule always covers the full [`Deal`]'s fee over all its
/// installments, so kept payments may duplicate a [`Sequence`] number and
/// push the total of the [`Deal`]'s payments above its fee. Neither is
/// validated, and reconciling kept payments is up to the operator.
///
/// [`Sequence`]: payment::Sequence
///
/// [`PaymentSplit`]: crate::domain::PaymentSplit
#[derive(Clone, Copy, Debug, From)]
pub struct GeneratePayments {
    /// ID of the [`Deal`] to generate [`Payment`]s for.
    pub deal_id: deal::Id,
}

impl<Db> Command<GeneratePayments> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Deal>, deal::Id>>,
            Ok = Option<Deal>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Payment>, deal::Id>>,
            Ok = Vec<Payment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<CommissionSplit>, deal::Id>>,
            Ok = Vec<CommissionSplit>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Deal, deal::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Payment, payment::Id>>,
            Err = Traced<database::Error>,
        > + Database<Insert<Payment>, Err = Traced<database::Error>>
        + Database<
            Insert<crate::domain::PaymentSplit>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Vec<Payment>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: GeneratePayments,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let GeneratePayments { deal_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent regeneration of the same schedule.
        tx.execute(Lock(By::new(deal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let deal = tx
            .execute(Select(By::<Option<Deal>, _>::new(deal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::DealNotExists(deal_id))
            .map_err(tracerr::wrap!())?;

        let existing = tx
            .execute(Select(By::<Vec<Payment>, _>::new(deal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        for p in &existing {
            if p.locked || p.amount_override {
                continue;
            }
            tx.execute(Delete(By::<Payment, _>::new(p.id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        let splits = tx
            .execute(Select(By::<Vec<CommissionSplit>, _>::new(deal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let payments = schedule(&deal);
        for payment in &payments {
            tx.execute(Insert(payment.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            let rows = payment_split::regenerate(payment, &splits, &[])
                .unwrap_or_default();
            for row in rows {
                tx.execute(Insert(row))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(payments)
    }
}

/// Builds the installment schedule of the given [`Deal`].
///
/// The fee is divided evenly across the installments, rounded to cents,
/// with the rounding remainder carried by the last installment so the
/// amounts always sum to the fee exactly.
fn schedule(deal: &Deal) -> Vec<Payment> {
    let n = deal.number_of_payments;
    if n == 0 {
        return Vec::new();
    }

    let each = (deal.fee.amount / Decimal::from(n)).round_dp(2);
    let last = deal.fee.amount - each * Decimal::from(n - 1);

    (1..=n)
        .map(|seq| {
            let amount = if seq == n { last } else { each };
            Payment::new(
                deal.id,
                seq,
                deal.fee.with_amount(amount),
                deal.referral_fee_percent,
            )
        })
        .collect()
}

/// Error of [`GeneratePayments`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Deal`] doesn't exist.
    #[display("`Deal(id: {_0})` does not exist")]
    #[from(ignore)]
    DealNotExists(#[error(not(source))] deal::Id),
}

#[cfg(test)]
mod schedule_spec {
    use common::{money, Money};
    use rust_decimal::Decimal;

    use crate::domain::{deal, Deal};

    use super::schedule;

    fn deal(fee: Money, n: deal::NumPayments) -> Deal {
        Deal {
            id: deal::Id::new(),
            name: deal::Name::new("Main St lease").unwrap(),
            kind: deal::Kind::Lease,
            fee,
            commission_percent: "3".parse().unwrap(),
            origination_percent: "50".parse().unwrap(),
            site_percent: "25".parse().unwrap(),
            deal_percent: "25".parse().unwrap(),
            house_percent: "0".parse().unwrap(),
            referral_fee_percent: "10".parse().unwrap(),
            number_of_payments: n,
            created_at: common::DateTime::now().coerce(),
        }
    }

    #[test]
    fn splits_fee_evenly() {
        let payments = schedule(&deal(
            Money {
                amount: Decimal::from(30000),
                currency: money::Currency::Usd,
            },
            3,
        ));

        assert_eq!(payments.len(), 3);
        for p in &payments {
            assert_eq!(p.payment_amount.amount, Decimal::from(10000));
        }
    }

    #[test]
    fn last_installment_carries_remainder() {
        let payments = schedule(&deal(
            Money {
                amount: Decimal::from(100),
                currency: money::Currency::Usd,
            },
            3,
        ));

        let amounts: Vec<_> =
            payments.iter().map(|p| p.payment_amount.amount).collect();
        assert_eq!(amounts[0], "33.33".parse::<Decimal>().unwrap());
        assert_eq!(amounts[1], "33.33".parse::<Decimal>().unwrap());
        assert_eq!(amounts[2], "33.34".parse::<Decimal>().unwrap());
        assert_eq!(
            amounts.iter().sum::<Decimal>(),
            Decimal::from(100),
        );
    }

    #[test]
    fn zero_installments_yield_no_payments() {
        let payments = schedule(&deal(
            Money {
                amount: Decimal::from(100),
                currency: money::Currency::Usd,
            },
            0,
        ));

        assert!(payments.is_empty());
    }
}
