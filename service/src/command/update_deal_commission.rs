//! [`Command`] for updating the commission terms of a [`Deal`].

use common::{
    operations::{
        By, Commit, Delete, Insert, Lock, Select, Transact, Transacted,
        Update,
    },
    Money, Percent,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        commission_split, deal, payment, payment_split, CommissionSplit,
        Deal, Payment, PaymentSplit,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating the commission terms of a [`Deal`].
///
/// Every changed [`CommissionSplit`] has its dollar caches re-derived from
/// its percentages and the (possibly new) fee, and the [`PaymentSplit`]s of
/// every non-locked [`Payment`] are regenerated in the same transaction.
/// A changed referral fee percent also re-derives the referral fee and AGCI
/// of those payments, except ones carrying their own pinned percent.
#[derive(Clone, Debug)]
pub struct UpdateDealCommission {
    /// ID of the [`Deal`] to update.
    pub deal_id: deal::Id,

    /// New gross commission fee, if changed.
    pub fee: Option<Money>,

    /// New referral fee percent, if changed.
    pub referral_fee_percent: Option<Percent>,

    /// New house percent, if changed.
    pub house_percent: Option<Percent>,

    /// New origination percent, if changed.
    pub origination_percent: Option<Percent>,

    /// New site percent, if changed.
    pub site_percent: Option<Percent>,

    /// New deal-side percent, if changed.
    pub deal_percent: Option<Percent>,

    /// Changed per-[`Broker`] split percentages.
    ///
    /// [`Broker`]: crate::domain::Broker
    pub splits: Vec<SplitUpdate>,
}

/// New percentages of a single [`CommissionSplit`].
#[derive(Clone, Copy, Debug)]
pub struct SplitUpdate {
    /// ID of the [`CommissionSplit`] to update.
    pub commission_split_id: commission_split::Id,

    /// New origination percent of the [`CommissionSplit`].
    pub split_origination_percent: Percent,

    /// New site percent of the [`CommissionSplit`].
    pub split_site_percent: Percent,

    /// New deal percent of the [`CommissionSplit`].
    pub split_deal_percent: Percent,
}

impl<Db> Command<UpdateDealCommission> for Service<Db>
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
            Select<By<Vec<PaymentSplit>, payment::Id>>,
            Ok = Vec<PaymentSplit>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Deal, deal::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Deal>, Ok = (), Err = Traced<database::Error>>
        + Database<
            Update<CommissionSplit>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Payment>, Ok = (), Err = Traced<database::Error>>
        + Database<
            Delete<By<PaymentSplit, payment::Id>>,
            Err = Traced<database::Error>,
        > + Database<Insert<PaymentSplit>, Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Deal;
    type Err = Traced<ExecutionError>;

    #[expect(clippy::too_many_lines, reason = "single transaction")]
    async fn execute(
        &self,
        cmd: UpdateDealCommission,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateDealCommission {
            deal_id,
            fee,
            referral_fee_percent,
            house_percent,
            origination_percent,
            site_percent,
            deal_percent,
            splits: split_updates,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Deal`.
        tx.execute(Lock(By::new(deal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut deal = tx
            .execute(Select(By::<Option<Deal>, _>::new(deal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::DealNotExists(deal_id))
            .map_err(tracerr::wrap!())?;

        let referral_changed = referral_fee_percent
            .is_some_and(|p| p != deal.referral_fee_percent);
        if let Some(fee) = fee {
            deal.fee = fee;
        }
        if let Some(p) = referral_fee_percent {
            deal.referral_fee_percent = p;
        }
        if let Some(p) = house_percent {
            deal.house_percent = p;
        }
        if let Some(p) = origination_percent {
            deal.origination_percent = p;
        }
        if let Some(p) = site_percent {
            deal.site_percent = p;
        }
        if let Some(p) = deal_percent {
            deal.deal_percent = p;
        }
        tx.execute(Update(deal.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut splits = tx
            .execute(Select(By::<Vec<CommissionSplit>, _>::new(deal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        for upd in split_updates {
            let split = splits
                .iter_mut()
                .find(|s| s.id == upd.commission_split_id)
                .ok_or(E::CommissionSplitNotExists(upd.commission_split_id))
                .map_err(tracerr::wrap!())?;
            split.split_origination_percent = upd.split_origination_percent;
            split.split_site_percent = upd.split_site_percent;
            split.split_deal_percent = upd.split_deal_percent;
        }
        for split in &mut splits {
            split.recalculate(deal.fee);
            tx.execute(Update(split.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        let payments = tx
            .execute(Select(By::<Vec<Payment>, _>::new(deal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        for mut payment in payments {
            if payment.locked || payment.deleted_at.is_some() {
                continue;
            }

            if referral_changed {
                payment
                    .apply_referral_fee_percent(deal.referral_fee_percent);
                tx.execute(Update(payment.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?;
            }

            let existing = tx
                .execute(Select(By::<Vec<PaymentSplit>, _>::new(payment.id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            let Some(rows) =
                payment_split::regenerate(&payment, &splits, &existing)
            else {
                continue;
            };
            tx.execute(Delete(By::<PaymentSplit, _>::new(payment.id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            for row in rows {
                tx.execute(Insert(row))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(deal)
    }
}

/// Error of [`UpdateDealCommission`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`CommissionSplit`] doesn't exist.
    #[display("`CommissionSplit(id: {_0})` does not exist")]
    #[from(ignore)]
    CommissionSplitNotExists(#[error(not(source))] commission_split::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Deal`] doesn't exist.
    #[display("`Deal(id: {_0})` does not exist")]
    #[from(ignore)]
    DealNotExists(#[error(not(source))] deal::Id),
}
