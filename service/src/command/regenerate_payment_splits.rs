//! [`Command`] for regenerating [`PaymentSplit`]s of a [`Deal`].

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        deal, payment, payment_split, CommissionSplit, Deal, Payment,
        PaymentSplit,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for regenerating the [`PaymentSplit`]s of every [`Payment`]
/// of a [`Deal`] from its current [`CommissionSplit`]s.
///
/// Locked and soft-deleted [`Payment`]s are skipped entirely. For the rest,
/// existing rows keep their identity and their pinned percent overrides,
/// rows of removed [`CommissionSplit`]s are dropped, and rows for new ones
/// appear with every percent inherited.
#[derive(Clone, Copy, Debug, From)]
pub struct RegeneratePaymentSplits {
    /// ID of the [`Deal`] to regenerate [`PaymentSplit`]s for.
    pub deal_id: deal::Id,
}

impl<Db> Command<RegeneratePaymentSplits> for Service<Db>
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
        > + Database<
            Delete<By<PaymentSplit, payment::Id>>,
            Err = Traced<database::Error>,
        > + Database<Insert<PaymentSplit>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Vec<payment::Id>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RegeneratePaymentSplits,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegeneratePaymentSplits { deal_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent regeneration of the same `Deal`.
        tx.execute(Lock(By::new(deal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        _ = tx
            .execute(Select(By::<Option<Deal>, _>::new(deal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::DealNotExists(deal_id))
            .map_err(tracerr::wrap!())?;

        let splits = tx
            .execute(Select(By::<Vec<CommissionSplit>, _>::new(deal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let payments = tx
            .execute(Select(By::<Vec<Payment>, _>::new(deal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut regenerated = Vec::with_capacity(payments.len());
        for payment in &payments {
            let existing = tx
                .execute(Select(By::<Vec<PaymentSplit>, _>::new(payment.id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            let Some(rows) =
                payment_split::regenerate(payment, &splits, &existing)
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
            regenerated.push(payment.id);
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(regenerated)
    }
}

/// Error of [`RegeneratePaymentSplits`] [`Command`] execution.
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
