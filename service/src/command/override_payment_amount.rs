//! [`Command`] for manually overriding a [`Payment`] amount.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{deal, payment, Deal, Payment},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for manually overriding the amount of a [`Payment`].
///
/// The referral fee and AGCI of the [`Payment`] are re-derived against the
/// new amount. Its [`PaymentSplit`]s are deliberately not regenerated:
/// broker shares keep reflecting the previous amount until
/// [`RegeneratePaymentSplits`] is invoked explicitly.
///
/// [`PaymentSplit`]: crate::domain::PaymentSplit
/// [`RegeneratePaymentSplits`]: super::RegeneratePaymentSplits
#[derive(Clone, Copy, Debug)]
pub struct OverridePaymentAmount {
    /// ID of the [`Payment`] to override the amount of.
    pub payment_id: payment::Id,

    /// New amount of the [`Payment`].
    pub amount: Money,
}

impl<Db> Command<OverridePaymentAmount> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Payment>, payment::Id>>,
            Ok = Option<Payment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Deal>, deal::Id>>,
            Ok = Option<Deal>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Payment, payment::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Payment>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Payment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: OverridePaymentAmount,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let OverridePaymentAmount { payment_id, amount } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Payment`.
        tx.execute(Lock(By::new(payment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut payment = tx
            .execute(Select(By::<Option<Payment>, _>::new(payment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|p| p.deleted_at.is_none())
            .ok_or(E::PaymentNotExists(payment_id))
            .map_err(tracerr::wrap!())?;
        let deal = tx
            .execute(Select(By::<Option<Deal>, _>::new(payment.deal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::DealNotExists(payment.deal_id))
            .map_err(tracerr::wrap!())?;

        payment.override_amount(amount, deal.referral_fee_percent);
        tx.execute(Update(payment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(payment)
    }
}

/// Error of [`OverridePaymentAmount`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Deal`] doesn't exist.
    #[display("`Deal(id: {_0})` does not exist")]
    #[from(ignore)]
    DealNotExists(#[error(not(source))] deal::Id),

    /// [`Payment`] doesn't exist.
    #[display("`Payment(id: {_0})` does not exist")]
    #[from(ignore)]
    PaymentNotExists(#[error(not(source))] payment::Id),
}
