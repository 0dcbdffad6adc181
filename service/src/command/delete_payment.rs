//! [`Command`] for soft-deleting a [`Payment`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{payment, Payment},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for soft-deleting a [`Payment`].
///
/// The [`Payment`] only receives a deletion timestamp and disappears from
/// reads and regeneration. Its row is removed for good later by the
/// [`PurgeDeletedPayments`] background [`Task`].
///
/// [`PurgeDeletedPayments`]: crate::task::PurgeDeletedPayments
/// [`Task`]: crate::task::Task
#[derive(Clone, Copy, Debug, From)]
pub struct DeletePayment {
    /// ID of the [`Payment`] to soft-delete.
    pub payment_id: payment::Id,
}

impl<Db> Command<DeletePayment> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Payment>, payment::Id>>,
            Ok = Option<Payment>,
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
        cmd: DeletePayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeletePayment { payment_id } = cmd;

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
            .ok_or(E::PaymentNotExists(payment_id))
            .map_err(tracerr::wrap!())?;
        if payment.deleted_at.is_some() {
            return Ok(payment);
        }

        payment.deleted_at = Some(DateTime::now().coerce());
        tx.execute(Update(payment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(payment)
    }
}

/// Error of [`DeletePayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Payment`] doesn't exist.
    #[display("`Payment(id: {_0})` does not exist")]
    #[from(ignore)]
    PaymentNotExists(#[error(not(source))] payment::Id),
}
