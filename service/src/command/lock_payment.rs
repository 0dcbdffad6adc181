//! [`Command`] for locking a [`Payment`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{payment, Payment},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for locking a [`Payment`], shielding it and its
/// [`PaymentSplit`]s from any regeneration until unlocked.
///
/// [`PaymentSplit`]: crate::domain::PaymentSplit
#[derive(Clone, Copy, Debug, From)]
pub struct LockPayment {
    /// ID of the [`Payment`] to lock.
    pub payment_id: payment::Id,
}

impl<Db> Command<LockPayment> for Service<Db>
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

    async fn execute(&self, cmd: LockPayment) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let LockPayment { payment_id } = cmd;

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
        if payment.locked {
            return Ok(payment);
        }

        payment.locked = true;
        tx.execute(Update(payment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(payment)
    }
}

/// Error of [`LockPayment`] [`Command`] execution.
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
