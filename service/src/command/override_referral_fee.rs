//! [`Command`] for overriding the referral fee percent of a [`Payment`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Percent,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{payment, Payment},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for pinning a referral fee [`Percent`] to a single
/// [`Payment`], replacing the [`Deal`]-level one for it.
///
/// The referral fee and AGCI of the [`Payment`] are re-derived right away.
///
/// [`Deal`]: crate::domain::Deal
#[derive(Clone, Copy, Debug)]
pub struct OverrideReferralFee {
    /// ID of the [`Payment`] to pin the [`Percent`] to.
    pub payment_id: payment::Id,

    /// Referral fee [`Percent`] effective for this [`Payment`] only.
    pub percent: Percent,
}

impl<Db> Command<OverrideReferralFee> for Service<Db>
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
        cmd: OverrideReferralFee,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let OverrideReferralFee { payment_id, percent } = cmd;

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

        payment.override_referral_fee(percent);
        tx.execute(Update(payment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(payment)
    }
}

/// Error of [`OverrideReferralFee`] [`Command`] execution.
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
