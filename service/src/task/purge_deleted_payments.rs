//! [`PurgeDeletedPayments`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Delete, Perform, Start};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{payment, Payment},
    infra::{database, Database},
    Service,
};

use super::Task;

/// Configuration for [`PurgeDeletedPayments`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between purge rounds.
    pub interval: time::Duration,

    /// Period a soft-deleted [`Payment`] is retained before its row (and
    /// its [`PaymentSplit`]s) are removed for good.
    ///
    /// [`PaymentSplit`]: crate::domain::PaymentSplit
    pub retention: time::Duration,
}

/// [`Task`] for purging soft-deleted [`Payment`]s past their retention
/// period.
#[derive(Clone, Copy, Debug)]
pub struct PurgeDeletedPayments<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db> Task<Start<By<PurgeDeletedPayments<Self>, Config>>> for Service<Db>
where
    PurgeDeletedPayments<Service<Db>>:
        Task<Perform<()>, Ok = (), Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<PurgeDeletedPayments<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = PurgeDeletedPayments {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::error!("`task::PurgeDeletedPayments` failed: {e}");
            });
        }
    }
}

impl<Db> Task<Perform<()>> for PurgeDeletedPayments<Service<Db>>
where
    Db: Database<
        Delete<By<Payment, payment::DeletionDateTime>>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let deadline =
            payment::DeletionDateTime::now() - self.config.retention;
        self.service
            .database()
            .execute(Delete(By::new(deadline)))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`PurgeDeletedPayments`] execution.
pub type ExecutionError = Traced<database::Error>;
