//! [`Command`] for creating a new [`Broker`].

use common::{
    operations::{Commit, Insert, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::broker::Name;
use crate::{
    domain::{broker, Broker},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Broker`].
#[derive(Clone, Debug, From)]
pub struct CreateBroker {
    /// [`Name`] of a new [`Broker`].
    pub name: broker::Name,
}

impl<Db> Command<CreateBroker> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Broker>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Broker;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateBroker) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateBroker { name } = cmd;

        let broker = Broker {
            id: broker::Id::new(),
            name,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Insert(broker.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(broker)
    }
}

/// Error of [`CreateBroker`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
