//! [`Command`] for creating a new [`Property`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime, Latitude, Longitude,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::property::Address;
use crate::{
    domain::{property, Property},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Property`].
///
/// Properties are deduplicated by their [`Address`]: creating one with an
/// already known address returns the existing [`Property`] instead.
#[derive(Clone, Debug)]
pub struct CreateProperty {
    /// [`Address`] of a new [`Property`].
    pub address: property::Address,

    /// Raw geocoded [`Latitude`] of a new [`Property`].
    pub latitude: Option<Latitude>,

    /// Raw geocoded [`Longitude`] of a new [`Property`].
    pub longitude: Option<Longitude>,
}

impl<Db> Command<CreateProperty> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Property>, property::Hash>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Insert<Property>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
        Lock<By<Property, property::Hash>>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateProperty {
            address,
            latitude,
            longitude,
        } = cmd;

        let hash = property::Hash::new(&address);

        let property = Property {
            id: property::Id::new(),
            hash,
            address,
            latitude,
            longitude,
            verified_latitude: None,
            verified_longitude: None,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent creation of the same `Property`.
        tx.execute(Lock(By::new(hash)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let existing = tx
            .execute(Select(By::new(hash)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(property) = existing {
            // `Property` with the same address already exists.
            return Ok(property);
        }

        tx.execute(Insert(property.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(property)
    }
}

/// Error of [`CreateProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
