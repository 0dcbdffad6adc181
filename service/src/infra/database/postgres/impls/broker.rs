//! [`Broker`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{broker, Broker},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Select<By<Option<Broker>, broker::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Broker>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Broker>, broker::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: broker::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, created_at \
            FROM brokers \
            WHERE id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Broker {
                id: row.get("id"),
                name: row.get("name"),
                created_at: row.get("created_at"),
            }))
    }
}

impl<C> Database<Insert<Broker>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Broker>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(broker): Insert<Broker>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(broker)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Broker>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(broker): Update<Broker>,
    ) -> Result<Self::Ok, Self::Err> {
        let Broker {
            id,
            name,
            created_at,
        } = broker;

        const SQL: &str = "\
            INSERT INTO brokers (id, name, created_at) \
            VALUES ($1::UUID, $2::VARCHAR, $3::TIMESTAMPTZ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                created_at = EXCLUDED.created_at";
        self.exec(SQL, &[&id, &name, &created_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
