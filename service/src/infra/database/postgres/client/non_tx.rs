//! [`NonTx`] client definitions.

use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

/// Non-transactional Postgres database client.
///
/// Every operation checks a fresh [`Connection`] out of the
/// [`connection::Pool`] and returns it once done.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`connection::Pool`] to check [`Connection`]s out of.
    pub(crate) pool: connection::Pool,
}

impl NonTx {
    /// Creates a new [`NonTx`] client from the provided [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self { pool }
    }

    /// Checks a [`Connection`] out of the [`connection::Pool`].
    pub(crate) async fn connection(
        &self,
    ) -> Result<connection::NonTx, Traced<database::Error>> {
        self.pool
            .get()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

impl Connection for NonTx {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        self.connection()
            .await
            .map_err(tracerr::wrap!())?
            .query(stmt, params)
            .await
            .map_err(tracerr::wrap!())
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        self.connection()
            .await
            .map_err(tracerr::wrap!())?
            .query_opt(stmt, params)
            .await
            .map_err(tracerr::wrap!())
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        self.connection()
            .await
            .map_err(tracerr::wrap!())?
            .exec(stmt, params)
            .await
            .map_err(tracerr::wrap!())
    }
}
