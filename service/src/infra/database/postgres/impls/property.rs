//! [`Property`]- and [`SiteSubmit`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{property, site_submit, Property, SiteSubmit},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Maps a `properties` table row into a [`Property`].
fn property_from_row(row: &tokio_postgres::Row) -> Property {
    Property {
        id: row.get("id"),
        hash: row.get("hash"),
        address: row.get("address"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        verified_latitude: row.get("verified_latitude"),
        verified_longitude: row.get("verified_longitude"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Property>, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: property::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, hash, address, \
                   latitude, longitude, \
                   verified_latitude, verified_longitude, \
                   created_at \
            FROM properties \
            WHERE id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| property_from_row(&row)))
    }
}

impl<C> Database<Select<By<Option<Property>, property::Hash>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Property>, property::Id>>,
        Ok = Option<Property>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Hash>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let hash: property::Hash = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM properties \
            WHERE hash = $1::UUID \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&hash])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        self.execute(Select(By::new(row.get("id"))))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Property>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Property>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(property): Insert<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(property))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Property>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(property): Update<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        let Property {
            id,
            hash,
            address,
            latitude,
            longitude,
            verified_latitude,
            verified_longitude,
            created_at,
        } = property;

        const SQL: &str = "\
            INSERT INTO properties (\
                id, hash, address, \
                latitude, longitude, \
                verified_latitude, verified_longitude, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, \
                $4::FLOAT8, $5::FLOAT8, \
                $6::FLOAT8, $7::FLOAT8, \
                $8::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET hash = EXCLUDED.hash, \
                address = EXCLUDED.address, \
                latitude = EXCLUDED.latitude, \
                longitude = EXCLUDED.longitude, \
                verified_latitude = EXCLUDED.verified_latitude, \
                verified_longitude = EXCLUDED.verified_longitude, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &hash,
                &address,
                &latitude,
                &longitude,
                &verified_latitude,
                &verified_longitude,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Property, property::Hash>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Property, property::Hash>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let hash: property::Hash = by.into_inner();

        const SQL: &str = "\
            INSERT INTO properties_creation_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (hash) DO NOTHING";
        self.query(SQL, &[&hash])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

/// Columns of a `site_submits` table row.
const SITE_SUBMIT_COLUMNS: &str = "\
    id, deal_id, property_id, name, \
    verified_latitude, verified_longitude, \
    created_at";

/// Maps a `site_submits` table row into a [`SiteSubmit`].
fn site_submit_from_row(row: &tokio_postgres::Row) -> SiteSubmit {
    SiteSubmit {
        id: row.get("id"),
        deal_id: row.get("deal_id"),
        property_id: row.get("property_id"),
        name: row.get("name"),
        verified_latitude: row.get("verified_latitude"),
        verified_longitude: row.get("verified_longitude"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<SiteSubmit>, site_submit::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<SiteSubmit>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<SiteSubmit>, site_submit::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: site_submit::Id = by.into_inner();

        let sql = format!(
            "SELECT {SITE_SUBMIT_COLUMNS} \
             FROM site_submits \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| site_submit_from_row(&row)))
    }
}

impl<C> Database<Insert<SiteSubmit>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<SiteSubmit>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(site_submit): Insert<SiteSubmit>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(site_submit))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<SiteSubmit>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(site_submit): Update<SiteSubmit>,
    ) -> Result<Self::Ok, Self::Err> {
        let SiteSubmit {
            id,
            deal_id,
            property_id,
            name,
            verified_latitude,
            verified_longitude,
            created_at,
        } = site_submit;

        const SQL: &str = "\
            INSERT INTO site_submits (\
                id, deal_id, property_id, name, \
                verified_latitude, verified_longitude, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::VARCHAR, \
                $5::FLOAT8, $6::FLOAT8, \
                $7::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET deal_id = EXCLUDED.deal_id, \
                property_id = EXCLUDED.property_id, \
                name = EXCLUDED.name, \
                verified_latitude = EXCLUDED.verified_latitude, \
                verified_longitude = EXCLUDED.verified_longitude, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &deal_id,
                &property_id,
                &name,
                &verified_latitude,
                &verified_longitude,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<SiteSubmit, site_submit::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<SiteSubmit, site_submit::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: site_submit::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO site_submits_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<Select<By<read::pin::list::Page, read::pin::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::pin::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::pin::list::Page, read::pin::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::pin::list::Selector {
            arguments,
            filter: read::pin::list::Filter { deal_id },
        } = by.into_inner();

        let limit = i32::try_from(arguments.limit()).unwrap() + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let deal_idx = deal_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });

        // Only submits resolvable to a complete coordinate pair become
        // pins, so the tier presence check happens right in SQL.
        let sql = format!(
            "SELECT s.id, s.deal_id, s.property_id, s.name, \
                    s.verified_latitude, s.verified_longitude, \
                    s.created_at, \
                    p.id AS p_id, p.hash, p.address, \
                    p.latitude, p.longitude, \
                    p.verified_latitude AS p_verified_latitude, \
                    p.verified_longitude AS p_verified_longitude, \
                    p.created_at AS p_created_at \
             FROM site_submits AS s \
             JOIN properties AS p ON p.id = s.property_id \
             WHERE ((s.verified_latitude IS NOT NULL \
                     AND s.verified_longitude IS NOT NULL) \
                    OR (p.verified_latitude IS NOT NULL \
                        AND p.verified_longitude IS NOT NULL) \
                    OR (p.latitude IS NOT NULL \
                        AND p.longitude IS NOT NULL)) \
                   {cursor} \
                   {deal_filtering} \
             ORDER BY s.id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND s.id {op} ${idx}::UUID"))
            }),
            deal_filtering =
                deal_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND s.deal_id = ${idx}::UUID"))
                }),
            order = arguments.kind().order().sql(),
        );
        let rows = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?;

        let has_more = rows.len() > arguments.limit();
        let edges = rows
            .into_iter()
            .take(arguments.limit())
            .filter_map(|row| {
                let site_submit = site_submit_from_row(&row);
                let property = Property {
                    id: row.get("p_id"),
                    hash: row.get("hash"),
                    address: row.get("address"),
                    latitude: row.get("latitude"),
                    longitude: row.get("longitude"),
                    verified_latitude: row.get("p_verified_latitude"),
                    verified_longitude: row.get("p_verified_longitude"),
                    created_at: row.get("p_created_at"),
                };
                let coordinate =
                    site_submit.display_coordinate(&property)?;
                Some((
                    site_submit.id,
                    read::Pin {
                        site_submit_id: site_submit.id,
                        coordinate,
                    },
                ))
            })
            .collect::<Vec<_>>();

        Ok(read::pin::list::Page::new(&arguments, edges, has_more))
    }
}
