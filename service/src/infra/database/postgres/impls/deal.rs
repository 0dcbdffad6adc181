//! [`Deal`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{commission_split, deal, CommissionSplit, Deal},
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

impl<C> Database<Select<By<Option<Deal>, deal::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Deal>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Deal>, deal::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: deal::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, kind, \
                   fee, fee_currency, \
                   commission_percent, \
                   origination_percent, site_percent, deal_percent, \
                   house_percent, referral_fee_percent, \
                   number_of_payments, \
                   created_at \
            FROM deals \
            WHERE id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Deal {
                id: row.get("id"),
                name: row.get("name"),
                kind: row.get("kind"),
                fee: Money {
                    amount: row.get("fee"),
                    currency: row.get("fee_currency"),
                },
                commission_percent: row.get("commission_percent"),
                origination_percent: row.get("origination_percent"),
                site_percent: row.get("site_percent"),
                deal_percent: row.get("deal_percent"),
                house_percent: row.get("house_percent"),
                referral_fee_percent: row.get("referral_fee_percent"),
                number_of_payments: u16::try_from(
                    row.get::<_, i32>("number_of_payments"),
                )
                .expect("`number_of_payments` overflow"),
                created_at: row.get("created_at"),
            }))
    }
}

impl<C> Database<Insert<Deal>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Deal>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(deal): Insert<Deal>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(deal)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Deal>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(deal): Update<Deal>,
    ) -> Result<Self::Ok, Self::Err> {
        let Deal {
            id,
            name,
            kind,
            fee,
            commission_percent,
            origination_percent,
            site_percent,
            deal_percent,
            house_percent,
            referral_fee_percent,
            number_of_payments,
            created_at,
        } = deal;

        let number_of_payments = i32::from(number_of_payments);

        const SQL: &str = "\
            INSERT INTO deals (\
                id, name, kind, \
                fee, fee_currency, \
                commission_percent, \
                origination_percent, site_percent, deal_percent, \
                house_percent, referral_fee_percent, \
                number_of_payments, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::INT2, \
                $4::NUMERIC, $5::INT2, \
                $6::NUMERIC, \
                $7::NUMERIC, $8::NUMERIC, $9::NUMERIC, \
                $10::NUMERIC, $11::NUMERIC, \
                $12::INT4, \
                $13::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                kind = EXCLUDED.kind, \
                fee = EXCLUDED.fee, \
                fee_currency = EXCLUDED.fee_currency, \
                commission_percent = EXCLUDED.commission_percent, \
                origination_percent = EXCLUDED.origination_percent, \
                site_percent = EXCLUDED.site_percent, \
                deal_percent = EXCLUDED.deal_percent, \
                house_percent = EXCLUDED.house_percent, \
                referral_fee_percent = EXCLUDED.referral_fee_percent, \
                number_of_payments = EXCLUDED.number_of_payments, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &kind,
                &fee.amount,
                &fee.currency,
                &commission_percent,
                &origination_percent,
                &site_percent,
                &deal_percent,
                &house_percent,
                &referral_fee_percent,
                &number_of_payments,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Deal, deal::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Deal, deal::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: deal::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO deals_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<CommissionSplit>, deal::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<CommissionSplit>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<CommissionSplit>, deal::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let deal_id: deal::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, deal_id, broker_id, \
                   split_origination_percent, \
                   split_site_percent, \
                   split_deal_percent, \
                   split_origination_usd, split_site_usd, split_deal_usd, \
                   split_broker_total, currency, \
                   created_at \
            FROM commission_splits \
            WHERE deal_id = $1::UUID \
            ORDER BY created_at ASC, id ASC";
        Ok(self
            .query(SQL, &[&deal_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let currency = row.get("currency");
                CommissionSplit {
                    id: row.get("id"),
                    deal_id: row.get("deal_id"),
                    broker_id: row.get("broker_id"),
                    split_origination_percent: row
                        .get("split_origination_percent"),
                    split_site_percent: row.get("split_site_percent"),
                    split_deal_percent: row.get("split_deal_percent"),
                    split_origination_usd: Money {
                        amount: row.get("split_origination_usd"),
                        currency,
                    },
                    split_site_usd: Money {
                        amount: row.get("split_site_usd"),
                        currency,
                    },
                    split_deal_usd: Money {
                        amount: row.get("split_deal_usd"),
                        currency,
                    },
                    split_broker_total: Money {
                        amount: row.get("split_broker_total"),
                        currency,
                    },
                    created_at: row.get("created_at"),
                }
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<CommissionSplit>, commission_split::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<CommissionSplit>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<CommissionSplit>, commission_split::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: commission_split::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, deal_id, broker_id, \
                   split_origination_percent, \
                   split_site_percent, \
                   split_deal_percent, \
                   split_origination_usd, split_site_usd, split_deal_usd, \
                   split_broker_total, currency, \
                   created_at \
            FROM commission_splits \
            WHERE id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| {
                let currency = row.get("currency");
                CommissionSplit {
                    id: row.get("id"),
                    deal_id: row.get("deal_id"),
                    broker_id: row.get("broker_id"),
                    split_origination_percent: row
                        .get("split_origination_percent"),
                    split_site_percent: row.get("split_site_percent"),
                    split_deal_percent: row.get("split_deal_percent"),
                    split_origination_usd: Money {
                        amount: row.get("split_origination_usd"),
                        currency,
                    },
                    split_site_usd: Money {
                        amount: row.get("split_site_usd"),
                        currency,
                    },
                    split_deal_usd: Money {
                        amount: row.get("split_deal_usd"),
                        currency,
                    },
                    split_broker_total: Money {
                        amount: row.get("split_broker_total"),
                        currency,
                    },
                    created_at: row.get("created_at"),
                }
            }))
    }
}

impl<C> Database<Insert<CommissionSplit>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Update<CommissionSplit>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(split): Insert<CommissionSplit>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(split)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<CommissionSplit>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(split): Update<CommissionSplit>,
    ) -> Result<Self::Ok, Self::Err> {
        let CommissionSplit {
            id,
            deal_id,
            broker_id,
            split_origination_percent,
            split_site_percent,
            split_deal_percent,
            split_origination_usd,
            split_site_usd,
            split_deal_usd,
            split_broker_total,
            created_at,
        } = split;

        const SQL: &str = "\
            INSERT INTO commission_splits (\
                id, deal_id, broker_id, \
                split_origination_percent, \
                split_site_percent, \
                split_deal_percent, \
                split_origination_usd, split_site_usd, split_deal_usd, \
                split_broker_total, currency, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::NUMERIC, $5::NUMERIC, $6::NUMERIC, \
                $7::NUMERIC, $8::NUMERIC, $9::NUMERIC, \
                $10::NUMERIC, $11::INT2, \
                $12::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET deal_id = EXCLUDED.deal_id, \
                broker_id = EXCLUDED.broker_id, \
                split_origination_percent = \
                    EXCLUDED.split_origination_percent, \
                split_site_percent = EXCLUDED.split_site_percent, \
                split_deal_percent = EXCLUDED.split_deal_percent, \
                split_origination_usd = EXCLUDED.split_origination_usd, \
                split_site_usd = EXCLUDED.split_site_usd, \
                split_deal_usd = EXCLUDED.split_deal_usd, \
                split_broker_total = EXCLUDED.split_broker_total, \
                currency = EXCLUDED.currency, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &deal_id,
                &broker_id,
                &split_origination_percent,
                &split_site_percent,
                &split_deal_percent,
                &split_origination_usd.amount,
                &split_site_usd.amount,
                &split_deal_usd.amount,
                &split_broker_total.amount,
                &split_broker_total.currency,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C>
    Database<Select<By<read::deal::list::Page, read::deal::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::deal::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::deal::list::Page, read::deal::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::deal::list::Selector {
            arguments,
            filter: read::deal::list::Filter { name },
        } = by.into_inner();

        let limit = i32::try_from(arguments.limit()).unwrap() + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let name_idx = name.as_ref().map(|n| {
            ps.push(n);
            ps.len()
        });

        let name_pattern = name.as_ref().map(|n| FuzzPattern::new(n.as_ref()));
        let name_pattern_idx = name_pattern.as_ref().map(|n| {
            ps.push(n);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM deals \
             WHERE true \
                   {cursor} \
                   {name_filtering} \
             ORDER BY {name_ordering} \
                      id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            name_filtering =
                name_pattern_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND LOWER(name) SIMILAR TO LOWER(${idx}::VARCHAR)"
                    ))
                }),
            name_ordering = name_idx.into_iter().format_with("", |idx, f| {
                let order = arguments.kind().order().sql();
                f(&format_args!(
                    "LEVENSHTEIN(name, ${idx}::VARCHAR, 1, 1, 0) {order},"
                ))
            })
        );
        let rows = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?;

        let has_more = rows.len() > arguments.limit();
        let edges = rows
            .into_iter()
            .take(arguments.limit())
            .map(|row| {
                let id = row.get("id");
                (id, id)
            })
            .collect::<Vec<_>>();

        Ok(read::deal::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C> Database<Select<By<read::deal::list::TotalCount, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::deal::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::deal::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM deals";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
