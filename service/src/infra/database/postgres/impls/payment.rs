//! [`Payment`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Lock, Select, Update},
    Money, Percent,
};
use tracerr::Traced;

use crate::{
    domain::{
        deal, payment, payment_split::PercentSource, Payment, PaymentSplit,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of a `payments` table row.
const PAYMENT_COLUMNS: &str = "\
    id, deal_id, payment_sequence, \
    payment_amount, agci, referral_fee_usd, currency, \
    referral_fee_percent_override, \
    locked, amount_override, \
    created_at, deleted_at";

/// Maps a `payments` table row into a [`Payment`].
fn payment_from_row(row: &tokio_postgres::Row) -> Payment {
    let currency = row.get("currency");
    Payment {
        id: row.get("id"),
        deal_id: row.get("deal_id"),
        payment_sequence: u16::try_from(
            row.get::<_, i32>("payment_sequence"),
        )
        .expect("`payment_sequence` overflow"),
        payment_amount: Money {
            amount: row.get("payment_amount"),
            currency,
        },
        agci: Money {
            amount: row.get("agci"),
            currency,
        },
        referral_fee_usd: Money {
            amount: row.get("referral_fee_usd"),
            currency,
        },
        referral_fee_percent_override: row
            .get("referral_fee_percent_override"),
        locked: row.get("locked"),
        amount_override: row.get("amount_override"),
        created_at: row.get("created_at"),
        deleted_at: row.get("deleted_at"),
    }
}

impl<C> Database<Select<By<Option<Payment>, payment::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Payment>, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: payment::Id = by.into_inner();

        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} \
             FROM payments \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| payment_from_row(&row)))
    }
}

impl<C> Database<Select<By<Vec<Payment>, deal::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Payment>, deal::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let deal_id: deal::Id = by.into_inner();

        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} \
             FROM payments \
             WHERE deal_id = $1::UUID \
               AND deleted_at IS NULL \
             ORDER BY payment_sequence ASC, created_at ASC",
        );
        Ok(self
            .query(&sql, &[&deal_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(payment_from_row)
            .collect())
    }
}

impl<C> Database<Insert<Payment>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Payment>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(payment): Insert<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(payment))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Payment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(payment): Update<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        let Payment {
            id,
            deal_id,
            payment_sequence,
            payment_amount,
            agci,
            referral_fee_usd,
            referral_fee_percent_override,
            locked,
            amount_override,
            created_at,
            deleted_at,
        } = payment;

        let payment_sequence = i32::from(payment_sequence);

        const SQL: &str = "\
            INSERT INTO payments (\
                id, deal_id, payment_sequence, \
                payment_amount, agci, referral_fee_usd, currency, \
                referral_fee_percent_override, \
                locked, amount_override, \
                created_at, deleted_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::INT4, \
                $4::NUMERIC, $5::NUMERIC, $6::NUMERIC, $7::INT2, \
                $8::NUMERIC, \
                $9::BOOLEAN, $10::BOOLEAN, \
                $11::TIMESTAMPTZ, $12::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET deal_id = EXCLUDED.deal_id, \
                payment_sequence = EXCLUDED.payment_sequence, \
                payment_amount = EXCLUDED.payment_amount, \
                agci = EXCLUDED.agci, \
                referral_fee_usd = EXCLUDED.referral_fee_usd, \
                currency = EXCLUDED.currency, \
                referral_fee_percent_override = \
                    EXCLUDED.referral_fee_percent_override, \
                locked = EXCLUDED.locked, \
                amount_override = EXCLUDED.amount_override, \
                created_at = EXCLUDED.created_at, \
                deleted_at = EXCLUDED.deleted_at";
        self.exec(
            SQL,
            &[
                &id,
                &deal_id,
                &payment_sequence,
                &payment_amount.amount,
                &agci.amount,
                &referral_fee_usd.amount,
                &payment_amount.currency,
                &referral_fee_percent_override,
                &locked,
                &amount_override,
                &created_at,
                &deleted_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Payment, payment::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Payment, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: payment::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO payments_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Payment, payment::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Payment, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: payment::Id = by.into_inner();

        // `payment_splits` rows follow via `ON DELETE CASCADE`.
        const SQL: &str = "\
            DELETE FROM payments \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Payment, payment::DeletionDateTime>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Payment, payment::DeletionDateTime>>,
    ) -> Result<Self::Ok, Self::Err> {
        let deadline: payment::DeletionDateTime = by.into_inner();

        const SQL: &str = "\
            DELETE FROM payments \
            WHERE deleted_at IS NOT NULL \
              AND deleted_at < $1";
        self.exec(SQL, &[&deadline])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<PaymentSplit>, payment::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<PaymentSplit>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<PaymentSplit>, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let payment_id: payment::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, payment_id, commission_split_id, broker_id, \
                   split_origination_percent_override, \
                   split_site_percent_override, \
                   split_deal_percent_override, \
                   split_origination_usd, split_site_usd, split_deal_usd, \
                   split_broker_total, currency, \
                   created_at \
            FROM payment_splits \
            WHERE payment_id = $1::UUID \
            ORDER BY created_at ASC, id ASC";
        Ok(self
            .query(SQL, &[&payment_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let currency = row.get("currency");
                PaymentSplit {
                    id: row.get("id"),
                    payment_id: row.get("payment_id"),
                    commission_split_id: row.get("commission_split_id"),
                    broker_id: row.get("broker_id"),
                    split_origination_percent: row
                        .get::<_, Option<Percent>>(
                            "split_origination_percent_override",
                        )
                        .into(),
                    split_site_percent: row
                        .get::<_, Option<Percent>>(
                            "split_site_percent_override",
                        )
                        .into(),
                    split_deal_percent: row
                        .get::<_, Option<Percent>>(
                            "split_deal_percent_override",
                        )
                        .into(),
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

impl<C> Database<Insert<PaymentSplit>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(split): Insert<PaymentSplit>,
    ) -> Result<Self::Ok, Self::Err> {
        let PaymentSplit {
            id,
            payment_id,
            commission_split_id,
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

        let origination_override = split_origination_percent.overridden();
        let site_override = split_site_percent.overridden();
        let deal_override = split_deal_percent.overridden();

        const SQL: &str = "\
            INSERT INTO payment_splits (\
                id, payment_id, commission_split_id, broker_id, \
                split_origination_percent_override, \
                split_site_percent_override, \
                split_deal_percent_override, \
                split_origination_usd, split_site_usd, split_deal_usd, \
                split_broker_total, currency, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, \
                $5::NUMERIC, $6::NUMERIC, $7::NUMERIC, \
                $8::NUMERIC, $9::NUMERIC, $10::NUMERIC, \
                $11::NUMERIC, $12::INT2, \
                $13::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET payment_id = EXCLUDED.payment_id, \
                commission_split_id = EXCLUDED.commission_split_id, \
                broker_id = EXCLUDED.broker_id, \
                split_origination_percent_override = \
                    EXCLUDED.split_origination_percent_override, \
                split_site_percent_override = \
                    EXCLUDED.split_site_percent_override, \
                split_deal_percent_override = \
                    EXCLUDED.split_deal_percent_override, \
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
                &payment_id,
                &commission_split_id,
                &broker_id,
                &origination_override,
                &site_override,
                &deal_override,
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

impl<C> Database<Delete<By<PaymentSplit, payment::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<PaymentSplit, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let payment_id: payment::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM payment_splits \
            WHERE payment_id = $1::UUID";
        self.exec(SQL, &[&payment_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
