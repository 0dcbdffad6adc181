//! [`Command`] for creating a new [`Deal`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Money, Percent,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::deal::{Kind, Name};
use crate::{
    domain::{broker, deal, Broker, CommissionSplit, Deal},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Deal`] along with its
/// [`CommissionSplit`]s.
#[derive(Clone, Debug)]
pub struct CreateDeal {
    /// [`Name`] of a new [`Deal`].
    pub name: deal::Name,

    /// [`Kind`] of a new [`Deal`].
    pub kind: deal::Kind,

    /// Gross commission fee of a new [`Deal`].
    pub fee: Money,

    /// Portion of the transaction value forming the fee.
    pub commission_percent: Percent,

    /// Origination portion of the fee.
    pub origination_percent: Percent,

    /// Site portion of the fee.
    pub site_percent: Percent,

    /// Deal-side portion of the fee.
    pub deal_percent: Percent,

    /// House portion of the fee.
    pub house_percent: Percent,

    /// Referral fee portion of every [`Payment`] of a new [`Deal`].
    ///
    /// [`Payment`]: crate::domain::Payment
    pub referral_fee_percent: Percent,

    /// Number of installments the fee is paid out in.
    pub number_of_payments: deal::NumPayments,

    /// Per-[`Broker`] splits of a new [`Deal`].
    pub splits: Vec<BrokerSplit>,
}

/// Share of a single [`Broker`] in a new [`Deal`].
#[derive(Clone, Copy, Debug)]
pub struct BrokerSplit {
    /// ID of the [`Broker`] receiving this share.
    pub broker_id: broker::Id,

    /// Origination percent of this [`Broker`].
    pub split_origination_percent: Percent,

    /// Site percent of this [`Broker`].
    pub split_site_percent: Percent,

    /// Deal percent of this [`Broker`].
    pub split_deal_percent: Percent,
}

impl<Db> Command<CreateDeal> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Broker>, broker::Id>>,
            Ok = Option<Broker>,
            Err = Traced<database::Error>,
        > + Database<Insert<Deal>, Err = Traced<database::Error>>
        + Database<Insert<CommissionSplit>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Deal;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateDeal) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateDeal {
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
            splits,
        } = cmd;

        let deal = Deal {
            id: deal::Id::new(),
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
            created_at: common::DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        for s in &splits {
            _ = tx
                .execute(Select(By::<Option<Broker>, _>::new(s.broker_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::BrokerNotExists(s.broker_id))
                .map_err(tracerr::wrap!())?;
        }

        tx.execute(Insert(deal.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        for s in splits {
            let split = CommissionSplit::new(
                deal.id,
                s.broker_id,
                fee,
                s.split_origination_percent,
                s.split_site_percent,
                s.split_deal_percent,
            );
            tx.execute(Insert(split))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(deal)
    }
}

/// Error of [`CreateDeal`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Broker`] doesn't exist.
    #[display("`Broker(id: {_0})` does not exist")]
    #[from(ignore)]
    BrokerNotExists(#[error(not(source))] broker::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
