//! [`Command`] for creating a new [`SiteSubmit`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::site_submit::Name;
use crate::{
    domain::{deal, property, site_submit, Deal, Property, SiteSubmit},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`SiteSubmit`], presenting a [`Property`]
/// within a [`Deal`].
#[derive(Clone, Debug)]
pub struct CreateSiteSubmit {
    /// ID of the [`Deal`] a new [`SiteSubmit`] belongs to.
    pub deal_id: deal::Id,

    /// ID of the [`Property`] a new [`SiteSubmit`] presents.
    pub property_id: property::Id,

    /// [`Name`] of a new [`SiteSubmit`].
    pub name: site_submit::Name,
}

impl<Db> Command<CreateSiteSubmit> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Deal>, deal::Id>>,
            Ok = Option<Deal>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Insert<SiteSubmit>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = SiteSubmit;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateSiteSubmit,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateSiteSubmit {
            deal_id,
            property_id,
            name,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        _ = tx
            .execute(Select(By::<Option<Deal>, _>::new(deal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::DealNotExists(deal_id))
            .map_err(tracerr::wrap!())?;
        _ = tx
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;

        let site_submit = SiteSubmit {
            id: site_submit::Id::new(),
            deal_id,
            property_id,
            name,
            verified_latitude: None,
            verified_longitude: None,
            created_at: DateTime::now().coerce(),
        };

        tx.execute(Insert(site_submit.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(site_submit)
    }
}

/// Error of [`CreateSiteSubmit`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Deal`] doesn't exist.
    #[display("`Deal(id: {_0})` does not exist")]
    #[from(ignore)]
    DealNotExists(#[error(not(source))] deal::Id),

    /// [`Property`] doesn't exist.
    #[display("`Property(id: {_0})` does not exist")]
    #[from(ignore)]
    PropertyNotExists(#[error(not(source))] property::Id),
}
