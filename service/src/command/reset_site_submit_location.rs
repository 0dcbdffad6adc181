//! [`Command`] for resetting a [`SiteSubmit`] location.

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{site_submit, SiteSubmit},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for dropping the human-verified location of a
/// [`SiteSubmit`], falling its rendering back to what its [`Property`]
/// knows.
///
/// [`Property`]: crate::domain::Property
#[derive(Clone, Copy, Debug, From)]
pub struct ResetSiteSubmitLocation {
    /// ID of the [`SiteSubmit`] to reset.
    pub site_submit_id: site_submit::Id,
}

impl<Db> Command<ResetSiteSubmitLocation> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<SiteSubmit>, site_submit::Id>>,
            Ok = Option<SiteSubmit>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<SiteSubmit, site_submit::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Update<SiteSubmit>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = SiteSubmit;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ResetSiteSubmitLocation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ResetSiteSubmitLocation { site_submit_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `SiteSubmit`.
        tx.execute(Lock(By::new(site_submit_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut site_submit = tx
            .execute(Select(By::<Option<SiteSubmit>, _>::new(site_submit_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SiteSubmitNotExists(site_submit_id))
            .map_err(tracerr::wrap!())?;
        if site_submit.verified_latitude.is_none()
            && site_submit.verified_longitude.is_none()
        {
            return Ok(site_submit);
        }

        site_submit.reset_location();
        tx.execute(Update(site_submit.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(site_submit)
    }
}

/// Error of [`ResetSiteSubmitLocation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`SiteSubmit`] doesn't exist.
    #[display("`SiteSubmit(id: {_0})` does not exist")]
    #[from(ignore)]
    SiteSubmitNotExists(#[error(not(source))] site_submit::Id),
}
