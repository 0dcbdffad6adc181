//! [`Command`] for verifying a [`SiteSubmit`] location.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Coordinate,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{site_submit, SiteSubmit},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for marking a [`SiteSubmit`] location as human-verified at
/// the provided [`Coordinate`].
///
/// A verified [`SiteSubmit`] renders at this exact [`Coordinate`],
/// shadowing anything its [`Property`] knows.
///
/// [`Property`]: crate::domain::Property
#[derive(Clone, Copy, Debug)]
pub struct VerifySiteSubmitLocation {
    /// ID of the [`SiteSubmit`] to verify.
    pub site_submit_id: site_submit::Id,

    /// Human-verified [`Coordinate`] of the [`SiteSubmit`].
    pub coordinate: Coordinate,
}

impl<Db> Command<VerifySiteSubmitLocation> for Service<Db>
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
        cmd: VerifySiteSubmitLocation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let VerifySiteSubmitLocation {
            site_submit_id,
            coordinate,
        } = cmd;

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

        site_submit.verify_location(coordinate);
        tx.execute(Update(site_submit.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(site_submit)
    }
}

/// Error of [`VerifySiteSubmitLocation`] [`Command`] execution.
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
