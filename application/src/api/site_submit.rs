//! [`SiteSubmit`]-related definitions.

use std::future;

use common::{DateTime, Handler as _, Latitude, Longitude};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A site submitted for a `Deal`.
#[derive(Clone, Debug)]
pub struct SiteSubmit {
    /// ID of this [`SiteSubmit`].
    id: Id,

    /// Underlying [`domain::SiteSubmit`].
    site_submit: OnceCell<domain::SiteSubmit>,
}

impl From<domain::SiteSubmit> for SiteSubmit {
    fn from(site_submit: domain::SiteSubmit) -> Self {
        Self {
            id: site_submit.id.into(),
            site_submit: OnceCell::new_with(Some(site_submit)),
        }
    }
}

impl SiteSubmit {
    /// Creates a new [`SiteSubmit`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`SiteSubmit`] with the provided ID exists,
    /// otherwise accessing this [`SiteSubmit`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            site_submit: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::SiteSubmit`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::SiteSubmit`] doesn't exist.
    async fn site_submit(
        &self,
        ctx: &Context,
    ) -> Result<&domain::SiteSubmit, Error> {
        let id = self.id.into();
        self.site_submit
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::site_submit::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|s| {
                        future::ready(s.ok_or_else(|| {
                            api::query::SiteSubmitError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A site submitted for a `Deal`.
#[graphql_object(context = Context)]
impl SiteSubmit {
    /// Unique identifier of this `SiteSubmit`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SiteSubmit.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Deal` this `SiteSubmit` belongs to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SiteSubmit.deal",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn deal(&self, ctx: &Context) -> Result<api::Deal, Error> {
        let deal_id = self.site_submit(ctx).await?.deal_id;
        #[expect(
            unsafe_code,
            reason = "`SiteSubmit` loaded from repository guarantees `Deal` \
                      existence"
        )]
        Ok(unsafe { api::Deal::new_unchecked(deal_id) })
    }

    /// `Property` this `SiteSubmit` points at.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SiteSubmit.property",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn property(
        &self,
        ctx: &Context,
    ) -> Result<api::Property, Error> {
        let property_id = self.site_submit(ctx).await?.property_id;
        #[expect(
            unsafe_code,
            reason = "`SiteSubmit` loaded from repository guarantees \
                      `Property` existence"
        )]
        Ok(unsafe { api::Property::new_unchecked(property_id) })
    }

    /// Name of this `SiteSubmit`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SiteSubmit.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.site_submit(ctx).await?.name.clone().into())
    }

    /// Manually verified latitude of this `SiteSubmit`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SiteSubmit.verifiedLatitude",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn verified_latitude(
        &self,
        ctx: &Context,
    ) -> Result<Option<Latitude>, Error> {
        Ok(self.site_submit(ctx).await?.verified_latitude)
    }

    /// Manually verified longitude of this `SiteSubmit`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SiteSubmit.verifiedLongitude",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn verified_longitude(
        &self,
        ctx: &Context,
    ) -> Result<Option<Longitude>, Error> {
        Ok(self.site_submit(ctx).await?.verified_longitude)
    }

    /// Display coordinate of this `SiteSubmit`, resolved against its
    /// `Property`.
    ///
    /// `null` when neither the `SiteSubmit` nor its `Property` carries a
    /// complete coordinate pair.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SiteSubmit.displayCoordinate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn display_coordinate(
        &self,
        ctx: &Context,
    ) -> Result<Option<DisplayCoordinate>, Error> {
        let site_submit = self.site_submit(ctx).await?;
        let property = ctx
            .service()
            .execute(query::property::ById::by(site_submit.property_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::query::PropertyError::NotExists.into())
            .map_err(ctx.error())?;
        Ok(site_submit.display_coordinate(&property).map(Into::into))
    }

    /// `DateTime` when this `SiteSubmit` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SiteSubmit.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.site_submit(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `SiteSubmit`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::site_submit::Id)]
#[into(domain::site_submit::Id)]
#[graphql(name = "SiteSubmitId", transparent)]
pub struct Id(Uuid);

/// Name of a `SiteSubmit`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "SiteSubmitName",
    with = scalar::Via::<domain::site_submit::Name>,
)]
pub struct Name(domain::site_submit::Name);

/// Resolved display coordinate of a `SiteSubmit`.
#[derive(Clone, Copy, Debug, From, Into)]
pub struct DisplayCoordinate(domain::site_submit::DisplayCoordinate);

/// Resolved display coordinate of a `SiteSubmit`.
#[graphql_object(context = Context)]
impl DisplayCoordinate {
    /// Latitude of the resolved coordinate.
    #[must_use]
    pub fn latitude(&self) -> Latitude {
        self.0.coordinate.latitude
    }

    /// Longitude of the resolved coordinate.
    #[must_use]
    pub fn longitude(&self) -> Longitude {
        self.0.coordinate.longitude
    }

    /// Indicator whether the coordinate came from the `SiteSubmit`'s own
    /// verified pair.
    #[must_use]
    pub fn verified(&self) -> bool {
        self.0.verified
    }
}
