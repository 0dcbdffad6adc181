//! [`Property`]-related definitions.

use std::future;

use common::{DateTime, Handler as _, Latitude, Longitude};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A real-estate property.
#[derive(Clone, Debug)]
pub struct Property {
    /// ID of this [`Property`].
    id: Id,

    /// Underlying [`domain::Property`].
    property: OnceCell<domain::Property>,
}

impl From<domain::Property> for Property {
    fn from(property: domain::Property) -> Self {
        Self {
            id: property.id.into(),
            property: OnceCell::new_with(Some(property)),
        }
    }
}

impl Property {
    /// Creates a new [`Property`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Property`] with the provided ID exists,
    /// otherwise accessing this [`Property`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            property: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Property`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Property`] doesn't exist.
    async fn property(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Property, Error> {
        let id = self.id.into();
        self.property
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::property::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|p| {
                        future::ready(p.ok_or_else(|| {
                            api::query::PropertyError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A real-estate property.
#[graphql_object(context = Context)]
impl Property {
    /// Unique identifier of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Full postal address of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.address",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn address(&self, ctx: &Context) -> Result<Address, Error> {
        Ok(self.property(ctx).await?.address.clone().into())
    }

    /// Raw geocoded latitude of this `Property`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.latitude",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn latitude(
        &self,
        ctx: &Context,
    ) -> Result<Option<Latitude>, Error> {
        Ok(self.property(ctx).await?.latitude)
    }

    /// Raw geocoded longitude of this `Property`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.longitude",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn longitude(
        &self,
        ctx: &Context,
    ) -> Result<Option<Longitude>, Error> {
        Ok(self.property(ctx).await?.longitude)
    }

    /// Manually verified latitude of this `Property`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.verifiedLatitude",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn verified_latitude(
        &self,
        ctx: &Context,
    ) -> Result<Option<Latitude>, Error> {
        Ok(self.property(ctx).await?.verified_latitude)
    }

    /// Manually verified longitude of this `Property`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.verifiedLongitude",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn verified_longitude(
        &self,
        ctx: &Context,
    ) -> Result<Option<Longitude>, Error> {
        Ok(self.property(ctx).await?.verified_longitude)
    }

    /// `DateTime` when this `Property` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.property(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Property`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::property::Id)]
#[into(domain::property::Id)]
#[graphql(name = "PropertyId", transparent)]
pub struct Id(Uuid);

/// Full postal address of a `Property`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PropertyAddress",
    with = scalar::Via::<domain::property::Address>,
)]
pub struct Address(domain::property::Address);
