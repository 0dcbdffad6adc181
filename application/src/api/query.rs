//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Broker` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BROKER_NOT_EXISTS` - the `Broker` with the specified ID does not
    ///                         exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "broker",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn broker(
        id: api::broker::Id,
        ctx: &Context,
    ) -> Result<api::Broker, Error> {
        ctx.service()
            .execute(query::broker::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| BrokerError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Deal` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DEAL_NOT_EXISTS` - the `Deal` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "deal",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn deal(
        id: api::deal::Id,
        ctx: &Context,
    ) -> Result<api::Deal, Error> {
        ctx.service()
            .execute(query::deal::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| DealError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Payment` with the specified ID.
    ///
    /// Soft-deleted `Payment`s are returned as well, with their `deletedAt`
    /// field set.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAYMENT_NOT_EXISTS` - the `Payment` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "payment",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn payment(
        id: api::payment::Id,
        ctx: &Context,
    ) -> Result<api::Payment, Error> {
        ctx.service()
            .execute(query::payment::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| PaymentError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Property` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "property",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn property(
        id: api::property::Id,
        ctx: &Context,
    ) -> Result<api::Property, Error> {
        ctx.service()
            .execute(query::property::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| PropertyError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `SiteSubmit` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SITE_SUBMIT_NOT_EXISTS` - the `SiteSubmit` with the specified ID
    ///                              does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "siteSubmit",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn site_submit(
        id: api::site_submit::Id,
        ctx: &Context,
    ) -> Result<api::SiteSubmit, Error> {
        ctx.service()
            .execute(query::site_submit::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| SiteSubmitError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the non-deleted `Payment`s of the specified `Deal`, ordered
    /// by their sequence.
    #[tracing::instrument(
        skip_all,
        fields(
            deal_id = %deal_id,
            gql.name = "payments",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn payments(
        deal_id: api::deal::Id,
        ctx: &Context,
    ) -> Result<Vec<api::Payment>, Error> {
        ctx.service()
            .execute(query::payments::ByDeal::by(deal_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|payments| payments.into_iter().map(Into::into).collect())
    }

    /// Fetches the `CommissionSplit`s of the specified `Deal`.
    #[tracing::instrument(
        skip_all,
        fields(
            deal_id = %deal_id,
            gql.name = "commissionSplits",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn commission_splits(
        deal_id: api::deal::Id,
        ctx: &Context,
    ) -> Result<Vec<api::CommissionSplit>, Error> {
        ctx.service()
            .execute(query::commission_splits::ByDeal::by(deal_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|splits| splits.into_iter().map(Into::into).collect())
    }

    /// Fetches the `PaymentSplit`s of the specified `Payment`.
    #[tracing::instrument(
        skip_all,
        fields(
            payment_id = %payment_id,
            gql.name = "paymentSplits",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn payment_splits(
        payment_id: api::payment::Id,
        ctx: &Context,
    ) -> Result<Vec<api::PaymentSplit>, Error> {
        ctx.service()
            .execute(query::payment_splits::ByPayment::by(payment_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|splits| splits.into_iter().map(Into::into).collect())
    }

    /// Fetches the page of `Deal`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "deals",
            last = ?last,
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn deals(
        first: Option<i32>,
        after: Option<api::deal::list::Cursor>,
        last: Option<i32>,
        before: Option<api::deal::list::Cursor>,
        name: Option<api::deal::Name>,
        ctx: &Context,
    ) -> Result<api::deal::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        ctx.service()
            .execute(query::deals::List::by(read::deal::list::Selector {
                arguments: read::deal::list::Arguments::new(
                    first,
                    after.map(Into::into),
                    last,
                    before.map(Into::into),
                    DEFAULT_PAGE_SIZE,
                )
                .ok_or_else(|| api::PaginationError::Ambiguous.into())
                .map_err(ctx.error())?,
                filter: read::deal::list::Filter {
                    name: name.map(Into::into),
                },
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of map `Pin`s: `SiteSubmit`s resolvable to a
    /// complete display coordinate.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            deal_id = ?deal_id.as_ref().map(ToString::to_string),
            first = ?first,
            gql.name = "pins",
            last = ?last,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn pins(
        first: Option<i32>,
        after: Option<api::pin::list::Cursor>,
        last: Option<i32>,
        before: Option<api::pin::list::Cursor>,
        deal_id: Option<api::deal::Id>,
        ctx: &Context,
    ) -> Result<api::pin::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 100;

        ctx.service()
            .execute(query::pins::List::by(read::pin::list::Selector {
                arguments: read::pin::list::Arguments::new(
                    first,
                    after.map(Into::into),
                    last,
                    before.map(Into::into),
                    DEFAULT_PAGE_SIZE,
                )
                .ok_or_else(|| api::PaginationError::Ambiguous.into())
                .map_err(ctx.error())?,
                filter: read::pin::list::Filter {
                    deal_id: deal_id.map(Into::into),
                },
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum BrokerError {
        #[code = "BROKER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Broker` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum DealError {
        #[code = "DEAL_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Deal` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum PaymentError {
        #[code = "PAYMENT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Payment` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum PropertyError {
        #[code = "PROPERTY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Property` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum SiteSubmitError {
        #[code = "SITE_SUBMIT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`SiteSubmit` with the specified ID does not exist"]
        NotExists,
    }
}
