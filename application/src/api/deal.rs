//! [`Deal`]-related definitions.

use std::future;

use common::{DateTime, Handler as _, Money, Percent};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A brokerage deal.
#[derive(Clone, Debug)]
pub struct Deal {
    /// ID of this [`Deal`].
    id: Id,

    /// Underlying [`domain::Deal`].
    deal: OnceCell<domain::Deal>,
}

impl From<domain::Deal> for Deal {
    fn from(deal: domain::Deal) -> Self {
        Self {
            id: deal.id.into(),
            deal: OnceCell::new_with(Some(deal)),
        }
    }
}

impl Deal {
    /// Creates a new [`Deal`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Deal`] with the provided ID exists,
    /// otherwise accessing this [`Deal`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            deal: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Deal`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Deal`] doesn't exist.
    async fn deal(&self, ctx: &Context) -> Result<&domain::Deal, Error> {
        let id = self.id.into();
        self.deal
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::deal::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|d| {
                        future::ready(d.ok_or_else(|| {
                            api::query::DealError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A brokerage deal.
#[graphql_object(context = Context)]
impl Deal {
    /// Unique identifier of this `Deal`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Deal.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Deal`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Deal.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.deal(ctx).await?.name.clone().into())
    }

    /// Kind of this `Deal`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Deal.kind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn kind(&self, ctx: &Context) -> Result<Kind, Error> {
        Ok(self.deal(ctx).await?.kind.into())
    }

    /// Gross fee of this `Deal`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Deal.fee",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn fee(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.deal(ctx).await?.fee)
    }

    /// Commission percent of this `Deal`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Deal.commissionPercent",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn commission_percent(
        &self,
        ctx: &Context,
    ) -> Result<Percent, Error> {
        Ok(self.deal(ctx).await?.commission_percent)
    }

    /// Origination pool percent of this `Deal`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Deal.originationPercent",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn origination_percent(
        &self,
        ctx: &Context,
    ) -> Result<Percent, Error> {
        Ok(self.deal(ctx).await?.origination_percent)
    }

    /// Site pool percent of this `Deal`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Deal.sitePercent",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn site_percent(&self, ctx: &Context) -> Result<Percent, Error> {
        Ok(self.deal(ctx).await?.site_percent)
    }

    /// Deal pool percent of this `Deal`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Deal.dealPercent",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn deal_percent(&self, ctx: &Context) -> Result<Percent, Error> {
        Ok(self.deal(ctx).await?.deal_percent)
    }

    /// House percent of this `Deal`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Deal.housePercent",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn house_percent(&self, ctx: &Context) -> Result<Percent, Error> {
        Ok(self.deal(ctx).await?.house_percent)
    }

    /// Referral fee percent of this `Deal`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Deal.referralFeePercent",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn referral_fee_percent(
        &self,
        ctx: &Context,
    ) -> Result<Percent, Error> {
        Ok(self.deal(ctx).await?.referral_fee_percent)
    }

    /// Number of installment `Payment`s of this `Deal`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Deal.numberOfPayments",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn number_of_payments(
        &self,
        ctx: &Context,
    ) -> Result<i32, Error> {
        Ok(i32::from(self.deal(ctx).await?.number_of_payments))
    }

    /// `CommissionSplit`s of this `Deal`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Deal.commissionSplits",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn commission_splits(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::CommissionSplit>, Error> {
        ctx.service()
            .execute(query::commission_splits::ByDeal::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|splits| splits.into_iter().map(Into::into).collect())
    }

    /// Non-deleted `Payment`s of this `Deal`, ordered by their sequence.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Deal.payments",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn payments(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Payment>, Error> {
        ctx.service()
            .execute(query::payments::ByDeal::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|payments| payments.into_iter().map(Into::into).collect())
    }

    /// `DateTime` when this `Deal` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Deal.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.deal(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Deal`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::deal::Id)]
#[into(domain::deal::Id)]
#[graphql(name = "DealId", transparent)]
pub struct Id(Uuid);

/// Name of a `Deal`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "DealName",
    with = scalar::Via::<domain::deal::Name>,
)]
pub struct Name(domain::deal::Name);

/// Kind of a `Deal`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "DealKind")]
pub enum Kind {
    /// A property sale.
    Sale,

    /// A lease of a property.
    Lease,
}

impl From<domain::deal::Kind> for Kind {
    fn from(kind: domain::deal::Kind) -> Self {
        use domain::deal::Kind as K;
        match kind {
            K::Sale => Self::Sale,
            K::Lease => Self::Lease,
        }
    }
}

impl From<Kind> for domain::deal::Kind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Sale => Self::Sale,
            Kind::Lease => Self::Lease,
        }
    }
}

pub mod list {
    //! Definitions related to the [`Deal`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Deal, Id};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Deal` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::deal::list::Cursor)]
    #[graphql(
        name = "DealListCursor",
        with = scalar::Via::<read::deal::list::Cursor>,
    )]
    pub struct Cursor(pub read::deal::list::Cursor);

    /// Edge in the [`Deal`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::deal::list::Edge);

    /// Edge in the `Deal` list.
    #[graphql_object(name = "DealListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `DealListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `DealListEdge`.
        #[must_use]
        pub fn node(&self) -> Deal {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees `Deal` \
                          existence"
            )]
            unsafe {
                Deal::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Deal`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::deal::list::Connection);

    /// Connection of the `Deal` list.
    #[graphql_object(name = "DealListConnection", context = Context)]
    impl Connection {
        /// Edges of this `DealListConnection`.
        #[must_use]
        pub fn edges(&self) -> Vec<Edge> {
            self.0.edges.iter().copied().map(Into::into).collect()
        }

        /// Information about the page.
        #[must_use]
        pub fn page_info(&self) -> PageInfo {
            PageInfo {
                info: self.0.page_info(),
                start_cursor: self.0.edges.first().map(|e| e.cursor.into()),
                end_cursor: self.0.edges.last().map(|e| e.cursor.into()),
            }
        }
    }

    /// Information about a [`Connection`] page.
    #[derive(Clone, Copy, Debug)]
    pub struct PageInfo {
        /// Underlying [`read::deal::list::PageInfo`].
        info: read::deal::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about a `DealListConnection` page.
    #[graphql_object(name = "DealListPageInfo", context = Context)]
    impl PageInfo {
        /// Indicator whether there is a next page.
        #[must_use]
        pub fn has_next_page(&self) -> bool {
            self.info.has_next_page
        }

        /// Indicator whether there is a previous page.
        #[must_use]
        pub fn has_previous_page(&self) -> bool {
            self.info.has_previous_page
        }

        /// Start cursor of the page.
        #[must_use]
        pub fn start_cursor(&self) -> &Option<Cursor> {
            &self.start_cursor
        }

        /// End cursor of the page.
        #[must_use]
        pub fn end_cursor(&self) -> &Option<Cursor> {
            &self.end_cursor
        }

        /// Total `Deal` count.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::deals::TotalCount::by(()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
