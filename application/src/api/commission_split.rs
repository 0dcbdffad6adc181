//! [`CommissionSplit`]-related definitions.

use common::{DateTime, Money, Percent};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, Context};

/// Deal-level share of one broker in a `Deal`'s fee.
#[derive(Clone, Debug, From, Into)]
pub struct CommissionSplit(domain::CommissionSplit);

/// Deal-level share of one broker in a `Deal`'s fee.
#[graphql_object(context = Context)]
impl CommissionSplit {
    /// Unique identifier of this `CommissionSplit`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "CommissionSplit.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `Deal` this `CommissionSplit` belongs to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "CommissionSplit.deal",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn deal(&self) -> api::Deal {
        #[expect(
            unsafe_code,
            reason = "`CommissionSplit` loaded from repository guarantees \
                      `Deal` existence"
        )]
        unsafe {
            api::Deal::new_unchecked(self.0.deal_id)
        }
    }

    /// `Broker` this `CommissionSplit` is for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "CommissionSplit.broker",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn broker(&self) -> api::Broker {
        #[expect(
            unsafe_code,
            reason = "`CommissionSplit` loaded from repository guarantees \
                      `Broker` existence"
        )]
        unsafe {
            api::Broker::new_unchecked(self.0.broker_id)
        }
    }

    /// Origination share percent of the `Broker`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "CommissionSplit.splitOriginationPercent",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn split_origination_percent(&self) -> Percent {
        self.0.split_origination_percent
    }

    /// Site share percent of the `Broker`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "CommissionSplit.splitSitePercent",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn split_site_percent(&self) -> Percent {
        self.0.split_site_percent
    }

    /// Deal share percent of the `Broker`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "CommissionSplit.splitDealPercent",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn split_deal_percent(&self) -> Percent {
        self.0.split_deal_percent
    }

    /// Origination share of the `Deal`'s fee, in dollars.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "CommissionSplit.splitOriginationUsd",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn split_origination_usd(&self) -> Money {
        self.0.split_origination_usd
    }

    /// Site share of the `Deal`'s fee, in dollars.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "CommissionSplit.splitSiteUsd",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn split_site_usd(&self) -> Money {
        self.0.split_site_usd
    }

    /// Deal share of the `Deal`'s fee, in dollars.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "CommissionSplit.splitDealUsd",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn split_deal_usd(&self) -> Money {
        self.0.split_deal_usd
    }

    /// Total share of the `Broker` in the `Deal`'s fee, in dollars.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "CommissionSplit.splitBrokerTotal",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn split_broker_total(&self) -> Money {
        self.0.split_broker_total
    }

    /// `DateTime` when this `CommissionSplit` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "CommissionSplit.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `CommissionSplit`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::commission_split::Id)]
#[into(domain::commission_split::Id)]
#[graphql(name = "CommissionSplitId", transparent)]
pub struct Id(Uuid);
