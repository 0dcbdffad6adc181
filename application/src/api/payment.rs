//! [`Payment`]-related definitions.

use common::{DateTime, Money, Percent};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, Query as _};
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// An installment payment of a `Deal`'s fee.
#[derive(Clone, Debug, From, Into)]
pub struct Payment(domain::Payment);

/// An installment payment of a `Deal`'s fee.
#[graphql_object(context = Context)]
impl Payment {
    /// Unique identifier of this `Payment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `Deal` this `Payment` belongs to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.deal",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn deal(&self) -> api::Deal {
        #[expect(
            unsafe_code,
            reason = "`Payment` loaded from repository guarantees `Deal` \
                      existence"
        )]
        unsafe {
            api::Deal::new_unchecked(self.0.deal_id)
        }
    }

    /// 1-based position of this `Payment` in its `Deal`'s schedule.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.paymentSequence",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn payment_sequence(&self) -> i32 {
        i32::from(self.0.payment_sequence)
    }

    /// Amount of this `Payment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.paymentAmount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn payment_amount(&self) -> Money {
        self.0.payment_amount
    }

    /// Adjusted gross commission income of this `Payment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.agci",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn agci(&self) -> Money {
        self.0.agci
    }

    /// Referral fee of this `Payment`, in dollars.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.referralFeeUsd",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn referral_fee_usd(&self) -> Money {
        self.0.referral_fee_usd
    }

    /// Per-`Payment` referral fee percent, when pinned.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.referralFeePercentOverride",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn referral_fee_percent_override(&self) -> Option<Percent> {
        self.0.referral_fee_percent_override
    }

    /// Indicator whether this `Payment` is locked against regeneration.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.locked",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn locked(&self) -> bool {
        self.0.locked
    }

    /// Indicator whether this `Payment`'s amount was overridden manually.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.amountOverride",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn amount_override(&self) -> bool {
        self.0.amount_override
    }

    /// `PaymentSplit`s of this `Payment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.paymentSplits",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn payment_splits(
        &self,
        ctx: &Context,
    ) -> Result<Vec<PaymentSplit>, Error> {
        ctx.service()
            .execute(query::payment_splits::ByPayment::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|splits| splits.into_iter().map(Into::into).collect())
    }

    /// `DateTime` when this `Payment` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Payment` was soft-deleted, if it was.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.deletedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn deleted_at(&self) -> Option<DateTime> {
        self.0.deleted_at.map(|at| at.coerce())
    }
}

/// Unique identifier of a `Payment`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::payment::Id)]
#[into(domain::payment::Id)]
#[graphql(name = "PaymentId", transparent)]
pub struct Id(Uuid);

/// Per-broker share of one `Payment`.
#[derive(Clone, Debug, From, Into)]
pub struct PaymentSplit(domain::PaymentSplit);

/// Per-broker share of one `Payment`.
#[graphql_object(context = Context)]
impl PaymentSplit {
    /// Unique identifier of this `PaymentSplit`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PaymentSplit.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> SplitId {
        self.0.id.into()
    }

    /// `CommissionSplit` this `PaymentSplit` was derived from.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PaymentSplit.commissionSplitId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn commission_split_id(&self) -> api::commission_split::Id {
        self.0.commission_split_id.into()
    }

    /// `Broker` this `PaymentSplit` is for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PaymentSplit.broker",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn broker(&self) -> api::Broker {
        #[expect(
            unsafe_code,
            reason = "`PaymentSplit` loaded from repository guarantees \
                      `Broker` existence"
        )]
        unsafe {
            api::Broker::new_unchecked(self.0.broker_id)
        }
    }

    /// Pinned origination share percent, when overridden per `Payment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PaymentSplit.splitOriginationPercentOverride",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn split_origination_percent_override(&self) -> Option<Percent> {
        self.0.split_origination_percent.overridden()
    }

    /// Pinned site share percent, when overridden per `Payment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PaymentSplit.splitSitePercentOverride",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn split_site_percent_override(&self) -> Option<Percent> {
        self.0.split_site_percent.overridden()
    }

    /// Pinned deal share percent, when overridden per `Payment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PaymentSplit.splitDealPercentOverride",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn split_deal_percent_override(&self) -> Option<Percent> {
        self.0.split_deal_percent.overridden()
    }

    /// Origination share of the `Payment`, in dollars.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PaymentSplit.splitOriginationUsd",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn split_origination_usd(&self) -> Money {
        self.0.split_origination_usd
    }

    /// Site share of the `Payment`, in dollars.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PaymentSplit.splitSiteUsd",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn split_site_usd(&self) -> Money {
        self.0.split_site_usd
    }

    /// Deal share of the `Payment`, in dollars.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PaymentSplit.splitDealUsd",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn split_deal_usd(&self) -> Money {
        self.0.split_deal_usd
    }

    /// Total share of the `Broker` in the `Payment`, in dollars.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PaymentSplit.splitBrokerTotal",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn split_broker_total(&self) -> Money {
        self.0.split_broker_total
    }

    /// `DateTime` when this `PaymentSplit` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PaymentSplit.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `PaymentSplit`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::payment_split::Id)]
#[into(domain::payment_split::Id)]
#[graphql(name = "PaymentSplitId", transparent)]
pub struct SplitId(Uuid);
