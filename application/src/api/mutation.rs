//! GraphQL [`Mutation`]s definitions.

use common::{Coordinate, Latitude, Longitude, Money, Percent};
use juniper::{graphql_object, GraphQLInputObject};
use service::{command, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Broker` with the provided name.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createBroker",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_broker(
        name: api::broker::Name,
        ctx: &Context,
    ) -> Result<api::Broker, Error> {
        ctx.service()
            .execute(command::CreateBroker { name: name.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Deal` with the provided commission structure.
    ///
    /// One `CommissionSplit` is created per `splits` entry, with its dollar
    /// shares derived from the `Deal`'s fee.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BROKER_NOT_EXISTS` - a `Broker` referenced by `splits` does not
    ///                         exist;
    /// - `INVALID_NUMBER_OF_PAYMENTS` - `numberOfPayments` is out of range.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createDeal",
            kind = ?kind,
            name = %name,
            number_of_payments = %number_of_payments,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "GraphQL mutation")]
    pub async fn create_deal(
        name: api::deal::Name,
        kind: api::deal::Kind,
        fee: Money,
        commission_percent: Percent,
        origination_percent: Percent,
        site_percent: Percent,
        deal_percent: Percent,
        house_percent: Percent,
        referral_fee_percent: Percent,
        number_of_payments: i32,
        splits: Vec<BrokerSplitInput>,
        ctx: &Context,
    ) -> Result<api::Deal, Error> {
        let number_of_payments = u16::try_from(number_of_payments)
            .map_err(|_| DealInputError::NumberOfPayments.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateDeal {
                name: name.into(),
                kind: kind.into(),
                fee,
                commission_percent,
                origination_percent,
                site_percent,
                deal_percent,
                house_percent,
                referral_fee_percent,
                number_of_payments,
                splits: splits.into_iter().map(Into::into).collect(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Property` with the provided address, deduplicating by
    /// its normalized address.
    ///
    /// If a `Property` with the same normalized address exists already, it
    /// is returned instead of creating a duplicate.
    #[tracing::instrument(
        skip_all,
        fields(
            address = %address,
            gql.name = "createProperty",
            latitude = ?latitude,
            longitude = ?longitude,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_property(
        address: api::property::Address,
        latitude: Option<Latitude>,
        longitude: Option<Longitude>,
        ctx: &Context,
    ) -> Result<api::Property, Error> {
        ctx.service()
            .execute(command::CreateProperty {
                address: address.into(),
                latitude,
                longitude,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `SiteSubmit` tying the specified `Deal` to the
    /// specified `Property`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DEAL_NOT_EXISTS` - the `Deal` with the specified ID does not exist;
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            deal_id = %deal_id,
            gql.name = "createSiteSubmit",
            name = %name,
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
        ),
    )]
    pub async fn create_site_submit(
        deal_id: api::deal::Id,
        property_id: api::property::Id,
        name: api::site_submit::Name,
        ctx: &Context,
    ) -> Result<api::SiteSubmit, Error> {
        ctx.service()
            .execute(command::CreateSiteSubmit {
                deal_id: deal_id.into(),
                property_id: property_id.into(),
                name: name.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the commission structure of the specified `Deal`.
    ///
    /// Omitted fields keep their current values. All `CommissionSplit`s are
    /// re-derived against the updated fee, and `PaymentSplit`s of every
    /// non-locked, non-deleted `Payment` are regenerated.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DEAL_NOT_EXISTS` - the `Deal` with the specified ID does not exist;
    /// - `COMMISSION_SPLIT_NOT_EXISTS` - a `CommissionSplit` referenced by
    ///                                   `splits` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            deal_id = %deal_id,
            gql.name = "updateDealCommission",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "GraphQL mutation")]
    pub async fn update_deal_commission(
        deal_id: api::deal::Id,
        fee: Option<Money>,
        referral_fee_percent: Option<Percent>,
        house_percent: Option<Percent>,
        origination_percent: Option<Percent>,
        site_percent: Option<Percent>,
        deal_percent: Option<Percent>,
        splits: Option<Vec<SplitUpdateInput>>,
        ctx: &Context,
    ) -> Result<api::Deal, Error> {
        ctx.service()
            .execute(command::UpdateDealCommission {
                deal_id: deal_id.into(),
                fee,
                referral_fee_percent,
                house_percent,
                origination_percent,
                site_percent,
                deal_percent,
                splits: splits
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Regenerates the installment `Payment` schedule of the specified
    /// `Deal`.
    ///
    /// Non-locked `Payment`s without a manual amount override are replaced
    /// by a fresh schedule splitting the `Deal`'s fee evenly, with the
    /// rounding remainder carried by the last installment. Locked and
    /// amount-overridden `Payment`s are left untouched.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DEAL_NOT_EXISTS` - the `Deal` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            deal_id = %deal_id,
            gql.name = "generatePayments",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn generate_payments(
        deal_id: api::deal::Id,
        ctx: &Context,
    ) -> Result<Vec<api::Payment>, Error> {
        ctx.service()
            .execute(command::GeneratePayments {
                deal_id: deal_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|payments| payments.into_iter().map(Into::into).collect())
    }

    /// Regenerates the `PaymentSplit`s of every non-locked, non-deleted
    /// `Payment` of the specified `Deal`.
    ///
    /// Returns IDs of the `Payment`s whose splits were regenerated. Pinned
    /// per-`Payment` percent overrides are preserved.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DEAL_NOT_EXISTS` - the `Deal` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            deal_id = %deal_id,
            gql.name = "regeneratePaymentSplits",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn regenerate_payment_splits(
        deal_id: api::deal::Id,
        ctx: &Context,
    ) -> Result<Vec<api::payment::Id>, Error> {
        ctx.service()
            .execute(command::RegeneratePaymentSplits {
                deal_id: deal_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ids| ids.into_iter().map(Into::into).collect())
    }

    /// Overrides the amount of the specified `Payment`.
    ///
    /// The `Payment`'s referral fee and AGCI are re-derived against the new
    /// amount. Its `PaymentSplit`s are NOT regenerated: split dollar shares
    /// keep reflecting the previous amount until splits are regenerated
    /// explicitly.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAYMENT_NOT_EXISTS` - the `Payment` with the specified ID does not
    ///                          exist or is deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "overridePaymentAmount",
            otel.name = Self::SPAN_NAME,
            payment_id = %payment_id,
        ),
    )]
    pub async fn override_payment_amount(
        payment_id: api::payment::Id,
        amount: Money,
        ctx: &Context,
    ) -> Result<api::Payment, Error> {
        ctx.service()
            .execute(command::OverridePaymentAmount {
                payment_id: payment_id.into(),
                amount,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Pins a per-`Payment` referral fee percent, re-deriving the
    /// `Payment`'s referral fee and AGCI.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAYMENT_NOT_EXISTS` - the `Payment` with the specified ID does not
    ///                          exist or is deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "overrideReferralFee",
            otel.name = Self::SPAN_NAME,
            payment_id = %payment_id,
            percent = %percent,
        ),
    )]
    pub async fn override_referral_fee(
        payment_id: api::payment::Id,
        percent: Percent,
        ctx: &Context,
    ) -> Result<api::Payment, Error> {
        ctx.service()
            .execute(command::OverrideReferralFee {
                payment_id: payment_id.into(),
                percent,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Locks the specified `Payment` against regeneration.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAYMENT_NOT_EXISTS` - the `Payment` with the specified ID does not
    ///                          exist or is deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "lockPayment",
            otel.name = Self::SPAN_NAME,
            payment_id = %payment_id,
        ),
    )]
    pub async fn lock_payment(
        payment_id: api::payment::Id,
        ctx: &Context,
    ) -> Result<api::Payment, Error> {
        ctx.service()
            .execute(command::LockPayment {
                payment_id: payment_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Unlocks the specified `Payment`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAYMENT_NOT_EXISTS` - the `Payment` with the specified ID does not
    ///                          exist or is deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "unlockPayment",
            otel.name = Self::SPAN_NAME,
            payment_id = %payment_id,
        ),
    )]
    pub async fn unlock_payment(
        payment_id: api::payment::Id,
        ctx: &Context,
    ) -> Result<api::Payment, Error> {
        ctx.service()
            .execute(command::UnlockPayment {
                payment_id: payment_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Soft-deletes the specified `Payment`.
    ///
    /// The `Payment` disappears from `Deal` listings and schedule
    /// regeneration, and is purged for good after the retention period.
    /// Deleting an already deleted `Payment` is a no-op.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAYMENT_NOT_EXISTS` - the `Payment` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deletePayment",
            otel.name = Self::SPAN_NAME,
            payment_id = %payment_id,
        ),
    )]
    pub async fn delete_payment(
        payment_id: api::payment::Id,
        ctx: &Context,
    ) -> Result<api::Payment, Error> {
        ctx.service()
            .execute(command::DeletePayment {
                payment_id: payment_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks the location of the specified `SiteSubmit` as manually
    /// verified at the provided coordinate.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SITE_SUBMIT_NOT_EXISTS` - the `SiteSubmit` with the specified ID
    ///                              does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "verifySiteSubmitLocation",
            latitude = %latitude,
            longitude = %longitude,
            otel.name = Self::SPAN_NAME,
            site_submit_id = %site_submit_id,
        ),
    )]
    pub async fn verify_site_submit_location(
        site_submit_id: api::site_submit::Id,
        latitude: Latitude,
        longitude: Longitude,
        ctx: &Context,
    ) -> Result<api::SiteSubmit, Error> {
        ctx.service()
            .execute(command::VerifySiteSubmitLocation {
                site_submit_id: site_submit_id.into(),
                coordinate: Coordinate {
                    latitude,
                    longitude,
                },
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Clears the manually verified location of the specified `SiteSubmit`,
    /// falling back to its `Property` coordinates.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SITE_SUBMIT_NOT_EXISTS` - the `SiteSubmit` with the specified ID
    ///                              does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "resetSiteSubmitLocation",
            otel.name = Self::SPAN_NAME,
            site_submit_id = %site_submit_id,
        ),
    )]
    pub async fn reset_site_submit_location(
        site_submit_id: api::site_submit::Id,
        ctx: &Context,
    ) -> Result<api::SiteSubmit, Error> {
        ctx.service()
            .execute(command::ResetSiteSubmitLocation {
                site_submit_id: site_submit_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

/// Per-broker share percents for creating a `CommissionSplit`.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
pub struct BrokerSplitInput {
    /// `Broker` the share is for.
    pub broker_id: api::broker::Id,

    /// Origination share percent of the `Broker`.
    pub split_origination_percent: Percent,

    /// Site share percent of the `Broker`.
    pub split_site_percent: Percent,

    /// Deal share percent of the `Broker`.
    pub split_deal_percent: Percent,
}

impl From<BrokerSplitInput> for command::create_deal::BrokerSplit {
    fn from(input: BrokerSplitInput) -> Self {
        let BrokerSplitInput {
            broker_id,
            split_origination_percent,
            split_site_percent,
            split_deal_percent,
        } = input;
        Self {
            broker_id: broker_id.into(),
            split_origination_percent,
            split_site_percent,
            split_deal_percent,
        }
    }
}

/// Updated share percents of an existing `CommissionSplit`.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
pub struct SplitUpdateInput {
    /// `CommissionSplit` being updated.
    pub commission_split_id: api::commission_split::Id,

    /// Origination share percent of the `Broker`.
    pub split_origination_percent: Percent,

    /// Site share percent of the `Broker`.
    pub split_site_percent: Percent,

    /// Deal share percent of the `Broker`.
    pub split_deal_percent: Percent,
}

impl From<SplitUpdateInput> for command::update_deal_commission::SplitUpdate {
    fn from(input: SplitUpdateInput) -> Self {
        let SplitUpdateInput {
            commission_split_id,
            split_origination_percent,
            split_site_percent,
            split_deal_percent,
        } = input;
        Self {
            commission_split_id: commission_split_id.into(),
            split_origination_percent,
            split_site_percent,
            split_deal_percent,
        }
    }
}

define_error! {
    enum DealInputError {
        #[code = "INVALID_NUMBER_OF_PAYMENTS"]
        #[status = BAD_REQUEST]
        #[message = "`numberOfPayments` must be within `0..=65535`"]
        NumberOfPayments,
    }
}

impl AsError for command::create_broker::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::create_deal::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BROKER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Broker` with the provided ID does not exist"]
                BrokerNotExists,
            }
        }

        match self {
            Self::BrokerNotExists(_) => Some(Error::BrokerNotExists.into()),
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::create_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::create_site_submit::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "DEAL_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Deal` with the provided ID does not exist"]
                DealNotExists,

                #[code = "PROPERTY_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Property` with the provided ID does not exist"]
                PropertyNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::DealNotExists(_) => Error::DealNotExists.into(),
            Self::PropertyNotExists(_) => Error::PropertyNotExists.into(),
        })
    }
}

impl AsError for command::update_deal_commission::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "COMMISSION_SPLIT_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`CommissionSplit` with the provided ID does not \
                             exist"]
                CommissionSplitNotExists,

                #[code = "DEAL_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Deal` with the provided ID does not exist"]
                DealNotExists,
            }
        }

        Some(match self {
            Self::CommissionSplitNotExists(_) => {
                Error::CommissionSplitNotExists.into()
            }
            Self::Db(e) => return e.try_as_error(),
            Self::DealNotExists(_) => Error::DealNotExists.into(),
        })
    }
}

impl AsError for command::generate_payments::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "DEAL_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Deal` with the provided ID does not exist"]
                DealNotExists,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::DealNotExists(_) => Some(Error::DealNotExists.into()),
        }
    }
}

impl AsError for command::regenerate_payment_splits::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "DEAL_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Deal` with the provided ID does not exist"]
                DealNotExists,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::DealNotExists(_) => Some(Error::DealNotExists.into()),
        }
    }
}

impl AsError for command::override_payment_amount::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PAYMENT_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Payment` with the provided ID does not exist"]
                PaymentNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::DealNotExists(_) => return None,
            Self::PaymentNotExists(_) => Error::PaymentNotExists.into(),
        })
    }
}

impl AsError for command::override_referral_fee::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PAYMENT_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Payment` with the provided ID does not exist"]
                PaymentNotExists,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PaymentNotExists(_) => Some(Error::PaymentNotExists.into()),
        }
    }
}

impl AsError for command::lock_payment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PAYMENT_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Payment` with the provided ID does not exist"]
                PaymentNotExists,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PaymentNotExists(_) => Some(Error::PaymentNotExists.into()),
        }
    }
}

impl AsError for command::unlock_payment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PAYMENT_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Payment` with the provided ID does not exist"]
                PaymentNotExists,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PaymentNotExists(_) => Some(Error::PaymentNotExists.into()),
        }
    }
}

impl AsError for command::delete_payment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PAYMENT_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Payment` with the provided ID does not exist"]
                PaymentNotExists,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PaymentNotExists(_) => Some(Error::PaymentNotExists.into()),
        }
    }
}

impl AsError for command::verify_site_submit_location::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "SITE_SUBMIT_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`SiteSubmit` with the provided ID does not exist"]
                SiteSubmitNotExists,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::SiteSubmitNotExists(_) => {
                Some(Error::SiteSubmitNotExists.into())
            }
        }
    }
}

impl AsError for command::reset_site_submit_location::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "SITE_SUBMIT_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`SiteSubmit` with the provided ID does not exist"]
                SiteSubmitNotExists,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::SiteSubmitNotExists(_) => {
                Some(Error::SiteSubmitNotExists.into())
            }
        }
    }
}
