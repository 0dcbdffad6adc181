//! [`Command`] definition.

pub mod create_broker;
pub mod create_deal;
pub mod create_property;
pub mod create_site_submit;
pub mod delete_payment;
pub mod generate_payments;
pub mod lock_payment;
pub mod override_payment_amount;
pub mod override_referral_fee;
pub mod regenerate_payment_splits;
pub mod reset_site_submit_location;
pub mod unlock_payment;
pub mod update_deal_commission;
pub mod verify_site_submit_location;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_broker::CreateBroker, create_deal::CreateDeal,
    create_property::CreateProperty,
    create_site_submit::CreateSiteSubmit, delete_payment::DeletePayment,
    generate_payments::GeneratePayments, lock_payment::LockPayment,
    override_payment_amount::OverridePaymentAmount,
    override_referral_fee::OverrideReferralFee,
    regenerate_payment_splits::RegeneratePaymentSplits,
    reset_site_submit_location::ResetSiteSubmitLocation,
    unlock_payment::UnlockPayment,
    update_deal_commission::UpdateDealCommission,
    verify_site_submit_location::VerifySiteSubmitLocation,
};
