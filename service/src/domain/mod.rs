//! Domain definitions.

pub mod broker;
pub mod commission_split;
pub mod deal;
pub mod payment;
pub mod payment_split;
pub mod property;
pub mod site_submit;

pub use self::{
    broker::Broker, commission_split::CommissionSplit, deal::Deal,
    payment::Payment, payment_split::PaymentSplit, property::Property,
    site_submit::SiteSubmit,
};
