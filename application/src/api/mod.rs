//! GraphQL API definitions.

pub mod broker;
pub mod commission_split;
pub mod deal;
mod mutation;
pub mod payment;
pub mod pin;
pub mod property;
mod query;
pub mod scalar;
pub mod site_submit;
mod subscription;

use crate::define_error;

pub use self::{
    broker::Broker,
    commission_split::CommissionSplit,
    deal::Deal,
    mutation::Mutation,
    payment::{Payment, PaymentSplit},
    pin::Pin,
    property::Property,
    query::Query,
    site_submit::SiteSubmit,
    subscription::Subscription,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;

define_error! {
    enum PaginationError {
        #[code = "AMBIGUOUS_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "Ambiguous pagination arguments"]
        Ambiguous,
    }
}
