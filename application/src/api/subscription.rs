//! GraphQL [`Subscription`]s definitions.

use std::time;

use futures::{
    stream::{self, BoxStream},
    StreamExt as _,
};
use juniper::graphql_subscription;
use service::{query, Query as _};

use crate::{api, AsError, Context, Error};

/// Root of all GraphQL subscriptions.
#[derive(Clone, Copy, Debug)]
pub struct Subscription;

#[graphql_subscription(context = Context)]
impl Subscription {
    /// Subscription emitting the non-deleted `Payment`s of the specified
    /// `Deal`, re-read on a fixed interval.
    pub async fn payments(
        &self,
        deal_id: api::deal::Id,
        ctx: &Context,
    ) -> BoxStream<'static, Result<Vec<api::Payment>, Error>> {
        const POLL_INTERVAL: time::Duration = time::Duration::from_secs(5);

        let service = ctx.service().clone();
        stream::unfold(
            tokio::time::interval(POLL_INTERVAL),
            move |mut interval| {
                let service = service.clone();
                async move {
                    _ = interval.tick().await;
                    let payments = service
                        .execute(query::payments::ByDeal::by(deal_id.into()))
                        .await
                        .map_err(AsError::into_error)
                        .map(|payments| {
                            payments
                                .into_iter()
                                .map(api::Payment::from)
                                .collect()
                        });
                    Some((payments, interval))
                }
            },
        )
        .boxed()
    }
}
