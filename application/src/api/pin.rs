//! Map [`Pin`]-related definitions.

use derive_more::{From, Into};
use juniper::graphql_object;
use service::read;

use crate::{api, Context};

/// Map pin of a `SiteSubmit` with a resolvable display coordinate.
#[derive(Clone, Copy, Debug, From, Into)]
pub struct Pin(read::Pin);

/// Map pin of a `SiteSubmit` with a resolvable display coordinate.
#[graphql_object(context = Context)]
impl Pin {
    /// `SiteSubmit` this `Pin` renders.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Pin.siteSubmit",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn site_submit(&self) -> api::SiteSubmit {
        #[expect(
            unsafe_code,
            reason = "`Pin` loaded from repository guarantees `SiteSubmit` \
                      existence"
        )]
        unsafe {
            api::SiteSubmit::new_unchecked(self.0.site_submit_id)
        }
    }

    /// Resolved display coordinate of the `SiteSubmit`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Pin.coordinate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn coordinate(&self) -> api::site_submit::DisplayCoordinate {
        self.0.coordinate.into()
    }
}

pub mod list {
    //! Definitions related to the [`Pin`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::read;

    use super::Pin;
    use crate::{api, api::scalar, Context};

    /// Cursor for the `Pin` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(api::site_submit::Id, read::pin::list::Cursor)]
    #[graphql(
        name = "PinListCursor",
        with = scalar::Via::<read::pin::list::Cursor>,
    )]
    pub struct Cursor(pub read::pin::list::Cursor);

    /// Edge in the [`Pin`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::pin::list::Edge);

    /// Edge in the `Pin` list.
    #[graphql_object(name = "PinListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `PinListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `PinListEdge`.
        #[must_use]
        pub fn node(&self) -> Pin {
            self.0.node.into()
        }
    }

    /// Connection of the [`Pin`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::pin::list::Connection);

    /// Connection of the `Pin` list.
    #[graphql_object(name = "PinListConnection", context = Context)]
    impl Connection {
        /// Edges of this `PinListConnection`.
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
        /// Underlying [`read::pin::list::PageInfo`].
        info: read::pin::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about a `PinListConnection` page.
    #[graphql_object(name = "PinListPageInfo", context = Context)]
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
    }
}
