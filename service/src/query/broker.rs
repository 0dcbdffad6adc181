//! [`Broker`]-related [`Query`] definitions.

use common::operations::By;

use crate::domain::{broker, Broker};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// [`Query`] of a [`Broker`] by its ID.
pub type ById = DatabaseQuery<By<Option<Broker>, broker::Id>>;
