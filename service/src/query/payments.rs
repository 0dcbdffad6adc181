//! [`Query`] collection related to [`Payment`]s of a [`Deal`].

use common::operations::By;

#[cfg(doc)]
use crate::domain::Deal;
use crate::domain::{deal, Payment};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries the non-deleted [`Payment`]s of a [`Deal`], ordered by their
/// sequence.
pub type ByDeal = DatabaseQuery<By<Vec<Payment>, deal::Id>>;
