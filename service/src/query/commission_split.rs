//! [`CommissionSplit`]-related [`Query`] definitions.

use common::operations::By;

use crate::domain::{commission_split, CommissionSplit};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// [`Query`] of a [`CommissionSplit`] by its ID.
pub type ById =
    DatabaseQuery<By<Option<CommissionSplit>, commission_split::Id>>;
