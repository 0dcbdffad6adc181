//! [`Query`] collection related to [`CommissionSplit`]s of a [`Deal`].

use common::operations::By;

use crate::domain::{deal, CommissionSplit};
#[cfg(doc)]
use crate::{domain::Deal, Query};

use super::DatabaseQuery;

/// Queries the [`CommissionSplit`]s of a [`Deal`].
pub type ByDeal = DatabaseQuery<By<Vec<CommissionSplit>, deal::Id>>;
