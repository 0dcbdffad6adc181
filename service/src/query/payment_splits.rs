//! [`Query`] collection related to [`PaymentSplit`]s of a [`Payment`].

use common::operations::By;

use crate::domain::{payment, PaymentSplit};
#[cfg(doc)]
use crate::{domain::Payment, Query};

use super::DatabaseQuery;

/// Queries the [`PaymentSplit`]s of a [`Payment`].
pub type ByPayment = DatabaseQuery<By<Vec<PaymentSplit>, payment::Id>>;
