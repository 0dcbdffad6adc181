//! Transactional and non-transactional Postgres clients.

pub mod non_tx;
pub mod tx;

pub use self::{non_tx::NonTx, tx::Tx};
