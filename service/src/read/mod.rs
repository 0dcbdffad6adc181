//! Read entities definitions.

pub mod deal;
pub mod pin;

pub use self::pin::Pin;
