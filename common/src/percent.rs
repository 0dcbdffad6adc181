//! [`Percent`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

use crate::Money;

/// Floating-point percentage in the `0..=100` range.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Percent(Decimal);

impl Percent {
    /// Zero [`Percent`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Hundred [`Percent`].
    pub const HUNDRED: Self = Self(Decimal::ONE_HUNDRED);

    /// Creates a new [`Percent`] by checking the provided values is
    /// greater than `0` and less than `100`.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        if val < Decimal::ZERO || val > Decimal::ONE_HUNDRED {
            None
        } else {
            #[expect(
                clippy::allow_attributes,
                reason = "TODO: Remove once clippy is fixed"
            )]
            #[allow(unsafe_code, reason = "invariants checked already")]
            Some(unsafe { Self::new_unchecked(val) })
        }
    }

    /// Creates a new [`Percent`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided value must be greater than `0` and less than `100`.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(val: Decimal) -> Self {
        Self(val)
    }

    /// Takes this [`Percent`] of the provided amount.
    #[must_use]
    pub fn of(self, amount: Decimal) -> Decimal {
        amount * self.0 / Decimal::ONE_HUNDRED
    }

    /// Takes this [`Percent`] of the provided [`Money`], keeping its
    /// [`Currency`].
    ///
    /// [`Currency`]: crate::money::Currency
    #[must_use]
    pub fn of_money(self, money: Money) -> Money {
        money.with_amount(self.of(money.amount))
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Floating-point percentage in the `0..=100` range.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Percent = super::Percent;

    impl Percent {
        fn to_output<S: ScalarValue>(m: &Percent) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Percent` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Percent` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use crate::money::{Currency, Money};

    use super::Percent;

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert!(Percent::from_str("0").is_ok());
        assert!(Percent::from_str("50.25").is_ok());
        assert!(Percent::from_str("100").is_ok());

        assert!(Percent::from_str("-1").is_err());
        assert!(Percent::from_str("100.01").is_err());
        assert!(Percent::from_str("half").is_err());
    }

    #[test]
    fn of_takes_stored_percentage_of_base() {
        let pct = Percent::from_str("50").unwrap();
        assert_eq!(pct.of(decimal("100000")), decimal("50000"));

        let pct = Percent::from_str("12.5").unwrap();
        assert_eq!(pct.of(decimal("1000")), decimal("125"));

        assert_eq!(Percent::ZERO.of(decimal("1000")), Decimal::ZERO);
        assert_eq!(Percent::HUNDRED.of(decimal("1000")), decimal("1000"));
    }

    #[test]
    fn of_money_keeps_currency() {
        let pct = Percent::from_str("30").unwrap();
        let fee = Money {
            amount: decimal("100000"),
            currency: Currency::Usd,
        };
        assert_eq!(
            pct.of_money(fee),
            Money {
                amount: decimal("30000"),
                currency: Currency::Usd,
            },
        );
    }
}
