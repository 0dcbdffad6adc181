//! GraphQL scalar definitions.

use std::{fmt, marker::PhantomData, str::FromStr};

use juniper::{
    GraphQLType, InputValue, ParseScalarResult, ParseScalarValue, ScalarToken,
    ScalarValue, Value,
};

/// Helper for `#[graphql(with = ..)]` attributes, representing the target
/// type as a string GraphQL scalar via an intermediate `As` type.
///
/// Output goes through the [`Display`] impl of `As` (reached from the target
/// type via its [`AsRef`]`<As>` impl), and input is parsed with the
/// [`FromStr`] impl of `As` and then converted with the target type's
/// [`TryFrom`]`<As>` impl.
///
/// [`Display`]: fmt::Display
#[derive(Debug)]
pub struct Via<As>(PhantomData<As>);

impl<As> Via<As> {
    /// Renders the target type as a string scalar [`Value`], going through
    /// the [`Display`] impl of the `As` type.
    ///
    /// [`Display`]: fmt::Display
    pub fn to_output<T, S>(value: &T) -> Value<S>
    where
        As: fmt::Display,
        T: AsRef<As>,
        S: ScalarValue,
    {
        Value::from(value.as_ref().to_string())
    }

    /// Parses the target type out of a string scalar [`InputValue`], going
    /// through the [`FromStr`] impl of the `As` type.
    ///
    /// # Errors
    ///
    /// - If the input value is not a string.
    /// - If the `As` type cannot be parsed from the input string.
    /// - If the target type cannot be converted from the parsed `As` type.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        As: FromStr + fmt::Display,
        As::Err: fmt::Display,
        T: TryFrom<As> + GraphQLType<S, TypeInfo = ()>,
        T::Error: fmt::Display,
        S: ScalarValue,
    {
        let string = input.as_string_value().ok_or_else(|| {
            format!(
                "Cannot parse input scalar `{}`: expected string input \
                 value, found: {input}",
                T::name(&()).expect("always has a name"),
            )
        })?;
        string
            .parse::<As>()
            .map_err(|e| {
                format!(
                    "Cannot parse input scalar `{}` from \"{string}\" \
                     string: {e}",
                    T::name(&()).expect("always has a name"),
                )
            })?
            .try_into()
            .map_err(|e| {
                format!(
                    "Cannot parse input scalar `{}`: {e}",
                    T::name(&()).expect("always has a name"),
                )
            })
    }

    /// Parses the provided [`ScalarToken`] as a [`String`] scalar.
    ///
    /// # Errors
    ///
    /// If the token cannot be parsed as a [`String`].
    pub fn parse_token<S: ScalarValue>(
        value: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(value)
    }
}
