//! [`Error`]-related definitions.

use std::fmt;

use derive_more::Error as StdError;
use itertools::Itertools as _;
use juniper::IntoFieldError;
use service::infra::database;
use tracerr::{Trace, Traced};

/// Defines an error enum with a machine-readable code, an HTTP status and a
/// message per variant, convertible into the API [`Error`].
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// Error returned by the GraphQL API, rendered into field error extensions.
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// Machine-readable [`Code`] of this [`Error`].
    pub code: Code,

    /// [`http::StatusCode`] this [`Error`] maps onto.
    pub status_code: http::StatusCode,

    /// Backtrace of where this [`Error`] happened, if traced.
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// Human-readable message of this [`Error`].
    pub message: String,
}

impl Error {
    /// Builds an [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_SERVER_ERROR",
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

impl<S> IntoFieldError<S> for Error
where
    S: From<String>,
{
    fn into_field_error(self) -> juniper::FieldError<S> {
        let mut ext = juniper::Object::with_capacity(1);
        drop(
            ext.add_field("code", juniper::Value::scalar(self.code.to_owned())),
        );
        drop(
            ext.add_field(
                "backtrace",
                juniper::Value::list(
                    self.backtrace
                        .iter()
                        .flat_map(|trace| trace.iter())
                        .map(|frame| juniper::Value::scalar(frame.to_string()))
                        .collect(),
                ),
            ),
        );
        juniper::FieldError::new(self.message, juniper::Value::object(ext))
    }
}

/// Machine-readable [`Error`] code.
pub type Code = &'static str;

/// Classification of arbitrary error types into API [`Error`]s.
pub trait AsError {
    /// Tries to classify this error as a well-known API [`Error`].
    ///
    /// [`None`] means the error has no client-facing representation.
    fn try_as_error(&self) -> Option<Error>;

    /// Classifies this error as an API [`Error`], falling back to an
    /// internal server error.
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Consumes this error, classifying it as an API [`Error`].
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}
