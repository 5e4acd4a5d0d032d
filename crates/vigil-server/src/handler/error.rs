//! Handler errors rendered as JSON [`ErrorResponse`] bodies.

use std::borrow::Cow;
use std::fmt;

use axum::response::{IntoResponse, Response};

use crate::handler::response::ErrorResponse;

/// Error returned by health handlers and recovery middleware.
///
/// `kind` selects the status code and the default body; `message` and
/// `resource` override what the client sees, `context` only reaches logs.
#[derive(Debug, Clone, Default)]
#[must_use = "errors do nothing unless turned into a response"]
pub struct Error<'a> {
    kind: ErrorKind,
    message: Option<Cow<'a, str>>,
    resource: Option<Cow<'a, str>>,
    context: Option<Cow<'a, str>>,
}

impl<'a> Error<'a> {
    /// Creates an error of the given kind with the default body.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            resource: None,
            context: None,
        }
    }

    /// Replaces the client-facing message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Names the resource the error refers to, e.g. `component`.
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Attaches diagnostic context that is never serialized.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Builds the response body this error renders to.
    pub fn to_response(&self) -> ErrorResponse<'a> {
        let mut response: ErrorResponse<'a> = self.kind.response();
        if let Some(message) = &self.message {
            response = response.with_message(message.clone());
        }
        if let Some(resource) = &self.resource {
            response = response.with_resource(resource.clone());
        }
        if let Some(context) = &self.context {
            response = response.with_context(context.clone());
        }
        response
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.to_response();
        write!(f, "{} ({}): {}", response.name, response.status, response.message)?;

        if let Some(resource) = response.resource {
            write!(f, " [{resource}]")?;
        }
        if let Some(context) = response.context {
            write!(f, " ({context})")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        self.to_response().into_response()
    }
}

impl aide::OperationOutput for Error<'_> {
    type Inner = ErrorResponse<'static>;
}

impl From<ErrorKind> for Error<'_> {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result type of the health handlers.
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Failure classes the health service responds with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unknown route or component name (404).
    NotFound,
    /// The request outlived the configured request timeout (504).
    Timeout,
    /// Handler panic or unexpected middleware failure (500).
    #[default]
    InternalServerError,
}

impl ErrorKind {
    /// Shorthand for `Error::new(self).with_message(message)`.
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_message(message)
    }

    /// Returns the default body for this kind.
    pub fn response(self) -> ErrorResponse<'static> {
        match self {
            Self::NotFound => ErrorResponse::NOT_FOUND,
            Self::Timeout => ErrorResponse::GATEWAY_TIMEOUT,
            Self::InternalServerError => ErrorResponse::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorKind {
    fn into_response(self) -> Response {
        self.response().into_response()
    }
}
