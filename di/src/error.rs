//! Error types.

use thiserror::Error;

/// The failure of [`Container::resolve`](crate::Container::resolve).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  /// A required token has no cached value and no provider in the container
  /// (or, for a global token, in the container it was delegated to).
  #[error("Provider for {token} is not registered")]
  NotRegistered {
    /// Display name of the offending token.
    token: String,
  },
}

impl ResolveError {
  pub(crate) fn not_registered(token: &str) -> Self {
    ResolveError::NotRegistered {
      token: token.to_owned(),
    }
  }

  /// The display name of the token that could not be resolved.
  pub fn token_name(&self) -> &str {
    match self {
      ResolveError::NotRegistered { token } => token,
    }
  }
}

/// Returned when a string is not a valid [`Scope`](crate::Scope).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid token scope '{input}', expected 'local' or 'global'")]
pub struct ParseScopeError {
  pub(crate) input: String,
}
