//! Tokens: unique, typed identifiers that providers are registered under.

use crate::error::ParseScopeError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// Process-wide source of token identities. Never reset, never reused.
static NEXT_TOKEN_ID: AtomicU64 = AtomicU64::new(1);

/// The unique identity of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(u64);

impl TokenId {
  fn next() -> Self {
    TokenId(NEXT_TOKEN_ID.fetch_add(1, Ordering::Relaxed))
  }

  /// The raw numeric value, useful for diagnostics.
  pub fn as_u64(self) -> u64 {
    self.0
  }
}

/// Whether a token's value is shared across a fork hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Scope {
  /// Every container resolves the token on its own.
  #[default]
  Local,
  /// Resolution is delegated to the parent container, so the value is
  /// produced once at the top of the hierarchy.
  Global,
}

impl fmt::Display for Scope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Scope::Local => f.write_str("local"),
      Scope::Global => f.write_str("global"),
    }
  }
}

impl FromStr for Scope {
  type Err = ParseScopeError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "local" => Ok(Scope::Local),
      "global" => Ok(Scope::Global),
      other => Err(ParseScopeError {
        input: other.to_owned(),
      }),
    }
  }
}

/// Metadata attached to a token at creation time.
///
/// ```
/// use fibre_di::{Scope, TokenOptions};
///
/// let options = TokenOptions::new().multi().optional();
/// assert!(options.multi && options.optional);
/// assert_eq!(TokenOptions::global().scope, Scope::Global);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TokenOptions {
  /// Providers accumulate in registration order instead of replacing each other.
  pub multi: bool,
  /// Resolving without a provider yields an absent value instead of an error.
  pub optional: bool,
  /// Whether forks share one value or resolve their own.
  pub scope: Scope,
}

impl TokenOptions {
  pub fn new() -> Self {
    Self::default()
  }

  /// Options for a single, required, global-scope token.
  pub fn global() -> Self {
    Self::new().scope(Scope::Global)
  }

  pub fn multi(mut self) -> Self {
    self.multi = true;
    self
  }

  pub fn optional(mut self) -> Self {
    self.optional = true;
    self
  }

  pub fn scope(mut self, scope: Scope) -> Self {
    self.scope = scope;
    self
  }
}

pub(crate) struct TokenInner {
  pub(crate) id: TokenId,
  pub(crate) name: Box<str>,
  pub(crate) options: TokenOptions,
}

/// The untyped part of a token. Used as the key of dependency declarations,
/// where tokens of different value types sit side by side.
#[derive(Clone)]
pub(crate) struct TokenKey(Arc<TokenInner>);

impl TokenKey {
  pub(crate) fn id(&self) -> TokenId {
    self.0.id
  }

  pub(crate) fn name(&self) -> &str {
    &self.0.name
  }

  pub(crate) fn options(&self) -> TokenOptions {
    self.0.options
  }
}

impl fmt::Debug for TokenKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "TokenKey({}, {})", self.0.id.as_u64(), self.0.name)
  }
}

/// A typed identifier for a value of type `T` held by a [`Container`](crate::Container).
///
/// `T` exists only at compile time. Cloning a token is cheap and the clone
/// keeps the same identity; two separately created tokens are never equal,
/// whatever their names.
pub struct Token<T: ?Sized> {
  key: TokenKey,
  _marker: PhantomData<fn() -> T>,
}

/// Creates a new single, required, local-scope token.
pub fn create_token<T: ?Sized>(name: impl Into<String>) -> Token<T> {
  create_token_with(name, TokenOptions::default())
}

/// Creates a new token with the given metadata.
///
/// ```
/// use fibre_di::{create_token_with, TokenOptions};
///
/// let plugins = create_token_with::<String>("plugins", TokenOptions::new().multi());
/// assert!(plugins.is_multi());
/// assert_eq!(plugins.to_string(), "plugins");
/// ```
pub fn create_token_with<T: ?Sized>(name: impl Into<String>, options: TokenOptions) -> Token<T> {
  Token {
    key: TokenKey(Arc::new(TokenInner {
      id: TokenId::next(),
      name: name.into().into_boxed_str(),
      options,
    })),
    _marker: PhantomData,
  }
}

impl<T: ?Sized> Token<T> {
  pub fn id(&self) -> TokenId {
    self.key.id()
  }

  pub fn name(&self) -> &str {
    self.key.name()
  }

  pub fn options(&self) -> TokenOptions {
    self.key.options()
  }

  pub fn is_multi(&self) -> bool {
    self.key.options().multi
  }

  pub fn is_optional(&self) -> bool {
    self.key.options().optional
  }

  pub fn scope(&self) -> Scope {
    self.key.options().scope
  }

  pub(crate) fn key(&self) -> &TokenKey {
    &self.key
  }
}

impl<T: ?Sized> Clone for Token<T> {
  fn clone(&self) -> Self {
    Token {
      key: self.key.clone(),
      _marker: PhantomData,
    }
  }
}

impl<T: ?Sized> PartialEq for Token<T> {
  fn eq(&self, other: &Self) -> bool {
    self.id() == other.id()
  }
}

impl<T: ?Sized> Eq for Token<T> {}

impl<T: ?Sized> Hash for Token<T> {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id().hash(state);
  }
}

impl<T: ?Sized> fmt::Display for Token<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl<T: ?Sized> fmt::Debug for Token<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Token")
      .field("id", &self.id().as_u64())
      .field("name", &self.name())
      .field("options", &self.options())
      .finish()
  }
}
