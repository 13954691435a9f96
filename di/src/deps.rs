//! Dependency declarations and the resolved dependency bag handed to
//! factories and services.

use crate::provider::{downcast, Resolved};
use crate::token::{Token, TokenKey};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct DepEntry {
  pub(crate) name: Box<str>,
  pub(crate) token: TokenKey,
  pub(crate) optional: bool,
}

/// The named dependencies of a factory or service provider.
///
/// Each entry maps a name to a token. Declaring a name twice keeps the
/// latest token for it.
///
/// ```
/// use fibre_di::{create_token, Deps};
///
/// let url = create_token::<String>("url");
/// let pool_size = create_token::<usize>("pool_size");
/// let deps = Deps::new().with("url", &url).optional("pool_size", &pool_size);
/// assert_eq!(deps.names().collect::<Vec<_>>(), ["url", "pool_size"]);
/// ```
#[derive(Clone, Default)]
pub struct Deps {
  entries: Vec<DepEntry>,
}

impl Deps {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds an entry resolved with the token's own optionality.
  pub fn with<T: ?Sized>(self, name: &str, token: &Token<T>) -> Self {
    self.push(name, token.key().clone(), false)
  }

  /// Adds an entry that resolves to an absent value instead of failing when
  /// the token is not registered.
  pub fn optional<T: ?Sized>(self, name: &str, token: &Token<T>) -> Self {
    self.push(name, token.key().clone(), true)
  }

  fn push(mut self, name: &str, token: TokenKey, optional: bool) -> Self {
    let entry = DepEntry {
      name: name.into(),
      token,
      optional,
    };
    match self.entries.iter_mut().find(|e| *e.name == *name) {
      Some(existing) => *existing = entry,
      None => self.entries.push(entry),
    }
    self
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Entry names in declaration order.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(|e| &*e.name)
  }

  pub(crate) fn entries(&self) -> &[DepEntry] {
    &self.entries
  }
}

impl fmt::Debug for Deps {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut map = f.debug_map();
    for entry in &self.entries {
      map.entry(&entry.name, &entry.token);
    }
    map.finish()
  }
}

/// The resolved form of a [`Deps`] declaration, passed to the factory or
/// service constructor that declared it.
#[derive(Clone, Default)]
pub struct DepBag {
  entries: HashMap<Box<str>, Resolved>,
}

impl DepBag {
  pub(crate) fn insert(&mut self, name: &str, resolved: Resolved) {
    self.entries.insert(name.into(), resolved);
  }

  /// The value of a single-token entry, or `None` when the entry is absent,
  /// undeclared, or not a `T`.
  pub fn get<T>(&self, name: &str) -> Option<Arc<T>>
  where
    T: ?Sized + Send + Sync + 'static,
  {
    match self.entries.get(name)? {
      Resolved::Single(instance) => downcast::<T>(instance),
      Resolved::Multi(_) | Resolved::Absent => None,
    }
  }

  /// The values of a multi-token entry in registration order. A single-token
  /// entry is returned as one element; an absent entry as an empty vector.
  pub fn get_all<T>(&self, name: &str) -> Vec<Arc<T>>
  where
    T: ?Sized + Send + Sync + 'static,
  {
    match self.entries.get(name) {
      Some(Resolved::Multi(instances)) => instances.iter().filter_map(downcast::<T>).collect(),
      Some(Resolved::Single(instance)) => downcast::<T>(instance).into_iter().collect(),
      Some(Resolved::Absent) | None => Vec::new(),
    }
  }

  /// The value of a required single-token entry.
  ///
  /// # Panics
  ///
  /// Panics if the entry is absent, undeclared, or not a `T`. A required
  /// entry is always present once the bag reaches a provider, so a panic
  /// here means the provider reads a name or type it never declared.
  pub fn require<T>(&self, name: &str) -> Arc<T>
  where
    T: ?Sized + Send + Sync + 'static,
  {
    self.get::<T>(name).unwrap_or_else(|| {
      panic!(
        "dependency '{}' is missing or is not a {}",
        name,
        std::any::type_name::<T>()
      )
    })
  }

  /// Whether a value was resolved for the entry.
  pub fn contains(&self, name: &str) -> bool {
    !self.is_absent(name)
  }

  /// Whether the entry is undeclared or resolved to nothing (an optional
  /// single token without a provider).
  pub fn is_absent(&self, name: &str) -> bool {
    matches!(self.entries.get(name), None | Some(Resolved::Absent))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl fmt::Debug for DepBag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut names: Vec<_> = self.entries.keys().collect();
    names.sort();
    f.debug_struct("DepBag").field("entries", &names).finish()
  }
}

/// A service type constructed from a resolved dependency bag.
///
/// Services without dependencies are constructed through [`Default`] instead.
///
/// ```
/// use fibre_di::{DepBag, FromDeps};
///
/// struct Repository {
///   url: String,
/// }
///
/// impl FromDeps for Repository {
///   fn from_deps(deps: &DepBag) -> Self {
///     Repository {
///       url: deps.require::<String>("url").to_string(),
///     }
///   }
/// }
/// ```
pub trait FromDeps: Sized {
  fn from_deps(deps: &DepBag) -> Self;
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::provider::instance;
  use crate::token::create_token;

  fn bag() -> DepBag {
    let mut bag = DepBag::default();
    bag.insert("name", Resolved::Single(instance(Arc::new(String::from("fibre")))));
    bag.insert(
      "ports",
      Resolved::Multi(vec![instance(Arc::new(80u16)), instance(Arc::new(443u16))].into()),
    );
    bag.insert("missing", Resolved::Absent);
    bag
  }

  #[test]
  fn typed_access_matches_entry_shape() {
    let bag = bag();
    assert_eq!(*bag.require::<String>("name"), "fibre");
    assert!(bag.get::<u32>("name").is_none());
    assert!(bag.get::<u16>("ports").is_none());
    let ports: Vec<u16> = bag.get_all::<u16>("ports").iter().map(|p| **p).collect();
    assert_eq!(ports, vec![80, 443]);
    assert_eq!(bag.get_all::<String>("name").len(), 1);
    assert!(bag.get_all::<String>("missing").is_empty());
  }

  #[test]
  fn absent_and_undeclared_entries() {
    let bag = bag();
    assert!(bag.is_absent("missing"));
    assert!(bag.is_absent("undeclared"));
    assert!(bag.contains("ports"));
    assert_eq!(bag.len(), 3);
  }

  #[test]
  #[should_panic(expected = "dependency 'missing' is missing")]
  fn require_panics_on_absent_entry() {
    bag().require::<String>("missing");
  }

  #[test]
  fn redeclared_name_keeps_latest_token() {
    let first = create_token::<u8>("first");
    let second = create_token::<u8>("second");
    let deps = Deps::new().with("n", &first).optional("n", &second);
    assert_eq!(deps.len(), 1);
    assert_eq!(deps.entries()[0].token.name(), "second");
    assert!(deps.entries()[0].optional);
  }
}
