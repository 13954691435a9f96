//! The main `Container` struct and its associated methods.

use crate::deps::{DepBag, Deps, FromDeps};
use crate::error::ResolveError;
use crate::provider::{downcast, Binding, Instance, Provider, Recipe, Resolved, Source};
use crate::token::{Scope, Token, TokenId, TokenKey};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

/// Per-call overrides for [`Container::resolve_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveOptions {
  /// Treat the token as optional for this call. A token created optional
  /// stays optional whatever this says.
  pub optional: bool,
}

impl ResolveOptions {
  pub fn optional() -> Self {
    ResolveOptions { optional: true }
  }
}

/// The typed outcome of [`Container::resolve`].
#[derive(Debug)]
pub enum Resolution<T: ?Sized> {
  /// The value of a single token.
  Value(Arc<T>),
  /// The values of a multi token, in registration order. Empty for an
  /// optional multi token without providers.
  Values(Vec<Arc<T>>),
  /// An optional single token without a provider.
  Absent,
}

impl<T: ?Sized> Clone for Resolution<T> {
  fn clone(&self) -> Self {
    match self {
      Resolution::Value(v) => Resolution::Value(v.clone()),
      Resolution::Values(v) => Resolution::Values(v.clone()),
      Resolution::Absent => Resolution::Absent,
    }
  }
}

impl<T: ?Sized> Resolution<T> {
  /// The single value, if this is one.
  pub fn value(self) -> Option<Arc<T>> {
    match self {
      Resolution::Value(v) => Some(v),
      Resolution::Values(_) | Resolution::Absent => None,
    }
  }

  /// All values; a single value becomes a one-element vector.
  pub fn values(self) -> Vec<Arc<T>> {
    match self {
      Resolution::Value(v) => vec![v],
      Resolution::Values(v) => v,
      Resolution::Absent => Vec::new(),
    }
  }

  pub fn is_absent(&self) -> bool {
    matches!(self, Resolution::Absent)
  }
}

#[derive(Clone)]
enum Slot {
  Single(Arc<Binding>),
  Multi(Vec<Arc<Binding>>),
}

#[derive(Default)]
struct Inner {
  providers: DashMap<TokenId, Slot>,
  values: DashMap<TokenId, Resolved>,
  parent: Option<Container>,
}

/// The dependency injection container.
///
/// Holds the providers registered for tokens and the values they produced.
/// Values are produced lazily, on the first resolution of a token, and that
/// first result is kept for the lifetime of the container. `Container` is a
/// cheap handle: clones share the same tables.
///
/// [`fork`](Container::fork) creates a child that starts with a copy of the
/// current providers and an empty value cache.
///
/// ```
/// use fibre_di::{create_token, deps, Container};
///
/// let greeting = create_token::<String>("greeting");
/// let message = create_token::<String>("message");
///
/// let container = Container::new();
/// container.provide_value(&greeting, String::from("Hello"));
/// container.provide_factory_with(&message, deps! { greeting: greeting }, |deps| {
///   format!("{}, World!", deps.require::<String>("greeting"))
/// });
///
/// assert_eq!(*container.get(&message).unwrap(), "Hello, World!");
/// ```
#[derive(Clone, Default)]
pub struct Container {
  inner: Arc<Inner>,
}

impl Container {
  /// Creates a new, empty root `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  /// The container this one was forked from.
  pub fn parent(&self) -> Option<&Container> {
    self.inner.parent.as_ref()
  }

  // --- Registration ---

  /// Registers a provider for its token.
  ///
  /// Providers of a multi token accumulate in registration order. For any
  /// other token the latest registration replaces the previous one. A value
  /// this container already resolved for the token is kept either way.
  pub fn provide<T: ?Sized>(&self, provider: Provider<T>) {
    self.bind(provider.into_binding());
  }

  pub fn provide_value<T>(&self, token: &Token<T>, value: impl Into<Arc<T>>)
  where
    T: ?Sized + Send + Sync + 'static,
  {
    self.provide(Provider::value(token, value));
  }

  pub fn provide_factory<T, F, R>(&self, token: &Token<T>, factory: F)
  where
    T: ?Sized + Send + Sync + 'static,
    F: Fn() -> R + Send + Sync + 'static,
    R: Into<Arc<T>>,
  {
    self.provide(Provider::factory(token, factory));
  }

  pub fn provide_factory_with<T, F, R>(&self, token: &Token<T>, deps: Deps, factory: F)
  where
    T: ?Sized + Send + Sync + 'static,
    F: Fn(&DepBag) -> R + Send + Sync + 'static,
    R: Into<Arc<T>>,
  {
    self.provide(Provider::factory_with(token, deps, factory));
  }

  pub fn provide_service<S>(&self, token: &Token<S>)
  where
    S: Default + Send + Sync + 'static,
  {
    self.provide(Provider::service(token));
  }

  pub fn provide_service_with<S>(&self, token: &Token<S>, deps: Deps)
  where
    S: FromDeps + Send + Sync + 'static,
  {
    self.provide(Provider::service_with(token, deps));
  }

  fn bind(&self, binding: Arc<Binding>) {
    let id = binding.token.id();
    let multi = binding.token.options().multi;
    tracing::trace!(
      token = binding.token.name(),
      kind = binding.kind(),
      multi,
      "registering provider"
    );

    if multi {
      let mut slot = self
        .inner
        .providers
        .entry(id)
        .or_insert_with(|| Slot::Multi(Vec::new()));
      match &mut *slot {
        Slot::Multi(bindings) => bindings.push(binding),
        Slot::Single(_) => unreachable!("token options are fixed at creation"),
      }
    } else {
      self.inner.providers.insert(id, Slot::Single(binding));
    }
  }

  // --- Resolution ---

  /// Resolves a token, producing and caching its value on first access.
  ///
  /// # Errors
  ///
  /// [`ResolveError::NotRegistered`] if the token, or a required dependency
  /// of its providers, has no provider and is not optional.
  pub fn resolve<T>(&self, token: &Token<T>) -> Result<Resolution<T>, ResolveError>
  where
    T: ?Sized + Send + Sync + 'static,
  {
    self.resolve_with(token, ResolveOptions::default())
  }

  /// Like [`resolve`](Container::resolve), with per-call options.
  pub fn resolve_with<T>(
    &self,
    token: &Token<T>,
    options: ResolveOptions,
  ) -> Result<Resolution<T>, ResolveError>
  where
    T: ?Sized + Send + Sync + 'static,
  {
    let resolution = match self.resolve_key(token.key(), options.optional)? {
      Resolved::Single(instance) => Resolution::Value(cast(token, &instance)),
      Resolved::Multi(instances) => {
        Resolution::Values(instances.iter().map(|i| cast(token, i)).collect())
      }
      Resolved::Absent => Resolution::Absent,
    };
    Ok(resolution)
  }

  /// Resolves a single token, returning `None` on any failure.
  pub fn get<T>(&self, token: &Token<T>) -> Option<Arc<T>>
  where
    T: ?Sized + Send + Sync + 'static,
  {
    self.resolve(token).ok().and_then(Resolution::value)
  }

  /// Resolves a multi token, returning an empty vector on any failure.
  pub fn get_all<T>(&self, token: &Token<T>) -> Vec<Arc<T>>
  where
    T: ?Sized + Send + Sync + 'static,
  {
    self
      .resolve(token)
      .map(Resolution::values)
      .unwrap_or_default()
  }

  /// Resolves every entry of a dependency declaration against this container.
  ///
  /// # Errors
  ///
  /// The first [`ResolveError`] raised by a required entry.
  pub fn resolve_deps(&self, deps: &Deps) -> Result<DepBag, ResolveError> {
    let mut bag = DepBag::default();
    for entry in deps.entries() {
      let resolved = self.resolve_key(&entry.token, entry.optional)?;
      bag.insert(&entry.name, resolved);
    }
    Ok(bag)
  }

  /// Whether this container has its own provider for the token.
  pub fn has_provider<T: ?Sized>(&self, token: &Token<T>) -> bool {
    self.inner.providers.contains_key(&token.id())
  }

  /// Whether this container holds a resolved value for the token.
  pub fn is_cached<T: ?Sized>(&self, token: &Token<T>) -> bool {
    self.inner.values.contains_key(&token.id())
  }

  fn resolve_key(&self, key: &TokenKey, optional: bool) -> Result<Resolved, ResolveError> {
    let options = key.options();

    // Whatever the parent returns is final, error included.
    if options.scope == Scope::Global {
      if let Some(parent) = &self.inner.parent {
        tracing::debug!(token = key.name(), "delegating global token to parent container");
        return parent.resolve_key(key, optional);
      }
    }

    let id = key.id();
    let cached = self.inner.values.get(&id).map(|entry| entry.value().clone());
    if let Some(resolved) = cached {
      tracing::trace!(token = key.name(), "resolved from cache");
      return Ok(resolved);
    }

    // Cloned out so no map guard is held while producers run.
    let slot = self.inner.providers.get(&id).map(|entry| entry.value().clone());
    let resolved = match slot {
      None if options.optional || optional => {
        tracing::debug!(token = key.name(), "optional token has no provider");
        return Ok(if options.multi {
          Resolved::Multi(Vec::<Instance>::new().into())
        } else {
          Resolved::Absent
        });
      }
      None => return Err(ResolveError::not_registered(key.name())),
      Some(Slot::Multi(bindings)) => {
        let instances = bindings
          .iter()
          .map(|binding| self.produce(binding))
          .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(token = key.name(), count = instances.len(), "produced multi token");
        Resolved::Multi(instances.into())
      }
      Some(Slot::Single(binding)) => {
        let instance = self.produce(&binding)?;
        tracing::debug!(token = key.name(), kind = binding.kind(), "produced token");
        Resolved::Single(instance)
      }
    };

    // A value stored meanwhile by a reentrant or concurrent resolution wins.
    let stored = self.inner.values.entry(id).or_insert(resolved).value().clone();
    Ok(stored)
  }

  fn produce(&self, binding: &Binding) -> Result<Instance, ResolveError> {
    match &binding.source {
      Source::Value(instance) => Ok(instance.clone()),
      Source::Factory(recipe) | Source::Service { recipe, .. } => self.run(recipe),
    }
  }

  fn run(&self, recipe: &Recipe) -> Result<Instance, ResolveError> {
    match recipe {
      Recipe::Bare(produce) => Ok(produce()),
      Recipe::WithDeps { deps, produce } => {
        let bag = self.resolve_deps(deps)?;
        Ok(produce(&bag))
      }
    }
  }

  // --- Forking ---

  /// Creates a child container.
  ///
  /// The child starts with the providers registered here at this moment and
  /// an empty value cache. Later registrations on either side stay on that
  /// side. Global-scope tokens resolved on the child are delegated back to
  /// this container, so they are produced once for the whole hierarchy.
  pub fn fork(&self) -> Container {
    let child = Inner {
      providers: DashMap::with_capacity(self.inner.providers.len()),
      values: DashMap::new(),
      parent: Some(self.clone()),
    };

    let mut copied = 0;
    for entry in self.inner.providers.iter() {
      copied += match entry.value() {
        Slot::Single(_) => 1,
        Slot::Multi(bindings) => bindings.len(),
      };
      child.providers.insert(*entry.key(), entry.value().clone());
    }
    tracing::debug!(bindings = copied, "forked container");

    Container {
      inner: Arc::new(child),
    }
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("providers", &self.inner.providers.len())
      .field("values", &self.inner.values.len())
      .field("forked", &self.inner.parent.is_some())
      .finish()
  }
}

// Providers are bound to the token they were built for, so the erased
// instance always holds an `Arc<T>` of that token's `T`.
fn cast<T: ?Sized + Send + Sync + 'static>(token: &Token<T>, instance: &Instance) -> Arc<T> {
  match downcast::<T>(instance) {
    Some(value) => value,
    None => unreachable!("value stored for token '{}' has the wrong type", token),
  }
}
