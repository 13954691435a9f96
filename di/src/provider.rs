//! Provider descriptors: the three ways a token can be given a value.

use crate::deps::{DepBag, Deps, FromDeps};
use crate::token::{Token, TokenKey};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

// A type-erased resolved value. The concrete type is always `Arc<T>` for the
// token's `T`, which keeps unsized values (`dyn Trait`, `str`) storable.
pub(crate) type Instance = Arc<dyn Any + Send + Sync>;

pub(crate) fn instance<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Instance {
  Arc::new(value)
}

pub(crate) fn downcast<T: ?Sized + Send + Sync + 'static>(instance: &Instance) -> Option<Arc<T>> {
  instance.downcast_ref::<Arc<T>>().cloned()
}

/// The untyped outcome of resolving one token in one container.
#[derive(Clone)]
pub(crate) enum Resolved {
  Single(Instance),
  Multi(Arc<[Instance]>),
  /// An optional single token without a provider. Never cached.
  Absent,
}

pub(crate) enum Recipe {
  Bare(Box<dyn Fn() -> Instance + Send + Sync>),
  WithDeps {
    deps: Deps,
    produce: Box<dyn Fn(&DepBag) -> Instance + Send + Sync>,
  },
}

pub(crate) enum Source {
  Value(Instance),
  Factory(Recipe),
  Service {
    type_name: &'static str,
    recipe: Recipe,
  },
}

/// A provider bound to its token. Shared between a container and its forks.
pub(crate) struct Binding {
  pub(crate) token: TokenKey,
  pub(crate) source: Source,
}

impl Binding {
  pub(crate) fn kind(&self) -> &'static str {
    match self.source {
      Source::Value(_) => "value",
      Source::Factory(_) => "factory",
      Source::Service { .. } => "service",
    }
  }
}

/// A producer of values for a [`Token<T>`], ready to be handed to
/// [`Container::provide`](crate::Container::provide).
///
/// Factories may return either `T` or `Arc<T>`; the latter is how trait
/// object tokens are served:
///
/// ```
/// use fibre_di::{create_token, Container, Provider};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///   fn greet(&self) -> String;
/// }
///
/// struct English;
/// impl Greeter for English {
///   fn greet(&self) -> String {
///     "Hello!".to_string()
///   }
/// }
///
/// let greeter = create_token::<dyn Greeter>("greeter");
/// let container = Container::new();
/// container.provide(Provider::factory(&greeter, || Arc::new(English) as Arc<dyn Greeter>));
///
/// assert_eq!(container.get(&greeter).unwrap().greet(), "Hello!");
/// ```
pub struct Provider<T: ?Sized> {
  binding: Arc<Binding>,
  _marker: PhantomData<fn() -> T>,
}

impl<T: ?Sized + Send + Sync + 'static> Provider<T> {
  fn new(token: &Token<T>, source: Source) -> Self {
    Provider {
      binding: Arc::new(Binding {
        token: token.key().clone(),
        source,
      }),
      _marker: PhantomData,
    }
  }

  /// A precomputed value. Every resolution returns the same `Arc`.
  pub fn value(token: &Token<T>, value: impl Into<Arc<T>>) -> Self {
    Self::new(token, Source::Value(instance(value.into())))
  }

  /// A factory called without arguments the first time the token is resolved.
  pub fn factory<F, R>(token: &Token<T>, factory: F) -> Self
  where
    F: Fn() -> R + Send + Sync + 'static,
    R: Into<Arc<T>>,
  {
    let produce = move || instance(factory().into());
    Self::new(token, Source::Factory(Recipe::Bare(Box::new(produce))))
  }

  /// A factory called with its resolved dependencies.
  pub fn factory_with<F, R>(token: &Token<T>, deps: Deps, factory: F) -> Self
  where
    F: Fn(&DepBag) -> R + Send + Sync + 'static,
    R: Into<Arc<T>>,
  {
    let produce = move |bag: &DepBag| instance(factory(bag).into());
    Self::new(
      token,
      Source::Factory(Recipe::WithDeps {
        deps,
        produce: Box::new(produce),
      }),
    )
  }
}

impl<S: Send + Sync + 'static> Provider<S> {
  /// A service type built with its zero-argument constructor, [`Default::default`].
  pub fn service(token: &Token<S>) -> Self
  where
    S: Default,
  {
    let produce = || instance(Arc::new(S::default()));
    Self::new(
      token,
      Source::Service {
        type_name: std::any::type_name::<S>(),
        recipe: Recipe::Bare(Box::new(produce)),
      },
    )
  }

  /// A service type built from its resolved dependencies through [`FromDeps`].
  pub fn service_with(token: &Token<S>, deps: Deps) -> Self
  where
    S: FromDeps,
  {
    let produce = |bag: &DepBag| instance(Arc::new(S::from_deps(bag)));
    Self::new(
      token,
      Source::Service {
        type_name: std::any::type_name::<S>(),
        recipe: Recipe::WithDeps {
          deps,
          produce: Box::new(produce),
        },
      },
    )
  }
}

impl<T: ?Sized> Provider<T> {
  /// Which of the three provider shapes this is: `value`, `factory` or `service`.
  pub fn kind(&self) -> &'static str {
    self.binding.kind()
  }

  pub(crate) fn into_binding(self) -> Arc<Binding> {
    self.binding
  }
}

impl<T: ?Sized> Clone for Provider<T> {
  fn clone(&self) -> Self {
    Provider {
      binding: self.binding.clone(),
      _marker: PhantomData,
    }
  }
}

impl<T: ?Sized> fmt::Debug for Provider<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut s = f.debug_struct("Provider");
    s.field("token", &self.binding.token.name());
    match &self.binding.source {
      Source::Value(_) => s.field("kind", &"value"),
      Source::Factory(recipe) => s.field("kind", &"factory").field("deps", recipe.deps()),
      Source::Service { type_name, recipe } => s
        .field("kind", &"service")
        .field("type", type_name)
        .field("deps", recipe.deps()),
    };
    s.finish()
  }
}

impl Recipe {
  fn deps(&self) -> &dyn fmt::Debug {
    match self {
      Recipe::Bare(_) => &"none",
      Recipe::WithDeps { deps, .. } => deps,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::token::create_token;

  #[test]
  fn erased_instances_keep_their_type() {
    let text: Arc<str> = Arc::from("fibre");
    let erased = instance(text.clone());
    let back = downcast::<str>(&erased).unwrap();
    assert!(Arc::ptr_eq(&text, &back));
    assert!(downcast::<String>(&erased).is_none());
  }

  #[test]
  fn providers_report_their_shape() {
    #[derive(Default)]
    struct Plain;
    let number = create_token::<u32>("number");
    let plain = create_token::<Plain>("plain");
    assert_eq!(Provider::value(&number, 1u32).kind(), "value");
    assert_eq!(Provider::factory(&number, || 2u32).kind(), "factory");
    assert_eq!(Provider::service(&plain).kind(), "service");
    let debug = format!("{:?}", Provider::service(&plain));
    assert!(debug.contains("Plain"), "{debug}");
  }
}
