//! Public macros for declaring dependencies and resolving tokens.

/// Builds a [`Deps`](crate::Deps) declaration.
///
/// Each entry is `name: token`, or `name: optional(token)` for a dependency
/// that resolves to an absent value when the token has no provider. The
/// entry name is the identifier's spelling.
///
/// # Examples
///
/// ```
/// use fibre_di::{create_token, deps, Container};
///
/// let host = create_token::<String>("host");
/// let port = create_token::<u16>("port");
///
/// let container = Container::new();
/// container.provide_value(&host, String::from("localhost"));
///
/// let bag = container.resolve_deps(&deps! { host: host, port: optional(port) }).unwrap();
/// assert_eq!(*bag.require::<String>("host"), "localhost");
/// assert!(bag.is_absent("port"));
/// ```
#[macro_export]
macro_rules! deps {
    (@acc $deps:expr;) => {
        $deps
    };

    (@acc $deps:expr; $name:ident : optional($token:expr) $(, $($rest:tt)*)?) => {
        $crate::deps!(@acc $deps.optional(stringify!($name), &$token); $($($rest)*)?)
    };

    (@acc $deps:expr; $name:ident : $token:expr $(, $($rest:tt)*)?) => {
        $crate::deps!(@acc $deps.with(stringify!($name), &$token); $($($rest)*)?)
    };

    ($($body:tt)*) => {
        $crate::deps!(@acc $crate::Deps::new(); $($body)*)
    };
}

/// Resolves a token from a container, panicking if it cannot be resolved.
///
/// `resolve!(container, token)` returns the `Arc<T>` of a single token.
/// `resolve!(container, token, all)` returns the `Vec<Arc<T>>` of a multi
/// token.
///
/// # Panics
///
/// Panics with the [`ResolveError`](crate::ResolveError) message when the
/// token, or one of its required dependencies, is not registered, and when
/// a single token resolves to nothing. For a non-panicking version, use
/// [`Container::resolve`](crate::Container::resolve).
///
/// # Examples
///
/// ```
/// use fibre_di::{create_token_with, resolve, Container, TokenOptions};
///
/// let hooks = create_token_with::<&'static str>("hooks", TokenOptions::new().multi());
/// let container = Container::new();
/// container.provide_value(&hooks, "audit");
/// container.provide_factory(&hooks, || "metrics");
///
/// let names: Vec<_> = resolve!(container, hooks, all).iter().map(|h| **h).collect();
/// assert_eq!(names, ["audit", "metrics"]);
/// ```
#[macro_export]
macro_rules! resolve {
    // Arm for resolving a multi token: resolve!(container, token, all)
    ($container:expr, $token:expr, all) => {
        match $container.resolve(&$token) {
            Ok(resolution) => resolution.values(),
            Err(err) => panic!("Failed to resolve required token: {}", err),
        }
    };

    ($container:expr, $token:expr) => {
        match $container.resolve(&$token) {
            Ok(resolution) => resolution.value().unwrap_or_else(|| {
                panic!("Failed to resolve required token: {} resolved to no value", $token)
            }),
            Err(err) => panic!("Failed to resolve required token: {}", err),
        }
    };
}
