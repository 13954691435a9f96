//! # Fibre DI
//!
//! A token-based dependency injection container with hierarchical forking.
//!
//! Values are registered against typed [`Token`]s rather than against Rust
//! types, so the same type can be served under many tokens and a token can
//! stand for a trait object. Containers produce values lazily, keep the first
//! result, and can be forked into children that inherit the current
//! providers while keeping their own values.
//!
//! ## Core Concepts
//!
//! - **Token**: a unique, typed identifier created by [`create_token`]. Its
//!   [`TokenOptions`] mark it `multi` (providers accumulate), `optional`
//!   (resolving without a provider is not an error) or [`Scope::Global`]
//!   (shared by every fork).
//! - **Provider**: a value, a factory, or a service type, optionally with
//!   named dependencies ([`Deps`]) that are resolved into a [`DepBag`].
//! - **Container**: registers providers, resolves tokens and forks children.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_di::{create_token, create_token_with, resolve, Container, TokenOptions};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let config = create_token_with::<String>("config", TokenOptions::global());
//! let request_id = create_token::<usize>("request_id");
//!
//! let root = Container::new();
//! root.provide_factory(&config, || String::from("db=postgres"));
//!
//! let counter = Arc::new(AtomicUsize::new(0));
//! let ids = counter.clone();
//! root.provide_factory(&request_id, move || ids.fetch_add(1, Ordering::SeqCst));
//!
//! let a = root.fork();
//! let b = root.fork();
//!
//! // Global tokens are produced once, at the root.
//! assert!(Arc::ptr_eq(&resolve!(a, config), &resolve!(b, config)));
//! // Local tokens are produced once per container.
//! assert_ne!(resolve!(a, request_id), resolve!(b, request_id));
//! ```

mod container;
mod deps;
mod error;
mod macros;
mod provider;
mod token;

pub use container::{Container, Resolution, ResolveOptions};
pub use deps::{DepBag, Deps, FromDeps};
pub use error::{ParseScopeError, ResolveError};
pub use provider::Provider;
pub use token::{create_token, create_token_with, Scope, Token, TokenId, TokenOptions};
