use fibre_di::{create_token, create_token_with, Container, TokenOptions};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing_subscriber::EnvFilter;

// A connection pool shared by the whole application.
struct Pool {
  id: usize,
}

// A per-request context, created once in every forked container.
struct RequestContext {
  id: usize,
}

static POOLS: AtomicUsize = AtomicUsize::new(0);
static REQUESTS: AtomicUsize = AtomicUsize::new(0);

fn main() {
  // Run with RUST_LOG=fibre_di=trace to see the container at work.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let pool = create_token_with::<Pool>("pool", TokenOptions::global());
  let request = create_token::<RequestContext>("request");

  let app = Container::new();
  app.provide_factory(&pool, || {
    println!("Creating the GLOBAL pool...");
    Pool {
      id: POOLS.fetch_add(1, Ordering::SeqCst),
    }
  });
  app.provide_factory(&request, || RequestContext {
    id: REQUESTS.fetch_add(1, Ordering::SeqCst),
  });

  // Each request gets its own fork of the application container.
  let first = app.fork();
  let second = app.fork();

  let p1 = first.get(&pool).expect("pool is registered");
  let p2 = second.get(&pool).expect("pool is registered");
  let r1 = first.get(&request).expect("request is registered");
  let r2 = second.get(&request).expect("request is registered");

  println!("Pool IDs: {} and {}", p1.id, p2.id);
  println!("Request IDs: {} and {}", r1.id, r2.id);
  assert!(Arc::ptr_eq(&p1, &p2), "global values are shared by every fork");
  assert_ne!(r1.id, r2.id, "local values are produced per container");
}
