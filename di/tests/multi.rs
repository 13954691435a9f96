use fibre_di::{
  create_token, create_token_with, deps, Container, DepBag, FromDeps, Resolution, TokenOptions,
};
use pretty_assertions::assert_eq;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// --- Test Fixtures ---

#[derive(Debug, PartialEq, Eq)]
struct Labelled {
  name: String,
}

impl Default for Labelled {
  fn default() -> Self {
    Labelled {
      name: "service".to_string(),
    }
  }
}

impl FromDeps for Labelled {
  fn from_deps(deps: &DepBag) -> Self {
    Labelled {
      name: deps.require::<String>("value").to_string(),
    }
  }
}

fn names(values: &[Arc<Labelled>]) -> Vec<&str> {
  values.iter().map(|v| v.name.as_str()).collect()
}

fn multi<T: ?Sized>(name: &str) -> fibre_di::Token<T> {
  create_token_with(name, TokenOptions::new().multi())
}

// --- Multi Provider Tests ---

#[test]
fn test_multi_values_in_registration_order() {
  let container = Container::new();
  let token = multi::<String>("token");

  container.provide_value(&token, String::from("value1"));
  container.provide_value(&token, String::from("value2"));

  let values: Vec<String> = container.get_all(&token).iter().map(|v| v.to_string()).collect();
  assert_eq!(values, vec!["value1", "value2"]);
}

#[test]
fn test_multi_factories_with_and_without_deps() {
  let container = Container::new();
  let value = create_token::<String>("valueToken");
  let token = multi::<String>("factoryToken");

  container.provide_value(&value, String::from("value1"));
  container.provide_factory_with(&token, deps! { value: value }, |deps| {
    deps.require::<String>("value").to_string()
  });
  container.provide_factory(&token, || String::from("value2"));

  let values: Vec<String> = container.get_all(&token).iter().map(|v| v.to_string()).collect();
  assert_eq!(values, vec!["value1", "value2"]);
}

#[test]
fn test_multi_services_with_and_without_deps() {
  let container = Container::new();
  let value = create_token::<String>("valueToken");
  let token = multi::<Labelled>("serviceToken");

  container.provide_value(&value, String::from("value1"));
  container.provide_service_with(&token, deps! { value: value });
  container.provide_service(&token);

  assert_eq!(names(&container.get_all(&token)), vec!["value1", "service"]);
}

#[test]
fn test_mixed_provider_shapes_keep_order() {
  let container = Container::new();
  let token = multi::<Labelled>("mixed");

  container.provide_value(
    &token,
    Labelled {
      name: "value".to_string(),
    },
  );
  container.provide_factory(&token, || Labelled {
    name: "factory".to_string(),
  });
  container.provide_service(&token);

  match container.resolve(&token).unwrap() {
    Resolution::Values(values) => assert_eq!(names(&values), vec!["value", "factory", "service"]),
    other => panic!("expected a sequence, got {:?}", other),
  }
}

#[test]
fn test_multi_resolution_is_cached_whole() {
  let container = Container::new();
  let token = multi::<usize>("counted");
  let calls = Arc::new(AtomicUsize::new(0));

  for _ in 0..3 {
    let counter = calls.clone();
    container.provide_factory(&token, move || counter.fetch_add(1, Ordering::SeqCst));
  }

  let first = container.get_all(&token);
  let second = container.get_all(&token);

  assert_eq!(calls.load(Ordering::SeqCst), 3);
  assert_eq!(first.iter().map(|v| **v).collect::<Vec<_>>(), vec![0, 1, 2]);
  assert!(first.iter().zip(&second).all(|(a, b)| Arc::ptr_eq(a, b)));
}

#[test]
fn test_multi_registration_after_resolve_is_ignored() {
  let container = Container::new();
  let token = multi::<String>("token");

  container.provide_value(&token, String::from("value1"));
  assert_eq!(container.get_all(&token).len(), 1);

  container.provide_value(&token, String::from("value2"));

  let values: Vec<String> = container.get_all(&token).iter().map(|v| v.to_string()).collect();
  assert_eq!(values, vec!["value1"]);
}

#[test]
fn test_multi_token_failing_provider_aborts_whole_sequence() {
  let container = Container::new();
  let missing = create_token::<String>("missing");
  let token = multi::<String>("plugins");

  container.provide_value(&token, String::from("ok"));
  container.provide_factory_with(&token, deps! { missing: missing }, |deps| {
    deps.require::<String>("missing").to_string()
  });

  let err = container.resolve(&token).unwrap_err();
  assert_eq!(err.to_string(), "Provider for missing is not registered");
  assert!(!container.is_cached(&token));
}
