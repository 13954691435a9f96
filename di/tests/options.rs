//! Token metadata loaded from configuration (`serde` feature).

use fibre_di::{create_token_with, Container, Scope, TokenOptions};
use pretty_assertions::assert_eq;

#[test]
fn test_options_deserialize_with_defaults() {
  let options: TokenOptions = serde_json::from_str(r#"{ "multi": true }"#).unwrap();

  assert_eq!(options, TokenOptions::new().multi());
  assert_eq!(options.scope, Scope::Local);
}

#[test]
fn test_scope_uses_lowercase_names() {
  let options: TokenOptions =
    serde_json::from_str(r#"{ "optional": true, "scope": "global" }"#).unwrap();

  assert_eq!(options, TokenOptions::global().optional());
  assert_eq!(
    serde_json::to_string(&Scope::Global).unwrap(),
    r#""global""#
  );
  assert!(serde_json::from_str::<Scope>(r#""Global""#).is_err());
}

#[test]
fn test_configured_token_behaves_like_built_one() {
  let options: TokenOptions =
    serde_json::from_str(r#"{ "multi": true, "optional": true }"#).unwrap();
  let token = create_token_with::<String>("plugins", options);
  let container = Container::new();

  assert!(container.resolve(&token).unwrap().values().is_empty());
}
