use fibre_di::{create_token, create_token_with, deps, Container, TokenOptions};

// A multi token collects every registered provider, in registration order.
fn main() {
  let prefix = create_token::<String>("prefix");
  let plugins = create_token_with::<String>("plugins", TokenOptions::new().multi());
  let container = Container::new();

  container.provide_value(&prefix, String::from("plugin"));
  container.provide_value(&plugins, String::from("static plugin"));
  container.provide_factory(&plugins, || String::from("lazy plugin"));
  container.provide_factory_with(&plugins, deps! { prefix: prefix }, |deps| {
    format!("{} with deps", deps.require::<String>("prefix"))
  });

  let loaded = container.get_all(&plugins);
  for (i, plugin) in loaded.iter().enumerate() {
    println!("{}: {}", i, plugin);
  }
  assert_eq!(loaded.len(), 3);

  // The list is fixed once resolved.
  container.provide_value(&plugins, String::from("too late"));
  assert_eq!(container.get_all(&plugins).len(), 3);
  println!("Late registrations do not change an already resolved list.");
}
