use fibre_di::{create_token, resolve, Container, ResolveOptions};
use std::panic;

fn main() {
  let token = create_token::<String>("unregistered");
  let container = Container::new();

  // --- Using the panicking `resolve!` macro ---
  println!("Attempting to resolve a token that was never registered...");

  // resolve! panics after the lookup fails, with no table mid-update.
  let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
    // This line will panic!
    let _value = resolve!(container, token);
  }));

  assert!(result.is_err(), "resolve! should have panicked.");
  println!("Successfully caught the expected panic from resolve!.");

  // --- Using the fallible `resolve()` method ---
  println!("\nNow, attempting to resolve using `resolve()`...");

  match container.resolve(&token) {
    Ok(_) => panic!("Should not have found the token!"),
    Err(err) => println!("Correctly received an error: {}", err),
  }

  // --- Marking the call site optional ---
  let resolution = container
    .resolve_with(&token, ResolveOptions::optional())
    .expect("optional resolution never fails for a missing provider");
  assert!(resolution.is_absent());
  println!("An optional resolution of the same token is simply absent.");
}
