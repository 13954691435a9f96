use fibre_di::{create_token, deps, resolve, Container, DepBag, FromDeps};
use std::sync::Arc;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Arc<dyn Logger>,
}

impl FromDeps for ReportService {
  fn from_deps(deps: &DepBag) -> Self {
    ReportService {
      logger: deps.require("logger"),
    }
  }
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    // ... logic to generate report ...
    self.logger.log("Finished report generation.");
  }
}

fn main() {
  let logger = create_token::<dyn Logger>("logger");
  let reports = create_token::<ReportService>("reports");
  let container = Container::new();

  // --- Registration ---

  // The factory returns Arc<dyn Logger>, which is what the token serves.
  container.provide_factory(&logger, || Arc::new(ConsoleLogger) as Arc<dyn Logger>);

  // ReportService declares the logger as a dependency instead of creating it.
  container.provide_service_with(&reports, deps! { logger: logger });

  // --- Resolution and Usage ---
  println!("Resolving the high-level service...");
  let report_service = resolve!(container, reports);

  println!("Using the service...");
  report_service.generate_report();
}
