// Service modules (web service functionality)
pub mod database;
pub mod http_server;
pub mod notifier;
pub mod process;
pub mod service_config;
pub mod service_state;

// App state (configuration, paths)
pub mod state;

// Re-exports for consumers
pub use database::{Account, Database, Document, DocumentSummary};
pub use notifier::{LogNotifier, Notifier, NotifyError, WebhookNotifier};
pub use process::{spawn_service, start_service, ShutdownHandle};
pub use service_config::Config as ServiceConfig;
pub use service_state::State as ServiceState;
pub use state::{AppConfig, AppState, StateError};
