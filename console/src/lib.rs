// Report console: role-aware selection state, report retrieval and export

pub mod catalog;
pub mod client;
pub mod controller;
pub mod errors;
pub mod messages;
pub mod render;
pub mod users;

pub use catalog::ReportCatalog;
pub use client::ReportClient;
pub use controller::{ConsoleController, ConsoleState, Controls, GenerationTicket, ReportResult};
pub use errors::{ClientError, ConsoleError};
pub use users::UserDirectory;
