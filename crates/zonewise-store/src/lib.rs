pub mod database;
pub mod error;
pub mod messages;
pub mod row_helpers;
pub mod schema;
pub mod sessions;
pub mod zoning;

pub use database::Database;
pub use error::StoreError;
pub use messages::{LoggedMessage, MessageRepo};
pub use sessions::{SessionRepo, SessionRow};
pub use zoning::ZoningRepo;
