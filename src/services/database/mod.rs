// Database service module
// SQLite connection and schema for schedules and contexts

mod connection;
pub(crate) mod rows;
mod schema;

pub use connection::Database;
