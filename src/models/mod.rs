// Module exports for models

pub mod context;
pub mod schedule;
pub mod settings;
