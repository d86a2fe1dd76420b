// Chronos planner library
// Day timeline layout, validation and optimistic mutations over a SQLite store

pub mod models;
pub mod services;
pub mod utils;
