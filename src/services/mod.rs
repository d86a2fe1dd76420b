// Service module exports
// Persistence, timeline engine, validation and mutation services

pub mod context;
pub mod database;
pub mod live_query;
pub mod mutation;
pub mod notification;
pub mod schedule;
pub mod settings;
pub mod store;
pub mod timeline;
pub mod validation;
