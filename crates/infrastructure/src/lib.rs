//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod database;
mod field_values;
mod in_memory_user_store;
mod postgres_user_repository;
mod postgres_workday_repository;

pub use database::{DatabaseConfig, connect_and_migrate};
pub use in_memory_user_store::InMemoryUserStore;
pub use postgres_user_repository::PostgresUserRepository;
pub use postgres_workday_repository::PostgresWorkdayRepository;
