//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod user;
mod workday;

pub use user::{AuthProvider, NewUser, PUBLIC_ATTRIBUTES, ProfileField, UniqueAttribute, UserId};
pub use workday::{BusynessFilter, WorkDay, WorkdayEntry};
