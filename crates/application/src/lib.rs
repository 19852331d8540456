//! Application services and ports.

#![forbid(unsafe_code)]

mod user_service;

pub use user_service::{
    ProviderIdentity, UserProfile, UserRecord, UserRepository, UserService, WorkdayRepository,
};
