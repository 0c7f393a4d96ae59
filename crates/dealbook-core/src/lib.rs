//! Validated users and deals, a uniqueness registry, and a repository over
//! in-memory lists.
//!
//! This crate has no configuration or CLI dependencies. Callers create one
//! [`UniquenessRegistry`] and one [`EntityStore`] per entity type and pass
//! them by reference wherever they are needed.

pub mod connection;
pub mod deal;
pub mod entity;
pub mod error;
pub mod registry;
pub mod repository;
pub mod store;
pub mod user;

pub use connection::{ConnectionGuard, ConnectionProvider, MockConnection};
pub use deal::{Deal, DealType, NewDeal};
pub use entity::{Entity, Patch, Record};
pub use error::{ConnectionError, Error, Result};
pub use registry::UniquenessRegistry;
pub use repository::{BatchReport, Rejection, Repository};
pub use store::EntityStore;
pub use user::{NewUser, User};
