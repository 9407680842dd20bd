//! Infrastructure layer: user directory storage.

pub mod user_store;

pub use user_store::{
    InMemoryUserStore, NewUser, PostgresUserStore, StoreError, UserChanges, UserRecord, UserStore,
};
