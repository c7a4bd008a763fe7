//! Business logic services.
//!
//! Services contain core logic separated from HTTP handlers. The key store
//! owns all credential state and is the only place it is ever mutated.

pub mod key_store;
