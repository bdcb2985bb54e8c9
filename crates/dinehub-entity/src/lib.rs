//! # dinehub-entity
//!
//! Domain models for the DineHub admin client. Every struct in this crate
//! mirrors a JSON record exchanged with the backend or a client-side value
//! object. All entities derive `Debug`, `Clone`, `Serialize`, and
//! `Deserialize`.

pub mod branch;
pub mod notification;
pub mod user;
