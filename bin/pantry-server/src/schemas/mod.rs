//! Request / response bodies of the HTTP surface.
//!
//! Field names are camelCase to match the browser client.

pub mod chat;
pub mod images;
