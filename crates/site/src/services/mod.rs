//! Business-logic services sitting between routes and the database.

pub mod auth;
pub mod search;
pub mod visits;
