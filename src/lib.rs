//! Leave and task administration: an HTTP service over MySQL and the
//! dashboard state layer that talks to it. Both enforce the same leave rules
//! from [`policy`].

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod docs;
pub mod error;
pub mod model;
pub mod models;
pub mod policy;
pub mod routes;
pub mod utils;
