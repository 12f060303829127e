#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "Core business logic for the taskboard service: account registration and"]
#![doc = "login, stateless JWT session tokens, the bearer-token guard for task"]
#![doc = "routes, per-user task CRUD with ownership enforcement, and the uniform"]
#![doc = "error boundary. The binary (`main.rs`) wires these into an actix-web app."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
