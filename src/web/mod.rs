//! Admin web API for the report builder (feature `ui`).

mod server;

pub use server::{router, serve, AppState};
