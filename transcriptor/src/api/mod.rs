mod extractors;
mod frontend;
pub mod pages;
mod routes;
mod state;
pub mod v1;
mod web;

pub use extractors::SESSION_COOKIE;
pub use routes::create_router;
pub use state::AppState;
