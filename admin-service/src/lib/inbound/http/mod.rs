pub mod client;
pub mod cookies;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod validation;
