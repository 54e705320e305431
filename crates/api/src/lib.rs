pub mod handler;
pub mod middleware;
