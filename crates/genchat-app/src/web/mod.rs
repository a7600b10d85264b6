pub mod inflight;
pub mod protocol;
pub mod routes;
pub mod server;
