// Adapters layer: concrete implementations of the domain ports (HTTP
// transport, query-string state, university form handoff).

pub mod http;
pub mod state;
pub mod university;
