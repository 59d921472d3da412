//! The serving shell: HTTP API, deduplicating sync, and the interval
//! scheduler that drives extract-then-sync cycles independent of HTTP
//! traffic.

pub mod routes;
pub mod scheduler;
pub mod state;
pub mod sync;

pub use routes::router;
pub use scheduler::spawn_sync_timer;
pub use state::AppState;
pub use sync::{run_sync_cycle, sync_records};
