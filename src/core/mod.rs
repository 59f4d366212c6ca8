//! Process-wide state shared by the signal handler and the actors.

mod state;

pub use state::{is_shutdown, register_shutdown, setup_shutdown_handler};
