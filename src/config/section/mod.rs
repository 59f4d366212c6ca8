//! Configuration section definitions.
//!
//! Each module corresponds to a section in `hotrun.toml`:
//!
//! | Module  | TOML Section | Purpose                                   |
//! |---------|--------------|-------------------------------------------|
//! | `build` | `[build]`    | Build command                             |
//! | `run`   | `[run]`      | Run command, artifact name, kill timeout  |
//! | `watch` | `[watch]`    | Extensions, quiet period, initial build   |

mod build;
mod run;
mod watch;

pub use build::BuildConfig;
pub use run::RunConfig;
pub use watch::WatchConfig;
