use std::path::Path;
use std::process::ExitStatus;
use std::time::Instant;

use thiserror::Error;

use crate::utils::exec::{Cmd, CommandLine};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}")]
    Failed { command: String, status: ExitStatus },
}

/// Run the build command in `root` to completion.
///
/// All standard streams and the environment are inherited, so compiler
/// output appears directly in the terminal. There is no timeout.
pub(super) async fn run_build(command: &CommandLine, root: &Path) -> Result<(), BuildError> {
    let start = Instant::now();

    let status = Cmd::from_line(command)
        .cwd(root)
        .status()
        .await
        .map_err(|source| BuildError::Spawn {
            command: command.to_string(),
            source,
        })?;

    crate::debug!("build"; "`{}` finished in {:?}", command, start.elapsed());

    if status.success() {
        Ok(())
    } else {
        Err(BuildError::Failed {
            command: command.to_string(),
            status,
        })
    }
}
