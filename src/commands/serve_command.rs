//! HTTP server command

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::config::SlicerConfig;
use crate::errors::{SliceError, SliceResult};
use crate::server;
use crate::slicer::init_encode_pool;

/// Command for running the slice service and editor assets
pub struct ServeCommand {
    /// Configuration with command-line overrides applied
    config: SlicerConfig,
}

impl ServeCommand {
    /// Create a new serve command
    ///
    /// `--host`, `--port` and `--static-dir` take precedence over the file.
    pub fn new(args: &ArgMatches, config: &SlicerConfig) -> SliceResult<Self> {
        let mut config = config.clone();

        if let Some(host) = args.get_one::<String>("host") {
            config.server.host = host.clone();
        }
        if let Some(port) = args.get_one::<String>("port") {
            config.server.port = port.parse::<u16>()
                .map_err(|_| SliceError::GenericError(format!("Invalid port: {}", port)))?;
        }
        if let Some(dir) = args.get_one::<String>("static-dir") {
            config.server.static_dir = dir.into();
        }

        Ok(ServeCommand { config })
    }
}

impl Command for ServeCommand {
    fn execute(&self) -> SliceResult<()> {
        init_encode_pool(self.config.slicing.encode_threads)?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.server.worker_threads)
            .max_blocking_threads(self.config.server.blocking_threads)
            .enable_all()
            .build()?;

        info!("Starting server (tokio_workers={}, tokio_blocking_threads={})",
              self.config.server.worker_threads, self.config.server.blocking_threads);
        runtime.block_on(server::run(self.config.clone()))
    }
}
