//! Binary entry point: settings, logging, then the pipeline until stopped

use super::cli::{Args, RawSettings};
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::shutdown::{ShutdownCoordinator, StopReason};
use crate::core::version::long_version;
use crate::pipeline::{
    LogSink, Pipeline, PipelineConfig, PipelineError, PipelineResult, ShutdownReport, WorkItem,
};
use crate::source::{ProcessTable, VecSource};
use clap::Parser;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

type BoxedSource = Box<dyn Iterator<Item = WorkItem> + Send>;

/// Run the application and return the process exit status
pub fn startup() -> i32 {
    let args = Args::parse();
    let use_color = args.use_color(std::io::stderr().is_terminal());

    let cli_settings = RawSettings::from(&args);
    let file_settings = RawSettings::load(args.config_file.as_deref());
    let settings = match &file_settings {
        Ok(file) => file.clone().overlay(cli_settings),
        Err(_) => cli_settings,
    };

    if let Err(e) = init_logging(
        settings.log_level.as_deref(),
        settings.log_format.as_deref(),
        settings.log_file().and_then(|path| path.to_str()),
        use_color,
    ) {
        eprintln!("Error initializing logging: {}", e);
        return 1;
    }

    if let Err(e) = file_settings {
        log_error_with_context(&e, "Configuration");
        return 1;
    }

    log::info!("proctally {} starting", long_version());
    log::debug!("Settings: {:?}", settings);

    let config = match settings.validate() {
        Ok(config) => config,
        Err(e) => {
            log_error_with_context(&e, "Configuration");
            return 1;
        }
    };

    let source = match open_source(&config) {
        Ok(source) => source,
        Err(e) => {
            log_error_with_context(&e, "Opening process table");
            return 1;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("FATAL: Cannot start runtime: {}", e);
            return 1;
        }
    };

    match runtime.block_on(run(config, source, settings.run_for())) {
        Ok(report) => {
            log::info!(
                "Pipeline stopped: produced {}, consumed {}, still buffered {}",
                report.produced,
                report.consumed,
                report.still_buffered
            );
            0
        }
        Err(e) => {
            log_error_with_context(&e, "Pipeline");
            1
        }
    }
}

/// The process table, or nothing when no producer will read it
fn open_source(config: &PipelineConfig) -> Result<BoxedSource, crate::source::SourceError> {
    if config.producer_enabled {
        Ok(Box::new(ProcessTable::open()?))
    } else {
        Ok(Box::new(VecSource::default()))
    }
}

async fn run(
    config: PipelineConfig,
    source: BoxedSource,
    run_for: Option<Duration>,
) -> PipelineResult<ShutdownReport> {
    let (coordinator, mut shutdown_rx) = ShutdownCoordinator::new();
    coordinator.install_signal_handlers();

    let pipeline = Pipeline::start(config, source, Arc::new(LogSink))?;

    match ShutdownCoordinator::wait_for_stop(&mut shutdown_rx, run_for).await {
        StopReason::Signal => log::info!("Stop signal received, shutting down"),
        StopReason::Deadline => log::info!("Run time elapsed, shutting down"),
    }

    tokio::task::spawn_blocking(move || pipeline.stop())
        .await
        .map_err(|_| PipelineError::WorkerPanicked {
            worker: "shutdown".to_string(),
        })?
}
