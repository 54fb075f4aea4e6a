use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hwdash_core::{HttpTransport, PollConfig, PollScheduler};
use log::info;

use crate::dashboard::DashboardState;

pub fn run(host: &str, interval_ms: u64, log_file: Option<&Path>) {
    if let Err(e) = crate::logging::init_monitor(log_file) {
        eprintln!("Cannot open log file: {e}");
        std::process::exit(1);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };
    // The scheduler and watcher spawn onto this runtime; the TUI loop itself
    // stays on the main thread.
    let _guard = runtime.enter();

    let endpoint = super::endpoint_for(host);
    let config = PollConfig {
        interval: Duration::from_millis(interval_ms),
    };
    info!("monitoring {endpoint}");

    let state = Arc::new(Mutex::new(DashboardState::default()));
    let mut scheduler = PollScheduler::new(
        HttpTransport::new(endpoint.clone()),
        Arc::clone(&state),
        config,
    );
    scheduler.start();
    let watcher = crate::connectivity::spawn(scheduler.events());

    let mut app = crate::tui::app::App::new(
        state,
        scheduler.stats(),
        scheduler.events(),
        endpoint,
        config.interval,
    );
    let result = app.run();

    watcher.abort();
    scheduler.stop();

    if let Err(e) = result {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}
