use hwdash_core::render::error_message;
use hwdash_core::{FetchError, HttpTransport, MetricsSnapshot, SnapshotSource, render};
use log::info;

use crate::dashboard::DashboardState;

pub fn run(host: &str, json: bool) {
    crate::logging::init_fetch();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    let transport = HttpTransport::new(super::endpoint_for(host));
    info!("fetching {}", transport.endpoint());

    let result = if json {
        runtime.block_on(print_json(&transport))
    } else {
        runtime.block_on(print_text(&transport))
    };

    if let Err(message) = result {
        eprintln!("{message}");
        std::process::exit(1);
    }
}

async fn print_json(transport: &HttpTransport) -> Result<(), String> {
    let snapshot = transport.fetch().await.map_err(|e| error_message(&e))?;
    let out = serde_json::to_string_pretty(&snapshot).map_err(|e| format!("Error: {e}"))?;
    println!("{out}");
    Ok(())
}

async fn print_text(transport: &HttpTransport) -> Result<(), String> {
    print!("{}", text_report(transport.fetch().await)?);
    Ok(())
}

/// Rendered regions for a good fetch, the banner message for a failed one.
/// Failures are reported once, by the caller, rather than also logged.
fn text_report(result: Result<MetricsSnapshot, FetchError>) -> Result<String, String> {
    let snapshot = result.map_err(|e| error_message(&e))?;
    let mut state = DashboardState::default();
    render(&mut state, &snapshot);
    Ok(state.to_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn good_fetch_renders_every_region() {
        let snapshot = MetricsSnapshot::from_json(
            br#"{"cpu": {"usage": 7}, "network": {"hostname": "rig", "ip": "10.0.0.5"}}"#,
        )
        .unwrap();
        let text = text_report(Ok(snapshot)).unwrap();
        assert!(text.starts_with("rig 10.0.0.5:5000 [connected]\n"), "{text}");
        assert!(text.contains("CPU Usage 7%\n"));
    }

    #[test]
    fn failed_fetch_yields_only_the_banner_message() {
        let err = text_report(Err(FetchError::Unreachable {
            host: "rig".into(),
            port: 5000,
        }))
        .unwrap_err();
        assert_eq!(
            err,
            "Cannot connect to rig:5000 - check that the server is running"
        );
    }
}
