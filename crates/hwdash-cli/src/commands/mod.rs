pub mod fetch;
pub mod monitor;

use hwdash_core::MetricsEndpoint;

/// The metrics endpoint for a `--host` value, with surrounding whitespace
/// and any `http://` prefix or trailing slash the user pasted removed.
pub fn endpoint_for(host: &str) -> MetricsEndpoint {
    let host = host.trim();
    let host = host
        .strip_prefix("http://")
        .unwrap_or(host)
        .trim_end_matches('/');
    MetricsEndpoint::for_host(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_host_is_used_as_is() {
        assert_eq!(
            endpoint_for("192.168.0.43").url(),
            "http://192.168.0.43:5000/api/metrics"
        );
    }

    #[test]
    fn pasted_url_prefix_is_dropped() {
        assert_eq!(endpoint_for(" http://rig/ ").host, "rig");
    }
}
