use std::time::Duration;

/// Build a reqwest client with bounded connect/request timeouts. These also
/// cap how long a single provider call can hold its invocation in flight.
pub fn make_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(2))
        .timeout(Duration::from_secs(6))
        .build()
        .expect("reqwest client")
}
