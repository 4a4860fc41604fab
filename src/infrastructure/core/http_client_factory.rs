use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;

/// Browser-like agent; the chart endpoint rejects anonymous clients.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) returncast";

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a new HTTP client. `max_retries == 0` means a single attempt
    /// per call.
    pub fn create_client(timeout: Duration, max_retries: u32) -> ClientWithMiddleware {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(5)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        let builder = ClientBuilder::new(client);
        if max_retries == 0 {
            return builder.build();
        }

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);
        builder
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }
}

/// Helper function to build a URL with query parameters.
/// Since reqwest-middleware 0.5.0 doesn't expose the .query() method,
/// we build the query string manually and append it to the URL.
pub fn build_url_with_query<K, V>(base_url: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    if params.is_empty() {
        return base_url.to_string();
    }

    let query_string: String = params
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k.as_ref()), encode_component(v.as_ref())))
        .collect::<Vec<_>>()
        .join("&");

    if base_url.contains('?') {
        format!("{}&{}", base_url, query_string)
    } else {
        format!("{}?{}", base_url, query_string)
    }
}

/// Percent-encodes a path segment or query value. Tickers such as `^GSPC`
/// and `CL=F` need it.
pub fn encode_component(s: &str) -> String {
    let mut encoded = String::new();
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_ticker_symbols() {
        assert_eq!(encode_component("^GSPC"), "%5EGSPC");
        assert_eq!(encode_component("CL=F"), "CL%3DF");
        assert_eq!(encode_component("AAPL"), "AAPL");
    }

    #[test]
    fn test_build_url_with_query() {
        let url = build_url_with_query(
            "https://example.com/chart/AAPL",
            &[("range", "10d"), ("interval", "1d")],
        );
        assert_eq!(url, "https://example.com/chart/AAPL?range=10d&interval=1d");

        let url = build_url_with_query("https://example.com/x?a=1", &[("b", "2")]);
        assert_eq!(url, "https://example.com/x?a=1&b=2");
    }
}
