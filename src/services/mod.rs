pub mod apic;
pub mod phantom;

/// Accepts either a bare host (https is assumed) or a full base URL.
pub fn base_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}
