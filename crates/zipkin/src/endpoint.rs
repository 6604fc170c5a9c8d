use std::net::Ipv4Addr;

use crossstitch_spanparser::Endpoint;

/// Render an endpoint as `service@a.b.c.d:port`.
///
/// Address and port are reinterpreted as unsigned. The service name is
/// passed through verbatim, even when empty.
pub fn resolve_endpoint(endpoint: Option<&Endpoint>) -> Option<String> {
    endpoint.map(|ep| {
        format!(
            "{}@{}:{}",
            ep.service_name,
            Ipv4Addr::from(ep.ipv4 as u32),
            ep.port as u16
        )
    })
}

/// The service name of an endpoint, if there is one.
pub fn resolve_service(endpoint: Option<&Endpoint>) -> Option<&str> {
    endpoint.map(|ep| ep.service_name.as_str())
}
