//! `host:port` grammar used by `:connect` (spec §4.3): host is either a DNS
//! label or a dotted-quad, port is 1..65535.

use once_cell::sync::Lazy;
use regex::Regex;

static HOST_PORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ^
        (?P<host>
            \d{1,3}(?:\.\d{1,3}){3}
            |
            [A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?
            (?:\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*
        )
        :
        (?P<port>\d{1,5})
        $
        ",
    )
    .unwrap_or_else(|err| panic!("invalid host:port regex: {err}"))
});

/// A host shaped like four dot-separated decimal groups is a dotted-quad
/// attempt, not a DNS label, even though the DNS-label branch of `HOST_PORT`
/// would otherwise accept it too (digits are legal label characters). Such a
/// host must have every octet in 0..=255.
fn is_valid_host(host: &str) -> bool {
    let groups: Vec<&str> = host.split('.').collect();
    let looks_like_dotted_quad =
        groups.len() == 4 && groups.iter().all(|g| !g.is_empty() && g.bytes().all(|b| b.is_ascii_digit()));
    if !looks_like_dotted_quad {
        return true;
    }
    groups.iter().all(|g| g.parse::<u8>().is_ok())
}

/// Parse a `host:port` token per spec §4.3's grammar. Returns `None` if the
/// token doesn't match the shape at all, the host is a dotted-quad with an
/// out-of-range octet, or the port is outside 1..65535.
pub(crate) fn parse_host_port(token: &str) -> Option<(String, u16)> {
    let captures = HOST_PORT.captures(token)?;
    let host = captures.name("host")?.as_str().to_string();
    if !is_valid_host(&host) {
        return None;
    }
    let port: u32 = captures.name("port")?.as_str().parse().ok()?;
    if port == 0 || port > u32::from(u16::MAX) {
        return None;
    }
    Some((host, port as u16))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_dns_label_host() {
        assert_eq!(parse_host_port("broker.local:1883"), Some(("broker.local".to_string(), 1883)));
    }

    #[test]
    fn accepts_dotted_quad_host() {
        assert_eq!(parse_host_port("192.168.1.10:8883"), Some(("192.168.1.10".to_string(), 8883)));
    }

    #[test]
    fn rejects_port_zero() {
        assert_eq!(parse_host_port("broker:0"), None);
    }

    #[test]
    fn rejects_port_over_65535() {
        assert_eq!(parse_host_port("broker:70000"), None);
    }

    #[test]
    fn rejects_missing_port() {
        assert_eq!(parse_host_port("broker"), None);
    }

    #[test]
    fn rejects_out_of_range_octet() {
        assert_eq!(parse_host_port("999.999.999.999:1883"), None);
    }

    #[test]
    fn bare_username_does_not_match() {
        assert_eq!(parse_host_port("alice"), None);
    }
}
