use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Reasons an article link is refused.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    #[error("Invalid link: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("Link points to a private address: {0}")]
    PrivateIp(String),
    #[error("Link points to localhost")]
    Localhost,
}

/// Validates an article link before handing it to the system browser.
///
/// Feed content is untrusted, so links are only opened when they are
/// `http`/`https` and do not target localhost or a private/link-local
/// address.
///
/// ```
/// use shadow_reader::util::validate_link;
///
/// assert!(validate_link("https://example.com/story").is_ok());
/// assert!(validate_link("file:///etc/passwd").is_err());
/// assert!(validate_link("http://192.168.1.1/admin").is_err());
/// ```
pub fn validate_link(link: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(link)?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlValidationError::UnsupportedScheme(url.scheme().to_owned()));
    }

    let Some(host) = url.host_str() else {
        return Ok(url);
    };
    if host.eq_ignore_ascii_case("localhost") {
        return Err(UrlValidationError::Localhost);
    }

    let bare = host.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = bare.parse::<IpAddr>() {
        if ip.is_loopback() {
            return Err(UrlValidationError::Localhost);
        }
        if is_private_ip(&ip) {
            return Err(UrlValidationError::PrivateIp(ip.to_string()));
        }
    }

    Ok(url)
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_link_local() || v4.is_unspecified(),
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            v6.is_unspecified()
                || (first & 0xfe00) == 0xfc00 // unique local fc00::/7
                || (first & 0xffc0) == 0xfe80 // link-local fe80::/10
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_links_accepted() {
        assert!(validate_link("https://www.theguardian.com/world/2024/jan/01/x").is_ok());
        assert!(validate_link("http://example.org:8080/a?b=c").is_ok());
    }

    #[test]
    fn test_non_http_schemes_rejected() {
        assert!(matches!(
            validate_link("javascript:alert(1)"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
        assert!(validate_link("ftp://example.com/file").is_err());
    }

    #[test]
    fn test_local_targets_rejected() {
        assert!(matches!(
            validate_link("http://LOCALHOST/x"),
            Err(UrlValidationError::Localhost)
        ));
        assert!(matches!(
            validate_link("http://127.0.0.1/x"),
            Err(UrlValidationError::Localhost)
        ));
        assert!(matches!(
            validate_link("http://[::1]/x"),
            Err(UrlValidationError::Localhost)
        ));
    }

    #[test]
    fn test_private_ranges_rejected() {
        for link in [
            "http://10.0.0.1/",
            "http://172.16.5.4/",
            "http://169.254.1.1/",
            "http://0.0.0.0/",
            "http://[fe80::1]/",
            "http://[fd00::1]/",
        ] {
            assert!(
                matches!(validate_link(link), Err(UrlValidationError::PrivateIp(_))),
                "{} should be rejected",
                link
            );
        }
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            validate_link("not a url"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
    }
}
