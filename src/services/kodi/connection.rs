//! Kodi connection descriptor
//!
//! Built once from a user-supplied host string, which may be a bare
//! hostname/IP or a full `http(s)://` URL.

use tracing::debug;
use url::Url;

/// Default Kodi web server port when none is given
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default port for `https://` URLs without an explicit port
pub const DEFAULT_HTTPS_PORT: u16 = 443;

/// URL scheme used to reach the Kodi web server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "http" => Some(Self::Http),
            "https" => Some(Self::Https),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Http => DEFAULT_HTTP_PORT,
            Scheme::Https => DEFAULT_HTTPS_PORT,
        }
    }
}

/// HTTP basic auth credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Where and how to reach a Kodi JSON-RPC endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    pub credentials: Option<Credentials>,
}

impl ConnectionConfig {
    /// Build a connection from a host string.
    ///
    /// * `host` - either `http(s)://host[:port]` or a bare hostname/IP
    /// * `port` - explicit port, only used for bare hostnames
    /// * `username`/`password` - kept only when both are non-empty
    ///
    /// Never fails: a nonsensical host simply yields a config that later
    /// calls cannot connect with.
    pub fn from_host(host: &str, port: Option<u16>, username: &str, password: &str) -> Self {
        let credentials = if !username.is_empty() && !password.is_empty() {
            Some(Credentials {
                username: username.to_string(),
                password: password.to_string(),
            })
        } else {
            None
        };

        let trimmed = host.trim();
        if trimmed.contains("://") {
            if let Some((scheme, parsed_host, parsed_port)) = parse_url(trimmed) {
                return Self {
                    scheme,
                    host: parsed_host,
                    port: parsed_port.unwrap_or_else(|| scheme.default_port()),
                    credentials,
                };
            }
            debug!("Host is not a usable http(s) URL, using it verbatim: {}", trimmed);
        }

        Self {
            scheme: Scheme::Http,
            host: trimmed.to_string(),
            port: port.unwrap_or(DEFAULT_HTTP_PORT),
            credentials,
        }
    }

    /// `{scheme}://{host}:{port}` without a trailing slash
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme.as_str(), self.host, self.port)
    }

    /// The JSON-RPC endpoint
    pub fn rpc_url(&self) -> String {
        format!("{}/jsonrpc", self.base_url())
    }

    /// Human-readable label for pages and logs (never includes credentials)
    pub fn label(&self) -> String {
        self.base_url()
    }

    /// Candidate absolute URLs for a path returned by `Files.PrepareDownload`,
    /// in the order they should be tried.
    pub fn download_candidates(&self, staged_path: &str) -> Vec<String> {
        let base = self.base_url();
        let path = staged_path.trim_start_matches('/');
        vec![
            format!("{}/{}", base, path),
            format!("{}/vfs/{}", base, path),
            format!("{}/image/{}", base, path),
        ]
    }
}

fn parse_url(value: &str) -> Option<(Scheme, String, Option<u16>)> {
    let parsed = match Url::parse(value) {
        Ok(url) => url,
        Err(e) => {
            debug!("Failed to parse host URL: {}", e);
            return None;
        }
    };

    let scheme = Scheme::parse(parsed.scheme())?;
    let host = parsed.host_str()?.to_string();

    Some((scheme, host, explicit_port(value, &parsed)))
}

/// `Url::port` hides a port equal to the scheme's well-known default
/// (`http://host:80`), which is still an explicit choice here.
fn explicit_port(value: &str, parsed: &Url) -> Option<u16> {
    parsed.port().or_else(|| {
        let known = parsed.port_or_known_default()?;
        let authority = value.split("://").nth(1)?.split(['/', '?', '#']).next()?;
        authority.ends_with(&format!(":{}", known)).then_some(known)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_with_explicit_port() {
        let conn = ConnectionConfig::from_host("http://192.168.1.10:555", None, "", "");
        assert_eq!(conn.scheme, Scheme::Http);
        assert_eq!(conn.host, "192.168.1.10");
        assert_eq!(conn.port, 555);
        assert_eq!(conn.rpc_url(), "http://192.168.1.10:555/jsonrpc");
    }

    #[test]
    fn test_url_default_ports_by_scheme() {
        let http = ConnectionConfig::from_host("http://kodi.local", None, "", "");
        assert_eq!(http.port, 8080);

        let https = ConnectionConfig::from_host("https://kodi.example.com/", None, "", "");
        assert_eq!(https.scheme, Scheme::Https);
        assert_eq!(https.port, 443);
        assert_eq!(https.base_url(), "https://kodi.example.com:443");
    }

    #[test]
    fn test_url_with_well_known_port() {
        let conn = ConnectionConfig::from_host("http://kodi.local:80", None, "", "");
        assert_eq!(conn.port, 80);
    }

    #[test]
    fn test_url_ignores_port_argument() {
        let conn = ConnectionConfig::from_host("http://kodi.local", Some(9090), "", "");
        assert_eq!(conn.port, 8080);
    }

    #[test]
    fn test_bare_host() {
        let conn = ConnectionConfig::from_host("192.168.1.100", None, "", "");
        assert_eq!(conn.scheme, Scheme::Http);
        assert_eq!(conn.host, "192.168.1.100");
        assert_eq!(conn.port, 8080);

        let conn = ConnectionConfig::from_host("192.168.1.100", Some(8081), "", "");
        assert_eq!(conn.port, 8081);
    }

    #[test]
    fn test_garbage_host_never_fails() {
        let conn = ConnectionConfig::from_host("ftp://nowhere", None, "", "");
        assert_eq!(conn.host, "ftp://nowhere");
        assert_eq!(conn.port, 8080);
    }

    #[test]
    fn test_credentials_require_both_parts() {
        let conn = ConnectionConfig::from_host("kodi", None, "kodi", "");
        assert!(conn.credentials.is_none());

        let conn = ConnectionConfig::from_host("kodi", None, "", "secret");
        assert!(conn.credentials.is_none());

        let conn = ConnectionConfig::from_host("kodi", None, "kodi", "secret");
        let creds = conn.credentials.expect("credentials should be kept");
        assert_eq!(creds.username, "kodi");
        assert_eq!(creds.password, "secret");
    }

    #[test]
    fn test_credentials_hidden_from_debug() {
        let conn = ConnectionConfig::from_host("kodi", None, "kodi", "secret");
        let debug = format!("{:?}", conn);
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_download_candidates_order() {
        let conn = ConnectionConfig::from_host("http://kodi.local:8080", None, "", "");
        let candidates = conn.download_candidates("/vfs/image%3A%2F%2Fposter.jpg%2F");
        assert_eq!(
            candidates,
            vec![
                "http://kodi.local:8080/vfs/image%3A%2F%2Fposter.jpg%2F",
                "http://kodi.local:8080/vfs/vfs/image%3A%2F%2Fposter.jpg%2F",
                "http://kodi.local:8080/image/vfs/image%3A%2F%2Fposter.jpg%2F",
            ]
        );
    }
}
