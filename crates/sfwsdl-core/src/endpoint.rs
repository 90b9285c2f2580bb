//! Where the WSDL lives and which cookie authenticates the request.

use url::Url;

use crate::error::RefreshError;
use crate::session::SessionProvider;

/// Path and query of the WSDL download on a Salesforce instance.
pub const WSDL_PATH: &str = "/soap/wsdl.jsp?type=*";
/// Host suffix appended to the server instance.
pub const SALESFORCE_DOMAIN: &str = "salesforce.com";
/// Name of the session cookie Salesforce expects.
pub const SESSION_COOKIE: &str = "sid";

/// Base URL of the instance plus the domain the session cookie is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsdlEndpoint {
    base_url: String,
    cookie_domain: String,
}

impl WsdlEndpoint {
    /// `https://{instance}.salesforce.com`, cookie scoped to `{instance}.salesforce.com`.
    pub fn for_session(session: &dyn SessionProvider) -> Self {
        let domain = format!("{}.{}", session.server_instance(), SALESFORCE_DOMAIN);
        Self {
            base_url: format!("https://{}", domain),
            cookie_domain: domain,
        }
    }

    /// Explicit base URL, e.g. a proxy or a local test server. The cookie is
    /// scoped to the URL's host.
    pub fn with_base_url(base_url: &str) -> Result<Self, RefreshError> {
        let parsed = Url::parse(base_url).map_err(|source| RefreshError::Endpoint {
            url: base_url.to_string(),
            source,
        })?;
        let host = parsed
            .host_str()
            .ok_or_else(|| RefreshError::Endpoint {
                url: base_url.to_string(),
                source: url::ParseError::EmptyHost,
            })?
            .to_string();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie_domain: host,
        })
    }

    /// Full URL of the WSDL document.
    pub fn wsdl_url(&self) -> String {
        format!("{}{}", self.base_url, WSDL_PATH)
    }

    /// The `sid` cookie carrying `session_id`, scoped to this endpoint.
    pub fn session_cookie(&self, session: &dyn SessionProvider) -> SessionCookie {
        SessionCookie {
            name: SESSION_COOKIE.to_string(),
            value: session.session_id().to_string(),
            domain: self.cookie_domain.clone(),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
}

impl SessionCookie {
    /// Value for the `Cookie` request header, e.g. `sid=00D...`.
    pub fn header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

impl std::fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCookie")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .field("domain", &self.domain)
            .finish()
    }
}
