mod crumb;

pub use self::crumb::parse_crumb;
pub use network::BasicCredentials;

use errors::JenkinsError;
use network::{build_request, crumb_headers, file_form, get_basic_credentials, get_url_response};
use reqwest::header::HeaderMap;
use reqwest::{Method, Url};
use settings::{Credentials, JenkinsVersion};
use std::collections::BTreeMap;
use std::path::PathBuf;
use url_builder;

/// Executes HTTP calls on behalf of a Jenkins session.
///
/// Every call made before a successful `connect` fails with `NotAuthenticated`.
pub trait SecurityClient: Send + Sync {
    /// Probes the server with `test_url` and establishes the session.
    fn connect(&mut self, test_url: &Url) -> Result<(), JenkinsError>;

    /// Performs one request and returns the response body.
    fn execute(&self, method: Method, url: &Url) -> Result<String, JenkinsError>;

    /// Posts `files` as a multipart form, each under its parameter name.
    fn upload(&self, url: &Url, files: &BTreeMap<String, PathBuf>) -> Result<String, JenkinsError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityStrategy {
    Anonymous,
    Basic(BasicCredentials),
}

#[derive(Debug)]
pub struct HttpSecurityClient {
    strategy: SecurityStrategy,
    version: JenkinsVersion,
    crumb: Option<String>,
    crumb_url: Url,
    connected: bool,
}

/// Builds the client matching the configured credentials.
pub fn create(server_url: &str, credentials: &Credentials) -> Result<HttpSecurityClient, JenkinsError> {
    let strategy = if credentials.is_security_mode() {
        SecurityStrategy::Basic(get_basic_credentials(
            &credentials.username,
            Some(credentials.password.clone()),
        ))
    } else {
        SecurityStrategy::Anonymous
    };
    Ok(HttpSecurityClient {
        strategy: strategy,
        version: credentials.version,
        crumb: credentials.crumb().map(|crumb| crumb.to_string()),
        crumb_url: url_builder::crumb_url(server_url)?,
        connected: false,
    })
}

impl HttpSecurityClient {
    pub fn strategy(&self) -> &SecurityStrategy {
        &self.strategy
    }

    pub fn crumb(&self) -> Option<&str> {
        self.crumb.as_ref().map(|crumb| crumb.as_str())
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    fn credentials(&self) -> Option<&BasicCredentials> {
        match self.strategy {
            SecurityStrategy::Anonymous => None,
            SecurityStrategy::Basic(ref credentials) => Some(credentials),
        }
    }

    fn headers(&self) -> Result<HeaderMap, JenkinsError> {
        crumb_headers(self.version.crumb_header_name(), self.crumb())
    }

    fn send(&self, method: Method, url: &Url) -> Result<String, JenkinsError> {
        debug!("--Jenkins--: {} {}", method, url);
        let request = build_request(method, url, self.headers()?, self.credentials());
        get_url_response(url, request)
    }

    fn fetch_crumb(&self) -> Result<Option<String>, JenkinsError> {
        match self.send(Method::GET, &self.crumb_url) {
            Ok(payload) => parse_crumb(&payload).map(Some),
            Err(ref err) if err.is_not_found() => {
                debug!("--Jenkins--: No crumb issuer at {}, CSRF protection is disabled.", self.crumb_url);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn ensure_connected(&self) -> Result<(), JenkinsError> {
        if self.connected {
            Ok(())
        } else {
            Err(JenkinsError::NotAuthenticated)
        }
    }
}

impl SecurityClient for HttpSecurityClient {
    fn connect(&mut self, test_url: &Url) -> Result<(), JenkinsError> {
        self.connected = false;
        self.send(Method::GET, test_url)?;
        if self.crumb.is_none() {
            self.crumb = self.fetch_crumb()?;
        }
        self.connected = true;
        info!("--Jenkins--: Connected to {}", test_url);
        Ok(())
    }

    fn execute(&self, method: Method, url: &Url) -> Result<String, JenkinsError> {
        self.ensure_connected()?;
        self.send(method, url)
    }

    fn upload(&self, url: &Url, files: &BTreeMap<String, PathBuf>) -> Result<String, JenkinsError> {
        self.ensure_connected()?;
        let form = file_form(url, files)?;
        debug!("--Jenkins--: POST {} with {} file(s)", url, files.len());
        let request = build_request(Method::POST, url, self.headers()?, self.credentials()).multipart(form);
        get_url_response(url, request)
    }
}
