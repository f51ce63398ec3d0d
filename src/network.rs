use errors::JenkinsError;
use reqwest::blocking::multipart::Form;
use reqwest::blocking::{RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use std::collections::BTreeMap;
use std::path::PathBuf;
use HTTP_CLIENT;

/// Basic credentials attached to every request of a secured session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: Option<String>,
}

pub fn get_basic_credentials(username: &str, password: Option<String>) -> BasicCredentials {
    BasicCredentials {
        username: username.to_string(),
        password: password,
    }
}

pub fn crumb_headers(header_name: &str, crumb: Option<&str>) -> Result<HeaderMap, JenkinsError> {
    let mut headers = HeaderMap::new();
    if let Some(crumb) = crumb {
        let name = HeaderName::from_bytes(header_name.as_bytes())
            .map_err(|err| JenkinsError::configuration(format!("Invalid crumb header '{}': {}", header_name, err)))?;
        let value = HeaderValue::from_str(crumb)
            .map_err(|err| JenkinsError::configuration(format!("Invalid crumb value: {}", err)))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

pub fn build_request(
    method: Method,
    url: &Url,
    headers: HeaderMap,
    credentials: Option<&BasicCredentials>,
) -> RequestBuilder {
    let request = HTTP_CLIENT.request(method, url.clone()).headers(headers);
    match credentials {
        Some(credentials) => request.basic_auth(credentials.username.clone(), credentials.password.clone()),
        None => request,
    }
}

/// Multipart form holding every file under its parameter name.
pub fn file_form(url: &Url, files: &BTreeMap<String, PathBuf>) -> Result<Form, JenkinsError> {
    let mut form = Form::new();
    for (name, path) in files {
        form = form.file(name.clone(), path).map_err(|err| {
            JenkinsError::request_failed(
                url.as_str(),
                None,
                format!("unable to attach {}: {}", path.display(), err),
            )
        })?;
    }
    Ok(form)
}

pub fn get_url_response(url: &Url, request: RequestBuilder) -> Result<String, JenkinsError> {
    let response = request
        .send()
        .map_err(|err| JenkinsError::request_failed(url.as_str(), None, err.to_string()))?;
    read_response(url, response)
}

fn read_response(url: &Url, response: Response) -> Result<String, JenkinsError> {
    let status = response.status();
    if status.is_success() {
        response
            .text()
            .map_err(|err| JenkinsError::request_failed(url.as_str(), Some(status.as_u16()), err.to_string()))
    } else {
        let reason = status.canonical_reason().unwrap_or("unexpected status").to_string();
        Err(JenkinsError::request_failed(url.as_str(), Some(status.as_u16()), reason))
    }
}
