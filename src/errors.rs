use failure::Fail;

#[derive(Debug, Fail)]
pub enum JenkinsError {
    #[fail(display = "Unable to parse Jenkins response ({}). Payload: {}", reason, payload)]
    Parse { reason: String, payload: String },

    #[fail(display = "Jenkins configuration error: {}", message)]
    Configuration { message: String },

    #[fail(display = "Not yet logged in to Jenkins. Authenticate before issuing requests.")]
    NotAuthenticated,

    #[fail(display = "Request to {} failed{}: {}", url, status_suffix, message)]
    RequestFailed {
        url: String,
        status: Option<u16>,
        status_suffix: String,
        message: String,
    },

    #[fail(display = "Invalid URL '{}': {}", url, reason)]
    InvalidUrl { url: String, reason: String },

    #[fail(display = "Parameter '{}' of type {} is unsupported.", name, parameter_type)]
    UnsupportedParameterType { name: String, parameter_type: String },
}

impl JenkinsError {
    pub fn parse<R: Into<String>, P: Into<String>>(reason: R, payload: P) -> JenkinsError {
        JenkinsError::Parse {
            reason: reason.into(),
            payload: payload.into(),
        }
    }

    pub fn configuration<M: Into<String>>(message: M) -> JenkinsError {
        JenkinsError::Configuration {
            message: message.into(),
        }
    }

    pub fn request_failed<U: Into<String>, M: Into<String>>(
        url: U,
        status: Option<u16>,
        message: M,
    ) -> JenkinsError {
        let status_suffix = match status {
            Some(code) => format!(" with HTTP status {}", code),
            None => String::new(),
        };
        JenkinsError::RequestFailed {
            url: url.into(),
            status: status,
            status_suffix: status_suffix,
            message: message.into(),
        }
    }

    pub fn invalid_url<U: Into<String>, R: Into<String>>(url: U, reason: R) -> JenkinsError {
        JenkinsError::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status carried by a failed request, if the server answered at all.
    pub fn http_status(&self) -> Option<u16> {
        match *self {
            JenkinsError::RequestFailed { status, .. } => status,
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.http_status() == Some(404)
    }
}
