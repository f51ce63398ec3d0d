use errors::JenkinsError;
use regex::Regex;

lazy_static! {
    static ref CRUMB_REGEX: Regex = Regex::new(r"<crumb>\s*([^<\s]+)\s*</crumb>").unwrap();
}

/// Extracts the crumb from a `crumbIssuer/api/xml?tree=crumb` answer.
pub fn parse_crumb(payload: &str) -> Result<String, JenkinsError> {
    CRUMB_REGEX
        .captures(payload)
        .and_then(|captures| captures.get(1))
        .map(|crumb| crumb.as_str().to_string())
        .ok_or_else(|| JenkinsError::parse("no crumb element", payload))
}
