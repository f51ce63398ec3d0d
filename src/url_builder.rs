use errors::JenkinsError;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::Url;
use settings::AppSettings;
use std::collections::BTreeMap;

const API_JSON: &str = "api/json";
const BUILD: &str = "build";
const PARAMETERIZED_BUILD: &str = "buildWithParameters";
const STOP: &str = "stop";
const RSS_LATEST: &str = "rssLatest";
const CONSOLE_TEXT: &str = "logText/progressiveText";
const TEST_REPORT: &str = "testReport/api/json";
const CRUMB_ISSUER: &str = "crumbIssuer/api/xml?tree=crumb";
const TEST_CONNECTION_REQUEST: &str = "nodeName";

// `%` and `#` would otherwise be read back as an escape or cut the query into a fragment.
const PARAMETER: &AsciiSet = &CONTROLS.add(b'%').add(b'#');

macro_rules! build_info {
    () => {
        "id,url,building,result,number,timestamp,duration"
    };
}

macro_rules! job_info {
    () => {
        concat!(
            "name,displayName,fullDisplayName,fullName,url,color,buildable,inQueue,",
            "healthReport[description,iconUrl],lastBuild[",
            build_info!(),
            "],property[parameterDefinitions[name,type,defaultParameterValue[value],description,choices]]"
        )
    };
}

pub const BASIC_BUILD_INFO: &str = build_info!();
pub const BASIC_JOB_INFO: &str = job_info!();
pub const BASIC_JENKINS_INFO: &str =
    "nodeName,nodeDescription,primaryView[name,url],views[name,url,views[name,url]]";
pub const BASIC_VIEW_INFO: &str = concat!("name,url,jobs[", job_info!(), "]");
pub const CLOUDBEES_VIEW_INFO: &str = concat!("name,url,views[jobs[", job_info!(), "]]");
pub const BASIC_BUILDS_INFO: &str = concat!("builds[", build_info!(), "]");

/// Shape of the view listings served by the Jenkins instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JenkinsPlatform {
    Classic,
    Cloudbees,
}

fn parse_url(url: &str) -> Result<Url, JenkinsError> {
    Url::parse(url).map_err(|err| JenkinsError::invalid_url(url, err.to_string()))
}

fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

fn tree_query(path: &str, projection: &str) -> String {
    format!("{}?tree={}", path, projection)
}

pub fn workspace_url(settings: &AppSettings) -> Result<Url, JenkinsError> {
    parse_url(&join(&settings.server_url, &tree_query(API_JSON, BASIC_JENKINS_INFO)))
}

/// URL of a view listing. The primary view is fetched through the fixed URL when one is configured.
pub fn view_url(settings: &AppSettings, platform: JenkinsPlatform, view_url: &str) -> Result<Url, JenkinsError> {
    let projection = match platform {
        JenkinsPlatform::Classic => BASIC_VIEW_INFO,
        JenkinsPlatform::Cloudbees => CLOUDBEES_VIEW_INFO,
    };
    let base = resolve_fixed_url(settings, view_url);
    parse_url(&join(&base, &tree_query(API_JSON, projection)))
}

pub fn resolve_fixed_url(settings: &AppSettings, url: &str) -> String {
    match settings.fixed_url() {
        Some(fixed_url) if url == with_trailing_slash(&settings.server_url) => with_trailing_slash(fixed_url),
        _ => url.to_string(),
    }
}

pub fn job_url(job_url: &str) -> Result<Url, JenkinsError> {
    parse_url(&join(job_url, &tree_query(API_JSON, BASIC_JOB_INFO)))
}

pub fn build_url(build_url: &str) -> Result<Url, JenkinsError> {
    parse_url(&join(build_url, &tree_query(API_JSON, BASIC_BUILD_INFO)))
}

pub fn builds_url(job_url: &str) -> Result<Url, JenkinsError> {
    parse_url(&join(job_url, &tree_query(API_JSON, BASIC_BUILDS_INFO)))
}

pub fn run_job_url(job_url: &str, settings: &AppSettings) -> Result<Url, JenkinsError> {
    parse_url(&join(job_url, &format!("{}?delay={}sec", BUILD, settings.build_delay)))
}

/// Only `%` and `#` are escaped in names and values; `&` or `=` inside a value still split it.
pub fn run_parameterized_job_url(
    job_url: &str,
    settings: &AppSettings,
    parameters: &BTreeMap<String, String>,
) -> Result<Url, JenkinsError> {
    let mut path = format!("{}?delay={}sec", PARAMETERIZED_BUILD, settings.build_delay);
    for (name, value) in parameters {
        path.push_str(&format!(
            "&{}={}",
            utf8_percent_encode(name, PARAMETER),
            utf8_percent_encode(value, PARAMETER)
        ));
    }
    parse_url(&join(job_url, &path))
}

pub fn stop_build_url(build_url: &str) -> Result<Url, JenkinsError> {
    parse_url(&join(build_url, STOP))
}

pub fn rss_latest_url(server_url: &str) -> Result<Url, JenkinsError> {
    parse_url(&join(server_url, RSS_LATEST))
}

pub fn authentication_url(server_url: &str) -> Result<Url, JenkinsError> {
    parse_url(&join(server_url, &tree_query(API_JSON, TEST_CONNECTION_REQUEST)))
}

pub fn crumb_url(server_url: &str) -> Result<Url, JenkinsError> {
    parse_url(&join(server_url, CRUMB_ISSUER))
}

pub fn console_text_url(build_url: &str) -> Result<Url, JenkinsError> {
    parse_url(&join(build_url, CONSOLE_TEXT))
}

pub fn test_report_url(build_url: &str) -> Result<Url, JenkinsError> {
    parse_url(&join(build_url, TEST_REPORT))
}
