use build_status::BuildStatus;
use errors::JenkinsError;
use jenkins_response::*;
use model::build::parse_legacy_build_id;
use model::*;
use serde;
use serde_json;

const EMPTY_OBJECT: &str = "{}";

fn ensure_payload(payload: &str) -> Result<(), JenkinsError> {
    let trimmed = payload.trim();
    if trimmed.is_empty() || trimmed == EMPTY_OBJECT {
        error!("Empty JSON data received from Jenkins.");
        return Err(JenkinsError::parse("empty JSON data", payload));
    }
    Ok(())
}

fn decode<T>(payload: &str) -> Result<T, JenkinsError>
where
    T: serde::de::DeserializeOwned,
{
    ensure_payload(payload)?;
    serde_json::from_str::<T>(payload).map_err(|err| {
        error!("Error during parsing JSON data: {}. Details: {}", payload, err);
        JenkinsError::parse(err.to_string(), payload)
    })
}

pub fn parse_workspace(payload: &str, server_url: &str) -> Result<Workspace, JenkinsError> {
    let response: JenkinsWorkspaceResponse = decode(payload)?;
    let mut workspace = Workspace::new("", server_url);
    workspace.primary_view = response.primary_view.map(to_view);
    workspace.views = response
        .views
        .unwrap_or_default()
        .into_iter()
        .map(to_view)
        .collect();
    Ok(workspace)
}

pub fn parse_job(payload: &str) -> Result<Job, JenkinsError> {
    let response: JenkinsJob = decode(payload)?;
    Ok(to_job(response))
}

pub fn parse_build(job_url: &str, payload: &str) -> Result<Build, JenkinsError> {
    let response: JenkinsBuild = decode(payload)?;
    Ok(to_build(job_url, response))
}

pub fn parse_builds(job_url: &str, payload: &str) -> Result<Vec<Build>, JenkinsError> {
    let response: JenkinsBuildsResponse = decode(payload)?;
    Ok(response
        .builds
        .into_iter()
        .map(|build| to_build(job_url, build))
        .collect())
}

pub fn parse_view_jobs(payload: &str) -> Result<Vec<Job>, JenkinsError> {
    let response: JenkinsJobsResponse = decode(payload)?;
    Ok(response.jobs.into_iter().map(to_job).collect())
}

/// CloudBees wraps the jobs of a view in a single nested view. Only the first
/// element of `views` is read; servers sending several are not supported.
pub fn parse_cloudbees_view_jobs(payload: &str) -> Result<Vec<Job>, JenkinsError> {
    let response: JenkinsViewsResponse = decode(payload)?;
    let first_view = response.views.and_then(|views| views.into_iter().next());
    Ok(first_view
        .and_then(|view| view.jobs)
        .unwrap_or_default()
        .into_iter()
        .map(to_job)
        .collect())
}

pub fn parse_test_result(payload: &str) -> Result<TestResult, JenkinsError> {
    let response: JenkinsTestReport = decode(payload)?;
    let suites = response
        .suites
        .unwrap_or_default()
        .into_iter()
        .map(|suite| TestSuite {
            name: suite.name.unwrap_or_default(),
            cases: suite
                .cases
                .unwrap_or_default()
                .into_iter()
                .map(|case| TestCase {
                    name: case.name.unwrap_or_default(),
                    class_name: case.class_name.unwrap_or_default(),
                    error_details: case.error_details,
                    error_stack_trace: case.error_stack_trace,
                    skipped: case.skipped,
                    duration: case.duration.unwrap_or(0.0),
                    status: case.status,
                })
                .collect(),
        })
        .collect();
    Ok(TestResult { suites: suites })
}

fn to_view(view: JenkinsView) -> View {
    let mut result = View::new(&view.name.unwrap_or_default(), &view.url, false);
    result.sub_views = view
        .sub_views
        .unwrap_or_default()
        .into_iter()
        .map(|nested| View::new(&nested.name.unwrap_or_default(), &nested.url, true))
        .collect();
    result
}

fn to_job(job: JenkinsJob) -> Job {
    let last_build = {
        let job_url = job.url.as_str();
        job.last_build.map(|build| to_build(job_url, build))
    };
    Job {
        kind: JobKind::from_class(job.class.as_ref().map(|c| c.as_str())),
        name: job.name,
        display_name: job.display_name,
        full_display_name: job.full_display_name,
        full_name: job.full_name,
        health: to_health(job.health_report),
        parameters: to_parameters(job.properties),
        color: job.color,
        buildable: job.buildable.unwrap_or(false),
        in_queue: job.in_queue.unwrap_or(false),
        last_build: last_build,
        builds: Vec::new(),
        url: job.url,
    }
}

fn to_build(job_url: &str, build: JenkinsBuild) -> Build {
    Build {
        job_url: job_url.to_string(),
        build_date: build.id.as_ref().and_then(|id| parse_legacy_build_id(id)),
        url: build.url,
        number: build.number,
        building: build.building,
        status: BuildStatus::parse_status(build.result.as_ref().map(|r| r.as_str())),
        timestamp: build.timestamp.unwrap_or(0),
        duration: build.duration,
        message: None,
    }
}

// Servers list health reports in priority order, so only the first one counts.
fn to_health(reports: Option<Vec<JenkinsHealth>>) -> Option<Health> {
    reports
        .and_then(|reports| reports.into_iter().next())
        .and_then(|report| Health::from_icon(report.icon_url.as_ref().map(|i| i.as_str()), report.description))
}

fn to_parameters(properties: Option<Vec<JenkinsJobProperty>>) -> Vec<ParameterDefinition> {
    properties
        .unwrap_or_default()
        .into_iter()
        .filter_map(|property| property.parameter_definitions)
        .flat_map(|definitions| definitions.into_iter())
        .map(to_parameter)
        .collect()
}

fn to_parameter(definition: JenkinsParameterDefinition) -> ParameterDefinition {
    let default_value = definition
        .default_parameter_value
        .and_then(|default| default.value)
        .and_then(|value| match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) => Some(text),
            other => Some(other.to_string()),
        });
    ParameterDefinition {
        name: definition.name.unwrap_or_default(),
        description: definition.description,
        parameter_type: definition
            .parameter_type
            .as_ref()
            .and_then(|t| ParameterType::from_type_name(t)),
        raw_type: definition.parameter_type,
        default_value: default_value,
        choices: definition.choices.unwrap_or_default(),
    }
}
