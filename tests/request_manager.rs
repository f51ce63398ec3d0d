extern crate jenkins_control;
extern crate reqwest;
extern crate tempfile;

use jenkins_control::model::Job;
use jenkins_control::url_builder::JenkinsPlatform;
use jenkins_control::{AppSettings, FavoriteJob, JenkinsError, RequestManager, SecurityClient};
use reqwest::{Method, Url};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;

const SERVER: &str = "http://myjenkins:8080";

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Connect(String),
    Execute(Method, String),
    Upload(String, Vec<String>),
}

/// Answers requests from canned payloads keyed by URL path, recording every call.
#[derive(Clone, Default)]
struct StubClient {
    calls: Arc<Mutex<Vec<Call>>>,
    payloads: Arc<BTreeMap<String, String>>,
    refuse_connection: bool,
}

impl StubClient {
    fn new(payloads: &[(&str, &str)]) -> StubClient {
        StubClient {
            calls: Arc::new(Mutex::new(Vec::new())),
            payloads: Arc::new(
                payloads
                    .iter()
                    .map(|&(path, payload)| (path.to_string(), payload.to_string()))
                    .collect(),
            ),
            refuse_connection: false,
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn answer(&self, url: &Url) -> Result<String, JenkinsError> {
        match self.payloads.get(url.path()) {
            Some(payload) => Ok(payload.clone()),
            None => Err(JenkinsError::request_failed(url.as_str(), Some(404), "Not Found")),
        }
    }
}

impl SecurityClient for StubClient {
    fn connect(&mut self, test_url: &Url) -> Result<(), JenkinsError> {
        self.record(Call::Connect(test_url.to_string()));
        if self.refuse_connection {
            Err(JenkinsError::request_failed(test_url.as_str(), Some(401), "Unauthorized"))
        } else {
            Ok(())
        }
    }

    fn execute(&self, method: Method, url: &Url) -> Result<String, JenkinsError> {
        self.record(Call::Execute(method, url.to_string()));
        self.answer(url)
    }

    fn upload(&self, url: &Url, files: &BTreeMap<String, PathBuf>) -> Result<String, JenkinsError> {
        self.record(Call::Upload(url.to_string(), files.keys().cloned().collect()));
        Ok(String::new())
    }
}

fn workspace_payload(primary_view_url: &str) -> String {
    format!(
        r#"{{
            "primaryView": {{"name": "All", "url": "{primary}"}},
            "views": [
                {{"name": "All", "url": "{primary}"}},
                {{"name": "Team", "url": "{server}/view/Team/", "views": [
                    {{"name": "Backend", "url": "{server}/view/Team/view/Backend/"}}
                ]}}
            ]
        }}"#,
        primary = primary_view_url,
        server = SERVER
    )
}

const JOB_PAYLOAD: &str = r#"{
    "_class": "hudson.model.FreeStyleProject",
    "name": "app",
    "displayName": "app",
    "url": "http://myjenkins:8080/job/app/",
    "color": "red",
    "buildable": true,
    "inQueue": false,
    "lastBuild": {"id": "12", "url": "http://myjenkins:8080/job/app/12/", "number": 12, "building": false, "result": "FAILURE", "timestamp": 1500000000000, "duration": 42000},
    "property": [
        {"parameterDefinitions": [
            {"name": "archive", "type": "FileParameterDefinition"},
            {"name": "branch", "type": "StringParameterDefinition", "defaultParameterValue": {"value": "master"}}
        ]}
    ]
}"#;

fn settings() -> AppSettings {
    AppSettings::new(SERVER)
}

fn authenticated(stub: &StubClient) -> RequestManager {
    let manager = RequestManager::new();
    manager
        .authenticate_with(&settings(), Box::new(stub.clone()))
        .unwrap();
    manager
}

fn app_job() -> Job {
    let mut job = Job::new("app", "http://myjenkins:8080/job/app/");
    job.parameters = jenkins_control::parser::parse_job(JOB_PAYLOAD).unwrap().parameters;
    job
}

#[test]
fn unauthenticated_manager_makes_no_calls() {
    let manager = RequestManager::new();
    let job = app_job();
    let build = jenkins_control::parser::parse_job(JOB_PAYLOAD)
        .unwrap()
        .last_build
        .unwrap();

    assert_eq!(manager.load_workspace(&settings()).unwrap(), None);
    assert!(manager.load_view(&settings(), "http://myjenkins:8080/").unwrap().is_empty());
    assert_eq!(manager.load_job_by_url(&job.url).unwrap(), None);
    assert!(manager.load_builds(&job).unwrap().is_empty());
    assert_eq!(manager.load_build(&build).unwrap(), None);
    assert_eq!(manager.load_test_results(&build).unwrap(), None);
    assert!(manager.load_rss_latest_builds(&settings()).unwrap().is_empty());
    assert!(manager
        .load_favorite_jobs(&[FavoriteJob {
            name: "app".to_string(),
            url: job.url.clone(),
        }])
        .unwrap()
        .is_empty());
    manager.run_build(&job, &settings()).unwrap();
    manager
        .run_parameterized_build(&job, &settings(), &BTreeMap::new())
        .unwrap();
    manager.stop_build(&build).unwrap();
}

#[test]
fn failed_authentication_leaves_the_manager_unauthenticated() {
    let good = StubClient::new(&[]);
    let manager = authenticated(&good);
    assert!(manager.is_authenticated());

    let mut refused = StubClient::new(&[]);
    refused.refuse_connection = true;
    let result = manager.authenticate_with(&settings(), Box::new(refused.clone()));
    assert_eq!(result.unwrap_err().http_status(), Some(401));
    assert!(!manager.is_authenticated());

    assert_eq!(manager.load_workspace(&settings()).unwrap(), None);
    assert!(good.calls().iter().all(|call| match *call {
        Call::Connect(_) => true,
        _ => false,
    }));
}

#[test]
fn authentication_probes_the_node_name() {
    let stub = StubClient::new(&[]);
    authenticated(&stub);
    assert_eq!(
        stub.calls(),
        vec![Call::Connect("http://myjenkins:8080/api/json?tree=nodeName".to_string())]
    );
}

#[test]
fn loads_the_workspace() {
    let payload = workspace_payload("http://myjenkins:8080/");
    let stub = StubClient::new(&[("/api/json", &payload)]);
    let manager = authenticated(&stub);

    let workspace = manager.load_workspace(&settings()).unwrap().unwrap();
    assert_eq!(workspace.views.len(), 2);
    assert!(!workspace.views[1].nested);
    assert!(workspace.views[1].sub_views[0].nested);
    assert_eq!(manager.platform(), JenkinsPlatform::Classic);
}

#[test]
fn port_mismatch_is_a_configuration_error() {
    let payload = workspace_payload("http://myjenkins:9090/view/All/");
    let stub = StubClient::new(&[("/api/json", &payload)]);
    let manager = authenticated(&stub);

    match manager.load_workspace(&settings()) {
        Err(JenkinsError::Configuration { message }) => {
            assert!(message.contains("expected='8080'"), "{}", message);
            assert!(message.contains("actual='9090'"), "{}", message);
            assert!(message.contains("http://myjenkins:8080/configure"), "{}", message);
        }
        other => panic!("expected a configuration error, got {:?}", other),
    }
}

#[test]
fn explicit_default_port_is_compared() {
    let settings = AppSettings::new("http://myjenkins:80");
    let payload = workspace_payload("http://myjenkins:8080/");
    let stub = StubClient::new(&[("/api/json", &payload)]);
    let manager = RequestManager::new();
    manager
        .authenticate_with(&settings, Box::new(stub.clone()))
        .unwrap();

    match manager.load_workspace(&settings) {
        Err(JenkinsError::Configuration { message }) => {
            assert!(message.contains("expected='80'"), "{}", message);
            assert!(message.contains("actual='8080'"), "{}", message);
        }
        other => panic!("expected a configuration error, got {:?}", other),
    }
}

#[test]
fn explicit_default_port_matches_an_implicit_one() {
    let settings = AppSettings::new("http://myjenkins:80");
    let payload = r#"{"primaryView": {"name": "All", "url": "http://myjenkins/"}, "views": []}"#;
    let stub = StubClient::new(&[("/api/json", payload)]);
    let manager = RequestManager::new();
    manager
        .authenticate_with(&settings, Box::new(stub.clone()))
        .unwrap();

    assert!(manager.load_workspace(&settings).unwrap().is_some());
}

#[test]
fn host_mismatch_is_a_configuration_error() {
    let payload = workspace_payload("http://jenkins.internal:8080/");
    let stub = StubClient::new(&[("/api/json", &payload)]);
    let manager = authenticated(&stub);

    match manager.load_workspace(&settings()) {
        Err(JenkinsError::Configuration { message }) => {
            assert!(message.contains("expected='myjenkins'"), "{}", message);
            assert!(message.contains("actual='jenkins.internal'"), "{}", message);
        }
        other => panic!("expected a configuration error, got {:?}", other),
    }
}

#[test]
fn fixed_url_is_checked_instead_of_the_primary_view() {
    let payload = workspace_payload("http://myjenkins:8080/");
    let stub = StubClient::new(&[("/api/json", &payload)]);
    let manager = authenticated(&stub);

    let mut settings = settings();
    settings.fixed_url = Some("http://myjenkins:9090".to_string());
    match manager.load_workspace(&settings) {
        Err(JenkinsError::Configuration { message }) => assert!(message.contains("actual='9090'"), "{}", message),
        other => panic!("expected a configuration error, got {:?}", other),
    }
}

#[test]
fn buildhive_servers_use_cloudbees_views() {
    let server = "http://buildhive.example.com";
    let workspace = r#"{"primaryView": {"name": "All", "url": "http://buildhive.example.com/"}, "views": []}"#;
    let view = r#"{"views": [{"name": "inner", "url": "http://buildhive.example.com/view/inner/", "jobs": [
        {"name": "app", "url": "http://buildhive.example.com/job/app/", "color": "blue"}
    ]}]}"#;
    let stub = StubClient::new(&[("/api/json", workspace), ("/view/Team/api/json", view)]);
    let manager = RequestManager::new();
    let settings = AppSettings::new(server);
    manager
        .authenticate_with(&settings, Box::new(stub.clone()))
        .unwrap();

    manager.load_workspace(&settings).unwrap().unwrap();
    assert_eq!(manager.platform(), JenkinsPlatform::Cloudbees);

    let jobs = manager
        .load_view(&settings, "http://buildhive.example.com/view/Team/")
        .unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].url, "http://buildhive.example.com/job/app/");
    match stub.calls().last() {
        Some(&Call::Execute(_, ref url)) => assert!(url.contains("tree=name,url,views[jobs["), "{}", url),
        other => panic!("unexpected call {:?}", other),
    }
}

#[test]
fn loads_a_job_with_its_last_build() {
    let stub = StubClient::new(&[("/job/app/api/json", JOB_PAYLOAD)]);
    let manager = authenticated(&stub);

    let job = manager.load_job_by_url("http://myjenkins:8080/job/app/").unwrap().unwrap();
    assert_eq!(job.display(), "app");
    let last_build = job.last_build().unwrap();
    assert_eq!(last_build.number, 12);
    assert_eq!(last_build.job_url, "http://myjenkins:8080/job/app/");
    assert!(job.has_parameter("archive"));
}

#[test]
fn file_parameters_are_filtered_by_job_parameters() {
    let stub = StubClient::new(&[]);
    let manager = authenticated(&stub);
    let job = app_job();

    let mut files = BTreeMap::new();
    files.insert("archive".to_string(), PathBuf::from("/tmp/archive.zip"));
    files.insert("unrelated".to_string(), PathBuf::from("/tmp/other.zip"));
    manager.run_build_with_files(&job, &settings(), &files).unwrap();

    assert_eq!(
        stub.calls().last(),
        Some(&Call::Upload(
            "http://myjenkins:8080/job/app/build?delay=0sec".to_string(),
            vec!["archive".to_string()]
        ))
    );
}

#[test]
fn no_matching_file_falls_back_to_a_plain_trigger() {
    let stub = StubClient::new(&[("/job/app/build", "")]);
    let manager = authenticated(&stub);

    let mut files = BTreeMap::new();
    files.insert("unrelated".to_string(), PathBuf::from("/tmp/other.zip"));
    manager.run_build_with_files(&app_job(), &settings(), &files).unwrap();

    assert_eq!(
        stub.calls().last(),
        Some(&Call::Execute(
            Method::POST,
            "http://myjenkins:8080/job/app/build?delay=0sec".to_string()
        ))
    );
}

#[test]
fn parameterized_builds_are_posted() {
    let stub = StubClient::new(&[("/job/app/buildWithParameters", "")]);
    let manager = authenticated(&stub);

    let mut parameters = BTreeMap::new();
    parameters.insert("branch".to_string(), "release".to_string());
    manager
        .run_parameterized_build(&app_job(), &settings(), &parameters)
        .unwrap();

    assert_eq!(
        stub.calls().last(),
        Some(&Call::Execute(
            Method::POST,
            "http://myjenkins:8080/job/app/buildWithParameters?delay=0sec&branch=release".to_string()
        ))
    );
}

#[test]
fn missing_favorites_yield_none() {
    let stub = StubClient::new(&[("/job/app/api/json", JOB_PAYLOAD)]);
    let manager = authenticated(&stub);

    let favorites = vec![
        FavoriteJob {
            name: "app".to_string(),
            url: "http://myjenkins:8080/job/app/".to_string(),
        },
        FavoriteJob {
            name: "gone".to_string(),
            url: "http://myjenkins:8080/job/gone/".to_string(),
        },
    ];
    let jobs = manager.load_favorite_jobs(&favorites).unwrap();
    assert_eq!(jobs.len(), 2);
    assert!(jobs[0].is_some());
    assert!(jobs[1].is_none());
}

#[test]
fn console_text_of_a_never_built_job_is_none() {
    let stub = StubClient::new(&[]);
    let manager = authenticated(&stub);

    let job = Job::new("fresh", "http://myjenkins:8080/job/fresh/");
    assert_eq!(manager.load_console_text(&job).unwrap(), None);
    assert_eq!(stub.calls().len(), 1);
}

#[test]
fn loads_latest_builds_from_the_feed() {
    let feed = r#"<feed xmlns="http://www.w3.org/2005/Atom">
        <entry><title>app #12 (broken since build #11)</title><link href="http://myjenkins:8080/job/app/12/"/></entry>
    </feed>"#;
    let stub = StubClient::new(&[("/rssLatest", feed)]);
    let manager = authenticated(&stub);

    let builds = manager.load_rss_latest_builds(&settings()).unwrap();
    assert_eq!(builds["app"].number, 12);
}

fn executions(stub: &StubClient) -> usize {
    stub.calls()
        .iter()
        .filter(|call| match **call {
            Call::Execute(..) => true,
            _ => false,
        })
        .count()
}

fn connections(stub: &StubClient) -> usize {
    stub.calls().len() - executions(stub)
}

#[test]
fn reads_survive_concurrent_reauthentication() {
    const READERS: usize = 4;
    const READS: usize = 50;
    const LOGINS: usize = 20;

    let first = StubClient::new(&[("/job/app/api/json", JOB_PAYLOAD)]);
    let second = StubClient::new(&[("/job/app/api/json", JOB_PAYLOAD)]);
    let manager = Arc::new(authenticated(&first));

    let readers: Vec<_> = (0..READERS)
        .map(|_| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                for _ in 0..READS {
                    let job = manager.load_job_by_url("http://myjenkins:8080/job/app/").unwrap();
                    assert_eq!(job.and_then(|job| job.name), Some("app".to_string()));
                }
            })
        })
        .collect();

    let writer = {
        let manager = Arc::clone(&manager);
        let second = second.clone();
        thread::spawn(move || {
            for _ in 0..LOGINS {
                manager
                    .authenticate_with(&settings(), Box::new(second.clone()))
                    .unwrap();
            }
        })
    };

    for reader in readers {
        reader.join().unwrap();
    }
    writer.join().unwrap();

    assert!(manager.is_authenticated());
    assert_eq!(connections(&first), 1);
    assert_eq!(connections(&second), LOGINS);
    assert_eq!(executions(&first) + executions(&second), READERS * READS);
}
