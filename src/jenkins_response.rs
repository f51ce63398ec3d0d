// Shapes of the JSON documents returned by the Jenkins remote API. Every field
// the server may omit is optional; unknown fields are ignored.

#[derive(Deserialize, Debug)]
pub struct JenkinsWorkspaceResponse {
    #[serde(rename = "primaryView")]
    pub primary_view: Option<JenkinsView>,
    pub views: Option<Vec<JenkinsView>>,
}

#[derive(Deserialize, Debug)]
pub struct JenkinsView {
    pub name: Option<String>,
    pub url: String,
    #[serde(rename = "views")]
    pub sub_views: Option<Vec<JenkinsView>>,
    pub jobs: Option<Vec<JenkinsJob>>,
}

#[derive(Deserialize, Debug)]
pub struct JenkinsViewsResponse {
    pub views: Option<Vec<JenkinsView>>,
}

#[derive(Deserialize, Debug)]
pub struct JenkinsJobsResponse {
    pub jobs: Vec<JenkinsJob>,
}

#[derive(Deserialize, Debug)]
pub struct JenkinsJob {
    #[serde(rename = "_class")]
    pub class: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "fullDisplayName")]
    pub full_display_name: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub url: String,
    pub color: Option<String>,
    pub buildable: Option<bool>,
    #[serde(rename = "inQueue")]
    pub in_queue: Option<bool>,
    #[serde(rename = "lastBuild")]
    pub last_build: Option<JenkinsBuild>,
    #[serde(rename = "healthReport")]
    pub health_report: Option<Vec<JenkinsHealth>>,
    #[serde(rename = "property")]
    pub properties: Option<Vec<JenkinsJobProperty>>,
}

#[derive(Deserialize, Debug)]
pub struct JenkinsHealth {
    pub description: Option<String>,
    #[serde(rename = "iconUrl")]
    pub icon_url: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct JenkinsJobProperty {
    #[serde(rename = "parameterDefinitions")]
    pub parameter_definitions: Option<Vec<JenkinsParameterDefinition>>,
}

#[derive(Deserialize, Debug)]
pub struct JenkinsParameterDefinition {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub parameter_type: Option<String>,
    pub description: Option<String>,
    pub choices: Option<Vec<String>>,
    #[serde(rename = "defaultParameterValue")]
    pub default_parameter_value: Option<JenkinsParameterValue>,
}

#[derive(Deserialize, Debug)]
pub struct JenkinsParameterValue {
    pub value: Option<::serde_json::Value>,
}

#[derive(Deserialize, Debug)]
pub struct JenkinsBuildsResponse {
    pub builds: Vec<JenkinsBuild>,
}

#[derive(Deserialize, Debug)]
pub struct JenkinsBuild {
    pub id: Option<String>,
    pub url: String,
    pub number: u32,
    #[serde(default)]
    pub building: bool,
    pub result: Option<String>,
    pub timestamp: Option<i64>,
    pub duration: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub struct JenkinsTestReport {
    pub suites: Option<Vec<JenkinsTestSuite>>,
}

#[derive(Deserialize, Debug)]
pub struct JenkinsTestSuite {
    pub name: Option<String>,
    pub cases: Option<Vec<JenkinsTestCase>>,
}

#[derive(Deserialize, Debug)]
pub struct JenkinsTestCase {
    pub name: Option<String>,
    #[serde(rename = "className")]
    pub class_name: Option<String>,
    #[serde(rename = "errorDetails")]
    pub error_details: Option<String>,
    #[serde(rename = "errorStackTrace")]
    pub error_stack_trace: Option<String>,
    #[serde(default)]
    pub skipped: bool,
    pub duration: Option<f64>,
    pub status: Option<String>,
}
