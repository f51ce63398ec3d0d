use build_status::BuildStatus;
use model::build::Build;
use model::health::Health;
use model::parameter::ParameterDefinition;

const ANIMATED_COLOR_SUFFIX: &str = "_anime";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Job,
    Folder,
}

impl JobKind {
    /// Derives the kind from the `_class` attribute Jenkins adds to every item.
    pub fn from_class(class: Option<&str>) -> JobKind {
        match class {
            Some(class) if class.contains("Folder") => JobKind::Folder,
            _ => JobKind::Job,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub kind: JobKind,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub full_display_name: Option<String>,
    /// Slash separated path through the enclosing folders, e.g. `team/app`.
    pub full_name: Option<String>,
    pub url: String,
    pub color: Option<String>,
    pub buildable: bool,
    pub in_queue: bool,
    pub health: Option<Health>,
    pub last_build: Option<Build>,
    /// Only populated by an explicit builds load.
    pub builds: Vec<Build>,
    pub parameters: Vec<ParameterDefinition>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    match *value {
        Some(ref value) if !value.is_empty() => Some(value.as_str()),
        _ => None,
    }
}

impl Job {
    pub fn new(name: &str, url: &str) -> Job {
        Job {
            kind: JobKind::Job,
            name: Some(name.to_string()),
            display_name: None,
            full_display_name: None,
            full_name: None,
            url: url.to_string(),
            color: None,
            buildable: false,
            in_queue: false,
            health: None,
            last_build: None,
            builds: Vec::new(),
            parameters: Vec::new(),
        }
    }

    /// Name to show: full display name, then display name, then name.
    pub fn display(&self) -> &str {
        non_empty(&self.full_display_name)
            .or_else(|| non_empty(&self.display_name))
            .or_else(|| non_empty(&self.name))
            .unwrap_or("")
    }

    pub fn status(&self) -> BuildStatus {
        match self.color {
            Some(ref color) => BuildStatus::from_color(color),
            None if self.kind == JobKind::Folder => BuildStatus::Folder,
            None => BuildStatus::Null,
        }
    }

    pub fn is_building(&self) -> bool {
        self.color
            .as_ref()
            .map(|color| color.ends_with(ANIMATED_COLOR_SUFFIX))
            .unwrap_or(false)
            || self.last_build().map(|build| build.building).unwrap_or(false)
    }

    /// The last build, falling back to the newest fetched build.
    pub fn last_build(&self) -> Option<&Build> {
        self.last_build.as_ref().or_else(|| self.builds.first())
    }

    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.iter().any(|parameter| parameter.name == name)
    }

    pub fn health_description(&self) -> &str {
        self.health
            .as_ref()
            .and_then(|health| health.description.as_ref())
            .map(|description| description.as_str())
            .unwrap_or("")
    }

    /// Copies the volatile state of a freshly loaded job into this one.
    pub fn update_content_with(&mut self, updated: Job) {
        self.color = updated.color;
        self.health = updated.health;
        self.in_queue = updated.in_queue;
        self.last_build = updated.last_build;
        self.builds = updated.builds;
    }
}
