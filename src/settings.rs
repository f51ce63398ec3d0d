use failure::Error;
use std::fs;
use std::path::Path;
use toml;

pub const DEFAULT_BUILD_DELAY: u32 = 0;
pub const DEFAULT_BUILD_RETRIES: u32 = 1;

/// Jenkins generation, deciding how the CSRF crumb header is named.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JenkinsVersion {
    #[serde(rename = "1")]
    V1,
    #[serde(rename = "2")]
    V2,
}

impl Default for JenkinsVersion {
    fn default() -> JenkinsVersion {
        JenkinsVersion::V1
    }
}

impl JenkinsVersion {
    pub fn crumb_header_name(&self) -> &'static str {
        match *self {
            JenkinsVersion::V1 => ".crumb",
            JenkinsVersion::V2 => "Jenkins-Crumb",
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub server_url: String,
    /// Externally reachable base URL used instead of the server URL for the primary view.
    #[serde(default)]
    pub fixed_url: Option<String>,
    #[serde(default = "default_build_delay")]
    pub build_delay: u32,
    #[serde(default = "default_build_retries")]
    pub build_retries: u32,
    #[serde(default)]
    pub refresh_period_secs: u64,
}

fn default_build_delay() -> u32 {
    DEFAULT_BUILD_DELAY
}

fn default_build_retries() -> u32 {
    DEFAULT_BUILD_RETRIES
}

impl AppSettings {
    pub fn new(server_url: &str) -> AppSettings {
        AppSettings {
            server_url: server_url.to_string(),
            fixed_url: None,
            build_delay: DEFAULT_BUILD_DELAY,
            build_retries: DEFAULT_BUILD_RETRIES,
            refresh_period_secs: 0,
        }
    }

    pub fn fixed_url(&self) -> Option<&str> {
        match self.fixed_url {
            Some(ref url) if !url.trim().is_empty() => Some(url.as_str()),
            _ => None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub crumb: String,
    #[serde(default)]
    pub version: JenkinsVersion,
}

impl Credentials {
    pub fn anonymous() -> Credentials {
        Credentials::default()
    }

    pub fn basic(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
            ..Credentials::default()
        }
    }

    pub fn is_security_mode(&self) -> bool {
        !self.username.trim().is_empty()
    }

    pub fn crumb(&self) -> Option<&str> {
        if self.crumb.trim().is_empty() {
            None
        } else {
            Some(self.crumb.as_str())
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FavoriteJob {
    pub name: String,
    pub url: String,
}

/// Favorite jobs, matched by URL so a renamed job keeps its favorite status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    jobs: Vec<FavoriteJob>,
}

impl Favorites {
    pub fn new(jobs: Vec<FavoriteJob>) -> Favorites {
        Favorites { jobs: jobs }
    }

    pub fn add(&mut self, name: &str, url: &str) {
        if self.contains(url) {
            return;
        }
        self.jobs.push(FavoriteJob {
            name: name.to_string(),
            url: url.to_string(),
        });
    }

    pub fn remove(&mut self, url: &str) {
        self.jobs.retain(|favorite| favorite.url != url);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.jobs.iter().any(|favorite| favorite.url == url)
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn jobs(&self) -> &[FavoriteJob] {
        &self.jobs
    }
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub server: AppSettings,
    #[serde(default)]
    pub credentials: Credentials,
    #[serde(default)]
    pub favorites: Vec<FavoriteJob>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|err| format_err!("Unable to read config file {}: {}", path.display(), err))?;
        Config::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Config, Error> {
        let config = toml::from_str::<Config>(contents)?;
        if config.server.server_url.trim().is_empty() {
            return Err(format_err!("The [server] section must set a server_url."));
        }
        Ok(config)
    }

    pub fn favorites(&self) -> Favorites {
        Favorites::new(self.favorites.clone())
    }
}
