#[macro_use]
extern crate failure;

#[macro_use]
extern crate serde_derive;

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate log;

extern crate chrono;
extern crate percent_encoding;
extern crate regex;
extern crate reqwest;
extern crate serde;
extern crate serde_json;
extern crate toml;

#[cfg(test)]
extern crate proptest;
#[cfg(test)]
extern crate tempfile;

pub mod build_params;
pub mod build_status;
pub mod errors;
pub mod job_tracker;
mod jenkins_response;
pub mod model;
mod network;
pub mod parser;
pub mod request_manager;
pub mod rss;
pub mod security;
pub mod settings;
pub mod url_builder;

pub use build_status::{BuildStatus, BuildStatusAggregator};
pub use errors::JenkinsError;
pub use request_manager::RequestManager;
pub use security::SecurityClient;
pub use settings::{AppSettings, Config, Credentials, FavoriteJob, Favorites, JenkinsVersion};

lazy_static! {
    static ref HTTP_CLIENT: reqwest::blocking::Client = reqwest::blocking::Client::new();
}
