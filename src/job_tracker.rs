use build_status::BuildStatus;
use errors::JenkinsError;
use model::Build;
use std::collections::BTreeMap;

pub const RETRY_LIMIT: u32 = 10;

/// A triggered build that is re-run until one of its builds succeeds or its tries run out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceableBuild {
    pub job_url: String,
    pub parameters: BTreeMap<String, String>,
    tries_left: u32,
    passed: bool,
}

impl TraceableBuild {
    /// `tries` counts the run already triggered.
    pub fn new(job_url: &str, parameters: BTreeMap<String, String>, tries: u32) -> Result<TraceableBuild, JenkinsError> {
        if tries > RETRY_LIMIT {
            return Err(JenkinsError::configuration(format!(
                "Can't retry more than {} times",
                RETRY_LIMIT
            )));
        }
        Ok(TraceableBuild {
            job_url: job_url.to_string(),
            parameters: parameters,
            tries_left: tries.saturating_sub(1),
            passed: false,
        })
    }

    pub fn tries_left(&self) -> u32 {
        self.tries_left
    }

    pub fn has_passed(&self) -> bool {
        self.passed
    }

    pub fn is_done(&self) -> bool {
        !self.should_retry()
    }

    fn should_retry(&self) -> bool {
        self.tries_left > 0 && !self.passed
    }

    // Returns true when the job must be triggered again.
    fn build_finished(&mut self, build: &Build) -> bool {
        if !build.belongs_to(&self.job_url) {
            return false;
        }
        self.passed = self.passed || build.status == BuildStatus::Success;
        if self.should_retry() {
            self.tries_left -= 1;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Default)]
pub struct JobTracker {
    builds: Vec<TraceableBuild>,
}

impl JobTracker {
    pub fn new() -> JobTracker {
        JobTracker::default()
    }

    /// Tracks `build`, replacing any entry for the same job.
    pub fn register(&mut self, build: TraceableBuild) {
        self.builds.retain(|tracked| tracked.job_url != build.job_url);
        self.builds.push(build);
    }

    pub fn tracked(&self) -> &[TraceableBuild] {
        &self.builds
    }

    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }

    /// Feeds newly finished builds to every tracked job.
    ///
    /// Returns the jobs that must be triggered again, then drops the entries that are done.
    pub fn on_finished_builds<'a, I>(&mut self, finished: I) -> Vec<TraceableBuild>
    where
        I: IntoIterator<Item = &'a Build>,
    {
        let finished: Vec<&Build> = finished.into_iter().collect();
        let mut to_retrigger = Vec::new();
        for tracked in self.builds.iter_mut() {
            for build in &finished {
                if tracked.build_finished(build) {
                    to_retrigger.push(tracked.clone());
                }
            }
        }
        self.builds.retain(|tracked| !tracked.is_done());
        to_retrigger
    }
}
