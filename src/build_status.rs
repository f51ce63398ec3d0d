use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuildStatus {
    Failure,
    Unstable,
    Aborted,
    Success,
    Stable,
    Null,
    // Not a build outcome: stands in for containers that have no build state.
    Folder,
}

const ALL_STATUSES: [BuildStatus; 7] = [
    BuildStatus::Failure,
    BuildStatus::Unstable,
    BuildStatus::Aborted,
    BuildStatus::Success,
    BuildStatus::Stable,
    BuildStatus::Null,
    BuildStatus::Folder,
];

impl BuildStatus {
    pub fn name(&self) -> &'static str {
        match *self {
            BuildStatus::Failure => "FAILURE",
            BuildStatus::Unstable => "UNSTABLE",
            BuildStatus::Aborted => "ABORTED",
            BuildStatus::Success => "SUCCESS",
            BuildStatus::Stable => "STABLE",
            BuildStatus::Null => "NULL",
            BuildStatus::Folder => "FOLDER",
        }
    }

    /// Color token Jenkins uses for jobs in this state.
    pub fn color(&self) -> &'static str {
        match *self {
            BuildStatus::Failure => "red",
            BuildStatus::Unstable => "yellow",
            BuildStatus::Aborted => "aborted",
            BuildStatus::Success | BuildStatus::Stable => "blue",
            BuildStatus::Null | BuildStatus::Folder => "disabled",
        }
    }

    /// Style token a front end can map to an icon.
    pub fn icon_name(&self) -> &'static str {
        match *self {
            BuildStatus::Success | BuildStatus::Stable => "blue",
            BuildStatus::Failure => "red",
            BuildStatus::Unstable => "yellow",
            BuildStatus::Aborted | BuildStatus::Null => "grey",
            BuildStatus::Folder => "folder",
        }
    }

    /// Parses a `result` value from the JSON API. Unknown values map to `Null`.
    pub fn parse_status(status: Option<&str>) -> BuildStatus {
        let status = match status {
            Some(status) => status,
            None => return BuildStatus::Null,
        };
        match ALL_STATUSES
            .iter()
            .find(|candidate| candidate.name().eq_ignore_ascii_case(status))
        {
            Some(found) => *found,
            None => {
                warn!("Unsupported build status: {}", status);
                BuildStatus::Null
            }
        }
    }

    /// Maps a job color such as `blue_anime` to a status by prefix match on the color token.
    pub fn from_color(color: &str) -> BuildStatus {
        ALL_STATUSES
            .iter()
            .find(|candidate| color.starts_with(candidate.color()))
            .cloned()
            .unwrap_or(BuildStatus::Null)
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Counts the last build outcome of every job in a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStatusAggregator {
    nb_jobs: usize,
    broken: usize,
    succeeded: usize,
    unstable: usize,
    aborted: usize,
}

impl BuildStatusAggregator {
    pub fn new(nb_jobs: usize) -> BuildStatusAggregator {
        BuildStatusAggregator {
            nb_jobs: nb_jobs,
            broken: 0,
            succeeded: 0,
            unstable: 0,
            aborted: 0,
        }
    }

    pub fn empty() -> BuildStatusAggregator {
        BuildStatusAggregator::new(0)
    }

    pub fn from_statuses<I>(nb_jobs: usize, statuses: I) -> BuildStatusAggregator
    where
        I: IntoIterator<Item = BuildStatus>,
    {
        let mut aggregator = BuildStatusAggregator::new(nb_jobs);
        for status in statuses {
            aggregator.visit(status);
        }
        aggregator
    }

    pub fn visit(&mut self, status: BuildStatus) {
        match status {
            BuildStatus::Failure => self.broken += 1,
            BuildStatus::Success => self.succeeded += 1,
            BuildStatus::Unstable => self.unstable += 1,
            BuildStatus::Aborted => self.aborted += 1,
            BuildStatus::Stable | BuildStatus::Null | BuildStatus::Folder => {}
        }
    }

    pub fn broken_count(&self) -> usize {
        self.broken
    }

    pub fn unstable_count(&self) -> usize {
        self.unstable
    }

    pub fn aborted_count(&self) -> usize {
        self.aborted
    }

    pub fn succeeded_count(&self) -> usize {
        self.succeeded
    }

    /// Builds shown on the dashboard. Aborted and unknown builds are not part of the total.
    pub fn sum_all(&self) -> usize {
        self.succeeded + self.unstable + self.broken
    }

    pub fn has_no_results(&self) -> bool {
        self.nb_jobs == 0 || self.sum_all() == 0
    }
}
