use build_status::BuildStatus;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

// Format of build ids on Jenkins releases before 1.597.
const LEGACY_BUILD_ID_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

#[derive(Debug, Clone, PartialEq)]
pub struct Build {
    /// URL of the owning job. Lookup-only, the job itself is not held.
    pub job_url: String,
    pub url: String,
    pub number: u32,
    pub building: bool,
    pub status: BuildStatus,
    /// Epoch millis; 0 when unknown (always 0 for builds read from the RSS feed).
    pub timestamp: i64,
    pub duration: Option<i64>,
    pub build_date: Option<DateTime<Utc>>,
    pub message: Option<String>,
}

impl Build {
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        if self.timestamp == 0 {
            return None;
        }
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    pub fn is_after(&self, other: &Build) -> bool {
        self.number > other.number
    }

    pub fn belongs_to(&self, job_url: &str) -> bool {
        !job_url.is_empty() && self.url.contains(job_url)
    }
}

pub fn parse_legacy_build_id(id: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(id, LEGACY_BUILD_ID_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn build(number: u32, timestamp: i64) -> Build {
        Build {
            job_url: "http://jenkins/job/app/".to_string(),
            url: format!("http://jenkins/job/app/{}/", number),
            number: number,
            building: false,
            status: BuildStatus::Success,
            timestamp: timestamp,
            duration: None,
            build_date: None,
            message: None,
        }
    }

    #[test]
    fn zero_timestamp_means_unknown_start() {
        assert_eq!(build(1, 0).started_at(), None);
        let started = build(1, 1_500_000_000_000).started_at().unwrap();
        assert_eq!(started.year(), 2017);
    }

    #[test]
    fn newer_build_numbers_are_after() {
        assert!(build(12, 0).is_after(&build(11, 0)));
        assert!(!build(11, 0).is_after(&build(11, 0)));
    }

    #[test]
    fn legacy_ids_are_dates() {
        let date = parse_legacy_build_id("2012-04-02_15-26-29").unwrap();
        assert_eq!((date.month(), date.day(), date.hour()), (4, 2, 15));
        assert_eq!(parse_legacy_build_id("42"), None);
    }

    #[test]
    fn build_belongs_to_job_by_url() {
        assert!(build(3, 0).belongs_to("http://jenkins/job/app/"));
        assert!(!build(3, 0).belongs_to("http://jenkins/job/other/"));
        assert!(!build(3, 0).belongs_to(""));
    }
}
