// Reader for the Atom feed served at `<server>/rssLatest`, one entry per job
// holding its most recent build.
//
// This is a pattern scan over the markup Jenkins emits, not an XML parser.
// Known limits:
// - `<![CDATA[...]]>` sections are not unwrapped, so a CDATA title fails the title pattern and the entry is skipped;
// - `xml:base` on an entry is ignored, so links are taken exactly as written;
// - the first double-quoted `href` on a `<link>` is used, wherever it sits among the attributes;
// - only the predefined XML entities and `&#39;` are decoded.

use build_status::BuildStatus;
use chrono::{DateTime, Utc};
use errors::JenkinsError;
use model::Build;
use regex::Regex;
use std::collections::BTreeMap;

lazy_static! {
    static ref FEED_REGEX: Regex = Regex::new(r"<feed[\s>]").unwrap();
    static ref ENTRY_REGEX: Regex = Regex::new(r"(?s)<entry(?:\s[^>]*)?>(.*?)</entry>").unwrap();
    static ref TITLE_REGEX: Regex = Regex::new(r"(?s)<title[^>]*>(.*?)</title>").unwrap();
    static ref LINK_REGEX: Regex = Regex::new(r#"<link[^>]*href="([^"]+)""#).unwrap();
    static ref PUBLISHED_REGEX: Regex = Regex::new(r"<published>(.*?)</published>").unwrap();
    static ref BUILD_TITLE_REGEX: Regex = Regex::new(r"^(.+) #(\d+) \((.*)\)$").unwrap();
}

/// Latest build of every job listed in the feed, keyed by job name.
pub fn parse_rss_latest_builds(payload: &str) -> Result<BTreeMap<String, Build>, JenkinsError> {
    if !FEED_REGEX.is_match(payload) {
        return Err(JenkinsError::parse("not an Atom feed", payload));
    }

    let mut builds: BTreeMap<String, Build> = BTreeMap::new();
    for entry in ENTRY_REGEX.captures_iter(payload) {
        let entry = &entry[1];
        let title = match capture(&TITLE_REGEX, entry) {
            Some(title) => unescape(title.trim()),
            None => continue,
        };
        let url = match capture(&LINK_REGEX, entry) {
            Some(url) => unescape(url),
            None => continue,
        };
        let (job_name, build) = match to_build(&title, url, capture(&PUBLISHED_REGEX, entry)) {
            Some(parsed) => parsed,
            None => {
                debug!("--Jenkins--: Skipping RSS entry with unexpected title '{}'", title);
                continue;
            }
        };

        let newer = match builds.get(&job_name) {
            Some(existing) => build.is_after(existing),
            None => true,
        };
        if newer {
            builds.insert(job_name, build);
        }
    }
    Ok(builds)
}

/// Status reported by the feed message, e.g. "broken since this build" or "back to normal".
pub fn status_from_message(message: &str) -> BuildStatus {
    let message = message.to_lowercase();
    if message.contains("broken") || message.contains("failed") {
        BuildStatus::Failure
    } else if message.contains("aborted") {
        BuildStatus::Aborted
    } else if message.contains("unstable") || message.contains("test") {
        BuildStatus::Unstable
    } else if message.contains("stable") || message.contains("normal") || message.contains("fixed") {
        BuildStatus::Success
    } else {
        BuildStatus::Null
    }
}

fn to_build(title: &str, url: String, published: Option<&str>) -> Option<(String, Build)> {
    let captures = BUILD_TITLE_REGEX.captures(title)?;
    let number = captures[2].parse::<u32>().ok()?;
    let message = captures[3].to_string();
    let build_date = published.and_then(|date| {
        DateTime::parse_from_rfc3339(date.trim())
            .ok()
            .map(|date| date.with_timezone(&Utc))
    });

    let build = Build {
        job_url: job_url_of(&url),
        url: url,
        number: number,
        building: false,
        status: status_from_message(&message),
        timestamp: 0,
        duration: None,
        build_date: build_date,
        message: Some(message),
    };
    Some((captures[1].to_string(), build))
}

// http://ci/job/app/42/ -> http://ci/job/app/
fn job_url_of(build_url: &str) -> String {
    let trimmed = build_url.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(index) => trimmed[..index + 1].to_string(),
        None => build_url.to_string(),
    }
}

fn capture<'a>(regex: &Regex, text: &'a str) -> Option<&'a str> {
    regex
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|found| found.as_str())
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
