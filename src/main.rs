extern crate clap;
extern crate ctrlc;
#[macro_use]
extern crate failure;
extern crate jenkins_control;
#[macro_use]
extern crate log;
extern crate log4rs;

use clap::{Parser, Subcommand};
use failure::Error;
use jenkins_control::build_params::collect_parameter_values;
use jenkins_control::job_tracker::{JobTracker, TraceableBuild};
use jenkins_control::model::{Build, Job};
use jenkins_control::{AppSettings, BuildStatus, BuildStatusAggregator, Config, RequestManager};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const CONFIG_FILE_NAME: &str = "jenkins.toml";
const MIN_REFRESH_SECS: u64 = 5;
const SLEEP_STEP: Duration = Duration::from_millis(250);

/// Command-line client for a Jenkins server
#[derive(Parser, Debug)]
#[command(name = "jenkins-control")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to jenkins.toml next to the executable)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize the jobs of the primary view
    Status,

    /// List the views, or the jobs of one view
    View {
        /// View name; lists every view when omitted
        name: Option<String>,
    },

    /// Show a job and its builds
    Job { url: String },

    /// Trigger a build
    Build {
        url: String,

        /// Parameter value, as name=value
        #[arg(short, long = "param", value_parser = parse_key_value)]
        params: Vec<(String, String)>,

        /// File parameter, as name=path
        #[arg(short, long = "file", value_parser = parse_key_value)]
        files: Vec<(String, String)>,

        /// Re-trigger a parameterized build until it succeeds, at most this many runs
        #[arg(short, long)]
        retries: Option<u32>,
    },

    /// Stop the last build of a job
    Stop { url: String },

    /// Print the console output of the last build of a job
    Log { url: String },

    /// Print the test report of the last build of a job
    Tests { url: String },

    /// Show the favorite jobs
    Favorites,

    /// Refresh the primary view summary until Ctrl-C
    Watch,
}

fn parse_key_value(value: &str) -> Result<(String, String), String> {
    match value.find('=') {
        Some(index) if index > 0 => Ok((value[..index].to_string(), value[index + 1..].to_string())),
        _ => Err(format!("expected name=value, got '{}'", value)),
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Unable to initialize logging: {}", e);
    }

    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbosity: u8) -> Result<(), Error> {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {t} - {m}{n}")))
        .build();
    let config = LogConfig::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn default_config_path() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

fn run(cli: Cli) -> Result<(), Error> {
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = Config::from_file(&config_path)?;
    info!("Loaded configuration from {}", config_path.display());

    let manager = RequestManager::new();
    manager.authenticate(&config.server, &config.credentials)?;

    match cli.command {
        Commands::Status => print_status(&manager, &config.server),
        Commands::View { name } => print_view(&manager, &config.server, name),
        Commands::Job { url } => print_job(&manager, &url),
        Commands::Build {
            url,
            params,
            files,
            retries,
        } => trigger_build(&manager, &config.server, &url, params, files, retries),
        Commands::Stop { url } => stop_last_build(&manager, &url),
        Commands::Log { url } => {
            let job = load_job(&manager, &url)?;
            match manager.load_console_text(&job)? {
                Some(text) => print!("{}", text),
                None => println!("{} has not been built yet.", job.display()),
            }
            Ok(())
        }
        Commands::Tests { url } => print_tests(&manager, &url),
        Commands::Favorites => {
            let favorites = config.favorites();
            if favorites.is_empty() {
                println!("No favorite jobs configured.");
                return Ok(());
            }
            let jobs = manager.load_favorite_jobs(favorites.jobs())?;
            for (favorite, job) in favorites.jobs().iter().zip(jobs) {
                match job {
                    Some(job) => print_job_line(&job),
                    None => println!("{:<10} {} (not found)", "-", favorite.name),
                }
            }
            Ok(())
        }
        Commands::Watch => watch(&manager, &config.server),
    }
}

fn load_job(manager: &RequestManager, url: &str) -> Result<Job, Error> {
    manager
        .load_job_by_url(url)?
        .ok_or_else(|| format_err!("Unable to load the job at {}", url))
}

fn primary_view_jobs(manager: &RequestManager, settings: &AppSettings) -> Result<Vec<Job>, Error> {
    let workspace = manager
        .load_workspace(settings)?
        .ok_or_else(|| format_err!("Not logged in to {}", settings.server_url))?;
    match workspace.primary_view {
        Some(view) => Ok(manager.load_view(settings, &view.url)?),
        None => Ok(Vec::new()),
    }
}

fn print_job_line(job: &Job) {
    let mut state = job.status().name().to_string();
    if job.is_building() {
        state.push('*');
    }
    println!("{:<10} {} {}", state, job.display(), job.health_description());
}

fn print_summary(jobs: &[Job]) {
    let aggregator = BuildStatusAggregator::from_statuses(jobs.len(), jobs.iter().map(|job| job.status()));
    if aggregator.has_no_results() {
        println!("No build results.");
        return;
    }
    println!(
        "{} builds: {} broken, {} unstable, {} aborted",
        aggregator.sum_all(),
        aggregator.broken_count(),
        aggregator.unstable_count(),
        aggregator.aborted_count()
    );
}

fn print_status(manager: &RequestManager, settings: &AppSettings) -> Result<(), Error> {
    let jobs = primary_view_jobs(manager, settings)?;
    for job in &jobs {
        print_job_line(job);
    }
    print_summary(&jobs);
    Ok(())
}

fn print_view(manager: &RequestManager, settings: &AppSettings, name: Option<String>) -> Result<(), Error> {
    let workspace = manager
        .load_workspace(settings)?
        .ok_or_else(|| format_err!("Not logged in to {}", settings.server_url))?;
    let name = match name {
        Some(name) => name,
        None => {
            for view in workspace.all_views() {
                let indent = if view.nested { "  " } else { "" };
                println!("{}{} ({})", indent, view.name, view.url);
            }
            return Ok(());
        }
    };
    let view = workspace
        .all_views()
        .into_iter()
        .find(|view| view.name == name)
        .ok_or_else(|| format_err!("No view named '{}'", name))?;
    let jobs = manager.load_view(settings, &view.url)?;
    for job in &jobs {
        print_job_line(job);
    }
    print_summary(&jobs);
    Ok(())
}

fn print_job(manager: &RequestManager, url: &str) -> Result<(), Error> {
    let mut job = load_job(manager, url)?;
    job.builds = manager.load_builds(&job)?;
    print_job_line(&job);
    for parameter in &job.parameters {
        println!(
            "  param {} ({}) default={}",
            parameter.name,
            parameter.raw_type.as_ref().map(|t| t.as_str()).unwrap_or("unknown"),
            parameter.default_value.as_ref().map(|v| v.as_str()).unwrap_or("")
        );
    }
    for build in &job.builds {
        print_build_line(build);
    }
    Ok(())
}

fn print_build_line(build: &Build) {
    let state = if build.building {
        "RUNNING"
    } else {
        build.status.name()
    };
    let started = build
        .started_at()
        .or(build.build_date)
        .map(|date| date.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();
    println!("  #{:<6} {:<10} {}", build.number, state, started);
}

fn to_map(pairs: Vec<(String, String)>) -> BTreeMap<String, String> {
    pairs.into_iter().collect()
}

fn trigger_build(
    manager: &RequestManager,
    settings: &AppSettings,
    url: &str,
    params: Vec<(String, String)>,
    files: Vec<(String, String)>,
    retries: Option<u32>,
) -> Result<(), Error> {
    let job = load_job(manager, url)?;
    if !files.is_empty() {
        let files: BTreeMap<String, PathBuf> = files
            .into_iter()
            .map(|(name, path)| (name, PathBuf::from(path)))
            .collect();
        manager.run_build_with_files(&job, settings, &files)?;
        println!("Triggered {} with files.", job.display());
        return Ok(());
    }
    if !job.has_parameters() {
        manager.run_build(&job, settings)?;
        println!("Triggered {}.", job.display());
        return Ok(());
    }

    let values = collect_parameter_values(&job, &to_map(params))?;
    manager.run_parameterized_build(&job, settings, &values)?;
    println!("Triggered {} with parameters.", job.display());

    let tries = retries.unwrap_or(settings.build_retries);
    let tracked = TraceableBuild::new(&job.url, values, tries)?;
    if tracked.is_done() {
        return Ok(());
    }
    let mut tracker = JobTracker::new();
    tracker.register(tracked);
    follow_retries(manager, settings, &job, tracker)
}

// Polls the RSS feed and re-triggers the job while its builds keep failing.
fn follow_retries(
    manager: &RequestManager,
    settings: &AppSettings,
    job: &Job,
    mut tracker: JobTracker,
) -> Result<(), Error> {
    let running = install_ctrlc_handler()?;
    let mut seen = manager.load_rss_latest_builds(settings)?;
    while !tracker.is_empty() && running.load(Ordering::SeqCst) {
        sleep_while_running(&running, refresh_period(settings));
        let latest = manager.load_rss_latest_builds(settings)?;
        let finished: Vec<Build> = latest
            .iter()
            .filter(|&(name, build)| {
                !build.building && seen.get(name).map(|previous| build.is_after(previous)).unwrap_or(true)
            })
            .map(|(_, build)| build.clone())
            .collect();
        seen = latest;

        for retry in tracker.on_finished_builds(&finished) {
            info!("Build of {} did not succeed, {} tries left", job.display(), retry.tries_left());
            manager.run_parameterized_build(job, settings, &retry.parameters)?;
            println!("Re-triggered {}.", job.display());
        }
    }
    Ok(())
}

fn stop_last_build(manager: &RequestManager, url: &str) -> Result<(), Error> {
    let job = load_job(manager, url)?;
    match job.last_build() {
        Some(build) if build.building => {
            manager.stop_build(build)?;
            println!("Stopped {} #{}.", job.display(), build.number);
        }
        Some(build) => println!("{} #{} is not running.", job.display(), build.number),
        None => println!("{} has not been built yet.", job.display()),
    }
    Ok(())
}

fn print_tests(manager: &RequestManager, url: &str) -> Result<(), Error> {
    let job = load_job(manager, url)?;
    let build = job
        .last_build()
        .ok_or_else(|| format_err!("{} has not been built yet.", job.display()))?;
    let result = match manager.load_test_results(build)? {
        Some(result) => result,
        None => return Ok(()),
    };
    for case in result.cases().filter(|case| case.is_failed()) {
        println!("FAILED {}.{} ({} ms)", case.class_name, case.name, case.duration_millis());
        if let Some(ref details) = case.error_details {
            println!("    {}", details);
        }
    }
    println!(
        "{} tests: {} passed, {} failed, {} skipped",
        result.total_count(),
        result.passed_count(),
        result.failed_count(),
        result.skipped_count()
    );
    Ok(())
}

fn watch(manager: &RequestManager, settings: &AppSettings) -> Result<(), Error> {
    let running = install_ctrlc_handler()?;
    while running.load(Ordering::SeqCst) {
        match primary_view_jobs(manager, settings) {
            Ok(jobs) => {
                let failing: Vec<&Job> = jobs
                    .iter()
                    .filter(|job| match job.status() {
                        BuildStatus::Failure | BuildStatus::Unstable => true,
                        _ => false,
                    })
                    .collect();
                for job in failing {
                    print_job_line(job);
                }
                print_summary(&jobs);
            }
            Err(e) => warn!("Refresh failed: {}", e),
        }
        sleep_while_running(&running, refresh_period(settings));
    }
    info!("Stopped watching {}", settings.server_url);
    Ok(())
}

fn install_ctrlc_handler() -> Result<Arc<AtomicBool>, Error> {
    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = running.clone();
    ctrlc::set_handler(move || {
        handler_flag.store(false, Ordering::SeqCst);
    })?;
    Ok(running)
}

fn refresh_period(settings: &AppSettings) -> Duration {
    Duration::from_secs(settings.refresh_period_secs.max(MIN_REFRESH_SECS))
}

fn sleep_while_running(running: &AtomicBool, period: Duration) {
    let start = Instant::now();
    while running.load(Ordering::SeqCst) && start.elapsed() < period {
        thread::sleep(SLEEP_STEP);
    }
}
