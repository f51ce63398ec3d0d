#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    pub suites: Vec<TestSuite>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestSuite {
    pub name: String,
    pub cases: Vec<TestCase>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub name: String,
    pub class_name: String,
    pub error_details: Option<String>,
    pub error_stack_trace: Option<String>,
    pub skipped: bool,
    /// Seconds, as reported by the test report API.
    pub duration: f64,
    pub status: Option<String>,
}

impl TestCase {
    pub fn duration_millis(&self) -> i64 {
        (self.duration * 1000.0) as i64
    }

    pub fn is_failed(&self) -> bool {
        if self.skipped {
            return false;
        }
        match self.status.as_ref().map(|s| s.as_str()) {
            Some("FAILED") | Some("REGRESSION") => true,
            Some(_) => false,
            None => self.error_details.is_some() || self.error_stack_trace.is_some(),
        }
    }
}

impl TestResult {
    pub fn cases<'a>(&'a self) -> impl Iterator<Item = &'a TestCase> + 'a {
        self.suites.iter().flat_map(|suite| suite.cases.iter())
    }

    pub fn total_count(&self) -> usize {
        self.cases().count()
    }

    pub fn failed_count(&self) -> usize {
        self.cases().filter(|case| case.is_failed()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.cases().filter(|case| case.skipped).count()
    }

    pub fn passed_count(&self) -> usize {
        self.total_count() - self.failed_count() - self.skipped_count()
    }
}
