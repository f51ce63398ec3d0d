pub mod build;
pub mod health;
pub mod job;
pub mod parameter;
pub mod test_result;
pub mod workspace;

pub use self::build::Build;
pub use self::health::{strip_health_suffix, Health};
pub use self::job::{Job, JobKind};
pub use self::parameter::{ParameterDefinition, ParameterType};
pub use self::test_result::{TestCase, TestResult, TestSuite};
pub use self::workspace::{View, Workspace};
