mod prober;

pub use prober::{ProberBuildError, StatusProber};
