mod catalogue;
mod category;
mod check;
mod client;
mod concurrency;
mod error;
mod executor;
mod fixture;
mod harness;
mod predicate;
mod report;
mod session;
mod supervisor;

#[cfg(test)]
mod tests;

pub use catalogue::{build_catalogue, build_category};
pub use category::{Category, CategoryKind};
pub use check::{
    BurstCheck, Check, CheckContext, DeleteLifecycleCheck, FollowUp, RequestCheck,
    SymlinkEscapeCheck,
};
pub use client::{HttpClient, HttpExchange, RequestSpec};
pub use concurrency::{BurstOutcome, ConcurrencyRunner};
pub use error::{CheckError, CheckResult, ShutdownError, StartError, StartResult};
pub use executor::ScenarioExecutor;
pub use fixture::{Fixture, FixtureGuard};
pub use harness::{SessionRun, check_preconditions, run_session};
pub use predicate::{
    AllOf, BodyContains, BodyExcludes, BodyLenAtLeast, HeaderPresent, Responded,
    ResponsePredicate, StatusIs, Verdict,
};
pub use report::Report;
pub use session::{Readiness, ReadinessPolicy, SessionBuilder, TestResult, TestSession};
pub use supervisor::{
    PortManager, ProbeOutcome, ProbeStep, ProcessSupervisor, ReadinessProbe, ServerHandle,
    ServerState, ShutdownOutcome,
};

pub use reqwest::Method;
