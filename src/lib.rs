//! Verify DNS resolvers before trusting them.
//!
//! Every candidate resolver goes through two probes:
//!
//! 1. Poisoning: random, nonexistent names under a set of control domains must
//!    not come back with `NOERROR`.
//! 2. Hijacking: the answer for a known test domain must match the address
//!    obtained once from a trusted resolver at startup.
//!
//! Resolvers passing both are appended to the output file. See [`pool::run`].

pub mod args;
pub mod dnslib;
pub mod error;
pub mod pool;
pub mod probe;
pub mod structs;
pub mod utils;

pub use {
    dnslib::{AnswerRecord, DnsAnswer, QueryError, QueryService, UdpQueryService},
    error::{Error, Result},
    structs::{Baseline, ProbeOutcome, RunSummary, VerifyConfig},
};
