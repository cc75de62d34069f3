use {
    crate::args::Args,
    std::{fmt, net::Ipv4Addr, path::PathBuf, time::Duration},
};

pub const DEFAULT_TARGET_DOMAIN: &str = "devepapps.zoomdev.us";
pub const DEFAULT_TRUSTED_RESOLVER: &str = "1.1.1.1";
pub const DEFAULT_CONTROL_DOMAINS: &[&str] = &[
    "facebook.com",
    "paypal.com",
    "google.com",
    "bet365.com",
    // Not expected to exist at all.
    "nonexist123.com",
    "zoomdev.us",
];
pub const LABEL_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
pub const LABEL_LENGTH: usize = 10;

/// Immutable settings for one verification run, built once at startup.
#[derive(Clone, Debug)]
pub struct VerifyConfig {
    pub resolvers_file: PathBuf,
    pub output_file: PathBuf,
    pub threads: usize,
    pub validate: bool,
    pub target_domain: String,
    pub trusted_resolver: String,
    pub control_domains: Vec<String>,
    pub label_length: usize,
    pub port: u16,
    pub timeout: Duration,
    pub input_capacity: usize,
    pub output_capacity: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            resolvers_file: PathBuf::from("resolvers.txt"),
            output_file: PathBuf::from("verify-resolvers.txt"),
            threads: 100,
            validate: false,
            target_domain: DEFAULT_TARGET_DOMAIN.to_owned(),
            trusted_resolver: DEFAULT_TRUSTED_RESOLVER.to_owned(),
            control_domains: DEFAULT_CONTROL_DOMAINS
                .iter()
                .map(|domain| (*domain).to_owned())
                .collect(),
            label_length: LABEL_LENGTH,
            port: 53,
            timeout: Duration::from_secs(2),
            input_capacity: 500,
            output_capacity: 500,
        }
    }
}

impl VerifyConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            resolvers_file: PathBuf::from(&args.resolvers),
            output_file: PathBuf::from(&args.output),
            threads: args.threads.max(1),
            validate: args.validate,
            ..Self::default()
        }
    }
}

/// Ground-truth address of the target domain, read-only once acquired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Baseline {
    pub address: Ipv4Addr,
    /// The trusted answer led with a non-A record (usually a CNAME).
    pub aliased: bool,
}

impl fmt::Display for Baseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.address, f)
    }
}

/// Terminal classification of one resolver candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Claimed that a random, nonexistent name resolved.
    Poisoned,
    /// The hijack query failed in transport.
    QueryError,
    /// Answered the target domain with a different address.
    Hijacked,
    /// Answered the target domain without a leading A record.
    NoVerdict,
    Verified,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines dropped by `--validate`, never probed.
    pub invalid: usize,
    pub poisoned: usize,
    pub query_errors: usize,
    pub hijacked: usize,
    pub no_verdict: usize,
    pub verified: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: ProbeOutcome) {
        match outcome {
            ProbeOutcome::Poisoned => self.poisoned += 1,
            ProbeOutcome::QueryError => self.query_errors += 1,
            ProbeOutcome::Hijacked => self.hijacked += 1,
            ProbeOutcome::NoVerdict => self.no_verdict += 1,
            ProbeOutcome::Verified => self.verified += 1,
        }
    }

    pub fn merge(&mut self, other: Self) {
        self.invalid += other.invalid;
        self.poisoned += other.poisoned;
        self.query_errors += other.query_errors;
        self.hijacked += other.hijacked;
        self.no_verdict += other.no_verdict;
        self.verified += other.verified;
    }

    pub fn total(&self) -> usize {
        self.invalid
            + self.poisoned
            + self.query_errors
            + self.hijacked
            + self.no_verdict
            + self.verified
    }
}
