//! Scripted `QueryService` shared by the integration tests.

#![allow(dead_code)]

use {
    hickory_resolver::proto::{op::ResponseCode, rr::RecordType},
    resolver_verify::{AnswerRecord, DnsAnswer, QueryError, QueryService, VerifyConfig},
    std::{
        collections::HashMap,
        net::Ipv4Addr,
        path::Path,
        sync::Mutex,
        time::Duration,
    },
};

pub const TRUSTED: &str = "1.1.1.1";

type Responder = dyn Fn(&str, &str) -> Result<DnsAnswer, QueryError> + Send + Sync;

/// Answers every query through a closure of `(server, name)` and remembers
/// every query it saw.
pub struct MockService {
    responder: Box<Responder>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockService {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str, &str) -> Result<DnsAnswer, QueryError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Names queried against `server`, in order.
    pub fn names_for(&self, server: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| s == server)
            .map(|(_, name)| name.clone())
            .collect()
    }

    pub fn calls_per_server(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for (server, _) in self.calls.lock().unwrap().iter() {
            *counts.entry(server.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl QueryService for MockService {
    async fn query(
        &self,
        name: &str,
        _record_type: RecordType,
        server: &str,
    ) -> Result<DnsAnswer, QueryError> {
        self.calls
            .lock()
            .unwrap()
            .push((server.to_owned(), name.to_owned()));
        (self.responder)(server, name)
    }
}

pub fn nxdomain() -> Result<DnsAnswer, QueryError> {
    Ok(DnsAnswer {
        response_code: ResponseCode::NXDomain,
        answers: Vec::new(),
    })
}

pub fn noerror_empty() -> Result<DnsAnswer, QueryError> {
    Ok(DnsAnswer {
        response_code: ResponseCode::NoError,
        answers: Vec::new(),
    })
}

pub fn address(ip: [u8; 4]) -> Result<DnsAnswer, QueryError> {
    Ok(DnsAnswer {
        response_code: ResponseCode::NoError,
        answers: vec![AnswerRecord::A(Ipv4Addr::from(ip))],
    })
}

pub fn cname_first(ip: [u8; 4]) -> Result<DnsAnswer, QueryError> {
    Ok(DnsAnswer {
        response_code: ResponseCode::NoError,
        answers: vec![
            AnswerRecord::Other(RecordType::CNAME),
            AnswerRecord::A(Ipv4Addr::from(ip)),
        ],
    })
}

pub fn cname_only() -> Result<DnsAnswer, QueryError> {
    Ok(DnsAnswer {
        response_code: ResponseCode::NoError,
        answers: vec![AnswerRecord::Other(RecordType::CNAME)],
    })
}

pub fn timeout(server: &str) -> Result<DnsAnswer, QueryError> {
    Err(QueryError::Timeout {
        server: server.to_owned(),
        timeout: Duration::from_secs(2),
    })
}

pub fn invalid_server(server: &str) -> Result<DnsAnswer, QueryError> {
    Err(QueryError::InvalidServer(server.to_owned()))
}

pub fn config_in(dir: &Path, threads: usize) -> VerifyConfig {
    VerifyConfig {
        resolvers_file: dir.join("resolvers.txt"),
        output_file: dir.join("verify-resolvers.txt"),
        threads,
        trusted_resolver: TRUSTED.to_owned(),
        ..VerifyConfig::default()
    }
}

pub fn is_target(config: &VerifyConfig, name: &str) -> bool {
    name == config.target_domain
}
