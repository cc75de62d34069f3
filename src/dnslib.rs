use {
    futures::StreamExt,
    hickory_resolver::proto::{
        op::{Message, MessageType, OpCode, Query, ResponseCode},
        rr::{Name, RData, RecordType},
        runtime::{TokioRuntimeProvider, TokioTime},
        udp::UdpClientStream,
        xfer::{DnsExchange, DnsHandle, DnsRequest, DnsRequestOptions},
        ProtoError, ProtoErrorKind,
    },
    rand::Rng,
    std::{
        future::Future,
        net::{IpAddr, Ipv4Addr, SocketAddr},
        time::Duration,
    },
    thiserror::Error,
};

/// A single record from the answer section, reduced to what the probes need.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerRecord {
    A(Ipv4Addr),
    Other(RecordType),
}

/// Structured result of one successful exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DnsAnswer {
    pub response_code: ResponseCode,
    pub answers: Vec<AnswerRecord>,
}

impl DnsAnswer {
    pub fn from_message(message: &Message) -> Self {
        let answers = message
            .answers()
            .iter()
            .map(|record| match record.data() {
                RData::A(a) => AnswerRecord::A(a.0),
                _ => AnswerRecord::Other(record.record_type()),
            })
            .collect();

        Self {
            response_code: message.response_code(),
            answers,
        }
    }

    /// Address of the first answer, if that answer is an A record.
    pub fn first_address(&self) -> Option<Ipv4Addr> {
        match self.answers.first() {
            Some(AnswerRecord::A(ip)) => Some(*ip),
            _ => None,
        }
    }
}

/// Failure of a single query. Never fatal on its own.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query to {server} timed out after {timeout:?}")]
    Timeout { server: String, timeout: Duration },

    #[error("invalid resolver address {0:?}")]
    InvalidServer(String),

    #[error("invalid query name {name:?}: {source}")]
    InvalidName { name: String, source: ProtoError },

    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed DNS message: {0}")]
    Proto(#[from] ProtoError),

    #[error("exchange with {0} closed without a response")]
    NoResponse(String),
}

/// One timed request/response exchange with a DNS server.
///
/// `server` is the resolver address exactly as read from input (no port).
pub trait QueryService: Send + Sync + 'static {
    fn query(
        &self,
        name: &str,
        record_type: RecordType,
        server: &str,
    ) -> impl Future<Output = Result<DnsAnswer, QueryError>> + Send;
}

/// Plain UDP transport, one datagram out and one back.
///
/// The exchange itself is hickory's: it matches the response to the request
/// id and question and drops anything else that lands on the socket,
/// malformed datagrams included.
#[derive(Clone, Debug)]
pub struct UdpQueryService {
    port: u16,
    timeout: Duration,
}

impl UdpQueryService {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }

    async fn exchange(
        &self,
        request: Message,
        target: SocketAddr,
    ) -> Result<DnsAnswer, QueryError> {
        let stream = UdpClientStream::builder(target, TokioRuntimeProvider::default())
            .with_timeout(Some(self.timeout))
            .build();
        let (client, background) = DnsExchange::connect::<_, _, TokioTime>(stream).await?;
        let background = tokio::spawn(background);

        let response = client
            .send(DnsRequest::new(request, DnsRequestOptions::default()))
            .next()
            .await;
        background.abort();

        match response {
            Some(response) => {
                let response = response?;
                Ok(DnsAnswer::from_message(&response))
            }
            None => Err(QueryError::NoResponse(target.to_string())),
        }
    }
}

pub fn build_query(name: &str, record_type: RecordType) -> Result<Message, QueryError> {
    let fqdn = if name.ends_with('.') {
        name.to_owned()
    } else {
        format!("{name}.")
    };
    let name = Name::from_ascii(&fqdn).map_err(|source| QueryError::InvalidName {
        name: fqdn.clone(),
        source,
    })?;

    let mut message = Message::new();
    message
        .set_id(rand::rng().random())
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(Query::query(name, record_type));
    Ok(message)
}

impl QueryService for UdpQueryService {
    async fn query(
        &self,
        name: &str,
        record_type: RecordType,
        server: &str,
    ) -> Result<DnsAnswer, QueryError> {
        let ip: IpAddr = server
            .parse()
            .map_err(|_| QueryError::InvalidServer(server.to_owned()))?;
        let request = build_query(name, record_type)?;

        let target = SocketAddr::new(ip, self.port);
        let timed_out = || QueryError::Timeout {
            server: server.to_owned(),
            timeout: self.timeout,
        };

        match tokio::time::timeout(self.timeout, self.exchange(request, target)).await {
            Ok(Err(QueryError::Proto(e))) if matches!(e.kind(), ProtoErrorKind::Timeout) => {
                Err(timed_out())
            }
            Ok(result) => result,
            Err(_) => Err(timed_out()),
        }
    }
}
