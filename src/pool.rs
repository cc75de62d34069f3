//! The verification pipeline.
//!
//! Ingestion feeds a bounded input queue, `threads` workers drain it and run
//! both probes on every candidate, and a single sink task owns the output
//! writer and appends each verified resolver as one line. The input queue is
//! closed once the file is exhausted, all workers are joined, and only then is
//! the output queue closed so the sink can flush and exit.

use {
    crate::{
        dnslib::QueryService,
        error::Result,
        probe::{probe_resolver, resolve_baseline},
        structs::{Baseline, ProbeOutcome, RunSummary, VerifyConfig},
        utils::{
            decode_line, is_ip_address, normalize_candidate, open_candidates, open_output,
        },
    },
    futures::future::try_join_all,
    std::sync::Arc,
    tokio::{
        io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, Split},
        sync::{mpsc, Mutex},
    },
    tracing::{debug, info, warn},
};

type JobQueue = Arc<Mutex<mpsc::Receiver<String>>>;

/// Runs a complete verification: baseline, then files, then the worker pool.
///
/// The output file is only opened once the baseline is known, so a failing
/// trusted resolver leaves no trace on disk.
pub async fn run<Q: QueryService>(
    config: Arc<VerifyConfig>,
    service: Arc<Q>,
) -> Result<RunSummary> {
    let baseline = resolve_baseline(service.as_ref(), &config).await?;
    let output = open_output(&config.output_file).await?;
    let candidates = open_candidates(&config.resolvers_file).await?;

    verify_candidates(config, service, Arc::new(baseline), candidates, output).await
}

pub async fn verify_candidates<Q, R, W>(
    config: Arc<VerifyConfig>,
    service: Arc<Q>,
    baseline: Arc<Baseline>,
    candidates: Split<R>,
    output: W,
) -> Result<RunSummary>
where
    Q: QueryService,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let threads = config.threads.max(1);
    let (job_sender, job_receiver) = mpsc::channel::<String>(config.input_capacity.max(1));
    let (result_sender, result_receiver) = mpsc::channel::<String>(config.output_capacity.max(1));
    let jobs: JobQueue = Arc::new(Mutex::new(job_receiver));

    let sink = tokio::spawn(run_sink(result_receiver, output));

    let workers = (0..threads)
        .map(|id| {
            tokio::spawn(worker(
                id,
                Arc::clone(&service),
                Arc::clone(&config),
                Arc::clone(&baseline),
                Arc::clone(&jobs),
                result_sender.clone(),
            ))
        })
        .collect::<Vec<_>>();
    drop(jobs);
    drop(result_sender);

    // Dropping the sender on return closes the input queue.
    let ingested = ingest(candidates, job_sender, config.validate).await;

    let mut summary = RunSummary::default();
    for worker_summary in try_join_all(workers).await? {
        summary.merge(worker_summary);
    }
    let written = sink.await??;

    summary.invalid += ingested?;
    info!(
        verified = summary.verified,
        written,
        poisoned = summary.poisoned,
        hijacked = summary.hijacked,
        query_errors = summary.query_errors,
        no_verdict = summary.no_verdict,
        invalid = summary.invalid,
        "verification finished"
    );
    Ok(summary)
}

/// Feeds the input queue, waiting whenever it is full. Returns the number of
/// lines rejected by validation.
///
/// Lines that aren't valid UTF-8 are decoded lossily and queued like any
/// other line, so they fail as query errors (or as invalid under validation).
async fn ingest<R>(
    mut lines: Split<R>,
    jobs: mpsc::Sender<String>,
    validate: bool,
) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut queued = 0usize;
    let mut invalid = 0usize;

    while let Some(raw) = lines.next_segment().await? {
        let line = decode_line(&raw);
        let Some(candidate) = normalize_candidate(&line) else {
            continue;
        };

        if validate && !is_ip_address(candidate) {
            warn!(line = %candidate, "not an IP address, skipped");
            invalid += 1;
            continue;
        }

        if jobs.send(candidate.to_owned()).await.is_err() {
            warn!("all workers are gone, stopping ingestion");
            break;
        }
        queued += 1;
    }

    info!(queued, "all candidates queued");
    Ok(invalid)
}

async fn worker<Q: QueryService>(
    id: usize,
    service: Arc<Q>,
    config: Arc<VerifyConfig>,
    baseline: Arc<Baseline>,
    jobs: JobQueue,
    results: mpsc::Sender<String>,
) -> RunSummary {
    let mut summary = RunSummary::default();

    loop {
        // The lock is released at the end of the statement, before probing.
        let next = jobs.lock().await.recv().await;
        let Some(resolver) = next else {
            break;
        };

        let outcome = probe_resolver(service.as_ref(), &config, &baseline, &resolver).await;
        summary.record(outcome);

        if outcome == ProbeOutcome::Verified && results.send(resolver).await.is_err() {
            warn!(worker = id, "result sink is gone, verified resolver dropped");
        }
    }

    debug!(worker = id, processed = summary.total(), "worker finished");
    summary
}

/// Single writer for the output destination. Returns the number of lines written.
pub async fn run_sink<W>(
    mut results: mpsc::Receiver<String>,
    mut output: W,
) -> std::io::Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0usize;

    while let Some(resolver) = results.recv().await {
        output.write_all(format!("{resolver}\n").as_bytes()).await?;
        output.flush().await?;
        written += 1;
    }

    output.shutdown().await?;
    Ok(written)
}
