use {
    crate::{
        dnslib::{AnswerRecord, QueryService},
        error::{BaselineFailure, Error, Result},
        structs::{Baseline, ProbeOutcome, VerifyConfig},
        utils::random_label,
    },
    hickory_resolver::proto::{op::ResponseCode, rr::RecordType},
    std::time::Instant,
    tracing::{debug, info, warn},
};

/// Asks the trusted resolver for the target domain and keeps its first A record.
pub async fn resolve_baseline<Q: QueryService>(
    service: &Q,
    config: &VerifyConfig,
) -> Result<Baseline> {
    let failure = |reason: BaselineFailure| Error::Baseline {
        domain: config.target_domain.clone(),
        server: config.trusted_resolver.clone(),
        reason,
    };

    let answer = service
        .query(&config.target_domain, RecordType::A, &config.trusted_resolver)
        .await
        .map_err(|e| failure(e.into()))?;

    if answer.answers.is_empty() {
        return Err(failure(BaselineFailure::NoAnswers));
    }

    let address = answer
        .answers
        .iter()
        .find_map(|record| match record {
            AnswerRecord::A(ip) => Some(*ip),
            AnswerRecord::Other(_) => None,
        })
        .ok_or_else(|| failure(BaselineFailure::NoAddress))?;

    // Candidates are judged on their first record only, so an alias in front
    // of the address means honest resolvers end up without a verdict.
    let aliased = answer.first_address().is_none();
    if aliased {
        warn!(
            domain = %config.target_domain,
            %address,
            "trusted answer does not lead with an A record, candidates answering alike get no verdict"
        );
    }

    info!(
        domain = %config.target_domain,
        %address,
        "baseline address acquired"
    );
    Ok(Baseline { address, aliased })
}

/// Returns `true` as soon as one random name under a control domain comes
/// back with NOERROR. Transport failures are skipped.
pub async fn is_poisoned<Q: QueryService>(
    service: &Q,
    config: &VerifyConfig,
    resolver: &str,
) -> bool {
    for control in &config.control_domains {
        let name = format!("{}.{}", random_label(config.label_length), control);

        match service.query(&name, RecordType::A, resolver).await {
            Ok(answer) if answer.response_code == ResponseCode::NoError => {
                debug!(%resolver, %name, "nonexistent name resolved");
                return true;
            }
            Ok(_) => {}
            Err(e) => debug!(%resolver, %name, error = %e, "checking nx domain failed"),
        }
    }

    false
}

/// Compares the resolver's answer for the target domain with the baseline.
pub async fn check_hijack<Q: QueryService>(
    service: &Q,
    config: &VerifyConfig,
    baseline: &Baseline,
    resolver: &str,
) -> ProbeOutcome {
    let answer = match service
        .query(&config.target_domain, RecordType::A, resolver)
        .await
    {
        Ok(answer) => answer,
        Err(e) => {
            warn!(%resolver, error = %e, "target query failed");
            return ProbeOutcome::QueryError;
        }
    };

    match answer.first_address() {
        Some(address) if address == baseline.address => {
            info!(%resolver, "DNS checked pass");
            ProbeOutcome::Verified
        }
        Some(address) => {
            warn!(%resolver, %address, expected = %baseline, "DNS hijacking detected");
            ProbeOutcome::Hijacked
        }
        None => {
            warn!(
                %resolver,
                rcode = %answer.response_code,
                answers = answer.answers.len(),
                "no A record leading the answer, no verdict"
            );
            ProbeOutcome::NoVerdict
        }
    }
}

/// Full two-stage check of one candidate.
pub async fn probe_resolver<Q: QueryService>(
    service: &Q,
    config: &VerifyConfig,
    baseline: &Baseline,
    resolver: &str,
) -> ProbeOutcome {
    let started = Instant::now();

    let outcome = if is_poisoned(service, config, resolver).await {
        warn!(%resolver, "DNS poison detected");
        ProbeOutcome::Poisoned
    } else {
        check_hijack(service, config, baseline, resolver).await
    };

    info!(%resolver, ?outcome, elapsed = ?started.elapsed(), "task finished");
    outcome
}
