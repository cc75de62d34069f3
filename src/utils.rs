use {
    crate::{
        error::{Error, Result},
        structs::LABEL_ALPHABET,
    },
    rand::{rng, Rng},
    std::{borrow::Cow, net::IpAddr, path::Path},
    tokio::{
        fs::{File, OpenOptions},
        io::{AsyncBufReadExt, BufReader, Split},
    },
};

/// Fresh random DNS label, e.g. `k3x9q0a7mz`.
pub fn random_label(length: usize) -> String {
    let mut rng = rng();
    (0..length)
        .map(|_| char::from(LABEL_ALPHABET[rng.random_range(0..LABEL_ALPHABET.len())]))
        .collect()
}

/// Opens the resolvers file as a stream of raw lines so it can be fed with
/// backpressure. Lines are bytes, not `String`, so one undecodable line can't
/// end ingestion.
pub async fn open_candidates(path: &Path) -> Result<Split<BufReader<File>>> {
    let file = File::open(path).await.map_err(|source| Error::Open {
        path: path.to_owned(),
        source,
    })?;
    Ok(BufReader::new(file).split(b'\n'))
}

/// Opens (or creates) the output file in append mode.
pub async fn open_output(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|source| Error::Open {
            path: path.to_owned(),
            source,
        })
}

/// Decodes a raw input line, replacing invalid UTF-8.
pub fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(raw)
}

/// Trims an input line. `None` for blank lines.
pub fn normalize_candidate(line: &str) -> Option<&str> {
    let line = line.trim();
    (!line.is_empty()).then_some(line)
}

pub fn is_ip_address(candidate: &str) -> bool {
    candidate.parse::<IpAddr>().is_ok()
}
