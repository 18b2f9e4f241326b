use std::{
    fmt,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use saber_analysis::{event::EventTable, reliability::ReliabilityResult};

/// Header of the result table, in [`ReliabilityResult`] field order.
pub const RESULT_HEADERS: [&str; 4] = ["category", "stat", "pa", "correlation"];

/// Where a command writes its report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => f.write_str("stdout"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Buffered report writer bound to its [`Destination`].
pub struct Output {
    destination: Destination,
    writer: Box<dyn Write>,
}

impl Output {
    /// Opens `path` for writing, or stdout if `path` is `None`.
    pub fn create(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let (destination, writer): (_, Box<dyn Write>) = match path {
            Some(path) => {
                let file = File::create(&path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                (Destination::File(path), Box::new(BufWriter::new(file)))
            }
            None => (Destination::Stdout, Box::new(io::stdout().lock())),
        };
        Ok(Self {
            destination,
            writer,
        })
    }

    #[must_use]
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn save_json<T>(value: &T, path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize + ?Sized,
    {
        Self::create(path)?.write_json(value)
    }

    /// Writes `value` as pretty-printed JSON followed by a newline.
    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize + ?Sized,
    {
        let Self {
            destination,
            writer,
        } = self;
        serde_json::to_writer_pretty(&mut *writer, value)
            .with_context(|| format!("Failed to write JSON to {destination}"))?;
        writer
            .write_all(b"\n")
            .and_then(|()| writer.flush())
            .with_context(|| format!("Failed to finish JSON output to {destination}"))
    }

    /// Writes a result table, header included even when `results` is empty.
    pub fn write_results_csv(&mut self, results: &[ReliabilityResult]) -> anyhow::Result<()> {
        let Self {
            destination,
            writer,
        } = self;
        let mut records = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        records
            .write_record(RESULT_HEADERS)
            .with_context(|| format!("Failed to write CSV header to {destination}"))?;
        for result in results {
            records
                .serialize(result)
                .with_context(|| format!("Failed to write CSV record to {destination}"))?;
        }
        records
            .flush()
            .with_context(|| format!("Failed to flush CSV output to {destination}"))
    }
}

/// Deserializes a JSON file. `kind` names the file in error messages.
pub fn read_json_file<T, P>(kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {kind} file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid {kind} JSON in {}", path.display()))
}

/// Read a pitch-level events CSV file
pub fn read_events_file<P>(path: P) -> anyhow::Result<EventTable>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let table = EventTable::from_csv_path(path)
        .with_context(|| format!("Failed to load events file: {}", path.display()))?;
    tracing::info!(path = %path.display(), events = table.len(), "loaded events");
    Ok(table)
}

/// Read a result table written by [`Output::write_results_csv()`]
pub fn read_results_file<P>(path: P) -> anyhow::Result<Vec<ReliabilityResult>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open results file: {}", path.display()))?;
    reader
        .deserialize()
        .enumerate()
        .map(|(i, record)| {
            record.with_context(|| {
                format!(
                    "Failed to parse record #{} of results file: {}",
                    i + 1,
                    path.display()
                )
            })
        })
        .collect()
}
