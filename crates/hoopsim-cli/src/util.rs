use std::{
    fs::{self, File},
    io::{self, BufRead as _, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use hoopsim_engine::{DescriptionTemplates, EventDurations, Game, ModelData, Node};
use hoopsim_roster::PlayerDataset;
use tracing::info;

pub const EVENT_SEQS_FILE: &str = "event_seqs.json";
pub const EVENT_DURATIONS_FILE: &str = "event_durations.json";
pub const DESC_TEMPLATES_FILE: &str = "desc_templates.json";
pub const PLAYERS_FILE: &str = "players.json";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    /// Opens `path` for writing, failing if it already exists.
    pub fn create_new(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create_new(&path)
            .with_context(|| format!("Refusing to overwrite output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }

    /// Writes `values` as JSON lines, one compact record per line.
    pub fn write_jsonl<I, T>(&mut self, values: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: serde::Serialize,
    {
        for value in values {
            serde_json::to_writer(&mut *self, &value)
                .with_context(|| format!("Failed to write JSON line to {}", self.display_path()))?;
            writeln!(&mut *self)
                .with_context(|| format!("Failed to write newline to {}", self.display_path()))?;
        }
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Reads a JSON-lines file; blank lines are skipped.
pub fn read_jsonl_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let mut values = Vec::new();
    for (i, line) in io::BufReader::new(file).lines().enumerate() {
        let line = line
            .with_context(|| format!("Failed to read {} file: {}", file_kind, path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let value = serde_json::from_str(&line).with_context(|| {
            format!(
                "Failed to parse {} JSON line {} in {}",
                file_kind,
                i + 1,
                path.display()
            )
        })?;
        values.push(value);
    }
    Ok(values)
}

/// Loads the corpus and lookup tables of a model data directory and builds
/// the transition graph.
pub fn read_model_data<P>(model_dir: P) -> anyhow::Result<ModelData>
where
    P: AsRef<Path>,
{
    let model_dir = model_dir.as_ref();
    let corpus: Vec<Vec<Node>> = read_json_file("event sequence", model_dir.join(EVENT_SEQS_FILE))?;
    let durations: EventDurations =
        read_json_file("event duration", model_dir.join(EVENT_DURATIONS_FILE))?;
    let templates: DescriptionTemplates =
        read_json_file("description template", model_dir.join(DESC_TEMPLATES_FILE))?;

    let model = ModelData::new(&corpus, durations, templates);
    info!(
        paths = corpus.len(),
        nodes = model.graph.sources().count(),
        edges = model.graph.edge_count(),
        durations = model.durations.len(),
        templates = model.templates.len(),
        "loaded model data from {}",
        model_dir.display()
    );
    Ok(model)
}

pub fn read_player_dataset<P>(model_dir: P) -> anyhow::Result<PlayerDataset>
where
    P: AsRef<Path>,
{
    read_json_file("player dataset", model_dir.as_ref().join(PLAYERS_FILE))
}

/// Reads every `*.json` game file of `dir` (the manifest excepted), ordered by
/// game number.
pub fn read_games_dir<P>(dir: P) -> anyhow::Result<Vec<(String, Game)>>
where
    P: AsRef<Path>,
{
    let dir = dir.as_ref();
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to read games directory: {}", dir.display()))?
    {
        let path = entry
            .with_context(|| format!("Failed to read games directory: {}", dir.display()))?
            .path();
        let is_game = path.extension().is_some_and(|ext| ext == "json")
            && path.file_name().is_some_and(|name| name != MANIFEST_FILE);
        if is_game {
            paths.push(path);
        }
    }
    paths.sort_by_cached_key(|path| {
        let stem = file_stem(path);
        let number = stem
            .rsplit('_')
            .next()
            .and_then(|n| n.parse::<u64>().ok())
            .unwrap_or(u64::MAX);
        (number, stem)
    });

    paths
        .into_iter()
        .map(|path| {
            let game = read_json_file("game", &path)?;
            Ok((file_stem(&path), game))
        })
        .collect()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Creates `dir` if needed; fails if it already holds any entry.
pub fn create_empty_dir(dir: &Path) -> anyhow::Result<()> {
    if dir.exists() {
        let mut entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read output directory: {}", dir.display()))?;
        if entries.next().is_some() {
            anyhow::bail!("Output directory {} already exists and is not empty", dir.display());
        }
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))
}
