use futures::executor::block_on;
use serde::Serialize;
use std::io::Read;
use storey_core::{
    Command as EditCommand, Context, FileSource, Session, SessionOptions, StaticSource,
    load_session, parse_script,
};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "STOREY_LOG";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Storey(storey_core::Error),
    Json(serde_json::Error),
    /// The dataset loaded but a script step failed; carries the 1-based step number.
    Step(usize, storey_core::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Storey(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Step(step, err) => write!(f, "script step {step} failed: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<storey_core::Error> for CliError {
    fn from(value: storey_core::Error) -> Self {
        Self::Storey(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Summary,
    Replay,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    dataset: Option<String>,
    script: Option<String>,
    root: Option<String>,
    out: Option<String>,
    pretty: bool,
}

fn usage() -> &'static str {
    "storey-cli\n\
\n\
USAGE:\n\
  storey-cli [summary] [--pretty] [--root <level>] [<dataset>|-]\n\
  storey-cli replay [--pretty] [--root <level>] [--out <path>] <dataset>|- <script>\n\
\n\
NOTES:\n\
  - If <dataset> is omitted or '-', the dataset is read from stdin.\n\
  - summary prints levels, buildings and floors of a validated dataset as JSON.\n\
  - replay applies a JSON command script and prints the final navigation context.\n\
  - --out writes the edited dataset to a file.\n\
  - Set STOREY_LOG (e.g. STOREY_LOG=debug) to control log output on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut positional = Vec::new();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "summary" if positional.is_empty() => args.command = Command::Summary,
            "replay" if positional.is_empty() => args.command = Command::Replay,
            "--pretty" => args.pretty = true,
            "--root" => {
                let Some(root) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.root = Some(root.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "-" => positional.push(a.clone()),
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => positional.push(path.to_string()),
        }
    }

    let mut positional = positional.into_iter();
    args.dataset = positional.next();
    args.script = positional.next();
    if positional.next().is_some() {
        return Err(CliError::Usage(usage()));
    }
    match args.command {
        Command::Summary if args.script.is_some() || args.out.is_some() => {
            Err(CliError::Usage(usage()))
        }
        Command::Replay if args.script.is_none() => Err(CliError::Usage(usage())),
        _ => Ok(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_session(dataset: Option<&str>, root: Option<&str>) -> Result<Session, CliError> {
    let mut options = SessionOptions::default();
    if let Some(root) = root {
        options = options.with_root_level(root);
    }
    let session = match dataset {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            block_on(load_session(&StaticSource::new(buf), options))?
        }
        Some(path) => block_on(load_session(&FileSource::new(path), options))?,
    };
    Ok(session)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FloorOut<'a> {
    id: &'a str,
    name: &'a str,
    nodes: usize,
    edges: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LevelOut<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    nodes: usize,
    edges: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    floors: Vec<FloorOut<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryOut<'a> {
    title: String,
    context: &'a Context,
    levels: Vec<LevelOut<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplayOut<'a> {
    title: String,
    context: &'a Context,
    level_history: Vec<&'a str>,
    steps: usize,
    version: u64,
    selected_nodes: Vec<&'a str>,
    selected_edges: Vec<&'a str>,
}

fn summarize(session: &Session) -> SummaryOut<'_> {
    let levels = session
        .dataset()
        .levels
        .iter()
        .map(|(id, level)| LevelOut {
            id,
            name: level.name.as_deref(),
            nodes: level.nodes.len(),
            edges: level.edges.len(),
            floors: level
                .floors
                .iter()
                .flatten()
                .map(|(id, floor)| FloorOut {
                    id,
                    name: &floor.name,
                    nodes: floor.nodes.len(),
                    edges: floor.edges.len(),
                })
                .collect(),
        })
        .collect();
    SummaryOut {
        title: session.title(),
        context: session.context(),
        levels,
    }
}

fn replay(session: &mut Session, script: Vec<EditCommand>) -> Result<usize, CliError> {
    let steps = script.len();
    for (index, command) in script.into_iter().enumerate() {
        session
            .apply(command)
            .map_err(|err| CliError::Step(index + 1, err))?;
    }
    Ok(steps)
}

fn run(args: Args) -> Result<(), CliError> {
    let mut session = open_session(args.dataset.as_deref(), args.root.as_deref())?;

    match args.command {
        Command::Summary => write_json(&summarize(&session), args.pretty),
        Command::Replay => {
            let Some(script_path) = args.script.as_deref() else {
                return Err(CliError::Usage(usage()));
            };
            let script = parse_script(&std::fs::read_to_string(script_path)?)?;
            let steps = replay(&mut session, script)?;
            tracing::info!(steps, version = session.version(), "script replayed");

            if let Some(out) = args.out.as_deref() {
                std::fs::write(out, session.dataset().to_json_string_pretty()?)?;
            }
            let selection = session.selection();
            let report = ReplayOut {
                title: session.title(),
                context: session.context(),
                level_history: session.level_history(),
                steps,
                version: session.version(),
                selected_nodes: selection.nodes.iter().map(String::as_str).collect(),
                selected_edges: selection.edges.iter().map(String::as_str).collect(),
            };
            write_json(&report, args.pretty)
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    init_tracing();

    match run(args) {
        Ok(()) => {}
        Err(err @ CliError::Step(..)) => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
