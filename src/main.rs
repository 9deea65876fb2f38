use clap::{ArgAction, Parser};
use miette::{Context, IntoDiagnostic, Result};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use jsonfold::debounce::{Clock, SystemClock};
use jsonfold::locale::{Lang, Locale, LocaleBundle};
use jsonfold::sample::SAMPLE;
use jsonfold::session::Session;
use jsonfold::tree::{KeyOrder, TreePath};
use jsonfold::view::{self, Layout};
use jsonfold::watch::{self, FileWatcher};

mod logging;

#[derive(Parser)]
#[command(name = "jsonfold", version)]
#[command(about = "json formatter that validates as you type and folds the result into a tree", long_about = None)]
struct Cli {
    /// JSON file to format, stdin when omitted or `-`
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Print the collapsible tree instead of the formatted text
    #[arg(long)]
    tree: bool,

    /// Sort object keys in the tree
    #[arg(long)]
    sort_keys: bool,

    /// Collapse the container at PATH (`/` separated, empty for the root;
    /// write `~1` for a `/` and `~0` for a `~` inside a key)
    #[arg(long, value_name = "PATH")]
    collapse: Vec<String>,

    /// Print the titled page with input and output panes
    #[arg(long)]
    panes: bool,

    #[arg(long, value_enum, default_value_t = Layout::Rows)]
    layout: Layout,

    #[arg(long, value_enum, default_value_t = Lang::En)]
    lang: Lang,

    /// Use the built-in sample document as input
    #[arg(long, conflicts_with = "file")]
    sample: bool,

    /// Re-render every time FILE changes
    #[arg(long, requires = "file")]
    watch: bool,

    /// Quiet period before a change is validated
    #[arg(long, value_name = "MS", default_value_t = 300)]
    quiet_ms: u64,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    miette::set_panic_hook();
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose);

    let locales = LocaleBundle::builtin()?;
    let locale = locales.get(cli.lang);
    let order = if cli.sort_keys {
        KeyOrder::Sorted
    } else {
        KeyOrder::Insertion
    };
    let mut session = Session::new(SystemClock::new(), Duration::from_millis(cli.quiet_ms))
        .with_key_order(order);

    if cli.watch {
        return watch_file(&cli, locale, &mut session);
    }

    session.submit(read_input(&cli)?);
    apply_collapse(&mut session, &cli.collapse);
    let rendered = render(&cli, locale, &session);
    if !rendered.is_empty() {
        println!("{}", rendered);
    }
    if let Some(err) = session.output().error() {
        return Err(err.clone().into());
    }
    Ok(())
}

fn read_input(cli: &Cli) -> Result<String> {
    if cli.sample {
        return Ok(SAMPLE.to_string());
    }
    match cli.file.as_deref() {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read file '{}'", path.display())),
        _ => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .into_diagnostic()
                .wrap_err("Failed to read stdin")?;
            Ok(content)
        }
    }
}

fn watch_file(cli: &Cli, locale: &Locale, session: &mut Session) -> Result<()> {
    let path = match cli.file.as_deref() {
        Some(path) if path != Path::new("-") => path.to_path_buf(),
        _ => miette::bail!("--watch needs a FILE, not stdin"),
    };
    debug!(path = %path.display(), "watching");
    watch::run(FileWatcher::new(path), session, |session| {
        apply_collapse(session, &cli.collapse);
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}\n", render(cli, locale, &*session))?;
        if let Some(err) = session.output().error().filter(|_| !cli.panes) {
            eprintln!("{}: {}", locale.error, err);
        }
        stdout.flush()
    })
    .into_diagnostic()
    .wrap_err("Stopped watching")
}

fn apply_collapse<C: Clock>(session: &mut Session<C>, paths: &[String]) {
    if session.output().value().is_none() {
        return;
    }
    for raw in paths {
        let path = TreePath::parse(raw);
        if !session.set_collapsed(&path, true) {
            warn!(%path, "no container to collapse");
        }
    }
}

fn render<C: Clock>(cli: &Cli, locale: &Locale, session: &Session<C>) -> String {
    let output = session.output();
    let body: Vec<String> = if cli.tree {
        session.tree().iter().map(ToString::to_string).collect()
    } else {
        output.formatted().lines().map(str::to_owned).collect()
    };
    if !cli.panes {
        return body.join("\n");
    }
    let panes = [
        view::input_pane(locale, session.input()),
        view::output_pane(locale, output, body),
    ];
    view::page(locale, &panes, cli.layout)
}
