use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use taxview::app::calculator::{
    FIELD_GST, FIELD_PROVINCE, FIELD_PST, FIELD_TAXES, FIELD_TOTAL, FIELD_TYPE,
};
use taxview::app::{AppContext, CALCULATOR_URL};
use taxview::client::ReqwestTransport;
use taxview::config::Config;
use taxview::logging::init_tracing;
use taxview::router::{NavOutcome, NavState};
use taxview::template::{FileStore, MemoryStore, TemplateStore};
use taxview::view::{MemoryDocument, MemoryHistory, ViewController};

#[derive(Parser)]
#[command(name = "taxview", version, about = "Browse provincial sales taxes")]
struct Cli {
    /// Config file (default: ~/.config/taxview/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the API base URL from config
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Preload the template store with every `<name>.html` in DIR
    #[arg(long, global = true, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// Keep fetched templates in memory for this run only
    #[arg(long, global = true)]
    no_persist: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Navigate to each hash in turn and print the view left on screen.
    /// `taxes/ON` is shorthand for `#/taxes/ON`.
    Open {
        #[arg(required = true, value_name = "HASH")]
        hashes: Vec<String>,

        /// Then step back this many history entries
        #[arg(long, default_value_t = 0)]
        back: usize,
    },

    /// Compute taxes for an amount in one province
    Calc {
        /// Province code, e.g. ON
        #[arg(long)]
        province: String,

        #[arg(long)]
        amount: String,
    },

    /// Work with the todo list
    #[command(subcommand)]
    Todos(TodoCommand),

    /// Delete every stored template
    ClearCache,
}

#[derive(Subcommand)]
enum TodoCommand {
    List,
    Add { text: String },
    Show { id: usize },
    Edit { id: usize, text: String },
    Rm { id: usize },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
        config.validate()?;
    }

    let store = open_store(&config, cli.no_persist)?;

    if let Command::ClearCache = cli.command {
        store.clear()?;
        println!("Template store cleared");
        return Ok(());
    }

    let transport = ReqwestTransport::from_config(&config.api)?;
    let app = AppContext::new(&config.api, Arc::new(transport), store);
    if let Some(dir) = &cli.templates {
        let count = app.templates.seed(read_templates(dir)?)?;
        tracing::info!(count, dir = %dir.display(), "Seeded templates");
    }

    match cli.command {
        Command::Open { hashes, back } => open(&app, &config, &hashes, back).await,
        Command::Calc { province, amount } => calc(&app, &config, &province, &amount).await,
        Command::Todos(command) => todos(&app, command).await,
        Command::ClearCache => Ok(()),
    }
}

fn open_store(config: &Config, no_persist: bool) -> anyhow::Result<Arc<dyn TemplateStore>> {
    if no_persist || !config.cache.persist {
        return Ok(Arc::new(MemoryStore::new()));
    }
    let path = config.cache.store_path();
    let store = FileStore::open(&path)
        .with_context(|| format!("Failed to open template store {}", path.display()))?;
    Ok(Arc::new(store))
}

/// `<dir>/<name>.html` files keyed by `<name>`.
fn read_templates(dir: &Path) -> anyhow::Result<Vec<(String, String)>> {
    let mut templates = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("html") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let source = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        templates.push((name.to_string(), source));
    }
    Ok(templates)
}

fn normalize_hash(hash: &str) -> String {
    if hash.starts_with('#') {
        hash.to_string()
    } else {
        format!("#/{}", hash.trim_start_matches('/'))
    }
}

fn report(outcome: &NavOutcome) {
    if let NavOutcome::Failed { hash, error } = outcome {
        eprintln!("Error: navigation to '{}' failed: {}", hash, error);
    }
}

async fn open(
    app: &AppContext,
    config: &Config,
    hashes: &[String],
    back: usize,
) -> anyhow::Result<()> {
    let document = MemoryDocument::new();
    let controller = ViewController::new(
        Box::new(document.clone()),
        Box::new(MemoryHistory::default()),
    );
    let navigator = app.navigator(controller, config.navigation.clone());

    for hash in hashes {
        report(&navigator.navigate(&normalize_hash(hash)).await);
    }
    for _ in 0..back {
        match navigator.back().await {
            Some(outcome) => report(&outcome),
            None => break,
        }
    }

    if navigator.state() == NavState::Idle {
        bail!("No view could be rendered");
    }
    println!("{}\n\n{}", document.title(), document.html());
    Ok(())
}

async fn calc(
    app: &AppContext,
    config: &Config,
    province: &str,
    amount: &str,
) -> anyhow::Result<()> {
    let controller = ViewController::new(
        Box::new(MemoryDocument::new()),
        Box::new(MemoryHistory::default()),
    );
    let navigator = app.navigator(controller, config.navigation.clone());

    if let NavOutcome::Failed { error, .. } = navigator.navigate(CALCULATOR_URL).await {
        return Err(error).context("Failed to load the calculator");
    }
    if !navigator.change_province(province) {
        bail!("Unknown province code '{}'", province);
    }
    navigator.change_amount(amount);

    for (label, id) in [
        ("Province", FIELD_PROVINCE),
        ("Type", FIELD_TYPE),
        ("GST", FIELD_GST),
        ("PST", FIELD_PST),
        ("Taxes", FIELD_TAXES),
        ("Total", FIELD_TOTAL),
    ] {
        println!("{:<9}{}", label, navigator.field(id).unwrap_or_default());
    }
    Ok(())
}

async fn todos(app: &AppContext, command: TodoCommand) -> anyhow::Result<()> {
    let list = match command {
        TodoCommand::Show { id } => {
            println!("{}", app.todos.get(id).await?);
            return Ok(());
        }
        TodoCommand::List => app.todos.list().await?,
        TodoCommand::Add { text } => app.todos.add(&text).await?,
        TodoCommand::Edit { id, text } => app.todos.update(id, &text).await?,
        TodoCommand::Rm { id } => app.todos.remove(id).await?,
    };

    for (index, text) in list.iter().enumerate() {
        println!("{:>3}  {}", index, text);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_hashes_get_route_prefix() {
        assert_eq!(normalize_hash("taxes/ON"), "#/taxes/ON");
        assert_eq!(normalize_hash("/calculator"), "#/calculator");
        assert_eq!(normalize_hash("#/provinces"), "#/provinces");
    }

    #[test]
    fn parses_open_with_back() {
        let args = ["taxview", "open", "#/provinces", "taxes/ON", "--back", "1"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Open { hashes, back } => {
                assert_eq!(hashes, vec!["#/provinces", "taxes/ON"]);
                assert_eq!(back, 1);
            }
            _ => panic!("expected open"),
        }
    }

    #[test]
    fn open_requires_a_hash() {
        assert!(Cli::try_parse_from(["taxview", "open"]).is_err());
    }

    #[test]
    fn reads_only_html_templates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tax-page.html"), "<h1>{{province}}</h1>").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let templates = read_templates(dir.path()).unwrap();
        assert_eq!(
            templates,
            vec![("tax-page".to_string(), "<h1>{{province}}</h1>".to_string())]
        );
    }
}
