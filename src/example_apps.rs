use std::error::Error;

use clap::{Parser, ValueEnum, error::ErrorKind};

use crate::config::{PageConfig, asset_base_from_env};
use crate::data::{LoadState, SelectionTuple};
use crate::loader::DatasetLoader;
use crate::page::{PageController, SubmitOutcome};
use crate::transport::{FsTransport, is_url, transport_for_base};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PageArg {
    SalinaTurda,
    TimisoaraCsv,
    TimisoaraJson,
    AlbaIulia,
}

impl From<PageArg> for PageConfig {
    fn from(value: PageArg) -> Self {
        match value {
            PageArg::SalinaTurda => PageConfig::salina_turda(),
            PageArg::TimisoaraCsv => PageConfig::timisoara_csv(),
            PageArg::TimisoaraJson => PageConfig::timisoara_json(),
            PageArg::AlbaIulia => PageConfig::alba_iulia(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "route_planner",
    disable_help_subcommand = true,
    about = "Load a route-planner page and render a recommendation",
    long_about = "Load one page's recommendation dataset from a site root or base URL, show the option domains, and render the card for a selection.",
    after_help = "The asset base is resolved in order by --asset-base, the ROUTE_PLANNER_ASSET_BASE environment variable, then the current directory."
)]
/// CLI for `route_planner_demo`.
///
/// Common usage:
/// - Show the option lists: `--page salina-turda --list-domains`
/// - Render a card: `--page salina-turda --select category=solo --select daytime=evening`
/// - Serve from a remote host: `--asset-base https://example.org`
struct RoutePlannerCli {
    #[arg(long, value_enum, default_value = "salina-turda", help = "Page preset to load")]
    page: PageArg,
    #[arg(
        long = "asset-base",
        value_name = "DIR_OR_URL",
        help = "Site root directory or base URL the dataset path is resolved against"
    )]
    asset_base: Option<String>,
    #[arg(
        long,
        value_name = "ASSET_PATH",
        help = "Override the preset's dataset location"
    )]
    dataset: Option<String>,
    #[arg(
        long = "select",
        value_name = "ATTRIBUTE=VALUE",
        value_parser = parse_selection_arg,
        help = "Chosen value for one attribute, repeat for each attribute"
    )]
    selections: Vec<(String, String)>,
    #[arg(long = "list-domains", help = "Print the option values for each attribute and exit")]
    list_domains: bool,
    #[arg(
        long = "list-datasets",
        help = "Print dataset files found under a local asset base and exit"
    )]
    list_datasets: bool,
    #[arg(long, help = "Print the card as an HTML fragment")]
    html: bool,
}

/// Run the route planner demo: load a preset page, then list domains or render a card.
pub fn run_route_planner<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) =
        parse_cli::<RoutePlannerCli, _>(std::iter::once("route_planner".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let base = cli
        .asset_base
        .clone()
        .or_else(asset_base_from_env)
        .unwrap_or_else(|| ".".to_string());

    if cli.list_datasets {
        if is_url(&base) {
            return Err(format!("--list-datasets needs a local asset base, got '{base}'").into());
        }
        let found = FsTransport::new(&base).discover_datasets();
        if found.is_empty() {
            println!("no datasets under {base}");
        }
        for path in found {
            println!("{path}");
        }
        return Ok(());
    }

    let mut config: PageConfig = cli.page.into();
    if let Some(dataset) = cli.dataset {
        config = config.with_dataset(dataset);
    }
    let loader = DatasetLoader::new(transport_for_base(&base));
    let mut page = PageController::new(config, loader)?;

    if let LoadState::Failed(reason) = page.load_blocking().clone() {
        eprintln!("{}", page.config().messages.load_failed);
        return Err(reason.into());
    }

    if cli.list_domains {
        println!("=== {} ===", page.config().page_id);
        for (attribute, values) in page.domains().iter() {
            let labels: Vec<String> = values
                .iter()
                .map(|value| page.config().card.label_style.apply(value))
                .collect();
            println!("{attribute}: {}", labels.join(", "));
        }
        return Ok(());
    }

    let tuple: SelectionTuple = cli.selections.into_iter().collect();
    match page.submit(&tuple) {
        SubmitOutcome::Card(card) => {
            if cli.html {
                print!("{}", card.to_html());
            } else {
                print!("{}", card.to_text());
            }
        }
        SubmitOutcome::Incomplete { message, missing } => {
            println!("{message}");
            println!("missing: {}", missing.join(", "));
        }
        other => {
            if let Some(message) = other.message() {
                println!("{message}");
            }
        }
    }
    Ok(())
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

fn parse_selection_arg(raw: &str) -> Result<(String, String), String> {
    let (attribute, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("--select expects ATTRIBUTE=VALUE, got '{raw}'"))?;
    let attribute = attribute.trim();
    if attribute.is_empty() {
        return Err(format!("--select '{raw}' has an empty attribute name"));
    }
    Ok((attribute.to_string(), value.trim().to_string()))
}
