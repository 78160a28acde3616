use std::num::NonZeroU32;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use curator::catalog::{CatalogClient, ClientSettings, CollectionList, FilterField, Query, RecordId};
use curator::config::{AuthContext, Config};
use curator::controller::{spawn_view, QueryIntent, ViewHandle, ViewOptions, ViewState};
use curator::{logging, render};

#[derive(Debug, Parser)]
#[command(name = "curator", version, about = "Browse a museum exhibit catalog")]
struct Cli {
    /// Config file (default: <config dir>/museum-curator/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the catalog service base URL
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Bearer token for collection commands
    #[arg(long, global = true)]
    token: Option<String>,

    /// Override exhibits per page
    #[arg(long, global = true)]
    page_size: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show one page of the catalog
    Browse(BrowseArgs),
    /// Line-driven browsing session
    Interactive(BrowseArgs),
    /// Show one exhibit in full
    Show { id: String },
    /// Manage personal collections
    #[command(subcommand)]
    Collections(CollectionsCommand),
    /// List suggested filter values
    Filters,
}

#[derive(Debug, Args)]
struct BrowseArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    collection: Option<String>,
    #[arg(long)]
    culture: Option<String>,
    #[arg(long)]
    medium: Option<String>,
}

#[derive(Debug, Subcommand)]
enum CollectionsCommand {
    /// List your collections
    List,
    /// Create a collection
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a collection
    Delete { id: String },
    /// Show the exhibits saved in a collection
    Exhibits { id: String },
    /// Save an exhibit into a collection
    Add { collection: String, exhibit: String },
    /// Remove an exhibit from a collection
    Remove { collection: String, exhibit: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let auth = match cli.token.as_deref() {
        Some(token) => AuthContext::with_token(token),
        None => AuthContext::resolve(&config.auth),
    };
    let client = CatalogClient::new(ClientSettings::from_config(&config), auth)?;

    match cli.command {
        Command::Browse(args) => browse(client, &config, &args).await,
        Command::Interactive(args) => interactive(client, &config, &args).await,
        Command::Show { id } => {
            let detail = client.fetch_exhibit(&RecordId::new(id)).await?;
            print!("{}", render::exhibit_detail(&detail));
            Ok(())
        }
        Command::Collections(command) => collections(&client, command).await,
        Command::Filters => {
            for field in FilterField::ALL {
                println!("{}: {}", field, field.suggestions().join(", "));
            }
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&path)?;
    if let Some(api_base) = &cli.api_base {
        config.catalog.api_base = api_base.clone();
    }
    if let Some(page_size) = cli.page_size {
        config.catalog.page_size = page_size;
    }
    config.validate()?;
    tracing::debug!(path = %path.display(), api_base = %config.catalog.api_base, "Config loaded");
    Ok(config)
}

fn initial_query(config: &Config, args: &BrowseArgs) -> Result<Query> {
    let page = NonZeroU32::new(args.page).context("--page must be at least 1")?;
    let page_size =
        NonZeroU32::new(config.catalog.page_size).context("page size must be at least 1")?;
    let mut query = Query::new(page_size);
    for (field, value) in [
        (FilterField::Collection, &args.collection),
        (FilterField::Culture, &args.culture),
        (FilterField::Medium, &args.medium),
    ] {
        if let Some(value) = value {
            query = query.with_filter(field, value.clone());
        }
    }
    if let Some(search) = &args.search {
        query = query.with_search_text(search.clone());
    }
    Ok(query.with_page(page))
}

async fn browse(client: CatalogClient, config: &Config, args: &BrowseArgs) -> Result<()> {
    let options = ViewOptions::from_config(config).with_initial_query(initial_query(config, args)?);
    let (view, _task) = spawn_view(Arc::new(client), options);
    let state = view.settled().await?;
    print!("{}", render::listing(&state));
    if let Some(error) = state.error {
        bail!("{}", error);
    }
    Ok(())
}

const INTERACTIVE_HELP: &str = "\
commands:
  search <text>            set the search text (empty clears it)
  filter <field> [value]   set collection, culture or medium (no value clears it)
  page <n>                 go to page n
  next | prev              move one page
  reset                    clear search and filters
  refresh                  fetch the current page again
  quit";

async fn interactive(client: CatalogClient, config: &Config, args: &BrowseArgs) -> Result<()> {
    let options = ViewOptions::from_config(config).with_initial_query(initial_query(config, args)?);
    let (view, task) = spawn_view(Arc::new(client), options);
    println!("{}", INTERACTIVE_HELP);
    print!("{}", render::listing(&view.settled().await?));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }
        match parse_command(line) {
            Ok(Some(intent)) => {
                let state = apply_and_settle(&view, intent).await?;
                print!("{}", render::listing(&state));
            }
            Ok(None) => println!("{}", INTERACTIVE_HELP),
            Err(message) => println!("{}", message),
        }
    }

    drop(view);
    task.await.context("catalog view task failed")?;
    Ok(())
}

async fn apply_and_settle(view: &ViewHandle, intent: QueryIntent) -> Result<ViewState> {
    view.apply(intent).await?;
    Ok(view.settled().await?)
}

/// `Ok(None)` asks for help.
fn parse_command(line: &str) -> Result<Option<QueryIntent>, String> {
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let intent = match word {
        "search" => QueryIntent::SetSearchText(rest.to_string()),
        "filter" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            QueryIntent::set_filter(field.parse::<FilterField>()?, value)
        }
        "page" => {
            let page = rest
                .parse::<u32>()
                .map_err(|_| format!("not a page number: '{}'", rest))?;
            QueryIntent::GoToPage(page)
        }
        "next" => QueryIntent::NextPage,
        "prev" | "previous" => QueryIntent::PreviousPage,
        "reset" => QueryIntent::ResetFilters,
        "refresh" => QueryIntent::Refresh,
        "help" => return Ok(None),
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(Some(intent))
}

async fn collections(client: &CatalogClient, command: CollectionsCommand) -> Result<()> {
    match command {
        CollectionsCommand::List => {
            let list = CollectionList::new(client.list_collections().await?);
            print!("{}", render::collections(list.items()));
        }
        CollectionsCommand::Create { name, description } => {
            if name.trim().is_empty() {
                bail!("collection name must not be empty");
            }
            let mut list = CollectionList::new(client.list_collections().await?);
            let created = client.create_collection(&name, &description).await?;
            println!("Created collection [{}] {}", created.id, created.name);
            list.push(created);
            print!("{}", render::collections(list.items()));
        }
        CollectionsCommand::Delete { id } => {
            let id = RecordId::new(id);
            let mut list = CollectionList::new(client.list_collections().await?);
            let name = list
                .get(&id)
                .map(|c| c.name.clone())
                .with_context(|| format!("no collection with id {}", id))?;
            client.delete_collection(&id).await?;
            list.remove(&id);
            println!("Deleted collection [{}] {}", id, name);
            print!("{}", render::collections(list.items()));
        }
        CollectionsCommand::Exhibits { id } => {
            let exhibits = client.collection_exhibits(&RecordId::new(id)).await?;
            print!("{}", render::collection_exhibits(&exhibits));
        }
        CollectionsCommand::Add {
            collection,
            exhibit,
        } => {
            let detail = client
                .fetch_exhibit(&RecordId::new(exhibit))
                .await
                .context("failed to look up exhibit")?;
            client
                .add_to_collection(&RecordId::new(collection), &detail)
                .await?;
            println!("Exhibit added successfully!");
        }
        CollectionsCommand::Remove {
            collection,
            exhibit,
        } => {
            client
                .remove_from_collection(&RecordId::new(collection), &RecordId::new(exhibit))
                .await?;
            println!("Exhibit removed successfully!");
        }
    }
    Ok(())
}
