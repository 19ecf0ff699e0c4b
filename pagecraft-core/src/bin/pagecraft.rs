//! pagecraft - render, check and serve page-builder documents

use clap::{Args, Parser, Subcommand};
use pagecraft_core::{
    serve_page, AnyStore, Config, LeafDataSource, PageCache, PageDocument, PageFetcher,
    PageRequest, PageResponse, Session, SocialClient,
};
use pagecraft_render::{inspect, RenderContext, Severity};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "pagecraft")]
#[command(about = "Render page-builder documents to static HTML", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a page document or bare node tree to HTML on stdout
    Render {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page title, defaults to the document name
        #[arg(long)]
        title: Option<String>,

        /// Print only the rendered body, without the HTML shell
        #[arg(long)]
        fragment: bool,

        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Report structural problems in node trees
    Check {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Fetch a page from the configured store and render it
    Fetch(FetchArgs),
}

#[derive(Args, Debug)]
struct FetchArgs {
    #[arg(long, conflicts_with = "page_id", required_unless_present = "page_id")]
    slug: Option<String>,

    #[arg(long)]
    page_id: Option<String>,

    #[arg(long)]
    workspace: String,

    /// Bearer token sent with slug lookups
    #[arg(long)]
    token: Option<String>,

    #[arg(long)]
    tenant: Option<String>,

    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

const EXIT_NOT_FOUND: u8 = 2;
const EXIT_UNAVAILABLE: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = pagecraft_core::logging::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            file,
            title,
            fragment,
            config,
        } => render(&file, title.as_deref(), fragment, config.as_deref()),
        Command::Check { files } => check(&files),
        Command::Fetch(args) => fetch(args).await,
    }
}

fn load_page(path: &Path) -> Result<PageDocument, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;
    let fallback = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Untitled page");
    PageDocument::from_json_or_tree(&content, fallback).map_err(|e| e.to_string())
}

fn render(path: &Path, title: Option<&str>, fragment: bool, config: Option<&Path>) -> ExitCode {
    let config = match Config::load(config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut page = match load_page(path) {
        Ok(page) => page,
        Err(e) => {
            eprintln!("✗ {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(title) = title {
        page.name = title.to_string();
    }

    let ctx = RenderContext::new().with_options(config.render_options());
    if fragment {
        println!("{}", page.render_body(&ctx).to_html());
    } else {
        print!("{}", page.render_html(&ctx));
    }
    ExitCode::SUCCESS
}

fn check(files: &[PathBuf]) -> ExitCode {
    let mut failed = false;

    for path in files {
        let page = match load_page(path) {
            Ok(page) => page,
            Err(e) => {
                eprintln!("✗ {} could not be read:", path.display());
                eprintln!("    {}", e);
                failed = true;
                continue;
            }
        };

        let issues = inspect(&page.content);
        let errors = issues.iter().filter(|i| i.severity == Severity::Error).count();
        if errors == 0 {
            println!("✓ {} is valid", path.display());
        } else {
            eprintln!("✗ {} has errors:", path.display());
            failed = true;
        }
        for issue in &issues {
            eprintln!("    {}", issue);
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn fetch(args: FetchArgs) -> ExitCode {
    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };
    let store = match AnyStore::from_config(&config.store).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };
    let social = match config.social.base_url.as_deref() {
        Some(url) => match SocialClient::new(url, config.social.timeout()) {
            Ok(client) => Some(client),
            Err(e) => {
                eprintln!("✗ {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let fetcher = PageFetcher::new(store, PageCache::from_config(&config.cache));
    let request = match args.page_id {
        Some(page_id) => PageRequest::by_id(&page_id, &args.workspace),
        None => PageRequest {
            slug: args.slug,
            workspace_id: Some(args.workspace.clone()),
            session: Some(Session {
                auth_token: args.token,
                tenant_id: args.tenant,
                workspace_id: Some(args.workspace),
            }),
            ..Default::default()
        },
    };

    let social = social.as_ref().map(|client| client as &dyn LeafDataSource);
    match serve_page(&fetcher, social, &config.render_options(), &request).await {
        PageResponse::Rendered { html, .. } => {
            print!("{}", html);
            ExitCode::SUCCESS
        }
        PageResponse::NotFound => {
            eprintln!("✗ page not found");
            ExitCode::from(EXIT_NOT_FOUND)
        }
        PageResponse::Unavailable { reason } => {
            eprintln!("✗ page unavailable: {}", reason);
            ExitCode::from(EXIT_UNAVAILABLE)
        }
    }
}
