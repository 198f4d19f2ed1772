//! aemdocs CLI - read Adobe AEM documentation from the terminal or over MCP

mod mcp;

use aemdocs::{
    DocumentRequest, FetchStrategy, ReaderOptions, SearchRequest, ServiceInfo, Tool, ToolBuilder,
    DEFAULT_MAX_LENGTH, TOOL_LLMTXT,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

/// Environment variable with the log filter
const LOG_LEVEL_ENV: &str = "AEMDOCS_LOG_LEVEL";

/// Output format for the services subcommand
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Markdown list
    #[default]
    Md,
    /// JSON array
    Json,
}

/// aemdocs - Adobe AEM documentation reader for AI agents
#[derive(Parser, Debug)]
#[command(name = "aemdocs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print full help with examples (llmtxt)
    #[arg(long)]
    llmtxt: bool,

    /// Fetch strategy: http or webdriver (overrides AEMDOCS_FETCHER)
    #[arg(long, global = true)]
    fetcher: Option<FetchStrategy>,

    /// Full User-Agent to send (overrides MCP_USER_AGENT)
    #[arg(long, global = true)]
    user_agent: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as MCP (Model Context Protocol) server over stdio
    Mcp,
    /// Read a documentation page as markdown
    Read {
        /// Documentation URL
        url: String,

        /// Maximum number of characters to return
        #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
        max_length: usize,

        /// Character index to start from
        #[arg(long, default_value_t = 0)]
        start_index: usize,
    },
    /// Search Experience League
    Search {
        /// Search query
        query: String,

        /// Content type filter, repeatable (default: Documentation)
        #[arg(long = "content-type")]
        content_types: Vec<String>,

        /// Product filter, repeatable
        #[arg(long = "product")]
        products: Vec<String>,

        /// Role filter, repeatable
        #[arg(long = "role")]
        roles: Vec<String>,

        /// Search every AEM product variant when no product is given
        #[arg(long)]
        all_aem_products: bool,
    },
    /// List curated AEM documentation areas
    Services {
        /// Output format
        #[arg(long, short, default_value = "md")]
        output: OutputFormat,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.llmtxt {
        writeln_safe(TOOL_LLMTXT);
        std::process::exit(0);
    }

    init_tracing();

    let Some(command) = cli.command else {
        eprintln!("Usage: aemdocs read <URL>");
        eprintln!("   or: aemdocs search <QUERY>");
        eprintln!("   or: aemdocs services");
        eprintln!("   or: aemdocs mcp");
        eprintln!("   or: aemdocs --help");
        std::process::exit(1);
    };

    let tool = match build_tool(cli.fetcher, cli.user_agent) {
        Ok(tool) => tool,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match command {
        Commands::Mcp => mcp::run_server(tool).await,
        Commands::Read {
            url,
            max_length,
            start_index,
        } => {
            let req = DocumentRequest::new(url)
                .max_length(max_length)
                .start_index(start_index);
            if let Err(e) = req.validate() {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            let text = tool.read_documentation(req).await;
            tool.shutdown().await;
            writeln_safe(&text);
        }
        Commands::Search {
            query,
            content_types,
            products,
            roles,
            all_aem_products,
        } => {
            let req = search_request(query, content_types, products, roles, all_aem_products);
            let text = tool.search_experience_league(req).await;
            tool.shutdown().await;
            writeln_safe(&text);
        }
        Commands::Services { output } => {
            let services = tool.available_services();
            match output {
                OutputFormat::Md => writeln_safe(&format_services_md(&services)),
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&services).unwrap_or_else(|e| {
                        eprintln!("Error serializing services: {}", e);
                        std::process::exit(1);
                    });
                    writeln_safe(&json);
                }
            }
        }
    }
}

/// Log to stderr; stdout carries results and the MCP channel
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_tool(
    fetcher: Option<FetchStrategy>,
    user_agent: Option<String>,
) -> Result<Tool, aemdocs::DocError> {
    let mut builder = ToolBuilder::new().options(ReaderOptions::from_env()?);
    if let Some(fetcher) = fetcher {
        builder = builder.fetch_strategy(fetcher);
    }
    if let Some(ua) = user_agent {
        builder = builder.user_agent(ua);
    }
    Ok(builder.build())
}

fn search_request(
    query: String,
    content_types: Vec<String>,
    products: Vec<String>,
    roles: Vec<String>,
    include_all_aem_products: bool,
) -> SearchRequest {
    let mut req = SearchRequest::new(query);
    if !content_types.is_empty() {
        req.content_types = content_types;
    }
    req.products = (!products.is_empty()).then_some(products);
    req.roles = (!roles.is_empty()).then_some(roles);
    req.include_all_aem_products = include_all_aem_products;
    req
}

/// Format the catalog as a markdown list grouped by category
fn format_services_md(services: &[ServiceInfo]) -> String {
    let mut output = String::new();
    let mut category = "";

    for service in services {
        if service.category != category {
            if !output.is_empty() {
                output.push('\n');
            }
            category = &service.category;
            output.push_str(&format!("## {}\n\n", category));
        }
        output.push_str(&format!(
            "- [{}]({}): {}\n",
            service.name, service.url, service.description
        ));
    }

    output
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
