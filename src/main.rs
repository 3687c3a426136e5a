use clap::{Parser, Subcommand};
use folio::content::{Category, ContentSource, FsContentSource};
use folio::gallery::{GalleryCommand, GalleryNavigator, ScrollLock};
use folio::search::SearchEngine;
use folio::{config, logging, output, view};
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio content, search and gallery tool")]
#[command(long_about = "\
Portfolio content, search and gallery tool

Content lives in one directory per category. Each markdown file is an entry
with TOML front matter between +++ lines.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── portfolio/
  │   ├── folio.md                 # Sorted newest first by `date`
  │   └── chat-relay.md
  └── certificate/
      ├── 001-rust.md              # Sorted by number prefix
      └── 002-systems.md

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory (defaults to `content_root` from config.toml, then `content`)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Log debug diagnostics to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every entry of a category
    List {
        category: Category,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Filter a category by a query
    Search {
        category: Category,
        query: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Drive the lightbox with commands: open:N, next, prev, close
    Gallery {
        category: Category,
        #[arg(required = true)]
        commands: Vec<GalleryCommand>,
    },
    /// Render a category page to an HTML file
    Render {
        category: Category,
        /// Search query (portfolio page only)
        #[arg(long)]
        query: Option<String>,
        /// Open the lightbox at this index (certificate page only)
        #[arg(long)]
        open: Option<usize>,
        /// Output HTML file
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Validate config and every content category
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match cli.command {
        Command::List { category, json } => {
            let site = Site::open(cli.source.as_deref())?;
            let items = site.source.fetch(category)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                output::print_listing(category, &items);
            }
        }
        Command::Search {
            category,
            query,
            json,
        } => {
            let site = Site::open(cli.source.as_deref())?;
            let items = site.source.fetch(category)?;
            let mut engine = SearchEngine::from_config(items.clone(), &site.config.search);
            engine.set_query(query.as_str());
            engine.wait();
            if json {
                println!("{}", serde_json::to_string_pretty(&engine.filtered_result())?);
            } else {
                output::print_search(category, &query, &items, &engine.view());
            }
        }
        Command::Gallery { category, commands } => {
            let site = Site::open(cli.source.as_deref())?;
            let items = site.source.fetch(category)?;
            let lock = ScrollLock::new();
            let mut nav = GalleryNavigator::new(items.len(), Rc::clone(&lock))?;
            for command in commands {
                command.apply(&mut nav)?;
                output::print_gallery_step(command, &nav, &items, &lock);
            }
        }
        Command::Render {
            category,
            query,
            open,
            output: out_path,
        } => {
            let site = Site::open(cli.source.as_deref())?;
            let items = site.source.fetch(category)?;
            let page = view::render_category_page(
                category,
                items,
                &site.config.search,
                query.as_deref(),
                open,
            )?;
            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&out_path, page.into_string())?;
            println!("Rendered {} → {}", category.label(), out_path.display());
        }
        Command::Check => {
            let site = Site::open(cli.source.as_deref())?;
            println!("==> Checking {}", site.root.display());
            let mut counts = Vec::new();
            for category in Category::ALL {
                counts.push((category, site.source.fetch(category)?.len()));
            }
            output::print_check(&counts);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// A resolved content root with its config and source.
struct Site {
    root: PathBuf,
    config: config::FolioConfig,
    source: FsContentSource,
}

impl Site {
    /// Resolve the content root, load its config and size the thread pool.
    ///
    /// An explicit `--source` wins. Otherwise `config.toml` in the working
    /// directory may point elsewhere through `content_root`.
    fn open(cli_source: Option<&Path>) -> Result<Self, config::ConfigError> {
        let root = match cli_source {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(config::load_config(Path::new("."))?.content_root),
        };
        let config = config::load_config(&root)?;
        init_thread_pool(&config.processing);
        Ok(Self {
            source: FsContentSource::new(&root),
            root,
            config,
        })
    }
}

/// Initialize the rayon thread pool based on processing config.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
