use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use verse_site::catalog::BookCatalog;
use verse_site::config::{self, SiteConfig};
use verse_site::corpus::{self, DataSource};
use verse_site::linearize::{VerseSequence, linearize};
use verse_site::{compile, generate, output};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Called once per process.
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "verse-site")]
#[command(about = "Static site generator that publishes one page per Bible verse")]
#[command(long_about = "\
Static site generator that publishes one page per Bible verse

The corpus is a JSON document shaped { Book: { chapter: { verse: \"text\" } } }.
Chapter and verse levels may be objects keyed by number or arrays with an
unused index 0. Missing books, chapters and verses are skipped.

Project layout:

  ./
  ├── config.toml          # Site config (optional)
  ├── books.json           # Book order (optional, built-in 66 books otherwise)
  └── data/web.json        # Local corpus, used when DATA_URL is not set

Output:

  dist/
  ├── genesis/1/1/index.html
  ├── ...
  ├── sitemap.xml
  ├── robots.txt
  ├── ads.txt              # When AdSense is configured
  └── CNAME                # When a custom domain is configured

The output directory is deleted and rebuilt on every build.

Run 'verse-site gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Project directory holding config.toml, books.json and data/
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Output directory (relative paths are taken from --root)
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Remote corpus URL (overrides data.url in config.toml)
    #[arg(long, env = "DATA_URL", global = true)]
    data_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the corpus, linearize it and write the site
    Build,
    /// Load and linearize the corpus without writing anything
    Check,
    /// Compile data/web.json from the upstream per-book JSON files
    MakeData,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let config = load_site_config(&cli.root, cli.data_url)?;
            let catalog = load_catalog(&cli.root, &config)?;
            let sequence = load_sequence(&cli.root, &config, &catalog)?;

            let output_dir = resolve_output(&cli.root, &cli.output);
            println!("==> Generating {}", output_dir.display());
            let summary = generate::generate(&sequence, &config, &output_dir)?;
            output::print_generate_output(&summary);
        }
        Command::Check => {
            let config = load_site_config(&cli.root, cli.data_url)?;
            let catalog = load_catalog(&cli.root, &config)?;
            let sequence = load_sequence(&cli.root, &config, &catalog)?;
            output::print_check_output(&catalog, &sequence);
            println!("==> Data is valid");
        }
        Command::MakeData => {
            let config = load_site_config(&cli.root, cli.data_url)?;
            let catalog = load_catalog(&cli.root, &config)?;
            println!(
                "==> Fetching {} books from {}",
                catalog.len(),
                config.data.upstream_base
            );

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_compile_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let client = reqwest::blocking::Client::new();
            let compiled = compile::compile_from_upstream(
                &client,
                &catalog,
                &config.data.upstream_base,
                Some(tx),
            );
            printer.join().ok();
            let compiled = compiled?;

            let path = cli.root.join(&config.data.local_path);
            compile::write_corpus(&compiled, &path)?;
            output::print_compile_output(&compiled, &path);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Build the run's configuration once: `config.toml` over stock defaults,
/// then the `DATA_URL` override.
fn load_site_config(
    root: &Path,
    data_url: Option<String>,
) -> Result<SiteConfig, Box<dyn std::error::Error>> {
    let config = config::load_config(root)?.with_data_url(data_url);
    Ok(config)
}

fn load_catalog(
    root: &Path,
    config: &SiteConfig,
) -> Result<BookCatalog, Box<dyn std::error::Error>> {
    let books_path = config.data.books_path.as_ref().map(|p| root.join(p));
    Ok(BookCatalog::load_or_standard(books_path.as_deref())?)
}

/// Resolve the data source, load the corpus and linearize it.
fn load_sequence(
    root: &Path,
    config: &SiteConfig,
    catalog: &BookCatalog,
) -> Result<VerseSequence, Box<dyn std::error::Error>> {
    println!("==> Loading data");
    let source = DataSource::resolve(&config.data, root)?;
    let corpus = corpus::load_corpus(&source)?;
    output::print_data_source(&source, &corpus);
    Ok(linearize(catalog, &corpus))
}

/// Relative output paths are taken from the project root.
fn resolve_output(root: &Path, output: &Path) -> PathBuf {
    if output.is_absolute() {
        output.to_path_buf()
    } else {
        root.join(output)
    }
}
