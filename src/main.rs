use clap::{Parser, Subcommand};
use folio::content::{FsSource, Library};
use folio::generate::{self, SiteData};
use folio::uploads::{UploadError, UploadGateway, UploadSlot};
use folio::{config, output, server};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Markdown-driven personal site with a command palette")]
#[command(long_about = "\
Markdown-driven personal site with a command palette

Your content directory is the data source. Single pages, fieldnotes,
writings and project details are markdown or MDX files with YAML front matter.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── about.md                     # Single pages (.md tried before .mdx)
  ├── experience.md
  ├── philosophy.mdx
  ├── content-worth-consuming.md   # `- [title](url) – *kind*` lines
  ├── fieldnotes/first-light.md    # Slug from filename or `slug:`
  ├── writings/on-tools.md
  └── projects/tensorforest.md     # Project detail bodies

Front matter fields (all optional):
  title, date, summary, banner, tags, draft, slug

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory for `build`
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Static files served and copied as-is
    #[arg(long, default_value = "public", global = true)]
    public: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load every page and list, and print a content inventory
    Check,
    /// Render the whole site to the output directory
    Build,
    /// Serve pages and the upload/palette API
    Serve {
        /// Address to bind, overriding `[server].bind`
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Manage files in blob storage
    Files {
        #[command(subcommand)]
        action: FilesCommand,
    },
}

#[derive(Subcommand)]
enum FilesCommand {
    /// List stored files
    List {
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Delete a stored file by pathname or URL
    Delete { pathname: String },
    /// Upload files; one failure does not stop the rest
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Pathname prefix in storage, e.g. `fieldnotes`
        #[arg(long)]
        prefix: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("folio=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            config::load_config(&cli.source)?;
            let library = Library::new(FsSource::new(&cli.source));
            output::print_check_output(&SiteData::load(&library));
            println!("==> Content is valid");
        }
        Command::Build => {
            println!("==> Building {} → {}", cli.source.display(), cli.output.display());
            let summary = generate::build_site(&cli.source, &cli.public, &cli.output)?;
            output::print_build_output(&summary);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Serve { bind } => {
            let site_config = config::load_config(&cli.source)?;
            server::serve(site_config, &cli.source, &cli.public, bind.as_deref()).await?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Files { action } => {
            let site_config = config::load_config(&cli.source)?;
            let gateway = UploadGateway::from_config(&site_config.uploads, &site_config.storage);
            match action {
                FilesCommand::List { prefix } => {
                    let objects = gateway.list_objects(prefix.as_deref()).await?;
                    output::print_files_list(&objects);
                }
                FilesCommand::Delete { pathname } => {
                    gateway.delete_object(&pathname).await?;
                    println!("Deleted {}", pathname);
                }
                FilesCommand::Upload { files, prefix } => {
                    let slots = upload_batch(&gateway, &files, prefix.as_deref()).await;
                    output::print_upload_results(&slots);
                    if slots.iter().any(|s| matches!(s, UploadSlot::Failed { .. })) {
                        std::process::exit(1);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Upload each file in turn, recording every outcome in its own slot.
async fn upload_batch(
    gateway: &UploadGateway,
    files: &[PathBuf],
    prefix: Option<&str>,
) -> Vec<UploadSlot> {
    let mut slots = Vec::with_capacity(files.len());
    for file in files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file.display().to_string());
        let mut slot = UploadSlot::default();
        if slot.begin(name.as_str()).is_err() {
            continue;
        }
        let result = match std::fs::read(file) {
            Ok(body) => {
                let pathname = storage_pathname(prefix, &name);
                let content_type = mime_guess::from_path(file).first_or_octet_stream();
                gateway.upload(&pathname, content_type.as_ref(), body).await
            }
            Err(e) => Err(UploadError::InvalidRequest(format!(
                "cannot read {}: {}",
                file.display(),
                e
            ))),
        };
        slot.finish(result);
        slots.push(slot);
    }
    slots
}

fn storage_pathname(prefix: Option<&str>, name: &str) -> String {
    match prefix.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{}/{}", prefix, name),
        None => name.to_string(),
    }
}
