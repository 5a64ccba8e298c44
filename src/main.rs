use clap::{Parser, Subcommand};
use nightbeans::{config, logging, migrate, output, pipeline, retemplate};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nightbeans")]
#[command(about = "Build tooling for the nightbeans static site")]
#[command(long_about = "\
Build tooling for the nightbeans static site

Pages are hand-written HTML, one folder per item. The build reads them back
and writes the data files the listing pages render in the browser.

Site structure:

  site/
  ├── site.toml                    # Optional config (see gen-config)
  ├── index.html                   # Homepage with <article class=\"latest-post\">
  ├── posts/
  │   └── late-night-beans/
  │       └── index.html           # Post: h1, time[datetime], .post-content p
  ├── benedict/
  │   └── tamper/
  │       └── index.html           # Review: .benedict-rating, .benedict-fellow, map
  └── book/
      ├── chapter-1/
      │   └── index.html           # Chapter 1
      └── prologue/
          └── index.html           # Unnumbered, listed last

Generated at the site root:
  blog-posts.js, benedict-reviews.js, book-chapters.js

Run 'nightbeans gen-config' to print a documented site.toml.")]
#[command(version)]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Log debug detail to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Regenerate the data files and refresh post and homepage navigation
    Build,
    /// Scan every collection and print it without writing anything
    Check,
    /// Move flat .html pages to clean directory URLs and rewrite links
    MigrateUrls,
    /// Give post pages the arrow navigation header
    RetemplateNav,
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(if cli.verbose { "debug" } else { "info" })?;

    match cli.command {
        Command::Build => {
            let site_config = config::load_config(&cli.root)?;
            println!("==> Building {}", cli.root.display());
            let report = pipeline::build(&cli.root, &site_config)?;
            output::print_build_output(&report, &cli.root);
            println!("==> Build complete");
        }
        Command::Check => {
            let site_config = config::load_config(&cli.root)?;
            println!("==> Checking {}", cli.root.display());
            let inventory = pipeline::check(&cli.root, &site_config)?;
            output::print_check_output(&inventory, &site_config.reviews.rating_glyph);
        }
        Command::MigrateUrls => {
            let site_config = config::load_config(&cli.root)?;
            println!("==> Migrating {} to clean URLs", cli.root.display());
            let report = migrate::migrate_urls(&cli.root, &site_config.migrate)?;
            output::print_migration_output(&report);
        }
        Command::RetemplateNav => {
            let site_config = config::load_config(&cli.root)?;
            println!("==> Re-templating post navigation");
            let report = retemplate::retemplate_posts(&cli.root, &site_config.posts)?;
            output::print_retemplate_output(&report);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
