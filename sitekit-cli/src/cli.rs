use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Define CLI arguments
#[derive(Parser)]
#[command(
    version,
    about = "Offline cache warming and page localization for static sites",
    long_about = "Warms a versioned on-disk asset cache from a manifest, serves lookups\n\
                  from it with a live-network fallback, and rewrites page models between\n\
                  languages from a translation catalog."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true, help = "Enable detailed debug logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Install the manifest into the versioned bucket, then activate it
    Warm {
        /// Path to the manifest JSON (an array of URL strings)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Versioned bucket name, e.g. "site-v1.0.0"
        #[arg(long)]
        version: String,

        /// Directory holding the cache buckets
        #[arg(long, default_value = "./sitekit-cache")]
        cache_dir: PathBuf,

        /// Origin used to resolve root-relative manifest entries
        #[arg(long, default_value = "http://localhost/")]
        origin: String,
    },

    /// Serve one request from the active bucket, falling back to the network
    Fetch {
        /// Request URL, absolute or root-relative
        request: String,

        /// Versioned bucket name the generation was warmed under
        #[arg(long)]
        version: String,

        /// Directory holding the cache buckets
        #[arg(long, default_value = "./sitekit-cache")]
        cache_dir: PathBuf,

        /// Origin used to resolve root-relative requests
        #[arg(long, default_value = "http://localhost/")]
        origin: String,

        /// Write the body to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List cache buckets and flag the stale ones
    Status {
        /// Versioned bucket name considered current
        #[arg(long)]
        version: String,

        /// Directory holding the cache buckets
        #[arg(long, default_value = "./sitekit-cache")]
        cache_dir: PathBuf,
    },

    /// Rewrite a page model to the given language
    Swap {
        /// Path to the translation catalog JSON
        #[arg(short, long)]
        catalog: PathBuf,

        /// Path to the page model JSON
        #[arg(short, long)]
        page: PathBuf,

        /// Language code to apply
        #[arg(short, long)]
        lang: String,

        /// Write the rewritten page back in place instead of printing it
        #[arg(long)]
        write: bool,
    },

    /// Report translation keys missing from any catalog language
    Audit {
        /// Path to the translation catalog JSON
        #[arg(short, long)]
        catalog: PathBuf,
    },
}
