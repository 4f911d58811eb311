use std::path::PathBuf;

use clap::{
    ArgAction, Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use albumix::{
    cli, config,
    shuffle::{DEFAULT_FLIP_PROBABILITY, DEFAULT_JITTER, ShuffleAlgorithm},
    types::{AdmissionMode, Collection, DiscoveryFilters},
    utils, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a shuffled full-album playlist
    Build(BuildOptions),

    /// Show the albums discovered from the sources
    Albums(AlbumsOptions),

    /// Manage the local cache
    Cache(CacheOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Args, Debug, Clone)]
pub struct SourceOptions {
    /// Playlist ids, URIs or URLs to scan
    #[clap(value_parser = utils::parse_collection)]
    pub playlists: Vec<Collection>,

    /// Also scan liked songs
    #[clap(long)]
    pub liked: bool,

    /// Read sources from a local JSON library instead of Spotify
    #[clap(long)]
    pub library: Option<PathBuf>,

    /// Keep singles as their own albums
    #[clap(long)]
    pub include_singles: bool,

    /// Keep compilations as their own albums
    #[clap(long)]
    pub include_compilations: bool,

    /// Skip the album pool and track caches
    #[clap(long)]
    pub no_cache: bool,
}

impl From<SourceOptions> for cli::SourceArgs {
    fn from(opt: SourceOptions) -> Self {
        cli::SourceArgs {
            playlists: opt.playlists,
            liked: opt.liked,
            library: opt.library,
            filters: DiscoveryFilters {
                include_singles: opt.include_singles,
                include_compilations: opt.include_compilations,
            },
            use_cache: !opt.no_cache,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct BuildOptions {
    #[clap(flatten)]
    pub sources: SourceOptions,

    /// Name of the new playlist
    #[clap(long, default_value = config::DEFAULT_PLAYLIST_NAME)]
    pub name: String,

    /// Create the playlist as public
    #[clap(long)]
    pub public: bool,

    /// Maximum number of albums, 0 for no limit
    #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
    pub max_albums: i64,

    /// Track budget for the playlist
    #[clap(long, default_value_t = 500, allow_negative_numbers = true)]
    pub max_tracks: i64,

    /// How the track budget is enforced (soft, hard)
    #[clap(long, default_value = "soft", value_parser = utils::parse_admission_mode)]
    pub mode: AdmissionMode,

    /// Album ordering (random, weighted-newer, weighted-older, chronological, spiral-dance)
    #[clap(long, default_value = "random", value_parser = utils::parse_algorithm)]
    pub algorithm: ShuffleAlgorithm,

    /// Prefer full albums and newer releases when trimming instead of the shuffled order
    #[clap(long)]
    pub sort_by_type: bool,

    /// Seed for a reproducible ordering
    #[clap(long)]
    pub seed: Option<u64>,

    /// Date noise for chronological ordering, between 0 and 1
    #[clap(long, default_value_t = DEFAULT_JITTER)]
    pub jitter: f64,

    /// Direction flip chance for spiral-dance ordering, between 0 and 1
    #[clap(long, default_value_t = DEFAULT_FLIP_PROBABILITY)]
    pub flip_probability: f64,

    /// Show the selection without creating a playlist
    #[clap(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,
}

impl BuildOptions {
    fn into_args(self) -> (cli::SourceArgs, cli::PlaylistArgs) {
        let playlist = cli::PlaylistArgs {
            name: self.name,
            public: self.public,
            max_albums: self.max_albums,
            max_tracks: self.max_tracks,
            mode: self.mode,
            algorithm: self.algorithm,
            sort_by_type: self.sort_by_type,
            seed: self.seed,
            jitter: self.jitter,
            flip_probability: self.flip_probability,
            dry_run: self.dry_run,
        };
        (self.sources.into(), playlist)
    }
}

#[derive(Parser, Debug, Clone)]
pub struct AlbumsOptions {
    #[clap(flatten)]
    pub sources: SourceOptions,

    /// Search albums by name or artist
    #[clap(long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Manage the local cache")]
pub struct CacheOptions {
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CacheSubcommand {
    /// Remove all cached album pools and tracks
    Clear,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Build(opt) => {
            let (sources, playlist) = opt.into_args();
            cli::build(sources, playlist).await
        }
        Command::Albums(opt) => cli::albums(opt.sources.into(), opt.search).await,
        Command::Cache(opt) => match opt.command {
            CacheSubcommand::Clear => cli::clear_cache().await,
        },
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
