use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quiver::assess::{assess, ClassifyWith};
use quiver::classification::CategoryKey;
use quiver::config::Config;
use quiver::handicap::{Handicapper, RatingSystem};
use quiver::output;
use quiver::round::RoundStructure;
use quiver::scoring::{Arrow, FaceScoring, GoldsMode};
use quiver::tables::Tables;
use quiver::tally::{ShotRecord, TallyOptions};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

/// Round selection shared by every subcommand that needs one.
#[derive(clap::Args, Debug)]
struct RoundArgs {
    /// Round id (see `quiver rounds`)
    round: String,

    /// Sub-type of the round, e.g. `70` for a WA 1440 at 70m
    #[arg(short, long)]
    subtype: Option<String>,

    /// Shoot the round on one of its permitted face variants
    #[arg(long)]
    face: Option<FaceScoring>,
}

/// Archer category for classification lookups.
#[derive(clap::Args, Debug)]
struct CategoryArgs {
    /// Bow style (recurve, compound, barebow, longbow)
    #[arg(long)]
    bow: Option<String>,

    #[arg(long)]
    gender: Option<String>,

    /// Age bracket (e.g. adult, u18)
    #[arg(long)]
    age: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score arrows against a round and show the score pad
    Score {
        #[command(flatten)]
        round: RoundArgs,

        /// Arrow values in shot order: m, 1-10, X (spaces or commas)
        #[arg(required = true, num_args = 1..)]
        arrows: Vec<String>,

        /// Arrows per end while shooting
        #[arg(long)]
        end_size: Option<usize>,

        /// Arrows per row on the score pad
        #[arg(long)]
        pad_end_size: Option<usize>,

        /// Which arrows count as golds (9s, 10s, xs, 10+)
        #[arg(long)]
        golds: Option<GoldsMode>,

        /// Your handicap, for the allowance and adjusted score
        #[arg(long, allow_hyphen_values = true)]
        handicap: Option<i32>,

        #[command(flatten)]
        category: CategoryArgs,
    },
    /// Handicap earned by a score on a round
    Handicap {
        #[command(flatten)]
        round: RoundArgs,

        score: u32,
    },
    /// Expected score on a round for a handicap
    Predict {
        #[command(flatten)]
        round: RoundArgs,

        #[arg(allow_hyphen_values = true)]
        handicap: i32,
    },
    /// Classification earned by a score
    Classify {
        #[command(flatten)]
        round: RoundArgs,

        score: u32,

        #[command(flatten)]
        category: CategoryArgs,
    },
    /// List known rounds
    Rounds,
    /// Create a config file
    Init {
        /// Write the default config without prompting
        #[arg(long)]
        defaults: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "quiver")]
#[command(
    about = "Archery score keeping: score pads, handicaps and classifications",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/quiver/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Handicap scheme, overriding the config file
    #[arg(long, global = true)]
    system: Option<RatingSystem>,

    /// Count only the inner ten as ten
    #[arg(long, global = true)]
    inner_ten: bool,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "quiver=debug" } else { "quiver=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.clone().map(PathBuf::from);

    if let Commands::Init { defaults } = cli.command {
        if let Err(e) = quiver::config::run_init(config_path, defaults) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let mut config = match quiver::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if let Some(system) = cli.system {
        config.system = system;
    }
    config.inner_ten |= cli.inner_ten;

    // Validate config at startup
    if let Err(errors) = quiver::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let tables = match quiver::tables::load_tables(&config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Table error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let use_colors = output::should_use_colors();
    match run(cli.command, cli.format, &config, &tables, use_colors) {
        Ok(text) => {
            println!("{}", text);
            std::process::exit(EXIT_SUCCESS);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    }
}

fn select_round(tables: &Tables, args: &RoundArgs) -> quiver::Result<RoundStructure> {
    let round = tables.rounds.structure(&args.round, args.subtype.as_deref())?;
    match args.face {
        Some(face) if face != round.face() => round.on_face(face),
        _ => Ok(round),
    }
}

fn category_key(
    tables: &Tables,
    args: &CategoryArgs,
    round: &RoundArgs,
) -> anyhow::Result<Option<CategoryKey>> {
    match (&args.bow, &args.gender, &args.age) {
        (None, None, None) => Ok(None),
        (Some(bow), Some(gender), Some(age)) => Ok(Some(tables.category_key(
            bow,
            gender,
            age,
            &round.round,
            round.subtype.as_deref(),
        )?)),
        _ => anyhow::bail!("--bow, --gender and --age must be given together"),
    }
}

/// Parse every arrow token, checking it against the face.
fn parse_shot(tokens: &[String], face: FaceScoring) -> quiver::Result<Vec<Arrow>> {
    tokens
        .iter()
        .flat_map(|t| t.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|t| !t.is_empty())
        .map(|t| Arrow::parse_for_face(t, face))
        .collect()
}

fn run(
    command: Commands,
    format: OutputFormat,
    config: &Config,
    tables: &Tables,
    use_colors: bool,
) -> anyhow::Result<String> {
    let handicapper = Handicapper::for_system(config.system).inner_ten(config.inner_ten);

    match command {
        Commands::Score {
            round: round_args,
            arrows,
            end_size,
            pad_end_size,
            golds,
            handicap,
            category,
        } => {
            let round = select_round(tables, &round_args)?;
            let arrows = parse_shot(&arrows, round.face())?;
            let record = ShotRecord::new(arrows, Some(&round)).with_declared_handicap(handicap);
            let options = TallyOptions {
                end_size: end_size.unwrap_or(config.end_size),
                pad_end_size: pad_end_size.or(config.pad_end_size),
                golds: golds.or(config.golds),
            };
            let key = category_key(tables, &category, &round_args)?;
            let classify = key.as_ref().map(|category| ClassifyWith {
                tables: &tables.classifications,
                category,
            });

            let assessment = assess(&record, &handicapper, &options, classify)?;
            Ok(match format {
                OutputFormat::Table => output::format_assessment(&assessment, use_colors),
                OutputFormat::Tsv => output::format_assessment_tsv(&assessment),
                OutputFormat::Json => output::format_json(&assessment)?,
            })
        }
        Commands::Handicap { round: round_args, score } => {
            let round = select_round(tables, &round_args)?;
            let report = output::HandicapReport {
                round: round.name().to_string(),
                score,
                system: handicapper.system(),
                handicap: handicapper.handicap_for_score(&round, score)?,
                fractional: handicapper.fractional_handicap(&round, score)?,
            };
            Ok(match format {
                OutputFormat::Table => output::format_handicap(&report, use_colors),
                OutputFormat::Tsv => {
                    format!("{}\t{}\t{}", report.round, report.score, report.handicap)
                }
                OutputFormat::Json => output::format_json(&report)?,
            })
        }
        Commands::Predict {
            round: round_args,
            handicap,
        } => {
            let round = select_round(tables, &round_args)?;
            let range = handicapper.table().handicap_range();
            if !range.contains(&handicap) {
                anyhow::bail!(
                    "handicap {} is outside the {} range {}..={}",
                    handicap,
                    handicapper.system(),
                    range.start(),
                    range.end()
                );
            }
            let report = output::PredictionReport {
                round: round.name().to_string(),
                handicap,
                system: handicapper.system(),
                score: handicapper.score_for_handicap(&round, handicap),
                max_score: round.max_score(),
                allowance: handicapper.allowance(&round, handicap),
            };
            Ok(match format {
                OutputFormat::Table => output::format_prediction(&report, use_colors),
                OutputFormat::Tsv => {
                    format!("{}\t{}\t{}", report.round, report.handicap, report.score)
                }
                OutputFormat::Json => output::format_json(&report)?,
            })
        }
        Commands::Classify {
            round: round_args,
            score,
            category,
        } => {
            let round = select_round(tables, &round_args)?;
            if score > round.max_score() {
                return Err(quiver::Error::ScoreExceedsCapacity {
                    score,
                    capacity: round.max_score(),
                }
                .into());
            }
            let Some(key) = category_key(tables, &category, &round_args)? else {
                anyhow::bail!("--bow, --gender and --age are required");
            };
            let report = output::ClassificationReport {
                tier: tables.classifications.classify(score, &key)?,
                next: tables.classifications.next_tier(score, &key)?,
                category: key,
                score,
            };
            Ok(match format {
                OutputFormat::Table => output::format_classification(&report, use_colors),
                OutputFormat::Tsv => format!(
                    "{}\t{}",
                    report.score,
                    report.tier.as_ref().map(|t| t.name.as_str()).unwrap_or("")
                ),
                OutputFormat::Json => output::format_json(&report)?,
            })
        }
        Commands::Rounds => {
            let summaries = output::round_summaries(&tables.rounds);
            Ok(match format {
                OutputFormat::Table => output::format_round_list(&summaries, use_colors),
                OutputFormat::Tsv => output::format_round_list_tsv(&summaries),
                OutputFormat::Json => output::format_json(&summaries)?,
            })
        }
        Commands::Init { .. } => Ok(String::new()),
    }
}
