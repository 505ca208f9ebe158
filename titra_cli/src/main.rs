use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use titra_core::report::{self, format_number};
use titra_core::*;

#[derive(Parser)]
#[command(name = "titra")]
#[command(about = "Titration concentration and purity calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Load configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute analyte concentration from titration measurements
    Calc(CalcArgs),

    /// List past calculations, newest first
    History {
        /// Show at most this many records
        #[arg(long)]
        limit: Option<usize>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove all past calculations
    Clear,

    /// Export history to a CSV file
    Export {
        /// Destination CSV file
        #[arg(long)]
        out: PathBuf,
    },

    /// List titration types and their role labels
    Types,
}

#[derive(Args)]
struct CalcArgs {
    /// Titration type (acid-base, redox, complexometric, precipitation)
    #[arg(long = "type", default_value = "acid-base")]
    titration_type: TitrationType,

    /// Titrant name
    #[arg(long, default_value = "")]
    titrant: String,

    /// Analyte name
    #[arg(long, default_value = "")]
    analyte: String,

    /// Titrant concentration
    #[arg(long)]
    concentration: f64,

    /// Concentration unit (molarity or normality)
    #[arg(long, default_value = "molarity")]
    unit: ConcentrationUnit,

    /// Titrant n-factor (equivalents per mole); required for normality
    #[arg(long)]
    n_factor: Option<u32>,

    /// Titrant volume used to reach the end point
    #[arg(long)]
    volume: f64,

    #[arg(long, default_value = "mL")]
    volume_unit: VolumeUnit,

    /// Titrant volume consumed by a blank
    #[arg(long, default_value_t = 0.0)]
    blank: f64,

    #[arg(long, default_value = "mL")]
    blank_unit: VolumeUnit,

    /// Volume of the analyte sample
    #[arg(long)]
    sample_volume: f64,

    #[arg(long, default_value = "mL")]
    sample_unit: VolumeUnit,

    /// Moles of titrant in the balanced equation
    #[arg(long, default_value_t = 1)]
    titrant_stoich: u32,

    /// Moles of analyte in the balanced equation
    #[arg(long, default_value_t = 1)]
    analyte_stoich: u32,

    /// Also compute mass and purity (needs --molar-mass)
    #[arg(long)]
    mass: bool,

    /// Analyte molar mass in g/mol
    #[arg(long)]
    molar_mass: Option<f64>,

    /// Total sample mass in g
    #[arg(long)]
    sample_mass: Option<f64>,

    /// Do not record this calculation in history
    #[arg(long)]
    no_save: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

impl CalcArgs {
    fn to_input(&self) -> TitrationInput {
        // Molarity input without an n-factor behaves as n = 1
        let titrant_n_factor = self.n_factor.or(match self.unit {
            ConcentrationUnit::Molarity => Some(1),
            ConcentrationUnit::Normality => None,
        });

        TitrationInput {
            titration_type: self.titration_type,
            titrant_name: self.titrant.clone(),
            titrant_concentration: self.concentration,
            titrant_concentration_unit: self.unit,
            titrant_n_factor,
            analyte_name: self.analyte.clone(),
            analyte_molar_mass: self.molar_mass,
            sample_mass: self.sample_mass,
            titration_volume: self.volume,
            titration_volume_unit: self.volume_unit,
            blank_volume: self.blank,
            blank_volume_unit: self.blank_unit,
            sample_volume: self.sample_volume,
            sample_volume_unit: self.sample_unit,
            titrant_stoichiometry: self.titrant_stoich,
            analyte_stoichiometry: self.analyte_stoich,
            compute_mass: self.mass,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    titra_core::logging::init(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }

    let mut store = JsonlHistory::new(config.history_path());
    tracing::debug!("Using history file {:?}", store.path());

    match cli.command {
        Commands::Calc(args) => cmd_calc(&args, &mut store, &config),
        Commands::History { limit, json } => cmd_history(&store, limit, json, &config),
        Commands::Clear => cmd_clear(&mut store),
        Commands::Export { out } => cmd_export(&store, &out),
        Commands::Types => {
            cmd_types();
            Ok(())
        }
    }
}

fn cmd_calc(args: &CalcArgs, store: &mut impl HistoryStore, config: &Config) -> Result<()> {
    let input = args.to_input();

    let problems = input.problems();
    if !problems.is_empty() {
        eprintln!("Invalid input:");
        for problem in &problems {
            eprintln!("  - {}", problem);
        }
        return Err(Error::Input(format!(
            "{} problem(s) with titration input",
            problems.len()
        )));
    }

    let result = compute(&input);

    for warning in warnings(&input, &result) {
        eprintln!("warning: {}", warning);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", report::render(&result, &config.display));
    }

    if args.no_save || !config.history.enabled {
        tracing::debug!("Not recording calculation in history");
        return Ok(());
    }

    let record = store.append(input, result)?;
    tracing::info!("Recorded calculation {}", record.id);
    if !args.json {
        println!("\n✓ Saved to history");
    }

    Ok(())
}

fn cmd_history(
    store: &impl HistoryStore,
    limit: Option<usize>,
    json: bool,
    config: &Config,
) -> Result<()> {
    let mut records = store.records()?;
    if let Some(limit) = limit {
        records.truncate(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No calculations yet.");
        return Ok(());
    }

    for record in &records {
        display_record(record, config);
    }

    Ok(())
}

fn display_record(record: &TitrationRecord, config: &Config) {
    let display = &config.display;
    let input = &record.input;
    let result = &record.result;

    let when = record
        .created_at()
        .map(|t| {
            t.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| record.id.to_string());

    println!("{}  ({})", display_name(&input.analyte_name), when);
    print!(
        "  {} mol/L",
        format_number(result.analyte_concentration_mol_l, display)
    );
    if let Some(purity) = result.analyte_purity {
        print!(", {}% pure", format_number(purity, display));
    }
    println!();
    println!(
        "  {} ({} {}) → {} ({} {})",
        display_name(&input.titrant_name),
        format_number(input.titrant_concentration, display),
        input.titrant_concentration_unit,
        display_name(&input.analyte_name),
        format_number(input.sample_volume, display),
        input.sample_volume_unit
    );
    println!();
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "(unnamed)"
    } else {
        name
    }
}

fn cmd_clear(store: &mut impl HistoryStore) -> Result<()> {
    let count = store.clear()?;
    println!("✓ Cleared {} calculations from history", count);
    Ok(())
}

fn cmd_export(store: &impl HistoryStore, out: &Path) -> Result<()> {
    let records = store.records()?;
    let count = export_csv(&records, out)?;
    println!("✓ Exported {} calculations to {}", count, out.display());
    Ok(())
}

fn cmd_types() {
    for titration_type in TitrationType::ALL {
        let labels = titration_type.labels();
        println!("{}", titration_type);
        println!("  titrant: {}", labels.titrant);
        println!("  analyte: {}", labels.analyte);
    }
}
