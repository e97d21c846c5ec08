mod commands;

use clap::{Args, Parser, Subcommand};
use xrandr_screens::display::Rotation;
use xrandr_screens::ui::{self, Level, OutputFormat};

/// xscreens: inspect and configure X11 outputs through xrandr
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Activate debug mode
    #[arg(short, long, global = true)]
    debug: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List outputs and their modes
    List {
        /// Only outputs with a monitor attached
        #[arg(long, conflicts_with = "enabled")]
        connected: bool,
        /// Only outputs that are switched on
        #[arg(long)]
        enabled: bool,
        /// Include details from xrandr --verbose (brightness, gamma, ...)
        #[arg(long)]
        details: bool,
    },

    /// Change settings of one output
    Set(SetArgs),

    /// Set brightness on all enabled outputs
    Brightness {
        /// Brightness multiplier, 1.0 is normal
        #[arg(value_parser = commands::parse_brightness_arg)]
        value: f64,
    },

    /// Set gamma on all enabled outputs
    Gamma {
        /// Gamma as R:G:B, e.g. 1.0:0.9:0.8
        #[arg(value_parser = commands::parse_gamma_arg)]
        value: (f64, f64, f64),
    },

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Inspect the log of executed xrandr commands
    Log {
        #[command(subcommand)]
        command: LogCommands,
    },
}

#[derive(Args, Debug)]
struct SetArgs {
    /// Output name (e.g. HDMI1)
    output: String,

    /// Resolution as WxH
    #[arg(long, value_parser = commands::parse_mode_arg)]
    mode: Option<(u32, u32)>,

    /// Make this the primary output
    #[arg(long)]
    primary: bool,

    /// Switch the output on
    #[arg(long, conflicts_with = "off")]
    on: bool,

    /// Switch the output off
    #[arg(long)]
    off: bool,

    /// Rotation: normal, left, inverted or right
    #[arg(long)]
    rotate: Option<Rotation>,

    #[arg(long, value_name = "OUTPUT", group = "position")]
    left_of: Option<String>,

    #[arg(long, value_name = "OUTPUT", group = "position")]
    right_of: Option<String>,

    #[arg(long, value_name = "OUTPUT", group = "position")]
    above: Option<String>,

    #[arg(long, value_name = "OUTPUT", group = "position")]
    below: Option<String>,

    #[arg(long, value_name = "OUTPUT", group = "position")]
    same_as: Option<String>,

    /// Brightness multiplier, 1.0 is normal
    #[arg(long, value_parser = commands::parse_brightness_arg)]
    brightness: Option<f64>,

    /// Gamma as R:G:B
    #[arg(long, value_parser = commands::parse_gamma_arg)]
    gamma: Option<(f64, f64, f64)>,

    /// Print the xrandr command instead of running it
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the configuration file location
    Path,
    /// Print the effective configuration
    Show,
}

#[derive(Subcommand, Debug)]
enum LogCommands {
    /// Show the most recent commands
    Show {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Delete the log
    Clear,
}

fn main() {
    let cli = Cli::parse();

    ui::init(cli.format, !cli.no_color);
    ui::set_debug_mode(cli.debug);

    let result = match cli.command {
        Commands::List {
            connected,
            enabled,
            details,
        } => commands::handle_list(connected, enabled, details),
        Commands::Set(args) => commands::handle_set(args.into()),
        Commands::Brightness { value } => commands::handle_brightness(value),
        Commands::Gamma { value } => commands::handle_gamma(value),
        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::handle_config_path(),
            ConfigCommands::Show => commands::handle_config_show(),
        },
        Commands::Log { command } => match command {
            LogCommands::Show { limit } => commands::handle_log_show(limit),
            LogCommands::Clear => commands::handle_log_clear(),
        },
    };

    if let Err(e) = result {
        ui::emit(Level::Error, "xscreens.error", &format!("Error: {:#}", e), None);
        std::process::exit(1);
    }
}

impl From<SetArgs> for commands::SetRequest {
    fn from(args: SetArgs) -> Self {
        use xrandr_screens::display::Relation;

        let position = [
            (Relation::LeftOf, args.left_of),
            (Relation::RightOf, args.right_of),
            (Relation::Above, args.above),
            (Relation::Below, args.below),
            (Relation::SameAs, args.same_as),
        ]
        .into_iter()
        .find_map(|(relation, target)| target.map(|t| (relation, t)));

        let enabled = match (args.on, args.off) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };

        Self {
            output: args.output,
            mode: args.mode,
            primary: args.primary,
            enabled,
            rotation: args.rotate,
            position,
            brightness: args.brightness,
            gamma: args.gamma,
            dry_run: args.dry_run,
        }
    }
}
