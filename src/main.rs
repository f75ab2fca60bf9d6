use clap::{ArgAction, Parser as ClapParser, Subcommand};
use rule_ast::cli::{self, CheckOptions, CliError, EvalOptions, RunOptions};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(name = "rule-ast")]
#[command(about = "Compile, combine and evaluate boolean rule expressions")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a rule expression and print its tree
    Check {
        /// The rule expression, e.g. "(age > 30 AND department = 'Sales')"
        expression: String,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Print the normalized expression instead of the JSON tree
        #[arg(long)]
        infix: bool,
    },

    /// Evaluate a rule expression against JSON data
    Eval {
        /// The rule expression
        expression: String,

        /// JSON object of variable values (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Evaluate a named rule from a rules file
    Run {
        /// Rule name
        name: String,

        /// TOML rules file
        #[arg(short, long)]
        rules: PathBuf,

        /// JSON object of variable values (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print every rule defined by a rules file
    Rules {
        /// TOML rules file
        #[arg(short, long)]
        rules: PathBuf,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // Only fails if a logger is already installed
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            expression,
            pretty,
            infix,
        } => cli::execute_check(&CheckOptions {
            expression,
            pretty,
            infix,
        })
        .map(|out| println!("{}", out)),
        Commands::Eval {
            expression,
            input,
            pretty,
        } => read_input(input).and_then(|input| {
            let output = cli::execute_eval(&EvalOptions { expression, input })?;
            print_json(&output, pretty)
        }),
        Commands::Run {
            name,
            rules,
            input,
            pretty,
        } => read_input(input).and_then(|input| {
            let output = cli::execute_run(&RunOptions { rules, name, input })?;
            print_json(&output, pretty)
        }),
        Commands::Rules { rules, pretty } => {
            cli::list_rules(&rules).and_then(|output| print_json(&output, pretty))
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// `--input` wins; otherwise read piped stdin.
fn read_input(input: Option<String>) -> Result<Option<String>, CliError> {
    match input {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

fn print_json(output: &serde_json::Value, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(output)
    } else {
        serde_json::to_string(output)
    }?;
    println!("{}", json);
    Ok(())
}
