use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use slox::ast_printer::{AstPrinter, RpnPrinter};
use slox::error::LoxError;
use slox::lox::Lox;
use slox::reporting::{ConsoleReporter, NullReporter};
use slox::scanner::Scanner;
use slox::token::Token;

mod repl;

#[derive(ClapParser, Debug)]
#[command(version, about = "slox language interpreter", long_about = None)]
pub struct Cli {
    /// Starts the interactive prompt when omitted
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: Option<PathBuf>,

        /// Print the tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file and prints its syntax tree
    Parse {
        filename: Option<PathBuf>,

        /// Parse a single expression instead of a program
        #[arg(long)]
        expression: bool,

        /// Print the expression in reverse Polish notation (implies --expression)
        #[arg(long)]
        rpn: bool,
    },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: Option<PathBuf> },

    /// Runs input from a file as a slox program
    Run { filename: Option<PathBuf> },
}

/// Reads a source file through a memory map.
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let len: u64 = file
        .metadata()
        .context(format!("Failed to stat file {:?}", filename))?
        .len();

    // Mapping an empty file fails on some platforms.
    if len == 0 {
        info!("{:?} is empty", filename);
        return Ok(String::new());
    }

    let map = unsafe { Mmap::map(&file) }.context(format!("Failed to map file {:?}", filename))?;

    info!("Read {} bytes from {:?}", map.len(), filename);

    let source: String = String::from_utf8(map.to_vec())
        .map_err(LoxError::from)
        .context(format!("File {:?} is not valid UTF-8", filename))?;

    Ok(source)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'slox::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("slox::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

/// Exits with the conventional code for `e`.  Diagnostics have already gone
/// through the console sink.
fn fail(e: LoxError) -> ! {
    debug!("Exiting after error: {}", e);

    if matches!(e, LoxError::Io(_) | LoxError::Utf8(_)) {
        eprintln!("{}", e);
    }

    std::process::exit(e.exit_code());
}

fn no_input() {
    info!("No filepath provided");
    println!("No input filepath was provided. Exiting...");
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let Some(command) = args.commands else {
        info!("No subcommand, starting REPL");
        return repl::start();
    };

    match command {
        Commands::Tokenize { filename, json } => {
            let Some(filename) = filename else {
                no_input();
                return Ok(());
            };

            info!("Running Tokenize subcommand");
            let source: String = read_file(&filename)?;
            let mut scanner = Scanner::new(&source);
            let tokens: Vec<Token> = scanner.scan_tokens(&mut ConsoleReporter);

            if json {
                let out: String =
                    serde_json::to_string_pretty(&tokens).context("Failed to encode tokens")?;
                println!("{}", out);
            } else {
                for token in &tokens {
                    println!("{}", token);
                }
            }

            if scanner.error_count() > 0 {
                debug!("Tokenization failed, exiting with code 65");
                std::process::exit(65);
            }

            info!("Tokenization completed successfully");
        }

        Commands::Parse {
            filename,
            expression,
            rpn,
        } => {
            let Some(filename) = filename else {
                no_input();
                return Ok(());
            };

            info!("Running Parse subcommand");
            let source: String = read_file(&filename)?;
            let mut lox = Lox::new(NullReporter, ConsoleReporter);

            if expression || rpn {
                let expr = lox.parse_expression(&source).unwrap_or_else(|e| fail(e));
                let tree: String = if rpn {
                    RpnPrinter::print(&expr)
                } else {
                    AstPrinter::print(&expr)
                };

                debug!("AST: {}", tree);
                println!("{}", tree);
            } else {
                let tree: String = lox.parse_tree(&source).unwrap_or_else(|e| fail(e));

                debug!("AST: {}", tree);
                println!("{}", tree);
            }

            info!("Parse subcommand completed");
        }

        Commands::Evaluate { filename } => {
            let Some(filename) = filename else {
                no_input();
                return Ok(());
            };

            info!("Running Evaluate subcommand");
            let source: String = read_file(&filename)?;
            let mut lox = Lox::new(NullReporter, ConsoleReporter);

            let value = lox.evaluate(&source).unwrap_or_else(|e| fail(e));

            debug!("Evaluated to: {}", value);
            println!("{}", value);

            info!("Evaluate subcommand completed");
        }

        Commands::Run { filename } => {
            let Some(filename) = filename else {
                no_input();
                return Ok(());
            };

            info!("Running Run subcommand");
            let source: String = read_file(&filename)?;
            let mut lox = Lox::new(ConsoleReporter, ConsoleReporter);

            if let Err(e) = lox.run(&source) {
                fail(e);
            }

            info!("Program executed successfully");
        }
    }

    Ok(())
}
