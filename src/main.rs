use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rox::ast_printer::AstPrinter;
use rox::diagnostics::Diagnostics;
use rox::scanner::Scanner;
use rox::session::{read_source, RunError, Session};

/// Invalid invocation.
const EX_USAGE: i32 = 64;
/// Input file could not be read.
const EX_IOERR: i32 = 74;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to a file
    #[arg(long, global = true)]
    log: bool,

    /// Where `--log` writes
    #[arg(long, global = true, value_name = "PATH", default_value = "rox.log")]
    log_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Emit tokens as JSON, one object per line
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file as a single expression and prints its AST
    Parse { filename: PathBuf },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs input from a file as a Lox program
    Run { filename: PathBuf },

    /// Starts an interactive prompt
    Repl,
}

/// Reads the contents of a file as UTF‑8 text.
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let text = read_source(filename).with_context(|| format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", text.len(), filename);

    Ok(text)
}

fn read_or_exit(filename: &Path) -> String {
    match read_file(filename) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(EX_IOERR);
        }
    }
}

fn init_logger(path: &Path) -> Result<()> {
    let log_file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;

    // `[module:line] - message`, RUST_LOG overrides the default level.
    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("rox::")
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
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to {:?}", path);
    Ok(())
}

fn report(error: &RunError) {
    for e in error.errors() {
        eprintln!("{}", e);
    }
}

fn exit_on(error: RunError) -> ! {
    debug!("Run failed: {}", error);
    report(&error);
    process::exit(error.exit_code());
}

fn tokenize(filename: &Path, json: bool) -> Result<()> {
    let source = read_or_exit(filename);
    let mut diagnostics = Diagnostics::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for result in Scanner::new(&source) {
        match result {
            Ok(token) if json => writeln!(out, "{}", serde_json::to_string(&token)?)?,
            Ok(token) => writeln!(out, "{}", token)?,
            Err(e) => {
                eprintln!("{}", e);
                diagnostics.report(e);
            }
        }
    }

    if diagnostics.has_errors() {
        debug!("Tokenization failed, exiting with code 65");
        out.flush()?;
        process::exit(65);
    }

    Ok(())
}

fn repl() -> Result<()> {
    let mut session = Session::new();
    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }

        // Errors never end the prompt.
        if let Err(e) = session.run(&line) {
            report(&e);
        }
    }
}

fn main() -> Result<()> {
    let args: Cli = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                // Ignore a failed write; we are exiting either way.
                let _ = e.print();
                process::exit(EX_USAGE);
            }
        },
    };

    if args.log {
        init_logger(&args.log_file)?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename, json } => tokenize(&filename, json)?,

        Commands::Parse { filename } => {
            let source = read_or_exit(&filename);
            match Session::new().parse_expression(&source) {
                Ok(expr) => println!("{}", AstPrinter::print(&expr)),
                Err(e) => exit_on(e),
            }
        }

        Commands::Evaluate { filename } => {
            let source = read_or_exit(&filename);
            match Session::new().evaluate(&source) {
                Ok(value) => println!("{}", value),
                Err(e) => exit_on(e),
            }
        }

        Commands::Run { filename } => {
            let source = read_or_exit(&filename);
            if let Err(e) = Session::new().run(&source) {
                exit_on(e);
            }
            info!("Program executed successfully");
        }

        Commands::Repl => repl()?,
    }

    Ok(())
}
