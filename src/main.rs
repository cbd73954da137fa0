use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use complex_calc::decompose::{Segment, decompose_within};
use complex_calc::lex::tokenize;
use complex_calc::session::Outcome;
use complex_calc::{DEFAULT_MAX_DEPTH, Expression, Limits, Session, compact};
use miette::{IntoDiagnostic, Report, WrapErr, miette};

/// Evaluates arithmetic over complex numbers, e.g. `2*(3+i) - a`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Deepest parenthesis nesting accepted.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive session; `name = expr` binds, `q` quits.
    Repl,
    /// Runs every line of a file through one session.
    Run { filename: PathBuf },
    /// Evaluates one expression.
    Eval {
        expression: String,
        /// Binding made before evaluating, e.g. `-D a=1+i`.
        #[arg(short = 'D', long = "define", value_name = "NAME=EXPR")]
        defines: Vec<String>,
    },
    /// Prints the resolved expression tree.
    Parse {
        expression: String,
        #[arg(short = 'D', long = "define", value_name = "NAME=EXPR")]
        defines: Vec<String>,
    },
    /// Prints the tokens of every scope.
    Tokenize { expression: String },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    let limits = Limits {
        max_depth: args.max_depth,
    };

    match args.command {
        Commands::Repl => repl(limits)?,
        Commands::Run { filename } => {
            let file_contents = fs::read_to_string(&filename)
                .into_diagnostic()
                .wrap_err_with(|| format!("reading `{}` failed", filename.display()))?;

            let mut session = Session::new(limits);
            for (index, line) in file_contents.lines().enumerate() {
                match session.execute(line) {
                    Ok(Outcome::Quit) => break,
                    Ok(Outcome::Empty | Outcome::Assigned { .. }) => {}
                    Ok(outcome) => println!("{outcome}"),
                    Err(e) => {
                        eprintln!("[line {}] Error: {e}", index + 1);
                        eprintln!("{:?}", Report::new(e));

                        std::process::exit(65);
                    }
                }
            }
        }
        Commands::Eval {
            expression,
            defines,
        } => {
            let session = define_all(limits, &defines)?;
            let whole = compact(&expression);
            let value = complex_calc::evaluate_with(&whole, session.environment(), limits)
                .map_err(|e| Report::new(e).with_source_code(whole))?;
            println!("{value}");
        }
        Commands::Parse {
            expression,
            defines,
        } => {
            let session = define_all(limits, &defines)?;
            let whole = compact(&expression);
            let expression = Expression::parse(&whole, session.environment(), limits)
                .map_err(|e| Report::new(e).with_source_code(whole))?;
            println!("{expression}");
        }
        Commands::Tokenize { expression } => {
            let whole = compact(&expression);
            let segments = decompose_within(&whole, limits.max_depth)
                .map_err(|e| Report::new(e).with_source_code(whole.clone()))?;
            print_tokens(&segments);
            println!("EOF  null");
        }
    }
    Ok(())
}

fn repl(limits: Limits) -> miette::Result<()> {
    println!("Starting interface. Enter q to leave");

    let mut session = Session::new(limits);
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!(">> ");
        io::stdout().flush().into_diagnostic()?;

        line.clear();
        let read = stdin
            .read_line(&mut line)
            .into_diagnostic()
            .wrap_err("reading from stdin failed")?;
        if read == 0 {
            println!();
            break;
        }

        match session.execute(&line) {
            Ok(Outcome::Quit) => {
                println!("{}", Outcome::Quit);
                break;
            }
            Ok(Outcome::Empty) => {}
            Ok(outcome) => println!("{outcome}"),
            // the session survives bad lines
            Err(e) => eprintln!("{:?}", Report::new(e)),
        }
    }
    Ok(())
}

fn define_all(limits: Limits, defines: &[String]) -> miette::Result<Session> {
    let mut session = Session::new(limits);
    for define in defines {
        match session.execute(define)? {
            Outcome::Assigned { .. } => {}
            _ => {
                return Err(miette!(
                    help = "write bindings as `NAME=EXPR`",
                    "`{define}` does not bind a name"
                ));
            }
        }
    }
    Ok(session)
}

fn print_tokens(segments: &[Segment<'_>]) {
    for segment in segments {
        match segment {
            Segment::Text { text, offset } => {
                for token in tokenize(text, *offset) {
                    println!("{token}");
                }
            }
            Segment::Group { children, .. } => {
                println!("LEFT_PAREN ( null");
                print_tokens(children);
                println!("RIGHT_PAREN ) null");
            }
        }
    }
}
