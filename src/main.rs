use std::{fs, process::ExitCode};

use clap::Parser as _;

use field_path::{Env, FieldPath, PathCodec, Parser};

/// Check field path text and print its canonical and dotted forms
#[derive(clap::Parser)]
#[command(name = "field-path")]
#[command(version)]
#[command(about = "Check field path text and print its canonical form", long_about = None)]
struct Cli {
    /// Field paths to check
    #[arg(required = true)]
    texts: Vec<String>,

    /// Accept calls to functions the environment does not know about
    #[arg(short, long)]
    permissive: bool,

    /// JSON file describing the parser environment
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,
}

fn load_env(cli: &Cli) -> Result<Env, String> {
    let mut env = match &cli.config {
        Some(file) => {
            let json = fs::read_to_string(file).map_err(|err| format!("{}: {}", file, err))?;
            Env::from_json(&json).map_err(|err| format!("{}: {}", file, err))?
        }
        None => Env::standard(),
    };

    if cli.permissive {
        env.permissive_functions = true;
    }

    Ok(env)
}

fn describe(path: &FieldPath) -> String {
    match path.as_unescaped_dotted_string() {
        Ok(dotted) => format!("{}\t{}", path, dotted),
        Err(err) => format!("{}\t({})", path, err),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    let env = match load_env(&cli) {
        Ok(env) => env,
        Err(msg) => {
            eprintln!("error: {}", msg);
            return ExitCode::FAILURE;
        }
    };

    log::debug!("{} known functions", env.functions.len());

    let codec = PathCodec::new(Parser::new(env));
    let mut failed = false;

    for text in &cli.texts {
        match codec.decode(text) {
            Ok(path) => println!("{}", describe(&path)),
            Err(err) => {
                eprintln!("error: {}", err);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
