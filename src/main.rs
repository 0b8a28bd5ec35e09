use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use taglet::{EngineConfig, EngineError, TemplateEngine};

/// Compiles and renders tag templates from layered theme directories.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a template against JSON data and print the result
    Render {
        /// Logical template name, e.g. `index` or `partials/header`
        name: String,

        /// JSON file used as the render context
        #[arg(long)]
        data: Option<PathBuf>,

        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Print the emitted code of a template and the mistakes recovered from
    Compile {
        name: String,

        #[command(flatten)]
        engine: EngineArgs,
    },
}

#[derive(Args, Debug)]
struct EngineArgs {
    /// Theme directory, most specific first; may be repeated
    #[arg(long = "theme")]
    themes: Vec<PathBuf>,

    /// JSON engine config; command line flags are applied on top
    #[arg(long)]
    config: Option<PathBuf>,

    /// Template file extension
    #[arg(long)]
    extension: Option<String>,

    /// Persist compiled templates in this directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Fail on recovered authoring mistakes such as unclosed blocks
    #[arg(long, default_value_t = false)]
    strict: bool,
}

impl EngineArgs {
    fn into_config(self) -> Result<EngineConfig, EngineError> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_file(path)?,
            None => EngineConfig::default(),
        };
        if !self.themes.is_empty() {
            config.theme_dirs = self.themes;
        }
        if let Some(extension) = self.extension {
            config.template_extension = extension;
        }
        if self.cache_dir.is_some() {
            config.cache_dir = self.cache_dir;
        }
        config.strict |= self.strict;
        Ok(config)
    }
}

fn load_data(path: Option<PathBuf>) -> Result<Value, EngineError> {
    let Some(path) = path else {
        return Ok(Value::Object(Default::default()));
    };
    let json = fs::read_to_string(&path).map_err(|e| {
        EngineError::Io(io::Error::new(
            e.kind(),
            format!("Failed to read data from '{}': {}", path.display(), e),
        ))
    })?;
    Ok(serde_json::from_str(&json)?)
}

fn run(command: Command) -> Result<String, EngineError> {
    match command {
        Command::Render { name, data, engine } => {
            let engine = TemplateEngine::from_config(engine.into_config()?)?;
            let context = load_data(data)?;
            engine.render(&name, &context)
        }
        Command::Compile { name, engine } => {
            let engine = TemplateEngine::from_config(engine.into_config()?)?;
            let artifact = engine.compile_artifact(&name)?;
            for diagnostic in &artifact.diagnostics {
                eprintln!("warning: recovered from {}", diagnostic);
            }
            Ok(artifact.code)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { "taglet=debug" } else { "taglet=warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli.command) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
