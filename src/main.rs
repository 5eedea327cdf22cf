use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use discovery_stubgen::builder::ClassBuilder;
use discovery_stubgen::config::GeneratorConfig;
use discovery_stubgen::discovery::Descriptor;
use discovery_stubgen::format::{BlackFormatter, Formatter, Unformatted};
use discovery_stubgen::http::{DiscoveryClient, discovery_url_for};
use discovery_stubgen::output;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = build_cli().get_matches();

    let log_level = matches
        .get_one::<String>("log-level")
        .map(String::as_str)
        .unwrap_or("warn");
    init_tracing(log_level)?;

    let config = load_config(&matches)?;
    config
        .compile_templates()
        .context("invalid template configuration")?;

    let descriptor = match matches.get_one::<PathBuf>("descriptor") {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("read descriptor {}", path.display()))?;
            Descriptor::from_json(&raw)?
        }
        None => DiscoveryClient::new()?.fetch(&config.discovery_url)?,
    };

    let builder = ClassBuilder::new(&descriptor, &config)?;
    let source = builder.build_module()?;

    let formatter: Box<dyn Formatter> = if config.formatter.enabled {
        Box::new(BlackFormatter::from_config(&config.formatter))
    } else {
        Box::new(Unformatted)
    };
    let emitted = output::emit(&config.output_dir, &descriptor.name, &source, formatter.as_ref())
        .with_context(|| format!("write output to {}", config.output_dir.display()))?;

    match &emitted.format_error {
        None => {
            let module = output::output_file_name(&descriptor.name);
            let module = module.trim_end_matches(".py");
            write_stdout_line(&format!(
                "Successfully created the class '{}' in '{}'.",
                builder.class_name(),
                emitted.path.display()
            ))?;
            write_stdout_line(&format!(
                "Use it as a type hint: from {module} import {}",
                builder.class_name()
            ))?;
        }
        Some(err) => {
            write_stdout_line(&format!(
                "{} failed to format the output ({err}), please check the config and try again.",
                config.formatter.program
            ))?;
            write_stdout_line(&format!(
                "You can find the unformatted output in the file '{}'",
                emitted.path.display()
            ))?;
        }
    }

    Ok(())
}

fn build_cli() -> Command {
    Command::new("discovery-stubgen")
        .about("Generate Python type-hint classes from a Google API discovery document")
        .arg(
            Arg::new("url")
                .long("url")
                .value_name("URL")
                .conflicts_with_all(["api", "descriptor"])
                .help("Discovery document URL"),
        )
        .arg(
            Arg::new("api")
                .long("api")
                .value_name("NAME")
                .requires("api-version")
                .conflicts_with("descriptor")
                .help("API name, e.g. sheets (builds the discovery URL)"),
        )
        .arg(
            Arg::new("api-version")
                .long("api-version")
                .value_name("VERSION")
                .requires("api")
                .help("API version, e.g. v4"),
        )
        .arg(
            Arg::new("descriptor")
                .long("descriptor")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Read the discovery document from a local JSON file"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("YAML file with templates and generator settings"),
        )
        .arg(
            Arg::new("out-dir")
                .long("out-dir")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Directory the generated module is written to"),
        )
        .arg(
            Arg::new("formatter")
                .long("formatter")
                .value_name("PROGRAM")
                .help("black-compatible formatter executable"),
        )
        .arg(
            Arg::new("line-length")
                .long("line-length")
                .value_name("N")
                .value_parser(value_parser!(u16))
                .help("Formatter line length"),
        )
        .arg(
            Arg::new("no-format")
                .long("no-format")
                .action(ArgAction::SetTrue)
                .help("Write the module without running the formatter"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .default_value("warn")
                .help("Log filter used when RUST_LOG is unset"),
        )
}

/// Defaults, then the config file, then the environment, then flags.
fn load_config(matches: &ArgMatches) -> Result<GeneratorConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => GeneratorConfig::from_yaml_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    config.apply_env();

    if let Some(url) = matches.get_one::<String>("url") {
        config.discovery_url = url.clone();
    }
    if let (Some(api), Some(version)) = (
        matches.get_one::<String>("api"),
        matches.get_one::<String>("api-version"),
    ) {
        config.discovery_url = discovery_url_for(api, version);
    }
    if let Some(dir) = matches.get_one::<PathBuf>("out-dir") {
        config.output_dir = dir.clone();
    }
    if let Some(program) = matches.get_one::<String>("formatter") {
        config.formatter.program = program.clone();
    }
    if let Some(line_length) = matches.get_one::<u16>("line-length") {
        config.formatter.line_length = *line_length;
    }
    if matches.get_flag("no-format") {
        config.formatter.enabled = false;
    }
    Ok(config)
}

/// Uses `RUST_LOG` if set, otherwise `log_level`. Logs go to stderr.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    Ok(())
}

fn write_stdout_line(line: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(line.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}
