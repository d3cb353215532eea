/// Native command-line client for the image processing service.
#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use clap::{Args, Parser, Subcommand};
    use imgproc::config::AppConfig;
    use imgproc::imgproc_core::Locale;
    use imgproc::native::{NativeError, ProcessOptions, algorithm_listing, run_process};

    #[derive(Parser)]
    #[command(name = "imgproc-native")]
    #[command(about = "Send images to the image processing service and save the result")]
    #[command(version)]
    struct Cli {
        /// Configuration file (defaults to the user config directory).
        #[arg(long, global = true)]
        config: Option<PathBuf>,

        /// Service base URL, overriding the configuration.
        #[arg(long, global = true)]
        base_url: Option<String>,

        /// Label language: en or zh.
        #[arg(long, global = true)]
        locale: Option<Locale>,

        /// Request timeout in seconds (at least 1).
        #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// List every algorithm with its endpoint and parameters.
        Algorithms,

        /// Process an image and save the result.
        Process(ProcessArgs),

        /// Write the effective configuration to the default config path.
        SaveConfig,
    }

    #[derive(Debug, Clone, Args)]
    struct ProcessArgs {
        /// Primary image.
        #[arg(long)]
        image: PathBuf,

        /// Second operand for arithmetic and bitwise algorithms.
        #[arg(long)]
        second_image: Option<PathBuf>,

        /// Canonical algorithm name, e.g. "Convolution - Sobel X".
        #[arg(long)]
        algorithm: String,

        /// Algorithm parameter as field=value (repeatable), e.g. scalingFactor=2.
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Output file or directory.
        #[arg(long, default_value = "resultImage.jpg")]
        out: PathBuf,
    }

    fn parse_param(raw: &str) -> Result<(String, String), String> {
        let (field, value) = raw
            .split_once('=')
            .ok_or_else(|| format!("expected field=value, got '{}'", raw))?;
        Ok((field.trim().to_string(), value.to_string()))
    }

    fn load_config(cli: &Cli) -> Result<AppConfig, NativeError> {
        let mut config = match &cli.config {
            Some(path) => AppConfig::load_from_path(path)?,
            None => AppConfig::load_from_default_path().unwrap_or_default(),
        };

        if let Some(base_url) = &cli.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(locale) = cli.locale {
            config.locale = locale;
        }
        if let Some(timeout) = cli.timeout {
            config.request_timeout_secs = timeout;
        }
        Ok(config)
    }

    pub fn run() -> Result<(), NativeError> {
        let cli = Cli::parse();
        let config = load_config(&cli)?;

        env_logger::Builder::new()
            .filter_level(config.log_level.to_level_filter())
            .parse_default_env()
            .init();

        match cli.command {
            Commands::Algorithms => {
                print!("{}", algorithm_listing(config.locale));
            }
            Commands::Process(args) => {
                let options = ProcessOptions {
                    image: args.image,
                    second_image: args.second_image,
                    algorithm: args.algorithm,
                    params: args.params,
                    out: args.out,
                };
                let path = run_process(&config, &options)?;
                println!("{}", path.display());
            }
            Commands::SaveConfig => {
                config.save_to_default_path()?;
            }
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_timeout_flag_requires_a_second() {
            let zero = Cli::try_parse_from(["imgproc-native", "--timeout", "0", "algorithms"]);
            assert!(zero.is_err());

            let cli = Cli::try_parse_from(["imgproc-native", "--timeout", "5", "algorithms"])
                .unwrap();
            assert_eq!(cli.timeout, Some(5));
        }

        #[test]
        fn test_param_flag_splits_field_and_value() {
            assert_eq!(
                parse_param("nBit=3"),
                Ok(("nBit".to_string(), "3".to_string()))
            );
            assert!(parse_param("nBit").is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = cli::run() {
        eprintln!("imgproc-native: {}", e);
        std::process::exit(1);
    }
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
