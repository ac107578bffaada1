//! Command Line Interface (CLI) arguments.

use crate::dataset::{PipelineOptions, Sources};
use crate::normalize::DegenerateRange;
use crate::schema::{LoadOptions, MalformedRows};

use std::path::PathBuf;

use clap::Parser;

/// Amazonia command line interface
#[derive(Clone, Debug, Parser)]
pub struct CommandLineArgs {
    /// The IP address on which the server should listen
    #[arg(long, default_value = "0.0.0.0", env = "AMAZONIA_HOST")]
    pub host: String,
    /// The port to which the server should bind
    #[arg(long, default_value_t = 8080, env = "AMAZONIA_PORT")]
    pub port: u16,
    /// Flag indicating whether HTTPS should be used
    #[arg(long, default_value_t = false, env = "AMAZONIA_HTTPS")]
    pub https: bool,
    /// Path to the certificate file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/amazonia/certs/cert.pem",
        env = "AMAZONIA_CERT_FILE"
    )]
    pub cert_file: String,
    /// Path to the key file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/amazonia/certs/key.pem",
        env = "AMAZONIA_KEY_FILE"
    )]
    pub key_file: String,
    /// Maximum time in seconds to wait for requests to complete upon receiving `ctrl+c` signal.
    #[arg(long, default_value_t = 60, env = "AMAZONIA_SHUTDOWN_TIMEOUT")]
    pub graceful_shutdown_timeout: u64,
    /// Path to the deforestation table
    #[arg(
        long,
        default_value = "data/Desmatamento.csv",
        env = "AMAZONIA_DEFORESTATION_FILE"
    )]
    pub deforestation_file: PathBuf,
    /// Path to the meteorological table
    #[arg(
        long,
        default_value = "data/Meteorologico.csv",
        env = "AMAZONIA_WEATHER_FILE"
    )]
    pub weather_file: PathBuf,
    /// Field delimiter of both source files. Must be a single ASCII character.
    #[arg(long, default_value = ";", value_parser = ascii_byte, env = "AMAZONIA_DELIMITER")]
    pub delimiter: u8,
    /// Decimal mark of numeric cells
    #[arg(long, default_value_t = ',', env = "AMAZONIA_DECIMAL_MARK")]
    pub decimal_mark: char,
    /// Rows dated before this year are discarded
    #[arg(long, default_value_t = crate::temporal::DEFAULT_MIN_YEAR, env = "AMAZONIA_MIN_YEAR")]
    pub min_year: i32,
    /// How to normalise a selection whose values are all equal
    #[arg(long, value_enum, default_value_t, env = "AMAZONIA_DEGENERATE_RANGE")]
    pub degenerate_range: DegenerateRange,
    /// How to treat source rows that fail to parse
    #[arg(long, value_enum, default_value_t, env = "AMAZONIA_MALFORMED_ROWS")]
    pub malformed_rows: MalformedRows,
}

impl CommandLineArgs {
    /// Source files and their format.
    pub fn sources(&self) -> Sources {
        Sources {
            deforestation_file: self.deforestation_file.clone(),
            weather_file: self.weather_file.clone(),
            load_options: LoadOptions {
                delimiter: self.delimiter,
                decimal_mark: self.decimal_mark,
                malformed_rows: self.malformed_rows,
            },
        }
    }

    /// Options of the transformation steps.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            min_year: self.min_year,
            ..Default::default()
        }
    }
}

fn ascii_byte(value: &str) -> Result<u8, String> {
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(format!("expected a single ASCII character, got {value:?}")),
    }
}

/// Returns parsed command line arguments.
pub fn parse() -> CommandLineArgs {
    CommandLineArgs::parse()
}
