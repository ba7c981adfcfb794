//! Command line client for the crypto broker service.

use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

mod commands;
mod env;
mod error;
mod runner;
mod shutdown;
mod telemetry;

use commands::sign::Encoding;

#[derive(Parser)]
#[command(name = "crypto-broker-cli")]
#[command(version, about = "Command line client for working with the crypto broker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a hashing request to the crypto broker
    Hash {
        /// Input to be hashed
        #[arg(value_name = "SLICE_OF_BYTES_TO_BE_HASHED")]
        input: String,
        /// Specify profile to be used
        #[arg(long, default_value = "Default")]
        profile: String,
        /// Specify delay for loop in milliseconds (1-1000)
        #[arg(long = "loop", value_name = "DELAY_MS", default_value_t = runner::NO_LOOP_FLAG_VALUE, allow_negative_numbers = true, value_parser = parse_loop_delay)]
        delay_ms: i64,
    },
    /// Send a certificate signing request to the crypto broker
    Sign {
        /// Specify relative path to CSR file
        #[arg(long)]
        csr: String,
        /// Specify relative path to CA certificate file
        #[arg(long = "caCert")]
        ca_cert: String,
        /// Specify relative path to signing key file
        #[arg(long = "caKey")]
        ca_key: String,
        /// Specify profile to be used
        #[arg(long, default_value = "Default")]
        profile: String,
        /// Specify encoding to be used
        #[arg(long, value_enum, ignore_case = true, default_value = "pem")]
        encoding: Encoding,
        /// Specify custom subject to be used for certificate generation
        #[arg(long)]
        subject: Option<String>,
        /// Specify delay for loop in milliseconds (1-1000)
        #[arg(long = "loop", value_name = "DELAY_MS", default_value_t = runner::NO_LOOP_FLAG_VALUE, allow_negative_numbers = true, value_parser = parse_loop_delay)]
        delay_ms: i64,
    },
    /// Check the broker server status
    Health {
        /// Specify delay for loop in milliseconds (1-1000)
        #[arg(long = "loop", value_name = "DELAY_MS", default_value_t = runner::NO_LOOP_FLAG_VALUE, allow_negative_numbers = true, value_parser = parse_loop_delay)]
        delay_ms: i64,
    },
    /// Run server-side cryptographic benchmarks
    Benchmark {
        /// Specify delay for loop in milliseconds (1-1000)
        #[arg(long = "loop", value_name = "DELAY_MS", default_value_t = runner::NO_LOOP_FLAG_VALUE, allow_negative_numbers = true, value_parser = parse_loop_delay)]
        delay_ms: i64,
    },
    /// Send a request to the broker's fake endpoint
    FakeEndpoint {
        /// Specify delay for loop in milliseconds (1-1000)
        #[arg(long = "loop", value_name = "DELAY_MS", default_value_t = runner::NO_LOOP_FLAG_VALUE, allow_negative_numbers = true, value_parser = parse_loop_delay)]
        delay_ms: i64,
    },
}

/// Validates `--loop` values before the command runs. Only the no-loop
/// sentinel and delays within the supported range are accepted.
fn parse_loop_delay(value: &str) -> Result<i64, String> {
    let delay: i64 = value
        .parse()
        .map_err(|err| format!("invalid loop flag value: {err}"))?;

    if delay == runner::NO_LOOP_FLAG_VALUE
        || (runner::MIN_LOOP_DELAY_MS..=runner::MAX_LOOP_DELAY_MS).contains(&delay)
    {
        Ok(delay)
    } else {
        Err(format!(
            "invalid loop flag value: delay must be between {} and {} milliseconds",
            runner::MIN_LOOP_DELAY_MS,
            runner::MAX_LOOP_DELAY_MS
        ))
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_thread_names(true)
        .with_filter(filter);
    tracing_subscriber::registry().with(fmt_layer).init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Hash {
            input,
            profile,
            delay_ms,
        } => commands::hash::execute(input, profile, delay_ms).await,
        Commands::Sign {
            csr,
            ca_cert,
            ca_key,
            profile,
            encoding,
            subject,
            delay_ms,
        } => commands::sign::execute(csr, ca_cert, ca_key, profile, encoding, subject, delay_ms).await,
        Commands::Health { delay_ms } => commands::health::execute(delay_ms).await,
        Commands::Benchmark { delay_ms } => commands::benchmark::execute(delay_ms).await,
        Commands::FakeEndpoint { delay_ms } => commands::fake_endpoint::execute(delay_ms).await,
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_flag_defaults_to_the_no_loop_sentinel() {
        let cli = Cli::try_parse_from(["crypto-broker-cli", "health"]).unwrap();

        match cli.command {
            Commands::Health { delay_ms } => assert_eq!(delay_ms, runner::NO_LOOP_FLAG_VALUE),
            _ => panic!("expected the health command"),
        }
    }

    #[test]
    fn loop_flag_accepts_delays_in_range() {
        let cli =
            Cli::try_parse_from(["crypto-broker-cli", "health", "--loop", "500"]).unwrap();

        match cli.command {
            Commands::Health { delay_ms } => assert_eq!(delay_ms, 500),
            _ => panic!("expected the health command"),
        }
    }

    #[test]
    fn loop_flag_rejects_delays_outside_range() {
        let err = Cli::try_parse_from(["crypto-broker-cli", "health", "--loop", "5000"])
            .err()
            .unwrap();

        assert!(err.to_string().contains("invalid loop flag value"));
    }

    #[test]
    fn loop_flag_rejects_negative_delays() {
        let err = Cli::try_parse_from(["crypto-broker-cli", "health", "--loop", "-5"])
            .err()
            .unwrap();

        assert!(err.to_string().contains("invalid loop flag value"));
    }

    #[test]
    fn loop_flag_rejects_non_numeric_values() {
        let err = Cli::try_parse_from(["crypto-broker-cli", "health", "--loop", "fast"])
            .err()
            .unwrap();

        assert!(err.to_string().contains("invalid loop flag value"));
    }

    #[test]
    fn hash_requires_an_input_argument() {
        let err = Cli::try_parse_from(["crypto-broker-cli", "hash"]).err().unwrap();

        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn hash_defaults_its_profile() {
        let cli = Cli::try_parse_from(["crypto-broker-cli", "hash", "payload"]).unwrap();

        match cli.command {
            Commands::Hash { input, profile, .. } => {
                assert_eq!(input, "payload");
                assert_eq!(profile, "Default");
            }
            _ => panic!("expected the hash command"),
        }
    }

    #[test]
    fn sign_requires_all_three_input_files() {
        let err = Cli::try_parse_from(["crypto-broker-cli", "sign", "--csr", "csr.pem"])
            .err()
            .unwrap();

        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn sign_accepts_its_file_flags() {
        let cli = Cli::try_parse_from([
            "crypto-broker-cli",
            "sign",
            "--csr",
            "csr.pem",
            "--caCert",
            "ca.pem",
            "--caKey",
            "ca.key",
        ])
        .unwrap();

        match cli.command {
            Commands::Sign {
                csr,
                ca_cert,
                ca_key,
                profile,
                encoding,
                subject,
                ..
            } => {
                assert_eq!(csr, "csr.pem");
                assert_eq!(ca_cert, "ca.pem");
                assert_eq!(ca_key, "ca.key");
                assert_eq!(profile, "Default");
                assert!(matches!(encoding, Encoding::Pem));
                assert!(subject.is_none());
            }
            _ => panic!("expected the sign command"),
        }
    }

    #[test]
    fn encoding_flag_is_case_insensitive() {
        let cli = Cli::try_parse_from([
            "crypto-broker-cli",
            "sign",
            "--csr",
            "csr.pem",
            "--caCert",
            "ca.pem",
            "--caKey",
            "ca.key",
            "--encoding",
            "B64",
        ])
        .unwrap();

        match cli.command {
            Commands::Sign { encoding, .. } => assert!(matches!(encoding, Encoding::B64)),
            _ => panic!("expected the sign command"),
        }
    }

    #[test]
    fn fake_endpoint_uses_a_kebab_case_name() {
        let cli = Cli::try_parse_from(["crypto-broker-cli", "fake-endpoint"]).unwrap();

        assert!(matches!(cli.command, Commands::FakeEndpoint { .. }));
    }
}
