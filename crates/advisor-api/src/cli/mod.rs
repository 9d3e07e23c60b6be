//! CLI command definitions for the `advisor` binary.

pub mod embed;

use clap::{Parser, Subcommand};

/// QA chat backend: serve the HTTP API or check the embeddings endpoint.
#[derive(Parser)]
#[command(name = "advisor", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Detailed output (-v for debug, -vv for trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit log lines as JSON.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve {
        /// Host to bind to. Defaults to `[server].host`.
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on. Defaults to `[server].port`.
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Embed a sample text and print the vector length and first values.
    EmbedCheck {
        /// Text to embed.
        #[arg(long, default_value = embed::DEFAULT_TEXT)]
        text: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from(["advisor", "-vv", "serve", "--port", "9000"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Serve { host, port } => {
                assert!(host.is_none());
                assert_eq!(port, Some(9000));
            }
            Commands::EmbedCheck { .. } => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_embed_check_default_text() {
        let cli = Cli::try_parse_from(["advisor", "embed-check", "--otel"]).unwrap();
        assert!(cli.otel);
        match cli.command {
            Commands::EmbedCheck { text } => assert_eq!(text, embed::DEFAULT_TEXT),
            Commands::Serve { .. } => panic!("expected embed-check"),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
