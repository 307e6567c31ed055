use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use hasura_mcp_server::errors::ServerError;
use hasura_mcp_server::server::{Server, Transport};
use hasura_mcp_server::tools::MutationMode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;
use url::Url;

/// The header carrying the Hasura admin secret
const ADMIN_SECRET_HEADER: &str = "X-Hasura-Admin-Secret";

/// Clap styling
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Arguments to the MCP server
#[derive(Debug, clap::Parser)]
#[command(
    styles = STYLES,
    about = "Hasura MCP Server - work with a Hasura-backed database from an AI agent",
)]
struct Args {
    /// The Hasura GraphQL endpoint the server will invoke
    #[arg(
        long,
        short = 'e',
        env = "HASURA_ENDPOINT",
        default_value = "http://localhost:8080/v1/graphql"
    )]
    endpoint: Url,

    /// The Hasura admin secret sent with every request. The default only suits
    /// a local Hasura started with its documented placeholder secret; set it
    /// explicitly anywhere else. An empty value disables the header.
    #[arg(
        long,
        env = "HASURA_ADMIN_SECRET",
        default_value = "myadminsecretkey",
        hide_default_value = true
    )]
    admin_secret: String,

    /// Additional headers to send to the endpoint
    #[arg(long = "header", action = clap::ArgAction::Append)]
    headers: Vec<String>,

    /// The IP address to bind the SSE server to
    ///
    /// [default: 127.0.0.1]
    #[arg(long)]
    sse_address: Option<IpAddr>,

    /// Start the server using the SSE transport on the given port
    ///
    /// [default: 5000]
    #[arg(long)]
    sse_port: Option<u16>,

    /// The IP address to bind the Streamable HTTP server to
    ///
    /// [default: 127.0.0.1]
    #[arg(long, conflicts_with_all(["sse_port", "sse_address"]))]
    http_address: Option<IpAddr>,

    /// Start the server using the Streamable HTTP transport on the given port
    ///
    /// [default: 5000]
    #[arg(long, conflicts_with_all(["sse_port", "sse_address"]))]
    http_port: Option<u16>,

    /// Configure whether the insert/update/delete tools are exposed
    #[clap(long, short = 'm', default_value_t, value_enum)]
    allow_mutations: MutationMode,

    /// The log level for the MCP Server
    #[arg(long = "log", short = 'l', global = true, default_value_t = Level::INFO)]
    log_level: Level,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let transport = if args.http_port.is_some() || args.http_address.is_some() {
        Transport::StreamableHttp {
            address: args.http_address.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            port: args.http_port.unwrap_or(5000),
        }
    } else if args.sse_port.is_some() || args.sse_address.is_some() {
        Transport::SSE {
            address: args.sse_address.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            port: args.sse_port.unwrap_or(5000),
        }
    } else {
        Transport::Stdio
    };

    // When using the Stdio transport, send output to stderr since stdout is used for MCP messages
    match transport {
        Transport::SSE { .. } | Transport::StreamableHttp { .. } => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive(args.log_level.into()))
            .with_ansi(true)
            .with_target(false)
            .init(),
        Transport::Stdio => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive(args.log_level.into()))
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
            .init(),
    };

    info!(
        "Hasura MCP Server v{} // endpoint {}",
        std::env!("CARGO_PKG_VERSION"),
        args.endpoint
    );

    let mut headers = parse_headers(args.headers)?;
    let admin_secret = SecretString::from(args.admin_secret);
    if !admin_secret.expose_secret().is_empty() {
        let mut value = HeaderValue::from_str(admin_secret.expose_secret())
            .map_err(ServerError::HeaderValue)?;
        value.set_sensitive(true);
        headers.insert(ADMIN_SECRET_HEADER, value);
    }

    Ok(Server::builder()
        .transport(transport)
        .endpoint(args.endpoint)
        .headers(headers)
        .mutation_mode(args.allow_mutations)
        .build()
        .start()
        .await?)
}

fn parse_headers(headers: Vec<String>) -> Result<HeaderMap, ServerError> {
    let mut default_headers = HeaderMap::new();
    for header in headers {
        let parts: Vec<&str> = header.splitn(2, ':').map(|s| s.trim()).collect();
        match (parts.first(), parts.get(1)) {
            (Some(key), Some(value)) => {
                default_headers.append(HeaderName::from_str(key)?, HeaderValue::from_str(value)?);
            }
            _ => return Err(ServerError::Header(header)),
        }
    }
    Ok(default_headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    #[test]
    fn test_parse_headers_empty() {
        let headers = vec![];

        let result = parse_headers(headers).unwrap();

        assert_eq!(result.len(), 0)
    }

    #[test]
    fn test_parse_headers_authorization() {
        let headers = vec![
            "Authorization: Bearer 1234567890".to_string(),
            "X-TEST: abcde".to_string(),
        ];

        let result = parse_headers(headers).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(
            result.get(AUTHORIZATION),
            Some(&HeaderValue::from_str("Bearer 1234567890").unwrap()),
        );
        assert_eq!(
            result.get("X-TEST"),
            Some(&HeaderValue::from_str("abcde").unwrap()),
        );
    }

    #[test]
    fn test_parse_headers_with_colon_in_value() {
        let headers = vec!["X-URL: https://example.com:8080/path".to_string()];

        let result = parse_headers(headers).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(
            result.get("X-URL"),
            Some(&HeaderValue::from_str("https://example.com:8080/path").unwrap())
        );
    }

    #[test]
    fn test_parse_headers_missing_colon() {
        let headers = vec!["Authorization; Bearer 1234567890".to_string()];
        let result = parse_headers(headers);

        assert!(result.is_err());
        match result.unwrap_err() {
            ServerError::Header(header) => assert_eq!(header, "Authorization; Bearer 1234567890"),
            _ => panic!("Expected ServerError::Header"),
        }
    }
}
