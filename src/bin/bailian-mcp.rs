use bailian_mcp::{BailianClient, BailianImageServer, Env, ServerConfig, http};
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: bailian-mcp [--http] [--port PORT]";

#[derive(Debug)]
struct CliArgs {
    http: bool,
    port: u16,
}

fn parse_args() -> Result<CliArgs, Box<dyn std::error::Error>> {
    let mut http = false;
    let mut port: u16 = 8000;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--http" => {
                http = true;
            }
            "--port" => {
                let raw = args.next().ok_or("missing value for --port")?;
                port = raw.parse::<u16>().map_err(|_| "invalid --port")?;
            }
            other => return Err(format!("unknown arg: {other}\n{USAGE}").into()),
        }
    }

    Ok(CliArgs { http, port })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the stdio MCP channel, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;

    let env = Env::default();
    let config = match ServerConfig::from_env(&env) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{err}");
            return Err(err.into());
        }
    };

    let client = BailianClient::new(&config.api_key)?;
    let server = BailianImageServer::new(client);

    if args.http {
        tracing::info!("Allowed hosts set to: {:?}", config.allowed_hosts);
        http::serve(server, &config, args.port).await?;
    } else {
        tracing::info!("Serving MCP over stdio");
        let service = server.serve(stdio()).await?;
        service.waiting().await?;
    }

    Ok(())
}
