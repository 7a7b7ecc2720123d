use clap::Parser;
use resolv_application::Client;
use resolv_infrastructure::create_transport;
use tracing::{debug, error};

mod args;
mod bootstrap;
mod commands;

use args::{Cli, QueryKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;

    bootstrap::init_logging(&config.logging);

    debug!(
        protocol = config.transport.protocol_name(),
        endpoint = config.transport.endpoint(),
        "resolv v{}",
        env!("CARGO_PKG_VERSION")
    );

    let transport = create_transport(&config.transport)?;
    let mut client = Client::new(config.client.clone(), Box::new(transport));

    let result = match cli.query_kind()? {
        QueryKind::Ips => commands::print_ips(&mut client, &cli.qname).await,
        QueryKind::Nameservers => commands::print_nameservers(&mut client, &cli.qname).await,
        QueryKind::Services => commands::print_services(&mut client, &cli.qname).await,
        QueryKind::Probe => {
            commands::print_probe(&mut client, &cli.qname, &config.services).await
        }
        QueryKind::PtrProbe => {
            commands::print_ptr_probe(&mut client, &cli.qname, &config.services).await
        }
        QueryKind::Naptr => commands::print_naptr(&mut client, &cli.qname).await,
        QueryKind::Record(qtype) => commands::print_lookup(&mut client, &cli.qname, qtype).await,
    };

    if let Err(e) = client.close().await {
        error!(error = %e, "Failed to close transport");
    }

    result.map_err(|e| anyhow::anyhow!("query failed: {}", e))
}
