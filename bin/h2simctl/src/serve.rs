//! ---
//! ems_section: "05-networking-external-interfaces"
//! ems_subsection: "binary"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "HTTP front end for the monthly simulation endpoint."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::net::{SocketAddr, TcpListener as StdTcpListener};

use anyhow::{Context, Result};
use clap::Args;
use tokio::{net::TcpListener, signal};
use tracing::info;

#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Socket address to listen on.
    #[arg(long, value_name = "ADDR", default_value = "127.0.0.1:8080")]
    listen: SocketAddr,
}

impl ServeCommand {
    pub fn execute(self) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to start tokio runtime")?;
        runtime.block_on(serve(self.listen))
    }
}

async fn serve(addr: SocketAddr) -> Result<()> {
    let listener = StdTcpListener::bind(addr)
        .with_context(|| format!("failed to bind simulation listener {addr}"))?;
    listener
        .set_nonblocking(true)
        .context("failed to configure listener as non-blocking")?;
    let listener = TcpListener::from_std(listener).context("failed to create tokio listener")?;

    info!(address = %addr, "simulation endpoint listening");
    axum::serve(listener, h2sim_calc_engine::api::router())
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .context("simulation server exited with error")?;
    Ok(())
}
