//! Serve command implementation.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use lostfound_file::DataDir;
use lostfound_http::{AppState, router, serve};

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Base URL for image links (default: derived from the Host header)
    #[arg(long, env = "LOSTFOUND_PUBLIC_URL")]
    pub public_url: Option<String>,
}

pub async fn run(args: ServeArgs, data_dir: &DataDir) -> Result<()> {
    let (store, media) = data_dir.open().with_context(|| {
        format!(
            "Failed to open data directory {}",
            data_dir.root().display()
        )
    })?;

    info!(
        data_dir = %data_dir.root().display(),
        items = %data_dir.items_path().display(),
        "Opened data directory"
    );

    let app = router(AppState {
        store,
        media,
        uploads_dir: data_dir.uploads_dir(),
        public_url: args.public_url,
    });

    let addr = SocketAddr::new(args.host, args.port);
    eprintln!("lostfound listening on http://{}", addr);

    serve(addr, app).await.context("Server failed")?;

    Ok(())
}
