use clap::Parser;
use nled_server::TcpServer;

/// Default gamma applied to every panel; not yet exposed on the wire or the
/// CLI, matching the core's gamma table being a construction-time constant.
const DEFAULT_GAMMA: f32 = 1.0;

#[derive(Parser, Debug)]
#[clap(name = "nled-server", about = "TCP command server for OctoWS2811-style LED interface boards")]
struct Args {
    /// TCP port to listen on.
    #[clap(long, default_value = "7845")]
    port: u16,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut server = TcpServer::new(args.port, DEFAULT_GAMMA);
    log::info!("nled-server starting on port {}", args.port);

    server.start()?;
    loop {
        server.restart()?;
    }
}
