use clap::Parser;

use fakeserver::config::{Config, Overrides};
use fakeserver::{FakeServer, ObjectStore};

/// Serve an in-memory JSON object store on localhost
#[derive(Debug, Parser)]
#[command(name = "fakeserver", version)]
struct Args {
    /// The port fakeserver will listen on
    #[arg(long)]
    port: Option<u16>,

    /// Enable debug output of the server
    #[arg(long)]
    debug: bool,

    /// Serve static content from this directory under /static/
    #[arg(long = "static-dir", alias = "static_dir")]
    static_dir: Option<String>,

    /// Configuration file, without extension
    #[arg(long, default_value = "fakeserver")]
    config: String,

    /// Append log lines to this file instead of stderr
    #[arg(long = "log-file")]
    log_file: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let overrides = Overrides {
        port: args.port,
        debug: args.debug.then_some(true),
        static_dir: args.static_dir,
        log_file: args.log_file,
    };
    let cfg = Config::load_from(&args.config, &overrides)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let logger = cfg.build_logger()?;
    let options = cfg.to_options(ObjectStore::new(), logger);

    // The foreground listener below is the only one; never autostart here
    let server = FakeServer::new(fakeserver::ServerOptions {
        start: false,
        ..options
    })
    .await?;

    let http_server = server.http_server();
    println!("Starting server on {}...", http_server.addr());
    println!("Objects are at /api/objects/{{id}}");

    tokio::select! {
        result = http_server.listen_and_serve() => {
            if let Err(e) = result {
                eprintln!("Error with the internal TCP server: {e}");
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!("Interrupted, shutting down");
        }
    }

    Ok(())
}
