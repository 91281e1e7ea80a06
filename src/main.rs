use cardwatch::cli::commands::{Cli, Commands};
use cardwatch::config::AppConfig;
use cardwatch::CardWatch;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading {}: {e}", cli.config.display());
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cw = CardWatch::new(config);
    if let Err(e) = run_command(cw, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(cw: CardWatch, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Run => {
            let report = cw.run_cycle().await;
            println!(
                "Processed {}/{} (skipped {}), alerts {}, failures {} in {:.1}s",
                report.processed,
                report.batch_size,
                report.skipped,
                report.alerts_sent,
                report.failures(),
                report.duration_sec
            );
        }
        Commands::Queries { text } => {
            for q in cw.candidate_queries(&text) {
                println!("{q}");
            }
        }
        Commands::History { name, days } => {
            let records = cw.history(&name, days)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Panel => {
            let rows = cw.build_panel()?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Commands::Ping => {
            cw.ping().await;
            println!("Ping sent");
        }
    }
    Ok(())
}
