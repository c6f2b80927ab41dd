use clap::{Parser, Subcommand};
use dotenv::dotenv;
use scribeflow_rs::scribe::collab::{BraveSearch, GroqModel, YtDlpTranscripts, DEFAULT_MODEL};
use scribeflow_rs::scribe::pipeline::Pipeline;
use scribeflow_rs::scribe::server;

use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the pipeline once for a video URL
    Run {
        /// The video URL to analyze
        #[arg(short, long)]
        url: String,

        /// The completion model to use
        #[arg(short, long, default_value = DEFAULT_MODEL)]
        model: String,
    },
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Run { url, model } => {
            log::info!("Using model: {}", model);

            let model = Arc::new(GroqModel::new(model)?);
            let transcripts = Arc::new(YtDlpTranscripts::new());
            let search = Arc::new(BraveSearch::new()?);

            let pipeline = Pipeline::new(model, transcripts, search);

            println!("Analyzing video: {}", url);
            let output = pipeline.run(&url).await?;
            println!("{}", output.blog_post);
        }
        Commands::Serve { port } => {
            server::serve(port).await?;
        }
    }

    Ok(())
}
