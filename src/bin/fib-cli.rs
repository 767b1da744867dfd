use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};

#[derive(Parser)]
#[command(name = "fib-cli")]
#[command(about = "Client for the fib-fanout service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// W3C baggage to send along, e.g. `user=alice,run=7`. Copied onto every span.
    #[arg(short, long)]
    baggage: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute term `index` (GET /fib?i=<index>)
    Compute {
        #[arg(allow_hyphen_values = true)]
        index: i64,
    },
    /// Fetch the informational root page
    Root,
    /// Terminate the service (GET /quitquitquit)
    Quit,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder().no_proxy().build()?;

    let mut headers = HeaderMap::new();
    if let Some(baggage) = &cli.baggage {
        headers.insert("baggage", HeaderValue::from_str(baggage)?);
    }

    match cli.command {
        Commands::Compute { index } => {
            let res = client.get(format!("{}/fib?i={}", cli.url, index))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Root => {
            let res = client.get(format!("{}/", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Quit => {
            // The server exits without answering; a dropped connection is success here.
            match client.get(format!("{}/quitquitquit", cli.url)).send().await {
                Ok(res) => print_response(res).await?,
                Err(e) if e.is_request() || e.is_connect() => println!("Service terminated"),
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(());
    }

    println!("{}", text);
    Ok(())
}
