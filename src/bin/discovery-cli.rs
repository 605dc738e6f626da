use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "discovery-cli")]
#[command(about = "Query CLI for the file-discovery server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:9313")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List resources, optionally filtered or scoped to one source
    List {
        /// Scope the query to a single configured source path
        #[arg(long)]
        path: Option<String>,

        /// key=value filter, repeatable; the value is a full-match regex
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,

        /// Skip the record list if nothing changed past this unix-seconds
        /// watermark
        #[arg(long)]
        if_modified_since: Option<i64>,
    },
    /// Check server liveness
    Health,
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {s:?}"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::List {
            path,
            filters,
            if_modified_since,
        } => {
            let filters: Vec<Value> = filters
                .into_iter()
                .map(|(key, value)| json!({"key": key, "value": value}))
                .collect();
            let body = json!({
                "resource_path": path,
                "filters": filters,
                "if_modified_since": if_modified_since,
            });

            let res = client
                .post(format!("{}/v1/resources", cli.url))
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/healthz", cli.url)).send().await?;
            println!("{}", res.status());
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
