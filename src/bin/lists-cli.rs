use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, ETAG, IF_MATCH, IF_NONE_MATCH, LOCATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "lists-cli")]
#[command(about = "Command line client for the shopping list server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every shopping list
    Lists {
        /// Previously seen collection ETag
        #[arg(long)]
        if_none_match: Option<String>,
    },
    /// Show one shopping list
    Show {
        id: u64,
        #[arg(long)]
        if_none_match: Option<String>,
    },
    /// Create a shopping list
    Create {
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        date: String,
    },
    /// Change a list's description and/or date
    Edit {
        id: u64,
        /// ETag of the list as last seen
        #[arg(long)]
        etag: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a shopping list
    Delete { id: u64 },
    /// Show the items of a list
    Items {
        id: u64,
        /// Only items with exactly this status
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Add an item to a list
    AddItem {
        id: u64,
        name: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
        #[arg(short, long, default_value = "open")]
        status: String,
    },
    /// Replace an item
    SetItem {
        id: u64,
        name: String,
        /// ETag of the item as last seen
        #[arg(long)]
        etag: String,
        #[arg(short, long)]
        quantity: i64,
        #[arg(short, long)]
        status: String,
    },
    /// Remove an item from a list
    RemoveItem { id: u64, name: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Lists { if_none_match } => client
            .get(format!("{}/shoppinglists", base))
            .headers(conditional(IF_NONE_MATCH, if_none_match)?),
        Commands::Show { id, if_none_match } => client
            .get(format!("{}/shoppinglists/{}", base, id))
            .headers(conditional(IF_NONE_MATCH, if_none_match)?),
        Commands::Create { description, date } => client
            .post(format!("{}/shoppinglists", base))
            .json(&json!({ "Description": description, "Date": date, "Items": {} })),
        Commands::Edit { id, etag, description, date } => {
            let mut patch = serde_json::Map::new();
            if let Some(description) = description {
                patch.insert("Description".into(), Value::String(description));
            }
            if let Some(date) = date {
                patch.insert("Date".into(), Value::String(date));
            }
            client
                .patch(format!("{}/shoppinglists/{}", base, id))
                .headers(conditional(IF_MATCH, Some(etag))?)
                .json(&patch)
        }
        Commands::Delete { id } => client.delete(format!("{}/shoppinglists/{}", base, id)),
        Commands::Items { id, status } => {
            let request = client.get(format!("{}/shoppinglists/{}/items", base, id));
            match status {
                Some(status) => request.query(&[("status", status)]),
                None => request,
            }
        }
        Commands::AddItem { id, name, quantity, status } => client
            .post(format!("{}/shoppinglists/{}/items", base, id))
            .json(&json!({ "Name": name, "Quantity": quantity, "Status": status })),
        Commands::SetItem { id, name, etag, quantity, status } => client
            .put(item_url(base, id, &name)?)
            .headers(conditional(IF_MATCH, Some(etag))?)
            .json(&json!({ "Quantity": quantity, "Status": status })),
        Commands::RemoveItem { id, name } => client.delete(item_url(base, id, &name)?),
    };

    print_response(request.send().await?).await
}

fn conditional(
    name: reqwest::header::HeaderName,
    value: Option<String>,
) -> Result<HeaderMap, Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    if let Some(value) = value {
        headers.insert(name, HeaderValue::from_str(&value)?);
    }
    Ok(headers)
}

fn item_url(base: &str, id: u64, name: &str) -> Result<reqwest::Url, Box<dyn std::error::Error>> {
    let mut url = reqwest::Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| "server URL cannot be a base")?
        .pop_if_empty()
        .extend(["shoppinglists", id.to_string().as_str(), "items", name]);
    Ok(url)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    println!("Status: {}", status);
    for header in [ETAG, LOCATION] {
        if let Some(value) = res.headers().get(&header) {
            println!("{}: {}", header, value.to_str().unwrap_or("<binary>"));
        }
    }

    let text = res.text().await?;
    if text.is_empty() {
        return Ok(());
    }
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
