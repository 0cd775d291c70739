//! Seed a running nite-cms server with sample articles through the admin
//! API, then publish them. Duplicate-slug responses are reported and
//! skipped, so the command is safe to re-run.

use anyhow::{bail, Context as _, Result};
use clap::Parser;
use serde_json::{json, Value};

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Seed sample articles via the admin API")]
struct Cli {
    /// Base URL of a running nite-cms server
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    api_url: String,

    /// Admin bearer token; falls back to the ADMIN_TOKEN env var
    #[arg(long)]
    token: Option<String>,

    /// Leave the seeded articles as drafts instead of publishing them
    #[arg(long)]
    drafts_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let token = cli
        .token
        .clone()
        .or_else(|| std::env::var("ADMIN_TOKEN").ok())
        .context("admin token required: pass --token or set ADMIN_TOKEN")?;

    let client = reqwest::Client::new();
    let mut created = 0usize;
    let mut skipped = 0usize;

    for article in sample_articles() {
        let title = article["title"].as_str().unwrap_or("<untitled>").to_string();

        let res = client
            .post(format!("{}/api/articles", cli.api_url))
            .bearer_auth(&token)
            .json(&article)
            .send()
            .await
            .with_context(|| format!("failed to reach {}", cli.api_url))?;

        let status = res.status();
        let body: Value = res.json().await.context("response was not JSON")?;

        if status == reqwest::StatusCode::CREATED {
            created += 1;
            let id = body["data"]["id"].as_str().unwrap_or_default().to_string();
            println!("created: {} ({})", title, body["data"]["slug"]);

            if !cli.drafts_only {
                let res = client
                    .post(format!("{}/api/articles/{}/publish", cli.api_url, id))
                    .bearer_auth(&token)
                    .send()
                    .await?;
                if res.status().is_success() {
                    println!("published: {}", title);
                } else {
                    eprintln!("publish failed for {}: {}", title, res.status());
                }
            }
        } else if status == reqwest::StatusCode::BAD_REQUEST
            && body["error"]
                .as_str()
                .map(|e| e.contains("already exists"))
                .unwrap_or(false)
        {
            skipped += 1;
            println!("skipped (already exists): {}", title);
        } else {
            bail!("create failed for {} ({}): {}", title, status, body);
        }
    }

    println!("done: {} created, {} skipped", created, skipped);
    Ok(())
}

fn sample_articles() -> Vec<Value> {
    vec![
        json!({
            "title": "Climate Shifts in 2025: What the Numbers Say",
            "content": "<h2>Introduction</h2>\
                <p>Climate trends keep accelerating. This article walks through the 2025 measurements region by region.</p>\
                <h3>Key findings</h3>\
                <ul>\
                <li>Global surface temperatures continue to rise</li>\
                <li>Emission patterns are shifting between sectors</li>\
                <li>Renewable adoption is accelerating</li>\
                </ul>\
                <p>The dashboards below break the trends down by region and time period.</p>",
            "excerpt": "A region-by-region look at the 2025 climate measurements, with interactive dashboards",
            "category": "Technology",
            "tags": ["climate", "data", "environment", "2025"],
            "author": "Sarah Smith",
            "featuredImage": "https://images.unsplash.com/photo-1559027615-cd2628902d4a?w=800",
            "seoMetaDescription": "Climate trend analysis with 2025 measurements and interactive dashboards",
            "seoKeywords": ["climate", "data analysis", "environment", "trends"],
            "visualizations": [
                {
                    "id": "viz_climate_001",
                    "type": "tableau",
                    "embedUrl": "https://public.tableau.com/views/GlobalTemperatures/Dashboard1",
                    "title": "Global Temperature Trends 2020-2025",
                    "position": 1,
                    "description": "Surface temperature anomalies by region"
                }
            ]
        }),
        json!({
            "title": "Small Business Lending After the Rate Peak",
            "content": "<h2>Where the credit went</h2>\
                <p>Lending to small firms fell sharply while rates peaked, but the recovery is uneven across sectors and regions.</p>\
                <p>We traced loan originations over eight quarters to see who got credit and on what terms.</p>",
            "excerpt": "Tracing eight quarters of small-business loan originations through the rate cycle",
            "category": "Business",
            "tags": ["lending", "small business", "economy"],
            "author": "Sarah Smith",
            "seoKeywords": ["lending", "interest rates", "small business"],
            "visualizations": [
                {
                    "id": "viz_lending_001",
                    "type": "tableau",
                    "embedUrl": "https://public.tableau.com/views/SmallBusinessLending/Overview",
                    "title": "Loan Originations by Quarter",
                    "position": 1
                }
            ]
        }),
        json!({
            "title": "Turnout Patterns in the Latest Election Cycle",
            "content": "<h2>Who showed up</h2>\
                <p>Turnout moved in opposite directions in urban and rural districts. The maps below show the shift county by county.</p>\
                <blockquote>The gap between the highest and lowest turnout districts has never been wider.</blockquote>",
            "category": "Political",
            "tags": ["elections", "turnout"],
            "author": "NITE Team",
            "visualizations": [
                {
                    "id": "viz_turnout_001",
                    "type": "chart.js",
                    "embedUrl": "https://charts.example.org/turnout-by-county",
                    "title": "Turnout by County",
                    "position": 1,
                    "description": "County-level turnout change"
                }
            ]
        })
    ]
}
