//! Memory usage forecast command

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::client::{ApiClient, Prediction};
use crate::output::{format_megabytes, print_info, print_json, print_table, OutputFormat};

/// Row for the per-container usage table
#[derive(Tabled)]
struct UsageRow {
    #[tabled(rename = "Container")]
    name: String,
    #[tabled(rename = "Memory")]
    memory: String,
}

/// Show per-container memory usage and the forecast
pub async fn show_prediction(client: &ApiClient, refresh: bool, format: OutputFormat) -> Result<()> {
    let prediction: Prediction = if refresh {
        client.post("api/predict/refresh").await?
    } else {
        client.get("api/predict").await?
    };

    match format {
        OutputFormat::Json => print_json(&prediction)?,
        OutputFormat::Table => render_table(&prediction),
    }

    Ok(())
}

fn render_table(prediction: &Prediction) {
    println!("{}", "Memory Usage".bold());
    println!("{}", "=".repeat(40));
    println!(
        "Generated: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!();

    if prediction.no_data {
        print_info("No running containers were sampled");
    } else {
        let rows: Vec<UsageRow> = prediction
            .data
            .iter()
            .map(|row| UsageRow {
                name: row.name.clone(),
                memory: format_megabytes(row.memory_usage),
            })
            .collect();
        print_table(rows, "No running containers were sampled");
    }

    println!();
    println!(
        "Predicted next reading: {}",
        format_megabytes(prediction.predicted_next).green().bold()
    );
    println!();
    println!("{}", prediction.summary);
}
