//! Image, container and engine version commands

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::client::{ActionResponse, ApiClient, Container, Image, VersionReport};
use crate::output::{print_json, print_success, print_table, print_warning, short_id, OutputFormat};

/// Row for images and containers tables
#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl ResourceRow {
    fn new(id: &str, name: &str) -> Self {
        Self {
            id: short_id(id),
            name: name.to_string(),
        }
    }
}

/// List images known to the engine
pub async fn list_images(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let images: Vec<Image> = client.get("api/images").await?;

    match format {
        OutputFormat::Json => print_json(&images)?,
        OutputFormat::Table => {
            let total = images.len();
            let rows: Vec<ResourceRow> = images
                .iter()
                .map(|i| ResourceRow::new(&i.id, &i.name))
                .collect();
            print_table(rows, "No images found");
            if total > 0 {
                println!("\nTotal: {} images", total);
            }
        }
    }

    Ok(())
}

/// List all containers, running or not
pub async fn list_containers(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let containers: Vec<Container> = client.get("api/containers").await?;

    match format {
        OutputFormat::Json => print_json(&containers)?,
        OutputFormat::Table => {
            let total = containers.len();
            let rows: Vec<ResourceRow> = containers
                .iter()
                .map(|c| ResourceRow::new(&c.id, &c.name))
                .collect();
            print_table(rows, "No containers found");
            if total > 0 {
                println!("\nTotal: {} containers", total);
            }
        }
    }

    Ok(())
}

/// Start or stop a container
pub async fn container_action(
    client: &ApiClient,
    action: &str,
    id: &str,
    format: OutputFormat,
) -> Result<()> {
    let path = format!("api/containers/{}/{}", id, action);
    let response: ActionResponse = client.post(&path).await?;

    match format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Table => print_success(&response.message),
    }

    Ok(())
}

/// Compare the installed engine with the latest release
pub async fn show_version(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let report: VersionReport = client.get("api/version").await?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            println!("{}", "Docker Engine".bold());
            println!("{}", "=".repeat(40));
            println!("Installed: {}", report.local.cyan());
            match &report.latest {
                Some(latest) => println!("Latest:    {}", latest.cyan()),
                None => println!("Latest:    {}", "unavailable".dimmed()),
            }
            println!();

            if report.is_latest {
                print_success("Docker is up to date");
            } else if report.latest.is_some() {
                print_warning("A newer Docker release is available");
            } else {
                print_warning("Could not determine the latest Docker release");
            }
        }
    }

    Ok(())
}
