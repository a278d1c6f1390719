use hal_client::{HalClient, HalClientConfig, Resource};
use snafu::prelude::*;
use tracing_subscriber::EnvFilter;

fn print_resource(resource: &Resource) {
    for (rel, links) in resource.links() {
        for link in links {
            println!("  link {rel}: {}", link.href);
        }
    }
    for (key, value) in resource.properties() {
        println!("  {key} = {value}");
    }
    for (rel, embedded) in resource.embedded() {
        println!("  {} embedded under {rel}", embedded.len());
    }
}

#[snafu::report]
#[tokio::main]
pub async fn main() -> Result<(), snafu::Whatever> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let api_root = std::env::var("API_ROOT").whatever_context("Failed to get API_ROOT")?;
    let rel = std::env::var("FOLLOW_REL").ok();

    let transport = hal_client::http::reqwest_0_13::client_builder()
        .build()
        .whatever_context("Failed to build HTTP client")?;

    let config = HalClientConfig::builder()
        .base_address(api_root.as_str())
        .whatever_context("API_ROOT is not an absolute URL")?
        .build();
    let client = HalClient::with_config(transport, config);

    let root = client
        .get("")
        .await
        .whatever_context("Failed to fetch API root")?;
    println!("{api_root}");
    print_resource(&root);
    client.set_cached_root_resource(root);

    let Some(rel) = rel else {
        return Ok(());
    };

    let Some(href) = client
        .cached_root_resource()
        .and_then(|root| root.link(&rel).map(|link| link.href.clone()))
    else {
        whatever!("The API root has no '{rel}' link");
    };

    match client.get(href.as_str()).await {
        Ok(resource) => {
            println!("{href}");
            print_resource(&resource);
        }
        Err(err) => {
            if let Some(body) = err.resource() {
                println!("{href} failed; server said:");
                print_resource(body);
            }
            return Err(err).whatever_context(format!("Failed to fetch {href}"));
        }
    }

    Ok(())
}
