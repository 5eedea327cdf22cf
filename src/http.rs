use reqwest::blocking::Client;
use tracing::info;

use crate::discovery::Descriptor;
use crate::error::{GenerateError, GenerateResult};

pub struct DiscoveryClient {
    client: Client,
}

impl DiscoveryClient {
    pub fn new() -> GenerateResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("discovery-stubgen/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Downloads and decodes a discovery document.
    pub fn fetch(&self, url: &str) -> GenerateResult<Descriptor> {
        let url = reqwest::Url::parse(url)
            .map_err(|err| GenerateError::Config(format!("invalid discovery url '{url}': {err}")))?;
        info!(%url, "fetching discovery document");

        let resp = self.client.get(url).send()?.error_for_status()?;
        let text = resp.text()?;
        let descriptor = Descriptor::from_json(&text)?;
        info!(
            api = %descriptor.name,
            version = %descriptor.version,
            resources = descriptor.resources.len(),
            "fetched discovery document"
        );
        Ok(descriptor)
    }
}

/// Conventional discovery URL of a Google API.
pub fn discovery_url_for(api: &str, version: &str) -> String {
    format!(
        "https://{}.googleapis.com/$discovery/rest?version={}",
        urlencoding::encode(api),
        urlencoding::encode(version)
    )
}
