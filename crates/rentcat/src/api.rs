use crate::config::Config;
use crate::prelude::*;
use log::debug;
use rentcat_core::catalog::{CarDetails, CarsResponse};
use rentcat_core::filter::RequestParams;
use serde::de::DeserializeOwned;

/// The remote catalog: listing, brand list, and single-car lookups.
#[allow(async_fn_in_trait)]
pub trait CatalogApi {
    /// Fetch one page of the listing with the given request parameters.
    async fn list_cars(&self, params: &RequestParams) -> Result<CarsResponse>;

    /// Fetch the distinct brand list used to populate the brand filter.
    async fn list_brands(&self) -> Result<Vec<String>>;

    /// Fetch one car's full record.
    async fn get_car(&self, id: &str) -> Result<CarDetails>;
}

/// [`CatalogApi`] backed by the car rental REST API.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("rentcat/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_base.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
        what: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to fetch {}: {}", what, e)))?;

        if !response.status().is_success() {
            return Err(Error::Network(format!(
                "Failed to fetch {}: HTTP {}",
                what,
                response.status()
            ))
            .into());
        }

        response
            .json::<T>()
            .await
            .with_context(|| f!("Failed to parse {}", what))
    }
}

impl CatalogApi for HttpCatalog {
    async fn list_cars(&self, params: &RequestParams) -> Result<CarsResponse> {
        let page = params.page().unwrap_or(1);
        self.get_json("/cars", params.pairs(), &format!("cars page {page}"))
            .await
    }

    async fn list_brands(&self) -> Result<Vec<String>> {
        self.get_json("/brands", &[], "brands").await
    }

    async fn get_car(&self, id: &str) -> Result<CarDetails> {
        let path = format!("/cars/{}", urlencoding::encode(id));
        self.get_json(&path, &[], &format!("car {id}")).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_catalog_uses_config_base() {
        let config = Config {
            api_base: "http://localhost:9999".to_string(),
            state_dir: std::env::temp_dir(),
        };
        let api = HttpCatalog::new(&config).unwrap();

        assert_eq!(api.base_url, "http://localhost:9999");
    }
}
