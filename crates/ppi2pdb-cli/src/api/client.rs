//! HTTP API client
//!
//! One `reqwest::Client` serves every endpoint. Identifier lookups are
//! additionally bounded by a semaphore sized to the connection pool and
//! retried on transient failures.

use crate::api::{endpoints, types::*, IdentifierLookup, StructureApi};
use crate::config::ApiConfig;
use crate::error::{CliError, Result};
use async_trait::async_trait;
use ppi2pdb_common::types::StructureId;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

pub struct ApiClient {
    client: Client,
    config: ApiConfig,
    lookup_permits: Arc<Semaphore>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(config.pool_size)
            .build()?;

        Ok(Self {
            client,
            lookup_permits: Arc::new(Semaphore::new(config.pool_size)),
            config,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ApiConfig::from_env()?)
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;
        read_json(url, response).await
    }

    /// GET with a pool permit, retrying transport errors and 5xx statuses
    async fn lookup_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let _permit = self
            .lookup_permits
            .acquire()
            .await
            .map_err(|e| CliError::api(format!("lookup pool closed: {}", e)))?;

        let attempts = self.config.lookup_retries + 1;
        let mut attempt = 1;
        loop {
            match self.get_json(url).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < attempts => {
                    warn!("Lookup attempt {}/{} for {} failed: {}", attempt, attempts, url, e);
                    tokio::time::sleep(self.config.retry_delay() * attempt).await;
                    attempt += 1;
                },
                Err(e) => return Err(e),
            }
        }
    }

    /// First element of an entry-keyed list response
    async fn entry_first<T: DeserializeOwned>(&self, url: &str, id: &StructureId) -> Result<T> {
        let mut keyed: EntryKeyed<Vec<T>> = self.get_json(url).await?;
        keyed
            .remove(&id.api_key())
            .and_then(|entries| entries.into_iter().next())
            .ok_or_else(|| CliError::api(format!("no '{}' entry in response from {}", id.api_key(), url)))
    }
}

/// Decode a success body; a malformed body is `JsonParse`, not a transport error
async fn read_json<T: DeserializeOwned>(url: &str, response: Response) -> Result<T> {
    let body = check_status(url, response)?.text().await?;
    Ok(serde_json::from_str(&body)?)
}

fn check_status(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(CliError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl StructureApi for ApiClient {
    async fn search_structures(&self, accession: &str) -> Result<Vec<String>> {
        let url = endpoints::structure_search_url(&self.config.rcsb_url);
        let response = self
            .client
            .post(&url)
            .json(&structure_search_query(accession))
            .send()
            .await?;

        // No hits is answered with an empty body
        if response.status() == StatusCode::NO_CONTENT {
            debug!(accession, "Structure search returned no content");
            return Ok(Vec::new());
        }

        let body: SearchResponse = read_json(&url, response).await?;
        Ok(body.result_set.into_iter().map(|hit| hit.identifier).collect())
    }

    async fn entry_summary(&self, id: &StructureId) -> Result<EntrySummary> {
        let url = endpoints::entry_summary_url(&self.config.pdbe_url, id.as_str());
        self.entry_first(&url, id).await
    }

    async fn uniprot_mappings(&self, id: &StructureId) -> Result<EntryMappings> {
        let url = endpoints::uniprot_mappings_url(&self.config.pdbe_url, id.as_str());
        let mut keyed: EntryKeyed<EntryMappings> = self.get_json(&url).await?;
        keyed
            .remove(&id.api_key())
            .ok_or_else(|| CliError::api(format!("no '{}' entry in response from {}", id.api_key(), url)))
    }

    async fn entry_experiment(&self, id: &StructureId) -> Result<ExperimentEntry> {
        let url = endpoints::entry_experiment_url(&self.config.pdbe_url, id.as_str());
        self.entry_first(&url, id).await
    }
}

#[async_trait]
impl IdentifierLookup for ApiClient {
    async fn gene_name(&self, accession: &str) -> Result<Option<String>> {
        let url = endpoints::uniprotkb_search_url(&self.config.uniprot_url, accession);
        let search: UniProtSearch = self.lookup_json(&url).await?;

        Ok(search
            .results
            .into_iter()
            .next()
            .and_then(|entry| entry.genes.into_iter().next())
            .and_then(|gene| gene.gene_name)
            .map(|name| name.value))
    }

    async fn primary_accession(&self, alternate_id: &str) -> Result<Option<String>> {
        let url = endpoints::uniprotkb_search_url(&self.config.uniprot_url, alternate_id);
        let search: UniProtSearch = self.lookup_json(&url).await?;

        Ok(search
            .results
            .into_iter()
            .next()
            .and_then(|entry| entry.primary_accession))
    }

    async fn representative_sequence(&self, accession: &str) -> Result<Option<String>> {
        let url = endpoints::uniref_search_url(&self.config.uniprot_url, accession);
        let search: UniRefSearch = self.lookup_json(&url).await?;

        if search.results.is_empty() {
            return Ok(None);
        }
        Ok(Some(search.human_sequence(accession).unwrap_or_default().to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        let mut config = ApiConfig::default();
        config.set_rcsb_url(server.uri());
        config.set_pdbe_url(server.uri());
        config.set_uniprot_url(server.uri());
        config.retry_delay_ms = 1;
        ApiClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_search_structures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rcsbsearch/v2/query"))
            .and(body_string_contains("P04637"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result_set": [{"identifier": "1YCR", "score": 1.0}, {"identifier": "4HFZ", "score": 1.0}]
            })))
            .mount(&server)
            .await;

        let ids = client_for(&server).search_structures("P04637").await.unwrap();
        assert_eq!(ids, vec!["1YCR", "4HFZ"]);
    }

    #[tokio::test]
    async fn test_search_no_content_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rcsbsearch/v2/query"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let ids = client_for(&server).search_structures("P99999").await.unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_entry_summary_unwraps_keyed_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/pdb/entry/summary/1YCR"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "1ycr": [{
                    "title": "MDM2 bound to the transactivation domain of p53",
                    "number_of_entities": {"dna": 0, "ligand": 0, "polypeptide": 2},
                    "experimental_method": ["X-ray diffraction"]
                }]
            })))
            .mount(&server)
            .await;

        let id = StructureId::parse("1ycr").unwrap();
        let summary = client_for(&server).entry_summary(&id).await.unwrap();
        assert_eq!(summary.experimental_method, vec!["X-ray diffraction"]);
        assert_eq!(summary.number_of_entities.dna, Some(0));
    }

    #[tokio::test]
    async fn test_annotation_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/pdb/entry/experiment/1YCR"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let id = StructureId::parse("1YCR").unwrap();
        let err = client_for(&server).entry_experiment(&id).await.unwrap_err();
        assert!(matches!(err, CliError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/pdb/entry/summary/1YCR"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let id = StructureId::parse("1YCR").unwrap();
        let err = client_for(&server).entry_summary(&id).await.unwrap_err();
        assert!(matches!(err, CliError::JsonParse(_)));
        assert!(err.to_string().starts_with("Failed to parse JSON"));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_lookup_does_not_retry_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/uniprotkb/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).gene_name("P04637").await.unwrap_err();
        assert!(matches!(err, CliError::JsonParse(_)));
    }

    #[tokio::test]
    async fn test_lookup_retries_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/uniprotkb/search"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/uniprotkb/search"))
            .and(query_param("query", "ENSG00000141510"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"primaryAccession": "P04637", "genes": [{"geneName": {"value": "TP53"}}]}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let accession = client.primary_accession("ENSG00000141510").await.unwrap();
        assert_eq!(accession.as_deref(), Some("P04637"));
    }

    #[tokio::test]
    async fn test_lookup_gives_up_on_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/uniprotkb/search"))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).gene_name("P04637").await.unwrap_err();
        assert!(matches!(err, CliError::Status { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_representative_sequence() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/uniref/search"))
            .and(query_param("query", "uniprot_id:P04637"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": "UniRef100_P04637", "representativeMember": {
                    "organismName": "Homo sapiens (Human)", "sequence": {"value": "MEEPQSDPSV"}
                }}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/uniref/search"))
            .and(query_param("query", "uniprot_id:P00000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(
            client.representative_sequence("P04637").await.unwrap().as_deref(),
            Some("MEEPQSDPSV")
        );
        assert_eq!(client.representative_sequence("P00000").await.unwrap(), None);
    }
}
