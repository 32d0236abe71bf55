//! API endpoint URL builders
//!
//! Helper functions to construct API endpoint URLs.

/// Structure search query endpoint (POST)
pub fn structure_search_url(rcsb_url: &str) -> String {
    format!("{}/rcsbsearch/v2/query", rcsb_url)
}

/// Entry summary: title, entity counts, experimental method
pub fn entry_summary_url(pdbe_url: &str, structure_id: &str) -> String {
    format!("{}/api/pdb/entry/summary/{}", pdbe_url, structure_id)
}

/// UniProt residue mappings of an entry
pub fn uniprot_mappings_url(pdbe_url: &str, structure_id: &str) -> String {
    format!("{}/api/mappings/uniprot/{}", pdbe_url, structure_id)
}

/// Experiment details, including resolution
pub fn entry_experiment_url(pdbe_url: &str, structure_id: &str) -> String {
    format!("{}/api/pdb/entry/experiment/{}", pdbe_url, structure_id)
}

/// UniProtKB free-text search
pub fn uniprotkb_search_url(uniprot_url: &str, query: &str) -> String {
    format!("{}/uniprotkb/search?query={}", uniprot_url, urlencoding::encode(query))
}

/// UniRef cluster search for a member accession
pub fn uniref_search_url(uniprot_url: &str, accession: &str) -> String {
    let query = format!("uniprot_id:{}", accession);
    format!("{}/uniref/search?query={}", uniprot_url, urlencoding::encode(&query))
}
