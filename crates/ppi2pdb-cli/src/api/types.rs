//! API request and response types
//!
//! Only the fields the pipeline reads are modelled; everything else in the
//! responses is ignored.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

// ============================================================================
// Structure Search
// ============================================================================

/// Query body for structures containing `accession`, restricted to UniProt
/// references and human source organisms
pub fn structure_search_query(accession: &str) -> Value {
    json!({
        "query": {
            "type": "group",
            "logical_operator": "and",
            "nodes": [
                {
                    "type": "group",
                    "logical_operator": "and",
                    "nodes": [
                        {
                            "type": "terminal",
                            "service": "text",
                            "parameters": {
                                "attribute": "rcsb_polymer_entity_container_identifiers.reference_sequence_identifiers.database_accession",
                                "operator": "in",
                                "negation": false,
                                "value": [accession]
                            }
                        },
                        {
                            "type": "terminal",
                            "service": "text",
                            "parameters": {
                                "attribute": "rcsb_polymer_entity_container_identifiers.reference_sequence_identifiers.database_name",
                                "operator": "exact_match",
                                "value": "UniProt",
                                "negation": false
                            }
                        }
                    ]
                },
                {
                    "type": "terminal",
                    "service": "text",
                    "parameters": {
                        "attribute": "rcsb_entity_source_organism.taxonomy_lineage.id",
                        "operator": "exact_match",
                        "negation": false,
                        "value": "9606"
                    }
                }
            ]
        },
        "return_type": "entry",
        "request_options": {
            "return_all_hits": true
        }
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub result_set: Vec<SearchHit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub identifier: String,
}

// ============================================================================
// Entry Annotations
// ============================================================================

/// Annotation responses are keyed by the lower-case entry id
pub type EntryKeyed<T> = HashMap<String, T>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntrySummary {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub number_of_entities: EntityCounts,
    #[serde(default)]
    pub experimental_method: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityCounts {
    pub dna: Option<u32>,
    pub ligand: Option<u32>,
}

/// Residue mappings of one entry, per UniProt accession in response order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryMappings {
    #[serde(rename = "UniProt", default, with = "response_order")]
    pub uniprot: Vec<(String, AccessionMappings)>,
}

impl EntryMappings {
    pub fn accession(&self, accession: &str) -> Option<&AccessionMappings> {
        self.uniprot
            .iter()
            .find(|(key, _)| key == accession)
            .map(|(_, mappings)| mappings)
    }
}

/// A JSON object read into key/value pairs without reordering its keys
mod response_order {
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;
    use std::marker::PhantomData;

    pub fn serialize<V, S>(entries: &[(String, V)], serializer: S) -> Result<S::Ok, S::Error>
    where
        V: Serialize,
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, V, D>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
    where
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = Vec<(String, V)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map keyed by accession")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut entries: Vec<(String, V)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    // A repeated key replaces the earlier value in place
                    match entries.iter_mut().find(|(existing, _)| *existing == key) {
                        Some(slot) => slot.1 = value,
                        None => entries.push((key, value)),
                    }
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessionMappings {
    #[serde(default)]
    pub mappings: Vec<ChainMapping>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainMapping {
    pub chain_id: String,
    pub unp_start: i64,
    pub unp_end: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperimentEntry {
    /// Kept as the raw JSON number so it converts to an exact decimal
    pub resolution: Option<serde_json::Number>,
}

// ============================================================================
// Identifier Lookup
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UniProtSearch {
    #[serde(default)]
    pub results: Vec<UniProtEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniProtEntry {
    pub primary_accession: Option<String>,
    #[serde(default)]
    pub genes: Vec<Gene>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gene {
    pub gene_name: Option<GeneName>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneName {
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UniRefSearch {
    #[serde(default)]
    pub results: Vec<UniRefCluster>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniRefCluster {
    pub id: String,
    pub representative_member: RepresentativeMember,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepresentativeMember {
    #[serde(default)]
    pub organism_name: String,
    pub sequence: Option<SequenceValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceValue {
    pub value: String,
}

/// Organism name of human UniRef representatives
pub const HUMAN_ORGANISM: &str = "Homo sapiens (Human)";

impl UniRefSearch {
    /// Sequence of the first human cluster whose id mentions `accession`
    pub fn human_sequence(&self, accession: &str) -> Option<&str> {
        self.results
            .iter()
            .find(|c| c.id.contains(accession) && c.representative_member.organism_name == HUMAN_ORGANISM)
            .and_then(|c| c.representative_member.sequence.as_ref())
            .map(|s| s.value.as_str())
    }
}
