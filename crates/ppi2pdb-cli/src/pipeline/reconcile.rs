//! Reconciliation of discovered, override and predicted rows
//!
//! 1. Discovered and override rows are outer-joined on their merge key
//!    (pair identity plus structure id). A row present in both keeps the
//!    discovered evidence and score; the literature references of both are
//!    joined.
//! 2. Predicted scores are folded into every row sharing the pair identity,
//!    or appended as new rows. Appended rows take part in later matches, so
//!    folding the same predictions twice changes nothing.
//! 3. Rows are sorted descending by (target, score, interactor, structure).

use ppi2pdb_common::types::{
    AnnotatedRow, MergeKey, Origin, OutputRow, PairIdentity, PredictedRow, SourceRow,
};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

pub struct Reconciler {
    predicted_sources: usize,
}

impl Reconciler {
    /// `predicted_sources` is the number of score columns to carry
    pub fn new(predicted_sources: usize) -> Self {
        Self { predicted_sources }
    }

    /// Merge the rows of one target (or of several, for a combined table)
    pub fn reconcile(&self, rows: impl IntoIterator<Item = SourceRow>) -> Vec<OutputRow> {
        let mut discovered = Vec::new();
        let mut overrides = Vec::new();
        let mut predicted = Vec::new();

        for row in rows {
            match row {
                SourceRow::Discovered(row) => discovered.push(row),
                SourceRow::Override(row) => overrides.push(row),
                SourceRow::Predicted(row) => predicted.push(row),
            }
        }

        let mut table = self.join(discovered, overrides);
        self.fold_predicted(&mut table, &predicted);
        sort_rows(&mut table);
        table
    }

    /// Outer join on the merge key. Within one origin the first row of a key
    /// wins.
    pub fn join(&self, discovered: Vec<AnnotatedRow>, overrides: Vec<AnnotatedRow>) -> Vec<OutputRow> {
        let mut table: Vec<OutputRow> = Vec::with_capacity(discovered.len() + overrides.len());
        let mut by_key: HashMap<MergeKey, usize> = HashMap::new();

        for row in discovered {
            let key = row.merge_key();
            if by_key.contains_key(&key) {
                debug!(pair = %row.key, "Duplicate discovered row dropped");
                continue;
            }
            by_key.insert(key, table.len());
            table.push(OutputRow::from_annotated(row, Origin::Discovered, self.predicted_sources));
        }

        for row in overrides {
            let key = row.merge_key();
            match by_key.get(&key).map(|&index| &mut table[index]) {
                Some(existing) if existing.origin == Origin::Discovered => {
                    existing.origin = Origin::Merged;
                    existing.literature_ref =
                        join_literature(existing.literature_ref.take(), row.literature_ref);
                },
                Some(_) => {
                    debug!(pair = %row.key, "Duplicate override row dropped");
                },
                None => {
                    by_key.insert(key, table.len());
                    table.push(OutputRow::from_annotated(row, Origin::Override, self.predicted_sources));
                },
            }
        }

        table
    }

    /// Write each predicted score into the rows of its pair, appending a row
    /// for pairs not yet in the table. Only the source's own column changes.
    pub fn fold_predicted(&self, table: &mut Vec<OutputRow>, predicted: &[PredictedRow]) {
        let mut by_identity: HashMap<PairIdentity, Vec<usize>> = HashMap::new();
        for (index, row) in table.iter().enumerate() {
            by_identity.entry(row.identity()).or_default().push(index);
        }

        for row in predicted {
            let identity = row.identity();
            match by_identity.get(&identity) {
                Some(indices) => {
                    for &index in indices {
                        table[index].set_predicted_score(row.source_index, row.score);
                    }
                },
                None => {
                    by_identity.insert(identity, vec![table.len()]);
                    table.push(OutputRow::from_predicted(row, self.predicted_sources));
                },
            }
        }
    }
}

/// Space-joined, discovered first
fn join_literature(discovered: Option<String>, override_ref: Option<String>) -> Option<String> {
    match (discovered, override_ref) {
        (Some(d), Some(o)) => Some(format!("{} {}", d, o)),
        (d, o) => d.or(o),
    }
}

/// Descending by target, score, interactor then structure id. Missing
/// scores and structures sort last; ties keep their current order.
pub fn sort_rows(rows: &mut [OutputRow]) {
    rows.sort_by(compare_rows);
}

fn compare_rows(a: &OutputRow, b: &OutputRow) -> Ordering {
    b.key
        .target
        .cmp(&a.key.target)
        .then_with(|| descending_present_first(a.score.as_ref(), b.score.as_ref()))
        .then_with(|| b.key.interactor.cmp(&a.key.interactor))
        .then_with(|| descending_present_first(a.structure_id(), b.structure_id()))
}

fn descending_present_first<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use ppi2pdb_common::types::{Field, PairKey, StructureEvidence};
    use rust_decimal::Decimal;
    use std::collections::HashSet;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn annotated(target: &str, interactor: &str, score: Option<&str>) -> AnnotatedRow {
        AnnotatedRow::new(
            PairKey::new(target, interactor),
            Some(format!("G{}", target)),
            Some(format!("G{}", interactor)),
            score.map(dec),
        )
    }

    fn with_structure(row: AnnotatedRow, id: &str, method: &str) -> AnnotatedRow {
        let mut evidence = StructureEvidence::unavailable(id);
        evidence.method = Field::Value(method.to_string());
        row.with_evidence(evidence)
    }

    fn predicted(target: &str, interactor: &str, source_index: usize, score: &str) -> PredictedRow {
        PredictedRow {
            key: PairKey::new(target, interactor),
            target_gene: Some(format!("G{}", target)),
            interactor_gene: Some(format!("G{}", interactor)),
            source_index,
            score: dec(score),
        }
    }

    #[test]
    fn test_discovered_only_rows_unchanged() {
        let row = with_structure(annotated("PX", "PY", Some("0.9")), "1ABC", "X-ray").with_literature(Some("1".into()));
        let table = Reconciler::new(0).reconcile(vec![SourceRow::Discovered(row.clone())]);

        assert_eq!(table.len(), 1);
        assert_eq!(table[0].origin, Origin::Discovered);
        assert_eq!(table[0].evidence, row.evidence);
        assert_eq!(table[0].literature_ref.as_deref(), Some("1"));
    }

    #[test]
    fn test_both_keeps_discovered_evidence_and_joins_literature() {
        let discovered =
            with_structure(annotated("PX", "PY", Some("0.9")), "1ABC", "X-ray").with_literature(Some("111".into()));
        let override_row =
            with_structure(annotated("PX", "PY", None), "1ABC", "NMR").with_literature(Some("222".into()));

        let table = Reconciler::new(0).reconcile(vec![
            SourceRow::Override(override_row),
            SourceRow::Discovered(discovered),
        ]);

        assert_eq!(table.len(), 1);
        assert_eq!(table[0].origin, Origin::Merged);
        assert_eq!(table[0].score, Some(dec("0.9")));
        assert_eq!(table[0].evidence.as_ref().unwrap().method, Field::Value("X-ray".to_string()));
        assert_eq!(table[0].literature_ref.as_deref(), Some("111 222"));
    }

    #[test]
    fn test_override_only_row_kept() {
        let discovered = annotated("PX", "PY", Some("0.9"));
        let override_row = annotated("PX", "PZ", None).with_literature(Some("pmid123".into()));

        let table = Reconciler::new(0).reconcile(vec![
            SourceRow::Discovered(discovered),
            SourceRow::Override(override_row),
        ]);

        assert_eq!(table.len(), 2);
        let extra = table.iter().find(|r| r.key.interactor == "PZ").unwrap();
        assert_eq!(extra.origin, Origin::Override);
        assert_eq!(extra.score, None);
        assert!(extra.evidence.is_none());
        assert_eq!(extra.literature_ref.as_deref(), Some("pmid123"));

        let cells = extra.cells(true);
        assert_eq!(cells[4], "na");
        assert_eq!(cells[18], "pmid123");
    }

    #[test]
    fn test_filler_rows_merge_with_each_other() {
        let table = Reconciler::new(0).reconcile(vec![
            SourceRow::Discovered(annotated("PX", "PY", Some("0.9")).with_literature(Some("1".into()))),
            SourceRow::Override(annotated("PX", "PY", None).with_literature(Some("2".into()))),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].literature_ref.as_deref(), Some("1 2"));
    }

    #[test]
    fn test_merge_keys_unique() {
        let table = Reconciler::new(1).reconcile(vec![
            SourceRow::Discovered(with_structure(annotated("PX", "PY", Some("0.9")), "1ABC", "X-ray")),
            SourceRow::Discovered(with_structure(annotated("PX", "PY", Some("0.8")), "1ABC", "X-ray")),
            SourceRow::Override(with_structure(annotated("PX", "PY", None), "1ABC", "X-ray")),
            SourceRow::Override(with_structure(annotated("PX", "PY", None), "1ABC", "X-ray")),
            SourceRow::Override(annotated("PX", "PW", None)),
            SourceRow::Override(annotated("PX", "PW", None)),
            SourceRow::Predicted(predicted("PX", "PV", 0, "0.6")),
            SourceRow::Predicted(predicted("PX", "PV", 0, "0.6")),
        ]);

        let keys: HashSet<_> = table.iter().map(|r| r.merge_key()).collect();
        assert_eq!(keys.len(), table.len());
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_predicted_folds_into_existing_pair() {
        let discovered = with_structure(annotated("PX", "PY", Some("0.95")), "1ABC", "X-ray");
        let table = Reconciler::new(2).reconcile(vec![
            SourceRow::Discovered(discovered),
            SourceRow::Predicted(predicted("PX", "PY", 1, "0.8")),
        ]);

        assert_eq!(table.len(), 1);
        assert_eq!(table[0].predicted_scores, vec![None, Some(dec("0.8"))]);
        assert_eq!(table[0].structure_id(), Some("1ABC"));
    }

    #[test]
    fn test_predicted_rows_for_new_pairs_are_appended_once() {
        let table = Reconciler::new(2).reconcile(vec![
            SourceRow::Discovered(annotated("PX", "PY", Some("0.95"))),
            SourceRow::Predicted(predicted("PX", "PZ", 0, "0.7")),
            SourceRow::Predicted(predicted("PX", "PZ", 1, "0.6")),
        ]);

        assert_eq!(table.len(), 2);
        let appended = table.iter().find(|r| r.key.interactor == "PZ").unwrap();
        assert_eq!(appended.origin, Origin::Predicted);
        assert_eq!(appended.score, None);
        assert_eq!(appended.predicted_scores, vec![Some(dec("0.7")), Some(dec("0.6"))]);
    }

    #[test]
    fn test_folding_is_idempotent() {
        let reconciler = Reconciler::new(1);
        let predictions = vec![predicted("PX", "PY", 0, "0.8"), predicted("PX", "PQ", 0, "0.9")];

        let mut once = reconciler.join(
            vec![with_structure(annotated("PX", "PY", Some("0.95")), "1ABC", "X-ray")],
            Vec::new(),
        );
        reconciler.fold_predicted(&mut once, &predictions);
        sort_rows(&mut once);

        let mut twice = once.clone();
        reconciler.fold_predicted(&mut twice, &predictions);
        sort_rows(&mut twice);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_descending_with_missing_last() {
        let table = Reconciler::new(0).reconcile(vec![
            SourceRow::Discovered(annotated("PA", "PY", Some("0.9"))),
            SourceRow::Override(annotated("PB", "PW", None)),
            SourceRow::Discovered(with_structure(annotated("PB", "PY", Some("0.7")), "1AAA", "X")),
            SourceRow::Discovered(with_structure(annotated("PB", "PY", Some("0.7")), "2BBB", "X")),
            SourceRow::Discovered(annotated("PB", "PZ", Some("0.95"))),
            SourceRow::Discovered(annotated("PB", "PV", Some("0.7"))),
        ]);

        let order: Vec<_> = table
            .iter()
            .map(|r| format!("{}-{}-{}", r.key.target, r.key.interactor, r.structure_id().unwrap_or("na")))
            .collect();
        assert_eq!(
            order,
            vec!["PB-PZ-na", "PB-PY-2BBB", "PB-PY-1AAA", "PB-PV-na", "PB-PW-na", "PA-PY-na"]
        );
    }

    #[test]
    fn test_ties_keep_join_order() {
        let with_gene = |gene: &str| {
            AnnotatedRow::new(PairKey::new("PX", "PY"), Some("GX".to_string()), Some(gene.to_string()), None)
        };
        let mut appended = predicted("PX", "PY", 0, "0.5");
        appended.target_gene = Some("GX".to_string());
        appended.interactor_gene = Some("GC".to_string());

        let table = Reconciler::new(1).reconcile(vec![
            SourceRow::Predicted(appended),
            SourceRow::Override(with_gene("GB")),
            SourceRow::Discovered(with_gene("GA")),
        ]);

        let order: Vec<_> = table
            .iter()
            .map(|r| (r.origin, r.interactor_gene.as_deref().unwrap_or("")))
            .collect();
        assert_eq!(
            order,
            vec![(Origin::Discovered, "GA"), (Origin::Override, "GB"), (Origin::Predicted, "GC")]
        );
    }

    #[test]
    fn test_empty_input_gives_empty_table() {
        assert!(Reconciler::new(2).reconcile(Vec::new()).is_empty());
    }
}
