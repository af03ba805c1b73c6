use std::collections::{BTreeMap, HashSet};

use crate::config::DuplicatePagePolicy;
use crate::record::PageRecord;

/// Records sharing one `page_index`, in input order.
pub type OrdinalGroups<'a> = BTreeMap<u32, Vec<&'a PageRecord>>;

/// Applies the duplicate-page policy, keeping input order.
///
/// With [`DuplicatePagePolicy::First`] later records repeating a
/// `(doc_id, page_index)` pair are dropped.
pub fn select_records(records: &[PageRecord], policy: DuplicatePagePolicy) -> Vec<&PageRecord> {
    let mut seen: HashSet<(&str, u32)> = HashSet::new();
    records
        .iter()
        .filter(|record| {
            let first = seen.insert((record.doc_id.as_str(), record.page_index));
            if !first && policy == DuplicatePagePolicy::First {
                tracing::debug!(
                    doc_id = %record.doc_id,
                    page_index = record.page_index,
                    "Dropping duplicate page record"
                );
                return false;
            }
            true
        })
        .collect()
}

/// Partitions records by `page_index`; every record lands in exactly one
/// group, in input order.
pub fn group_by_ordinal<'a, I>(records: I) -> OrdinalGroups<'a>
where
    I: IntoIterator<Item = &'a PageRecord>,
{
    let mut groups: OrdinalGroups<'a> = BTreeMap::new();
    for record in records {
        groups.entry(record.page_index).or_default().push(record);
    }
    groups
}

/// Highest `page_index` in the input, 0 when empty.
pub fn max_ordinal<'a, I>(records: I) -> u32
where
    I: IntoIterator<Item = &'a PageRecord>,
{
    records.into_iter().map(|r| r.page_index).max().unwrap_or(0)
}

/// Distinct document ids, in first-seen order.
pub fn document_ids<'a, I>(records: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a PageRecord>,
{
    let mut seen = HashSet::new();
    records
        .into_iter()
        .map(|r| r.doc_id.as_str())
        .filter(|id| seen.insert(*id))
        .collect()
}
