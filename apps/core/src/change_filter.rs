use crate::model::{LinkPair, MutationRecord, Predecessor};

/// Structural test deciding whether a host node is a result entry.
pub trait EntryPredicate<N> {
    fn is_result_entry(&self, node: &N) -> bool;
}

impl<N, F> EntryPredicate<N> for F
where
    F: Fn(&N) -> bool,
{
    fn is_result_entry(&self, node: &N) -> bool {
        self(node)
    }
}

/// Turns one host batch into link pairs, in the order the host reported them.
///
/// Added nodes that are not result entries are dropped. A declared previous
/// sibling that is missing or is not itself a result entry becomes
/// [`Predecessor::Root`]. Later nodes in the same record use the node added
/// just before them as their previous sibling.
pub fn filter_batch<N, P>(records: &[MutationRecord<N>], predicate: &P) -> Vec<LinkPair<N>>
where
    N: Clone,
    P: EntryPredicate<N> + ?Sized,
{
    let mut pairs = Vec::new();

    for record in records {
        let mut previous = record.previous_sibling.as_ref();
        for node in &record.added {
            if predicate.is_result_entry(node) {
                pairs.push(LinkPair::new(
                    node.clone(),
                    qualified_predecessor(previous, predicate),
                ));
            }
            previous = Some(node);
        }
    }

    pairs
}

fn qualified_predecessor<N, P>(sibling: Option<&N>, predicate: &P) -> Predecessor<N>
where
    N: Clone,
    P: EntryPredicate<N> + ?Sized,
{
    sibling
        .filter(|node| predicate.is_result_entry(node))
        .cloned()
        .into()
}
