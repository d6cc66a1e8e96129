use crate::bus::NotificationBus;
use crate::change_filter::{filter_batch, EntryPredicate};
use crate::model::{MutationRecord, NodeHandle};
use crate::reconstructor::{OrderReconstructor, SecondRootPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservationId(pub u64);

/// Host side of the inbound stream: batches of mutations under one container.
pub trait MutationSource<N> {
    fn observe(&mut self, container: &N) -> ObservationId;
    fn disconnect(&mut self, id: ObservationId);
}

/// Session glue between a host mutation source and the ordering engine.
///
/// One instance watches one results container at a time. Starting a session
/// drops the previous subscription and all ordering state.
pub struct ResultsObserver<N, P> {
    predicate: P,
    reconstructor: OrderReconstructor<N>,
    bus: NotificationBus<N>,
    observation: Option<ObservationId>,
}

impl<N, P> ResultsObserver<N, P>
where
    N: NodeHandle,
    P: EntryPredicate<N>,
{
    pub fn new(predicate: P, policy: SecondRootPolicy) -> Self {
        Self {
            predicate,
            reconstructor: OrderReconstructor::new(policy),
            bus: NotificationBus::new(),
            observation: None,
        }
    }

    pub fn begin_session<S>(&mut self, source: &mut S, container: &N)
    where
        S: MutationSource<N> + ?Sized,
    {
        self.disconnect(source);
        self.reconstructor.clean();
        let id = source.observe(container);
        tracing::info!(container = ?container, observation = id.0, "results session started");
        self.observation = Some(id);
    }

    pub fn end_session<S>(&mut self, source: &mut S)
    where
        S: MutationSource<N> + ?Sized,
    {
        self.disconnect(source);
        self.reconstructor.clean();
    }

    /// Feeds one host batch through the filter and the reconstructor.
    ///
    /// Returns the number of entries linked by this batch.
    pub fn on_batch(&mut self, records: &[MutationRecord<N>]) -> usize {
        let pairs = filter_batch(records, &self.predicate);
        let linked = self.reconstructor.attach_all(pairs, &mut self.bus);
        tracing::debug!(
            records = records.len(),
            linked,
            pending = self.reconstructor.pending_len(),
            "batch processed"
        );
        linked
    }

    pub fn is_observing(&self) -> bool {
        self.observation.is_some()
    }

    pub fn entries(&self) -> &[N] {
        self.reconstructor.entries()
    }

    pub fn reconstructor(&self) -> &OrderReconstructor<N> {
        &self.reconstructor
    }

    pub fn bus_mut(&mut self) -> &mut NotificationBus<N> {
        &mut self.bus
    }

    fn disconnect<S>(&mut self, source: &mut S)
    where
        S: MutationSource<N> + ?Sized,
    {
        if let Some(id) = self.observation.take() {
            source.disconnect(id);
        }
    }
}
