use std::cell::Cell;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::bus::LINKED_EVENT;
use crate::change_filter::EntryPredicate;
use crate::config::Config;
use crate::error::TraceError;
use crate::model::MutationRecord;
use crate::observer::{MutationSource, ObservationId, ResultsObserver};

/// Recorded host mutation stream, one entry per search session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub sessions: Vec<TraceSession>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceSession {
    pub container: String,
    /// Node id -> structural kind.
    #[serde(default)]
    pub nodes: BTreeMap<String, String>,
    #[serde(default)]
    pub batches: Vec<Vec<MutationRecord<String>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub container: String,
    pub linked: Vec<String>,
    pub pending: usize,
    pub segments: usize,
}

struct KindPredicate<'a> {
    nodes: &'a BTreeMap<String, String>,
    entry_kind: &'a str,
}

impl EntryPredicate<String> for KindPredicate<'_> {
    fn is_result_entry(&self, node: &String) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|kind| kind == self.entry_kind)
    }
}

/// Stands in for the host: every session gets a fresh observation id.
#[derive(Debug, Default)]
pub struct ReplaySource {
    next_id: u64,
    active: Option<ObservationId>,
}

impl ReplaySource {
    pub fn active(&self) -> Option<ObservationId> {
        self.active
    }
}

impl MutationSource<String> for ReplaySource {
    fn observe(&mut self, _container: &String) -> ObservationId {
        let id = ObservationId(self.next_id);
        self.next_id += 1;
        self.active = Some(id);
        id
    }

    fn disconnect(&mut self, id: ObservationId) {
        if self.active == Some(id) {
            self.active = None;
        }
    }
}

pub fn parse(raw: &str, json5_syntax: bool) -> Result<Trace, TraceError> {
    let trace: Trace = if json5_syntax {
        json5::from_str(raw)?
    } else {
        serde_json::from_str(raw)?
    };
    validate(&trace)?;
    Ok(trace)
}

/// Reads a trace file; `.json5` files may carry comments and trailing commas.
pub fn load(path: &Path) -> Result<Trace, TraceError> {
    let raw = std::fs::read_to_string(path).map_err(|source| TraceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let json5_syntax = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json5"));
    parse(&raw, json5_syntax)
}

pub fn validate(trace: &Trace) -> Result<(), TraceError> {
    for (index, session) in trace.sessions.iter().enumerate() {
        let referenced = session
            .batches
            .iter()
            .flatten()
            .flat_map(|record| record.added.iter().chain(record.previous_sibling.iter()));
        for node in referenced {
            if !session.nodes.contains_key(node) {
                return Err(TraceError::UnknownNode {
                    session: index,
                    node: node.clone(),
                });
            }
        }
    }
    Ok(())
}

pub fn replay(trace: &Trace, config: &Config) -> Vec<ReplayReport> {
    let mut source = ReplaySource::default();

    trace
        .sessions
        .iter()
        .map(|session| {
            let predicate = KindPredicate {
                nodes: &session.nodes,
                entry_kind: &config.entry_kind,
            };
            let mut observer = ResultsObserver::new(predicate, config.second_root);
            observer.begin_session(&mut source, &session.container);

            let signaled = Rc::new(Cell::new(0_usize));
            let counter = Rc::clone(&signaled);
            observer
                .bus_mut()
                .subscribe(LINKED_EVENT, move |_: &String| counter.set(counter.get() + 1));

            for batch in &session.batches {
                observer.on_batch(batch);
            }

            let reconstructor = observer.reconstructor();
            let report = ReplayReport {
                container: session.container.clone(),
                linked: reconstructor.entries().to_vec(),
                pending: reconstructor.pending_len(),
                segments: reconstructor.segments(),
            };
            tracing::info!(
                container = %report.container,
                linked = report.linked.len(),
                signaled = signaled.get(),
                pending = report.pending,
                "session replayed"
            );

            observer.end_session(&mut source);
            report
        })
        .collect()
}
