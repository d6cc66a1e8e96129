use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::bus::LinkSink;
use crate::model::{LinkPair, NodeHandle, Predecessor};

/// What to do with a ROOT pair once a chain already exists in the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondRootPolicy {
    /// Drop the pair without signaling.
    Reject,
    /// Drop the resolved chain and attach the node as the first root of a
    /// fresh one. Parked entries stay so they can resolve against it.
    Restart,
    /// Start a disconnected segment; earlier entries stay in order.
    #[default]
    NewChain,
}

/// Online list builder that turns out-of-order `(node, predecessor)` pairs
/// into one stable linear order.
///
/// Each node that cannot be placed yet is parked under the predecessor it is
/// waiting on. Attaching that predecessor later releases the parked node, and
/// the release continues along the pending pool until no successor is found.
#[derive(Debug)]
pub struct OrderReconstructor<N> {
    policy: SecondRootPolicy,
    entries: Vec<N>,
    segment_start: usize,
    segments: usize,
    linked: HashSet<N>,
    // predecessor -> successor waiting on it
    pending: HashMap<N, N>,
    // successor -> predecessor it was parked under
    parked_under: HashMap<N, N>,
}

impl<N: NodeHandle> Default for OrderReconstructor<N> {
    fn default() -> Self {
        Self::new(SecondRootPolicy::default())
    }
}

impl<N: NodeHandle> OrderReconstructor<N> {
    pub fn new(policy: SecondRootPolicy) -> Self {
        Self {
            policy,
            entries: Vec::new(),
            segment_start: 0,
            segments: 0,
            linked: HashSet::new(),
            pending: HashMap::new(),
            parked_under: HashMap::new(),
        }
    }

    pub fn policy(&self) -> SecondRootPolicy {
        self.policy
    }

    /// Places `node` after `predecessor` if possible and signals every entry
    /// that became linked as a result, in chain order.
    ///
    /// Returns how many entries were linked by this call, cascade included.
    pub fn attach<S>(&mut self, node: N, predecessor: Predecessor<N>, sink: &mut S) -> usize
    where
        S: LinkSink<N> + ?Sized,
    {
        if self.linked.contains(&node) {
            tracing::debug!(node = ?node, "ignoring pair for already linked entry");
            return 0;
        }

        let placed = match predecessor {
            Predecessor::Root => self.place_root(node, sink),
            Predecessor::Node(pred) => {
                if self.tail() == Some(&pred) {
                    self.link(node.clone(), sink);
                    Some(node)
                } else {
                    self.park(pred, node);
                    None
                }
            }
        };

        let Some(mut last) = placed else {
            return 0;
        };

        let mut count = 1;
        while let Some(successor) = self.pending.remove(&last) {
            self.parked_under.remove(&successor);
            if self.linked.contains(&successor) {
                break;
            }
            tracing::trace!(node = ?successor, after = ?last, "cascade");
            self.link(successor.clone(), sink);
            last = successor;
            count += 1;
        }
        count
    }

    /// Convenience for feeding a filtered batch.
    pub fn attach_all<I, S>(&mut self, pairs: I, sink: &mut S) -> usize
    where
        I: IntoIterator<Item = LinkPair<N>>,
        S: LinkSink<N> + ?Sized,
    {
        let mut linked = 0;
        for pair in pairs {
            linked += self.attach(pair.node, pair.predecessor, sink);
        }
        linked
    }

    /// Resets the session. Safe to call any number of times.
    pub fn clean(&mut self) {
        self.entries.clear();
        self.segment_start = 0;
        self.segments = 0;
        self.linked.clear();
        self.pending.clear();
        self.parked_under.clear();
    }

    pub fn head(&self) -> Option<&N> {
        self.entries.get(self.segment_start)
    }

    pub fn tail(&self) -> Option<&N> {
        self.entries.last()
    }

    /// Every linked entry this session, in signal order.
    pub fn entries(&self) -> &[N] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn is_linked(&self, node: &N) -> bool {
        self.linked.contains(node)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_successor(&self, predecessor: &N) -> Option<&N> {
        self.pending.get(predecessor)
    }

    fn place_root<S>(&mut self, node: N, sink: &mut S) -> Option<N>
    where
        S: LinkSink<N> + ?Sized,
    {
        if !self.entries.is_empty() {
            tracing::warn!(node = ?node, policy = ?self.policy, "second root in session");
            match self.policy {
                SecondRootPolicy::Reject => return None,
                SecondRootPolicy::Restart => self.restart_chain(),
                SecondRootPolicy::NewChain => {}
            }
        }

        self.segment_start = self.entries.len();
        self.segments += 1;
        self.link(node.clone(), sink);
        Some(node)
    }

    fn restart_chain(&mut self) {
        self.entries.clear();
        self.segment_start = 0;
        self.segments = 0;
        self.linked.clear();
    }

    fn park(&mut self, predecessor: N, node: N) {
        tracing::debug!(node = ?node, waiting_on = ?predecessor, "parking entry");
        if let Some(previous) = self.parked_under.remove(&node) {
            if self.pending.get(&previous) == Some(&node) {
                self.pending.remove(&previous);
            }
        }
        if let Some(evicted) = self.pending.insert(predecessor.clone(), node.clone()) {
            if evicted != node {
                self.parked_under.remove(&evicted);
            }
        }
        self.parked_under.insert(node, predecessor);
    }

    fn link<S>(&mut self, node: N, sink: &mut S)
    where
        S: LinkSink<N> + ?Sized,
    {
        if let Some(stale) = self.parked_under.remove(&node) {
            if self.pending.get(&stale) == Some(&node) {
                self.pending.remove(&stale);
            }
        }
        tracing::debug!(node = ?node, position = self.entries.len(), "entry linked");
        self.linked.insert(node.clone());
        self.entries.push(node);
        if let Some(node) = self.entries.last() {
            sink.linked(node);
        }
    }
}
