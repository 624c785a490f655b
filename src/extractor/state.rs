//! Per-call extraction state.
//!
//! Everything a single extraction pass mutates lives here: the set of nodes
//! already rewritten by the transformer, the potential tag set and a borrow of
//! the document's dedup cache. Nothing in this struct outlives one document.

use std::collections::HashSet;
use std::fmt;

use crate::cache::DedupCache;
use crate::etree::NodeId;
use crate::extractor::tags::TAG_CATALOG;
use crate::observer::Observer;
use crate::options::Options;

/// Tracks processed nodes and the potential tag set for one extraction pass.
pub struct ExtractionState<'a> {
    /// Options of the current call.
    pub options: &'a Options,

    /// Log sink of the current call.
    pub observer: &'a dyn Observer,

    /// Dedup cache shared by the comment and content passes of one document.
    pub cache: &'a mut DedupCache,

    processed_nodes: HashSet<NodeId>,
    potential_tags: HashSet<&'static str>,
}

impl<'a> ExtractionState<'a> {
    /// Create a state whose potential tags are the plain [`TAG_CATALOG`].
    #[must_use]
    pub fn new(options: &'a Options, observer: &'a dyn Observer, cache: &'a mut DedupCache) -> Self {
        Self {
            options,
            observer,
            cache,
            processed_nodes: HashSet::new(),
            potential_tags: TAG_CATALOG.iter().copied().collect(),
        }
    }

    /// Create a state for the main content pass, with tables, images and
    /// links added to the potential tags as the options ask.
    #[must_use]
    pub fn for_content(
        options: &'a Options,
        observer: &'a dyn Observer,
        cache: &'a mut DedupCache,
    ) -> Self {
        let mut state = Self::new(options, observer, cache);
        state.configure_from_options();
        state
    }

    /// Extend the potential tags according to the options.
    pub fn configure_from_options(&mut self) {
        if !self.options.exclude_tables {
            for tag in ["table", "tr", "th", "td"] {
                self.add_potential_tag(tag);
            }
        }
        if self.options.include_images {
            self.add_potential_tag("img");
        }
        if self.options.include_links {
            self.add_potential_tag("a");
        }
    }

    /// Mark a node as rewritten so later passes skip it.
    pub fn mark_done(&mut self, id: NodeId) {
        self.processed_nodes.insert(id);
    }

    /// Check whether a node was already rewritten.
    #[must_use]
    pub fn is_done(&self, id: NodeId) -> bool {
        self.processed_nodes.contains(&id)
    }

    /// Every node marked so far.
    #[must_use]
    pub fn done_nodes(&self) -> &HashSet<NodeId> {
        &self.processed_nodes
    }

    #[must_use]
    pub fn is_potential_tag(&self, tag: &str) -> bool {
        self.potential_tags.contains(tag)
    }

    pub fn add_potential_tag(&mut self, tag: &'static str) {
        self.potential_tags.insert(tag);
    }

    pub fn remove_potential_tag(&mut self, tag: &str) {
        self.potential_tags.remove(tag);
    }

    /// Run `f` with `extra` temporarily added to the potential tags.
    pub fn with_potential_tags<R>(
        &mut self,
        extra: &[&'static str],
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let added: Vec<&'static str> = extra
            .iter()
            .copied()
            .filter(|tag| self.potential_tags.insert(tag))
            .collect();
        let out = f(self);
        for tag in added {
            self.potential_tags.remove(tag);
        }
        out
    }

    pub(crate) fn debug(&self, args: fmt::Arguments<'_>) {
        self.observer.debug(args);
    }

    pub(crate) fn warn(&self, args: fmt::Arguments<'_>) {
        self.observer.warn(args);
    }
}
