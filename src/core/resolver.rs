//! Per-call-site level resolution
//!
//! The resolver walks the rule tree breadth-first to find the threshold that
//! applies to an entry's call site, then caches it under the call-site hash.
//! Rules are fixed once loaded, so a cached threshold never changes.

use super::log_entry::LogEntry;
use super::log_level::LevelFilter;
use crate::config::rules::RuleNode;
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};

#[derive(Debug)]
pub struct LevelResolver {
    root: RuleNode,
    default_level: LevelFilter,
    cache: RwLock<HashMap<u64, LevelFilter>>,
}

impl LevelResolver {
    pub fn new(root: RuleNode, default_level: LevelFilter) -> Self {
        Self {
            root,
            default_level,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// A resolver without rules: every call site gets `default_level`.
    pub fn with_default(default_level: LevelFilter) -> Self {
        Self::new(RuleNode::new(), default_level)
    }

    pub fn default_level(&self) -> LevelFilter {
        self.default_level
    }

    pub fn rules(&self) -> &RuleNode {
        &self.root
    }

    /// Whether `entry` is at least as severe as its call site's threshold.
    #[inline]
    pub fn should_emit(&self, entry: &LogEntry) -> bool {
        self.resolve_level(entry).admits(entry.level)
    }

    /// Threshold for the entry's call site.
    ///
    /// Safe to call from any thread. Two threads resolving the same new call
    /// site both walk the tree and store the same value.
    pub fn resolve_level(&self, entry: &LogEntry) -> LevelFilter {
        if let Some(hash) = entry.call_site_hash {
            if let Some(level) = self.cache.read().get(&hash) {
                return *level;
            }
        }

        let level = self.walk(entry);

        if let Some(hash) = entry.call_site_hash {
            self.cache.write().insert(hash, level);
        }
        level
    }

    /// Breadth-first walk; every visited node with a level overrides the
    /// running value, so deeper and later siblings win.
    fn walk(&self, entry: &LogEntry) -> LevelFilter {
        let mut current = self.default_level;
        let mut queue: VecDeque<&RuleNode> = VecDeque::new();
        queue.push_back(&self.root);

        while let Some(node) = queue.pop_front() {
            if let Some(level) = node.level {
                current = level;
            }

            for child in &node.children {
                let applies = child
                    .matcher
                    .as_ref()
                    .map_or(true, |clause| clause.matches(entry));
                if applies {
                    queue.push_back(child);
                }
            }
        }

        current
    }

    /// Number of call sites with a cached decision.
    pub fn cached_sites(&self) -> usize {
        self.cache.read().len()
    }
}

impl Default for LevelResolver {
    fn default() -> Self {
        Self::with_default(LevelFilter::default())
    }
}
