//! Dependency-chain resolution between milestones.
//!
//! Dependencies are id references and may dangle or form cycles. Milestones
//! from every phase are pooled into an arena indexed by id and walked with an
//! explicit stack and visited set, so neither cycles nor long chains can
//! recurse without bound.

use std::collections::{HashMap, HashSet};

use crate::timeline::{Milestone, TimelinePhase};

/// Milestones of every phase, indexed by id.
///
/// If several milestones share an id the first one in phase order wins.
#[derive(Debug)]
pub struct MilestonePool<'a> {
    by_id: HashMap<&'a str, &'a Milestone>,
}

impl<'a> MilestonePool<'a> {
    pub fn new(phases: &'a [TimelinePhase]) -> Self {
        let mut by_id = HashMap::new();
        for m in phases.iter().flat_map(|p| p.milestones.iter()) {
            by_id.entry(m.id.as_str()).or_insert(m);
        }
        MilestonePool { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a Milestone> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Depth-first pre-order walk from `root` along `dependencies`.
    ///
    /// The root comes first; siblings are visited in the order they are listed.
    /// Each milestone appears at most once. Ids that do not resolve are skipped.
    pub fn chain(&self, root: &str) -> Vec<&'a Milestone> {
        let mut out = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = vec![root];

        while let Some(id) = stack.pop() {
            let Some(m) = self.get(id) else { continue };
            if !seen.insert(m.id.as_str()) {
                continue;
            }
            out.push(m);
            // Reversed so the first listed dependency is popped next.
            for dep in m.dependencies.iter().rev() {
                if !seen.contains(dep.as_str()) {
                    stack.push(dep.as_str());
                }
            }
        }
        out
    }

    /// Dependency ids of `id` that resolve to nothing in the pool.
    pub fn dangling(&self, id: &str) -> Vec<&'a str> {
        match self.get(id) {
            Some(m) => m
                .dependencies
                .iter()
                .map(String::as_str)
                .filter(|d| self.get(d).is_none())
                .collect(),
            None => Vec::new(),
        }
    }
}

/// The milestone `milestone_id` followed by everything it transitively
/// depends on, in depth-first pre-order. Empty if the id is unknown.
pub fn get_dependency_chain<'a>(milestone_id: &str, phases: &'a [TimelinePhase]) -> Vec<&'a Milestone> {
    MilestonePool::new(phases).chain(milestone_id)
}

/// Milestones that list `id` among their dependencies, in phase order.
pub fn dependents<'a>(phases: &'a [TimelinePhase], id: &str) -> Vec<&'a Milestone> {
    phases
        .iter()
        .flat_map(|p| p.milestones.iter())
        .filter(|m| m.dependencies.iter().any(|d| d == id))
        .collect()
}
