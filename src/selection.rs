//! Urgency ranking and random sampling over a task snapshot.
//!
//! All functions are pure; randomness comes from the caller's `Rng` so that
//! tests can seed it.
//!
//! # Invariants
//! - Ranking is by `urgency` descending and stable: equal urgencies keep
//!   snapshot order.
//! - `Selection::top` and `Selection::random` never share a task.

use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::task::Task;

/// Result of [`top_and_random`].
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Most urgent tasks, highest first
    pub top: Vec<Task>,
    /// Sample drawn from everything ranked below `top`, in no particular order
    pub random: Vec<Task>,
}

/// Task uuids the caller wants left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet(HashSet<String>);

impl ExclusionSet {
    /// Parse a comma-separated list. The empty string is the empty set.
    pub fn from_csv(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::default();
        }
        raw.split(',').map(str::to_string).collect()
    }

    #[must_use]
    pub fn contains(&self, uuid: &str) -> bool {
        self.0.contains(uuid)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Higher urgency first. Numeric comparison, so -0.0 and 0.0 tie.
fn by_urgency_desc(a: &Task, b: &Task) -> Ordering {
    b.urgency.partial_cmp(&a.urgency).unwrap_or(Ordering::Equal)
}

/// Sort by urgency descending, keeping snapshot order among equals.
pub fn rank_by_urgency(tasks: &mut [Task]) {
    tasks.sort_by(by_urgency_desc);
}

/// Top `n` by urgency plus up to `k` drawn uniformly, without replacement,
/// from the rest.
pub fn top_and_random<R: Rng + ?Sized>(
    mut tasks: Vec<Task>,
    n: usize,
    k: usize,
    rng: &mut R,
) -> Selection {
    rank_by_urgency(&mut tasks);

    if tasks.len() <= n {
        return Selection {
            top: tasks,
            random: Vec::new(),
        };
    }

    let remainder = tasks.split_off(n);
    let random = remainder.choose_multiple(rng, k).cloned().collect();
    Selection { top: tasks, random }
}

/// Highest-urgency task not excluded. Ties go to the earliest in the snapshot.
pub fn most_urgent<'a>(tasks: &'a [Task], excluded: &ExclusionSet) -> Option<&'a Task> {
    tasks
        .iter()
        .filter(|t| !excluded.contains(&t.uuid))
        // min_by keeps the first of equal elements, max_by the last.
        .min_by(|a, b| by_urgency_desc(a, b))
}

/// Uniformly random task not excluded.
pub fn random_task<'a, R: Rng + ?Sized>(
    tasks: &'a [Task],
    excluded: &ExclusionSet,
    rng: &mut R,
) -> Option<&'a Task> {
    let candidates: Vec<&Task> = tasks
        .iter()
        .filter(|t| !excluded.contains(&t.uuid))
        .collect();
    candidates.choose(rng).copied()
}
