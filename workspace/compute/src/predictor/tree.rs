//! Axis-aligned decision tree (CART with Gini impurity).
//!
//! The tree is grown until every leaf is pure or no threshold separates the
//! samples it holds. Candidate splits are visited feature by feature and in
//! ascending threshold order; the first candidate with the lowest impurity
//! wins, which keeps the induction deterministic.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use model::entities::IllnessLevel;

use crate::error::{ComputeError, Result};

/// Number of features per sample: age and symptom severity.
pub const FEATURE_COUNT: usize = 2;

/// Feature vector paired with its observed label.
pub type LabeledSample = ([f64; FEATURE_COUNT], IllnessLevel);

type ClassCounts = BTreeMap<IllnessLevel, usize>;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        level: IllnessLevel,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Split { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

struct Candidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

/// A fitted decision tree.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    root: Node,
}

impl DecisionTree {
    /// Grows a tree over `samples`.
    pub fn fit(samples: &[LabeledSample]) -> Result<Self> {
        if samples.is_empty() {
            return Err(ComputeError::EmptyDataset(
                "cannot grow a decision tree without samples".to_string(),
            ));
        }
        if let Some((row, (features, _))) = samples
            .iter()
            .enumerate()
            .find(|(_, (features, _))| features.iter().any(|value| !value.is_finite()))
        {
            return Err(ComputeError::InvalidFeature(format!(
                "sample {} has non-finite features {:?}",
                row, features
            )));
        }

        let indices: Vec<usize> = (0..samples.len()).collect();
        let counts = class_counts(samples, &indices);
        let Some(fallback) = majority_level(&counts) else {
            return Err(ComputeError::EmptyDataset(
                "cannot grow a decision tree without labels".to_string(),
            ));
        };
        Ok(Self {
            root: grow(samples, indices, fallback),
        })
    }

    /// Follows the learned thresholds down to a leaf.
    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> IllnessLevel {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { level, .. } => return *level,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }
}

/// `fallback` labels the leaf when `indices` is empty: the parent's majority.
fn grow(samples: &[LabeledSample], indices: Vec<usize>, fallback: IllnessLevel) -> Node {
    let counts = class_counts(samples, &indices);
    let level = majority_level(&counts).unwrap_or(fallback);
    let leaf = Node::Leaf { level };
    if counts.len() <= 1 {
        return leaf;
    }

    match best_split(samples, &indices, &counts) {
        None => leaf,
        Some(candidate) => {
            let (left, right): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .partition(|&&i| samples[i].0[candidate.feature] <= candidate.threshold);
            Node::Split {
                feature: candidate.feature,
                threshold: candidate.threshold,
                left: Box::new(grow(samples, left, level)),
                right: Box::new(grow(samples, right, level)),
            }
        }
    }
}

fn best_split(samples: &[LabeledSample], indices: &[usize], counts: &ClassCounts) -> Option<Candidate> {
    let total = indices.len() as f64;
    let mut best: Option<Candidate> = None;

    for feature in 0..FEATURE_COUNT {
        let mut sorted = indices.to_vec();
        sorted.sort_by(|&a, &b| samples[a].0[feature].total_cmp(&samples[b].0[feature]));

        let mut left = ClassCounts::new();
        let mut right = counts.clone();

        for position in 0..sorted.len() - 1 {
            let level = samples[sorted[position]].1;
            *left.entry(level).or_insert(0) += 1;
            if let Some(count) = right.get_mut(&level) {
                *count -= 1;
                if *count == 0 {
                    right.remove(&level);
                }
            }

            let current = samples[sorted[position]].0[feature];
            let next = samples[sorted[position + 1]].0[feature];
            // Equal neighbours admit no threshold; unordered values never split.
            if current.partial_cmp(&next) != Some(Ordering::Less) {
                continue;
            }

            let n_left = (position + 1) as f64;
            let n_right = total - n_left;
            let impurity = (n_left * gini(&left, n_left) + n_right * gini(&right, n_right)) / total;

            if best.as_ref().is_none_or(|b| impurity < b.impurity) {
                best = Some(Candidate {
                    feature,
                    threshold: midpoint(current, next),
                    impurity,
                });
            }
        }
    }

    best
}

/// Midpoint of two consecutive values, kept strictly below `next`.
fn midpoint(current: f64, next: f64) -> f64 {
    let threshold = current + (next - current) / 2.0;
    if threshold >= next { current } else { threshold }
}

fn class_counts(samples: &[LabeledSample], indices: &[usize]) -> ClassCounts {
    let mut counts = ClassCounts::new();
    for &i in indices {
        *counts.entry(samples[i].1).or_insert(0) += 1;
    }
    counts
}

/// Most frequent level; ties go to the smallest level.
fn majority_level(counts: &ClassCounts) -> Option<IllnessLevel> {
    let mut best: Option<(IllnessLevel, usize)> = None;
    for (&level, &count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((level, count));
        }
    }
    best.map(|(level, _)| level)
}

fn gini(counts: &ClassCounts, n: f64) -> f64 {
    if n == 0.0 {
        return 0.0;
    }
    1.0 - counts
        .values()
        .map(|&count| {
            let p = count as f64 / n;
            p * p
        })
        .sum::<f64>()
}
