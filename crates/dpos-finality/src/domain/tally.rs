//! Vote tallies
//!
//! Pre-votes and pre-commits are implied by headers rather than cast as
//! messages. Heights are kept in ordered sparse maps so the watermark scans
//! walk from the top and the pre-commit pass only visits voted heights.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-delegate voting progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateState {
    /// Highest height this delegate has pre-voted
    pub max_pre_vote_height: u64,
    /// Highest height this delegate has pre-committed
    pub max_pre_commit_height: u64,
}

/// Sparse height -> vote count tallies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeightTallies {
    pre_votes: BTreeMap<u64, u32>,
    pre_commits: BTreeMap<u64, u32>,
}

impl HeightTallies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pre_votes(&self) -> &BTreeMap<u64, u32> {
        &self.pre_votes
    }

    pub fn pre_commits(&self) -> &BTreeMap<u64, u32> {
        &self.pre_commits
    }

    pub fn pre_votes_at(&self, height: u64) -> u32 {
        self.pre_votes.get(&height).copied().unwrap_or(0)
    }

    pub fn pre_commits_at(&self, height: u64) -> u32 {
        self.pre_commits.get(&height).copied().unwrap_or(0)
    }

    /// Add one pre-vote to every height in `from..=to`.
    pub fn add_pre_votes(&mut self, from: u64, to: u64) {
        for height in from..=to {
            *self.pre_votes.entry(height).or_insert(0) += 1;
        }
    }

    /// Add one pre-commit to every height in `from..=to` that already has
    /// `threshold` pre-votes. Returns the highest height pre-committed.
    pub fn add_pre_commits(&mut self, from: u64, to: u64, threshold: u32) -> Option<u64> {
        if from > to {
            return None;
        }

        let eligible: Vec<u64> = self
            .pre_votes
            .range(from..=to)
            .filter(|(_, &votes)| votes >= threshold)
            .map(|(&height, _)| height)
            .collect();

        for &height in &eligible {
            *self.pre_commits.entry(height).or_insert(0) += 1;
        }
        eligible.last().copied()
    }

    /// Highest height with at least `threshold` pre-votes.
    pub fn highest_pre_voted(&self, threshold: u32) -> Option<u64> {
        Self::highest_reaching(&self.pre_votes, threshold)
    }

    /// Highest height with at least `threshold` pre-commits.
    pub fn highest_pre_committed(&self, threshold: u32) -> Option<u64> {
        Self::highest_reaching(&self.pre_commits, threshold)
    }

    fn highest_reaching(tally: &BTreeMap<u64, u32>, threshold: u32) -> Option<u64> {
        tally
            .iter()
            .rev()
            .find(|(_, &votes)| votes >= threshold)
            .map(|(&height, _)| height)
    }

    /// Drop every entry below `height`.
    pub fn prune_below(&mut self, height: u64) {
        self.pre_votes = self.pre_votes.split_off(&height);
        self.pre_commits = self.pre_commits.split_off(&height);
    }

    pub fn clear(&mut self) {
        self.pre_votes.clear();
        self.pre_commits.clear();
    }

    pub fn len(&self) -> usize {
        self.pre_votes.len() + self.pre_commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pre_votes.is_empty() && self.pre_commits.is_empty()
    }
}
