//! # Finality Engine
//!
//! Turns a stream of delegate-forged headers into two watermarks:
//!
//! - **prevoted confirmed height**: highest height with `threshold` pre-votes
//! - **finalized height**: highest height with `threshold` pre-commits
//!
//! A header forged at height `h` implicitly pre-votes every height its
//! delegate has not voted on yet (down to `h - processing_threshold`), and
//! pre-commits every earlier height that already cleared the pre-vote bar.
//!
//! ## Ingestion
//!
//! ```text
//! add_header ──→ validate ──→ verify (fork choice) ──→ window.add
//!                                                         │
//!                       update_watermarks ←── update_tallies
//! ```
//!
//! The engine is a plain synchronous state machine. It owns all of its state
//! and performs no locking; see [`crate::service::FinalityService`] for a
//! shareable handle.

use super::tally::{DelegateState, HeightTallies};
use super::validation::validate_header;
use super::window::HeaderWindow;
use crate::error::{FinalityError, FinalityResult};
use crate::events::WatermarkEvent;
use crate::metrics;
use crate::types::{FinalityConfig, HeaderOutcome};
use shared_types::{BlockHeader, PublicKey};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, trace, warn};

#[derive(Debug)]
pub struct FinalityEngine {
    active_delegates: u64,
    threshold: u32,
    processing_threshold: u64,
    window: HeaderWindow,
    tallies: HeightTallies,
    /// One entry per delegate ever seen. Never pruned: dropping a state would
    /// let its delegate pre-commit the same heights twice. Grows with the
    /// number of distinct delegates across rotations, not with chain height.
    delegates: HashMap<PublicKey, DelegateState>,
    finalized_height: u64,
    prevoted_confirmed_height: u64,
    pending_events: Vec<WatermarkEvent>,
}

impl FinalityEngine {
    pub fn new(config: FinalityConfig) -> FinalityResult<Self> {
        config.validate()?;

        info!(
            active_delegates = config.active_delegates,
            finalized_height = config.finalized_height,
            threshold = config.threshold(),
            "Finality engine initialized"
        );

        Ok(Self {
            active_delegates: u64::from(config.active_delegates),
            threshold: config.threshold(),
            processing_threshold: config.processing_threshold(),
            window: HeaderWindow::new(config.max_headers()),
            tallies: HeightTallies::new(),
            delegates: HashMap::new(),
            finalized_height: config.finalized_height,
            prevoted_confirmed_height: 0,
            pending_events: Vec::new(),
        })
    }

    /// Ingest one header.
    ///
    /// Nothing is mutated when an error is returned. A disjoint chain is not
    /// an error here: the header is ingested and the outcome says so.
    pub fn add_header(&mut self, header: BlockHeader) -> FinalityResult<HeaderOutcome> {
        if let Err(err) = validate_header(&header) {
            return Err(self.reject(&header, err));
        }

        let outcome = match self.verify_header(&header) {
            Ok(()) if self.has_processing_history() => HeaderOutcome::Verified,
            Ok(()) => HeaderOutcome::Unchecked,
            Err(FinalityError::ChainDisjoint {
                prior_height,
                claimed,
                ..
            }) => {
                debug!(
                    height = header.height,
                    prior_height, claimed, "Tolerating disjoint delegate chain"
                );
                HeaderOutcome::ChainDisjoint
            }
            Err(err) => return Err(self.reject(&header, err)),
        };

        let len_before = self.window.len();
        let added = self.window.add(header.clone()).map(|_| ());
        if let Err(err) = added {
            return Err(self.reject(&header, err.into()));
        }
        if self.window.len() == len_before {
            self.prune_tallies();
        }

        self.update_tallies(&header);
        self.update_watermarks();

        debug!(
            height = header.height,
            ?outcome,
            prevoted_confirmed = self.prevoted_confirmed_height,
            finalized = self.finalized_height,
            "Header ingested"
        );
        metrics::record_header_processed();
        metrics::set_window_length(self.window.len());

        Ok(outcome)
    }

    /// Check `header` against the fork choice rules.
    ///
    /// Skipped until the window holds `processing_threshold` headers.
    pub fn verify_header(&self, header: &BlockHeader) -> FinalityResult<()> {
        if !self.has_processing_history() {
            return Ok(());
        }

        if header.prevoted_confirmed_upto_height != self.prevoted_confirmed_height {
            return Err(FinalityError::InvalidAttribute {
                reason: format!(
                    "prevotedConfirmedUptoHeight {} does not match {}",
                    header.prevoted_confirmed_upto_height, self.prevoted_confirmed_height
                ),
            });
        }

        let prior = self
            .window
            .top(self.processing_threshold as usize)
            .find(|h| h.same_delegate(header));

        let Some(prior) = prior else {
            return Ok(());
        };

        if prior.max_height_previously_forged == header.max_height_previously_forged
            && prior.height >= header.height
        {
            return Err(FinalityError::ForkChoiceRule {
                delegate: header.delegate_public_key,
                height: header.height,
                prior_height: prior.height,
            });
        }

        if prior.height > header.max_height_previously_forged {
            return Err(FinalityError::ChainDisjoint {
                delegate: header.delegate_public_key,
                prior_height: prior.height,
                claimed: header.max_height_previously_forged,
            });
        }

        if prior.prevoted_confirmed_upto_height > header.prevoted_confirmed_upto_height {
            return Err(FinalityError::LowerChainBranch {
                delegate: header.delegate_public_key,
                prior: prior.prevoted_confirmed_upto_height,
                claimed: header.prevoted_confirmed_upto_height,
            });
        }

        Ok(())
    }

    /// Whether the delegate's claimed previous block is consistent with the
    /// headers we hold.
    ///
    /// A claimed height outside the window cannot be checked and is treated
    /// as compliant.
    pub fn is_bft_protocol_compliant(&self, header: &BlockHeader) -> bool {
        if header.max_height_previously_forged == 0 {
            return true;
        }
        if header.max_height_previously_forged >= header.height {
            return false;
        }

        self.window
            .get(header.max_height_previously_forged)
            .map_or(true, |previous| previous.same_delegate(header))
    }

    /// Zero every tally and watermark, then replay the window from its
    /// lowest header. Fork choice rules are not re-run.
    pub fn recompute(&mut self) {
        let previous_prevoted = self.prevoted_confirmed_height;
        let previous_finalized = self.finalized_height;
        let events_mark = self.pending_events.len();

        self.tallies.clear();
        self.delegates.clear();
        self.finalized_height = 0;
        self.prevoted_confirmed_height = 0;

        let headers: Vec<BlockHeader> = self.window.iter().cloned().collect();
        for header in &headers {
            self.update_tallies(header);
            self.update_watermarks();
        }

        // replay noise is collapsed into at most one event per watermark
        self.pending_events.truncate(events_mark);
        if self.prevoted_confirmed_height != previous_prevoted {
            self.pending_events
                .push(WatermarkEvent::PrevotedConfirmedHeightChanged {
                    previous: previous_prevoted,
                    current: self.prevoted_confirmed_height,
                });
        }
        if self.finalized_height != previous_finalized {
            self.pending_events.push(WatermarkEvent::FinalizedHeightChanged {
                previous: previous_finalized,
                current: self.finalized_height,
            });
        }

        info!(
            headers = headers.len(),
            prevoted_confirmed = self.prevoted_confirmed_height,
            finalized = self.finalized_height,
            "Recomputed finality tallies"
        );
        metrics::record_recompute();
        metrics::set_watermarks(self.finalized_height, self.prevoted_confirmed_height);
    }

    /// Drop every header above `height` and recompute.
    ///
    /// Returns the removed headers in ascending order.
    pub fn revert_to(&mut self, height: u64) -> Vec<BlockHeader> {
        let removed = self.window.remove_above(Some(height));
        if !removed.is_empty() {
            info!(height, removed = removed.len(), "Reverting header window");
            self.recompute();
            metrics::set_window_length(self.window.len());
        }
        removed
    }

    fn has_processing_history(&self) -> bool {
        self.window.len() as u64 >= self.processing_threshold
    }

    fn reject(&self, header: &BlockHeader, err: FinalityError) -> FinalityError {
        warn!(height = header.height, kind = err.kind(), "Rejected header: {}", err);
        metrics::record_header_rejected(err.kind());
        err
    }

    fn update_tallies(&mut self, header: &BlockHeader) {
        let state = self.delegates.entry(header.delegate_public_key).or_default();

        // Delegate already forged at or above this height on another branch
        if header.max_height_previously_forged >= header.height {
            trace!(height = header.height, "Skipping tallies for cross-branch header");
            return;
        }

        // a round too far out to express as a height never activates
        let delegate_min_height_active = header
            .active_since_round
            .saturating_sub(1)
            .checked_mul(self.active_delegates)
            .and_then(|h| h.checked_add(1))
            .unwrap_or(u64::MAX);

        // Pre-commits: a header never pre-commits the height it introduces
        let min_pre_commit =
            delegate_min_height_active.max(state.max_pre_commit_height.saturating_add(1));
        let max_pre_commit = header.height - 1;
        let pre_committed =
            self.tallies
                .add_pre_commits(min_pre_commit, max_pre_commit, self.threshold);
        if let Some(highest) = pre_committed {
            state.max_pre_commit_height = highest;
        }

        let min_pre_vote = delegate_min_height_active
            .max(header.max_height_previously_forged.saturating_add(1))
            .max(state.max_pre_vote_height.saturating_add(1))
            .max(header.height.saturating_sub(self.processing_threshold));
        let max_pre_vote = header.height;
        if min_pre_vote <= max_pre_vote {
            self.tallies.add_pre_votes(min_pre_vote, max_pre_vote);
        }
        state.max_pre_vote_height = state.max_pre_vote_height.max(max_pre_vote);

        trace!(
            height = header.height,
            min_pre_commit,
            min_pre_vote,
            max_pre_vote,
            "Tallies updated"
        );
    }

    fn update_watermarks(&mut self) {
        if self.window.is_empty() {
            return;
        }

        if let Some(height) = self.tallies.highest_pre_voted(self.threshold) {
            if height > self.prevoted_confirmed_height {
                let previous = self.prevoted_confirmed_height;
                self.prevoted_confirmed_height = height;
                debug!(previous, current = height, "Prevoted confirmed height advanced");
                self.pending_events
                    .push(WatermarkEvent::PrevotedConfirmedHeightChanged {
                        previous,
                        current: height,
                    });
            }
        }

        if let Some(height) = self.tallies.highest_pre_committed(self.threshold) {
            if height > self.finalized_height {
                let previous = self.finalized_height;
                self.finalized_height = height;
                info!(previous, current = height, "Finalized height advanced");
                self.pending_events.push(WatermarkEvent::FinalizedHeightChanged {
                    previous,
                    current: height,
                });
            }
        }

        metrics::set_watermarks(self.finalized_height, self.prevoted_confirmed_height);
    }

    /// Drop tallies no window header can vote on any more.
    fn prune_tallies(&mut self) {
        if let Some(first) = self.window.first() {
            let floor = first.height.saturating_sub(self.processing_threshold);
            self.tallies.prune_below(floor);
        }
    }

    pub fn take_events(&mut self) -> Vec<WatermarkEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn min_height(&self) -> FinalityResult<u64> {
        self.window
            .first()
            .map(|h| h.height)
            .ok_or(FinalityError::EmptyWindow)
    }

    pub fn max_height(&self) -> FinalityResult<u64> {
        self.window
            .last()
            .map(|h| h.height)
            .ok_or(FinalityError::EmptyWindow)
    }

    pub fn finalized_height(&self) -> u64 {
        self.finalized_height
    }

    pub fn prevoted_confirmed_height(&self) -> u64 {
        self.prevoted_confirmed_height
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn processing_threshold(&self) -> u64 {
        self.processing_threshold
    }

    pub fn max_headers(&self) -> usize {
        self.window.capacity()
    }

    pub fn window(&self) -> &HeaderWindow {
        &self.window
    }

    /// Direct window access for reorg handling. Call [`Self::recompute`]
    /// after removing headers.
    pub fn window_mut(&mut self) -> &mut HeaderWindow {
        &mut self.window
    }

    pub fn pre_votes(&self) -> &BTreeMap<u64, u32> {
        self.tallies.pre_votes()
    }

    pub fn pre_commits(&self) -> &BTreeMap<u64, u32> {
        self.tallies.pre_commits()
    }

    pub fn delegate_state(&self, delegate: &PublicKey) -> Option<DelegateState> {
        self.delegates.get(delegate).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delegate(index: usize) -> PublicKey {
        let mut key = [0u8; 32];
        key[0] = index as u8;
        key[1] = (index >> 8) as u8;
        key[31] = 0xD0;
        key
    }

    /// Round-robin forging schedule with honest header attributes.
    struct Chain {
        delegates: usize,
        next_height: u64,
        last_forged: HashMap<PublicKey, u64>,
    }

    impl Chain {
        fn new(delegates: usize) -> Self {
            Self {
                delegates,
                next_height: 1,
                last_forged: HashMap::new(),
            }
        }

        fn next(&mut self, engine: &FinalityEngine) -> BlockHeader {
            let height = self.next_height;
            let key = delegate(((height - 1) as usize) % self.delegates);
            let header = BlockHeader {
                id: [height as u8; 32],
                height,
                max_height_previously_forged: self.last_forged.get(&key).copied().unwrap_or(0),
                prevoted_confirmed_upto_height: engine.prevoted_confirmed_height(),
                active_since_round: 1,
                delegate_public_key: key,
            };
            self.last_forged.insert(key, height);
            self.next_height += 1;
            header
        }

        fn extend(&mut self, engine: &mut FinalityEngine, count: usize) -> Vec<BlockHeader> {
            (0..count)
                .map(|_| {
                    let header = self.next(engine);
                    engine.add_header(header.clone()).unwrap();
                    header
                })
                .collect()
        }
    }

    fn engine(active_delegates: u32) -> FinalityEngine {
        FinalityEngine::new(FinalityConfig::new(active_delegates, 0)).unwrap()
    }

    #[test]
    fn test_zero_delegates_rejected() {
        let result = FinalityEngine::new(FinalityConfig::new(0, 0));
        assert!(matches!(result, Err(FinalityError::InvalidConfig { .. })));
    }

    #[test]
    fn test_four_delegate_round_robin() {
        let mut engine = engine(4);
        let mut chain = Chain::new(4);

        chain.extend(&mut engine, 3);
        assert_eq!(engine.prevoted_confirmed_height(), 1);
        assert_eq!(engine.finalized_height(), 0);

        chain.extend(&mut engine, 1);
        assert_eq!(engine.prevoted_confirmed_height(), 2);
        assert_eq!(engine.finalized_height(), 0);
        assert_eq!(engine.pre_commits().get(&1), Some(&1));

        chain.extend(&mut engine, 1);
        assert_eq!(engine.prevoted_confirmed_height(), 3);
        assert_eq!(engine.finalized_height(), 0);

        chain.extend(&mut engine, 1);
        assert_eq!(engine.prevoted_confirmed_height(), 4);
        assert_eq!(engine.finalized_height(), 1);

        chain.extend(&mut engine, 1);
        assert_eq!(engine.prevoted_confirmed_height(), 5);
        assert_eq!(engine.finalized_height(), 2);
    }

    #[test]
    fn test_steady_state_lag() {
        let mut engine = engine(4);
        let mut chain = Chain::new(4);
        chain.extend(&mut engine, 16);

        assert_eq!(engine.max_height().unwrap(), 16);
        assert_eq!(engine.prevoted_confirmed_height(), 14);
        assert_eq!(engine.finalized_height(), 11);
    }

    #[test]
    fn test_threshold_with_101_delegates() {
        let mut engine = engine(101);
        let mut chain = Chain::new(101);
        assert_eq!(engine.threshold(), 68);

        chain.extend(&mut engine, 67);
        assert_eq!(engine.pre_votes().get(&1), Some(&67));
        assert_eq!(engine.prevoted_confirmed_height(), 0);

        chain.extend(&mut engine, 1);
        assert_eq!(engine.pre_votes().get(&1), Some(&68));
        assert_eq!(engine.prevoted_confirmed_height(), 1);
    }

    #[test]
    fn test_header_outcome_reflects_history() {
        let mut engine = engine(4);
        let mut chain = Chain::new(4);

        chain.extend(&mut engine, 10);
        let header = chain.next(&engine);
        assert_eq!(engine.add_header(header).unwrap(), HeaderOutcome::Unchecked);

        let header = chain.next(&engine);
        assert_eq!(engine.add_header(header).unwrap(), HeaderOutcome::Verified);
    }

    /// Five delegates forging round-robin under a four-delegate config so
    /// height 10 belongs to the delegate that forged height 5.
    fn five_way_chain(engine: &mut FinalityEngine, count: usize) -> Chain {
        let mut chain = Chain::new(5);
        chain.extend(engine, count);
        chain
    }

    #[test]
    fn test_equivocation_detected() {
        let mut engine = engine(4);
        five_way_chain(&mut engine, 11);

        let original = engine.window().get(10).unwrap().clone();
        assert_eq!(original.max_height_previously_forged, 5);

        for height in [10, 9] {
            let double = BlockHeader {
                id: [0xEE; 32],
                height,
                prevoted_confirmed_upto_height: engine.prevoted_confirmed_height(),
                ..original.clone()
            };
            let err = engine.add_header(double).unwrap_err();
            assert!(matches!(err, FinalityError::ForkChoiceRule { prior_height: 10, .. }));
        }
        assert_eq!(engine.max_height().unwrap(), 11);
    }

    #[test]
    fn test_chain_disjoint_tolerated() {
        let mut engine = engine(4);
        five_way_chain(&mut engine, 13);

        let prior = engine.window().get(12).unwrap().clone();
        let header = BlockHeader {
            id: [0xCD; 32],
            height: 14,
            max_height_previously_forged: 8,
            prevoted_confirmed_upto_height: engine.prevoted_confirmed_height(),
            ..prior
        };

        let err = engine.verify_header(&header).unwrap_err();
        assert!(matches!(
            err,
            FinalityError::ChainDisjoint {
                prior_height: 12,
                claimed: 8,
                ..
            }
        ));
        assert!(err.is_recoverable());

        let outcome = engine.add_header(header).unwrap();
        assert_eq!(outcome, HeaderOutcome::ChainDisjoint);
        assert_eq!(engine.max_height().unwrap(), 14);
    }

    #[test]
    fn test_lower_chain_branch_detected() {
        let mut engine = engine(4);
        let mut chain = Chain::new(5);

        // height 7 claims a high pre-voted watermark while rules are still off
        for _ in 0..11 {
            let mut header = chain.next(&engine);
            if header.height == 7 {
                header.prevoted_confirmed_upto_height = 100;
            }
            engine.add_header(header).unwrap();
        }

        let header = chain.next(&engine);
        assert_eq!(header.height, 12);
        assert_eq!(header.max_height_previously_forged, 7);

        let err = engine.add_header(header).unwrap_err();
        assert!(matches!(
            err,
            FinalityError::LowerChainBranch { prior: 100, .. }
        ));
    }

    #[test]
    fn test_prevoted_mismatch_rejected() {
        let mut engine = engine(4);
        let mut chain = Chain::new(4);
        chain.extend(&mut engine, 11);

        let mut header = chain.next(&engine);
        header.prevoted_confirmed_upto_height += 1;

        let err = engine.add_header(header).unwrap_err();
        assert!(matches!(err, FinalityError::InvalidAttribute { .. }));
        assert_eq!(engine.max_height().unwrap(), 11);
    }

    #[test]
    fn test_invalid_header_leaves_state_untouched() {
        let mut engine = engine(4);
        let mut chain = Chain::new(4);
        chain.extend(&mut engine, 5);

        let votes_before = engine.pre_votes().clone();
        let mut header = chain.next(&engine);
        header.active_since_round = 0;

        assert!(engine.add_header(header).is_err());
        assert_eq!(engine.pre_votes(), &votes_before);
        assert_eq!(engine.window().len(), 5);
    }

    #[test]
    fn test_out_of_order_header_is_contract_violation() {
        let mut engine = engine(4);
        let mut chain = Chain::new(4);
        chain.extend(&mut engine, 3);

        let mut header = chain.next(&engine);
        header.height = 9;

        let err = engine.add_header(header).unwrap_err();
        assert!(err.is_contract_violation());
        assert_eq!(engine.window().len(), 3);
    }

    #[test]
    fn test_cross_branch_header_not_tallied() {
        let mut engine = engine(4);
        let mut chain = Chain::new(4);
        chain.extend(&mut engine, 2);

        let mut header = chain.next(&engine);
        header.max_height_previously_forged = 3;
        engine.add_header(header.clone()).unwrap();

        assert_eq!(engine.pre_votes().get(&3), None);
        assert_eq!(
            engine.delegate_state(&header.delegate_public_key),
            Some(DelegateState::default())
        );
    }

    #[test]
    fn test_late_activation_limits_votes() {
        let mut engine = engine(4);
        let mut chain = Chain::new(4);
        chain.extend(&mut engine, 8);

        // active from round 3: first eligible height is 9
        let mut header = chain.next(&engine);
        header.delegate_public_key = delegate(42);
        header.max_height_previously_forged = 0;
        header.active_since_round = 3;
        engine.add_header(header).unwrap();

        let state = engine.delegate_state(&delegate(42)).unwrap();
        assert_eq!(state.max_pre_vote_height, 9);
        assert_eq!(state.max_pre_commit_height, 0);
    }

    #[test]
    fn test_far_future_activation_round_casts_no_votes() {
        let mut engine = engine(101);
        let header = BlockHeader {
            id: [1; 32],
            height: 1,
            active_since_round: u64::MAX / 2,
            delegate_public_key: delegate(7),
            ..Default::default()
        };

        assert_eq!(engine.add_header(header).unwrap(), HeaderOutcome::Unchecked);
        assert!(engine.pre_votes().is_empty());
        assert!(engine.pre_commits().is_empty());
        let state = engine.delegate_state(&delegate(7)).unwrap();
        assert_eq!(state.max_pre_commit_height, 0);
    }

    #[test]
    fn test_height_past_u64_range_is_contract_violation() {
        let mut engine = engine(4);
        let mut chain = Chain::new(4);
        chain.extend(&mut engine, 5);

        let mut header = chain.next(&engine);
        header.height = u64::MAX;
        let err = engine.add_header(header).unwrap_err();

        assert!(matches!(err, FinalityError::Window(_)));
        assert!(err.is_contract_violation());
        assert_eq!(engine.max_height().unwrap(), 5);
    }

    #[test]
    fn test_recompute_matches_incremental() {
        let mut engine = engine(4);
        let mut chain = Chain::new(4);
        let headers = chain.extend(&mut engine, 15);

        let pre_votes = engine.pre_votes().clone();
        let pre_commits = engine.pre_commits().clone();
        let prevoted = engine.prevoted_confirmed_height();
        let finalized = engine.finalized_height();
        let states: Vec<_> = headers
            .iter()
            .map(|h| engine.delegate_state(&h.delegate_public_key))
            .collect();

        engine.recompute();

        assert_eq!(engine.pre_votes(), &pre_votes);
        assert_eq!(engine.pre_commits(), &pre_commits);
        assert_eq!(engine.prevoted_confirmed_height(), prevoted);
        assert_eq!(engine.finalized_height(), finalized);
        for (header, state) in headers.iter().zip(states) {
            assert_eq!(engine.delegate_state(&header.delegate_public_key), state);
        }
    }

    #[test]
    fn test_recompute_resets_configured_finalized_height() {
        let mut engine = FinalityEngine::new(FinalityConfig::new(4, 100)).unwrap();
        let mut chain = Chain::new(4);
        chain.extend(&mut engine, 7);
        assert_eq!(engine.finalized_height(), 100);

        engine.recompute();
        assert_eq!(engine.finalized_height(), 2);
    }

    #[test]
    fn test_revert_to_replays_remaining_headers() {
        let mut engine = engine(4);
        let mut chain = Chain::new(4);
        let headers = chain.extend(&mut engine, 10);

        let removed = engine.revert_to(7);
        assert_eq!(removed.iter().map(|h| h.height).collect::<Vec<_>>(), vec![8, 9, 10]);
        assert_eq!(engine.max_height().unwrap(), 7);

        let mut fresh = self::engine(4);
        for header in headers.into_iter().take(7) {
            fresh.add_header(header).unwrap();
        }
        assert_eq!(engine.prevoted_confirmed_height(), fresh.prevoted_confirmed_height());
        assert_eq!(engine.finalized_height(), fresh.finalized_height());
        assert_eq!(engine.pre_votes(), fresh.pre_votes());
        assert_eq!(engine.pre_commits(), fresh.pre_commits());
    }

    #[test]
    fn test_watermark_events() {
        let mut engine = engine(4);
        let mut chain = Chain::new(4);

        chain.extend(&mut engine, 3);
        assert_eq!(
            engine.take_events(),
            vec![WatermarkEvent::PrevotedConfirmedHeightChanged {
                previous: 0,
                current: 1
            }]
        );

        chain.extend(&mut engine, 3);
        let events = engine.take_events();
        assert!(events.contains(&WatermarkEvent::FinalizedHeightChanged {
            previous: 0,
            current: 1
        }));
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn test_recompute_emits_net_change_only() {
        let mut engine = engine(4);
        let mut chain = Chain::new(4);
        chain.extend(&mut engine, 10);
        engine.take_events();

        engine.recompute();
        assert!(engine.take_events().is_empty());

        engine.revert_to(8);
        let events = engine.take_events();
        assert_eq!(
            events,
            vec![
                WatermarkEvent::PrevotedConfirmedHeightChanged {
                    previous: 8,
                    current: 6
                },
                WatermarkEvent::FinalizedHeightChanged {
                    previous: 5,
                    current: 3
                },
            ]
        );
    }

    #[test]
    fn test_tallies_pruned_on_eviction() {
        let mut engine = engine(4);
        let mut chain = Chain::new(4);
        chain.extend(&mut engine, 40);

        assert_eq!(engine.window().len(), engine.max_headers());
        let first = engine.min_height().unwrap();
        let floor = first - engine.processing_threshold();
        assert!(*engine.pre_votes().keys().next().unwrap() >= floor);
        assert!(*engine.pre_commits().keys().next().unwrap() >= floor);
        assert_eq!(engine.prevoted_confirmed_height(), 38);
        assert_eq!(engine.finalized_height(), 35);
    }

    #[test]
    fn test_bft_protocol_compliance() {
        let mut engine = engine(4);
        let mut chain = Chain::new(4);
        chain.extend(&mut engine, 8);

        let base = BlockHeader {
            height: 9,
            active_since_round: 1,
            delegate_public_key: delegate(0),
            ..Default::default()
        };

        assert!(engine.is_bft_protocol_compliant(&base));
        assert!(engine.is_bft_protocol_compliant(&BlockHeader {
            max_height_previously_forged: 5,
            ..base.clone()
        }));
        assert!(!engine.is_bft_protocol_compliant(&BlockHeader {
            max_height_previously_forged: 6,
            ..base.clone()
        }));
        assert!(!engine.is_bft_protocol_compliant(&BlockHeader {
            max_height_previously_forged: 9,
            ..base.clone()
        }));
        assert!(engine.is_bft_protocol_compliant(&BlockHeader {
            height: 60,
            max_height_previously_forged: 50,
            ..base
        }));
    }

    #[test]
    fn test_empty_window_accessors() {
        let engine = engine(4);
        assert_eq!(engine.min_height(), Err(FinalityError::EmptyWindow));
        assert_eq!(engine.max_height(), Err(FinalityError::EmptyWindow));
        assert_eq!(engine.prevoted_confirmed_height(), 0);
    }
}
