//! One reconstruction run: shuffle, ingest, record entropy, freeze.

use rand::seq::SliceRandom;
use rand::Rng;

use super::trace::EntropyTrace;
use crate::estimator::{EntropyFunctional, OnlineEstimator};
use crate::types::SampleSet;

/// Lifecycle of a [`ReconstructionRun`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Created, estimator not yet reset.
    Idle,
    /// `next` samples of the shuffled order have been ingested.
    Ingesting { next: usize },
    /// Every sample has been ingested.
    Finalized,
}

/// Output of a finished run.
#[derive(Debug, Clone)]
pub struct RunOutput<S> {
    pub draw: S,
    pub trace: EntropyTrace,
}

/// A single estimator fed one shuffled copy of the samples.
pub struct ReconstructionRun<'a, E> {
    estimator: E,
    samples: &'a SampleSet,
    order: Vec<usize>,
    entropy_interval: usize,
    trace: EntropyTrace,
    state: RunState,
}

impl<'a, E: OnlineEstimator> ReconstructionRun<'a, E> {
    /// `entropy_interval` must be positive.
    pub fn new(estimator: E, samples: &'a SampleSet, entropy_interval: usize) -> Self {
        let interval = entropy_interval.max(1);
        Self {
            estimator,
            samples,
            order: Vec::new(),
            entropy_interval: interval,
            trace: EntropyTrace::with_capacity(samples.len().div_ceil(interval)),
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Reset the estimator and draw a fresh ingestion order.
    ///
    /// Restarting a run that already ingested samples discards its trace.
    pub fn start<R: Rng>(&mut self, rng: &mut R) {
        self.estimator.initialise();
        self.order = (0..self.samples.len()).collect();
        self.order.shuffle(rng);
        self.trace = EntropyTrace::with_capacity(self.order.len().div_ceil(self.entropy_interval));
        self.state = if self.order.is_empty() {
            RunState::Finalized
        } else {
            RunState::Ingesting { next: 0 }
        };
    }

    /// Ingest the next sample, evaluating the entropy on every
    /// `entropy_interval`-th position. Does nothing unless ingesting.
    pub fn step<H>(&mut self, entropy: &H) -> RunState
    where
        H: EntropyFunctional<E> + ?Sized,
    {
        if let RunState::Ingesting { next } = self.state {
            self.estimator.add_new_point(self.samples.row(self.order[next]));
            if next % self.entropy_interval == 0 {
                self.trace.push(next, entropy.entropy(&self.estimator));
            }
            self.state = if next + 1 == self.order.len() {
                RunState::Finalized
            } else {
                RunState::Ingesting { next: next + 1 }
            };
        }
        self.state
    }

    /// Ingest everything that is left.
    pub fn ingest_all<H>(&mut self, entropy: &H)
    where
        H: EntropyFunctional<E> + ?Sized,
    {
        while let RunState::Ingesting { .. } = self.step(entropy) {}
    }

    /// Freeze the estimator. `None` unless the run is finalized.
    pub fn finish(self) -> Option<RunOutput<E::Snapshot>> {
        match self.state {
            RunState::Finalized => Some(RunOutput {
                draw: self.estimator.build_mixture(),
                trace: self.trace,
            }),
            _ => None,
        }
    }
}
