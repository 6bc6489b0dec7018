use std::collections::HashSet;

use chrono::{Duration, Utc};
use draw_model::SampleSource;
use log::info;
use parking_lot::{Mutex, RwLock};

use crate::{
    config::PoolConfig,
    error::{Result, RosterError, SpinError},
    history::{SelectionLog, SelectionRecord},
    payload::{ParticipantSummary, PoolMember, SpinOutcome},
    roster::{Participant, ParticipantId, Roster},
};

/// Orchestrates the roster, the selection log, and the weight model.
///
/// Every mutating operation runs under the roster write lock as one
/// transaction: resolve pool, compute, mutate a staged copy, append the
/// ledger record, persist, and only then publish the staged state. A failure
/// anywhere drops the staged copy, so callers never observe a half-applied
/// spin, and spins over intersecting pools serialize.
pub struct PoolController {
    config: PoolConfig,
    roster: RwLock<Roster>,
    history: Mutex<SelectionLog>,
    samples: Mutex<SampleSource>,
}

impl PoolController {
    pub fn bootstrap(config: PoolConfig) -> Result<Self> {
        config.ensure_dirs().map_err(RosterError::from)?;
        let roster = Roster::load_or_init(config.roster_path())?;
        let history = SelectionLog::load(config.history_path())?;
        let samples = match config.seed {
            Some(seed) => SampleSource::seeded(seed),
            None => SampleSource::from_clock(),
        };

        Ok(Self {
            config,
            roster: RwLock::new(roster),
            history: Mutex::new(history),
            samples: Mutex::new(samples),
        })
    }

    /// Draws one winner from the named pool and applies the post-draw weight
    /// adjustment to every member.
    pub fn spin(&self, names: &[String]) -> Result<SpinOutcome> {
        self.run_spin(names, None)
    }

    /// Records an externally chosen winner, applying the same stat updates
    /// and weight adjustments as [`PoolController::spin`]. The probability
    /// written to the ledger still comes from the pre-draw distribution.
    pub fn record_winner(&self, winner: &str, names: &[String]) -> Result<SpinOutcome> {
        if winner.trim().is_empty() {
            return Err(SpinError::BlankName);
        }
        self.run_spin(names, Some(winner))
    }

    pub fn list_active(&self) -> Vec<ParticipantSummary> {
        self.roster
            .read()
            .list_active()
            .map(ParticipantSummary::from)
            .collect()
    }

    pub fn add_participant(&self, name: &str) -> Result<ParticipantSummary> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SpinError::BlankName);
        }

        let mut roster = self.roster.write();
        let mut staged = roster.clone();
        let summary = ParticipantSummary::from(staged.add(name, Utc::now())?);
        staged.persist()?;
        *roster = staged;
        Ok(summary)
    }

    pub fn remove_participant(&self, name: &str) -> Result<()> {
        let mut roster = self.roster.write();
        let mut staged = roster.clone();
        staged.deactivate(name)?;
        staged.persist()?;
        *roster = staged;
        Ok(())
    }

    pub fn recent_history(&self, days: u32) -> Vec<SelectionRecord> {
        let since = Utc::now() - Duration::days(i64::from(days));
        self.history.lock().recent_since(since)
    }

    /// Restores every active participant to the default weight with zeroed
    /// counters. The selection log is audit state and stays as-is.
    pub fn reset_stats(&self) -> Result<usize> {
        let mut roster = self.roster.write();
        let mut staged = roster.clone();
        let touched = staged.reset_stats();
        staged.persist()?;
        *roster = staged;
        info!("stats reset for {touched} active participants");
        Ok(touched)
    }

    pub fn participant_name(&self, id: ParticipantId) -> Option<String> {
        self.roster.read().get(id).map(|p| p.name.clone())
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    fn run_spin(&self, names: &[String], chosen: Option<&str>) -> Result<SpinOutcome> {
        validate_pool(names)?;
        let now = Utc::now();

        let mut roster = self.roster.write();
        let mut staged = roster.clone();

        // Resolving is itself a side effect: unknown names enter the pool at
        // the default weight before probabilities are computed.
        let mut pool: Vec<Participant> = Vec::with_capacity(names.len());
        for name in names {
            pool.push(staged.resolve_or_create(name, now).clone());
        }

        let weights: Vec<(usize, f64)> = pool
            .iter()
            .enumerate()
            .map(|(idx, p)| (idx, p.weight))
            .collect();
        let probabilities = draw_model::normalize(&weights)?;

        let winner_idx = match chosen {
            Some(winner) => pool
                .iter()
                .position(|p| p.name == winner)
                .ok_or_else(|| SpinError::WinnerNotInPool {
                    name: winner.to_string(),
                })?,
            None => {
                let sample = self.samples.lock().next_sample();
                draw_model::pick(&probabilities, sample)?
            }
        };
        let winner = &pool[winner_idx];

        // Pre-update share for the ledger. normalize covers the whole pool;
        // the fallback must not be reachable.
        let winner_probability = probabilities
            .get(winner_idx)
            .map(|&(_, p)| p)
            .unwrap_or(1.0 / pool.len() as f64);

        staged.record_win(winner.id, now)?;
        for (idx, weight) in draw_model::adjust(&weights, winner_idx, &self.config.policy) {
            staged.set_weight(pool[idx].id, weight)?;
        }

        let record = SelectionRecord {
            participant_id: winner.id,
            total_participants: pool.len(),
            probability_at_selection: winner_probability,
            selected_at: now,
        };

        let participants = pool
            .iter()
            .zip(probabilities.iter())
            .map(|(p, &(_, probability))| PoolMember {
                name: p.name.clone(),
                probability,
                times_selected: if p.id == winner.id {
                    p.times_selected + 1
                } else {
                    p.times_selected
                },
            })
            .collect();

        self.history.lock().append(record)?;
        staged.persist()?;
        let outcome = SpinOutcome {
            winner: winner.name.clone(),
            participants,
            winner_probability,
            spin_time: now,
        };
        *roster = staged;

        info!(
            "spin complete: {} won over {} participants (p={:.4})",
            outcome.winner,
            outcome.participants.len(),
            winner_probability
        );
        Ok(outcome)
    }
}

fn validate_pool(names: &[String]) -> Result<()> {
    if names.is_empty() {
        return Err(SpinError::EmptyPool);
    }
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if name.trim().is_empty() {
            return Err(SpinError::BlankName);
        }
        if !seen.insert(name.as_str()) {
            return Err(SpinError::DuplicateEntry { name: name.clone() });
        }
    }
    Ok(())
}
