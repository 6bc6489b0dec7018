use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::RosterError;

pub type ParticipantId = u64;

pub const DEFAULT_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub weight: f64,
    pub times_selected: u32,
    pub created_at: DateTime<Utc>,
    pub last_selected_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Participant {
    fn new(id: ParticipantId, name: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            weight: DEFAULT_WEIGHT,
            times_selected: 0,
            created_at,
            last_selected_at: None,
            is_active: true,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RosterFile {
    participants: Vec<Participant>,
}

/// Durable participant arena keyed by id, with name lookup, backed by a
/// single json file.
///
/// Ids are assigned densely in insertion order and never reused; slot `i`
/// always holds the participant with id `i`. A soft-deleted participant
/// keeps its slot, name, weight, and counters, so reactivation restores the
/// same identity.
#[derive(Debug, Clone)]
pub struct Roster {
    participants: Vec<Participant>,
    by_name: HashMap<String, ParticipantId>,
    path: PathBuf,
}

impl Roster {
    pub fn load_or_init(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let path = path.as_ref().to_path_buf();
        let participants = if path.exists() {
            let bytes = fs::read(&path)?;
            if bytes.is_empty() {
                Vec::new()
            } else {
                serde_json::from_slice::<RosterFile>(&bytes)?.participants
            }
        } else {
            Vec::new()
        };

        let mut by_name = HashMap::new();
        for (idx, participant) in participants.iter().enumerate() {
            if participant.id != idx as ParticipantId {
                return Err(RosterError::Invalid {
                    detail: format!(
                        "participant {} stored at slot {idx}",
                        participant.id
                    ),
                });
            }
            if by_name
                .insert(participant.name.clone(), participant.id)
                .is_some()
            {
                return Err(RosterError::Invalid {
                    detail: format!("duplicate participant name {}", participant.name),
                });
            }
        }

        Ok(Self {
            participants,
            by_name,
            path,
        })
    }

    pub fn persist(&self) -> Result<(), RosterError> {
        let file = RosterFile {
            participants: self.participants.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&file)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(id as usize)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Participant> {
        self.by_name
            .get(name)
            .and_then(|&id| self.participants.get(id as usize))
    }

    pub fn find_active_by_name(&self, name: &str) -> Option<&Participant> {
        self.find_by_name(name).filter(|p| p.is_active)
    }

    /// Resolves a pool mention: an active participant is returned as-is, a
    /// soft-deleted one is reactivated, an unknown name is created at the
    /// default weight.
    pub fn resolve_or_create(&mut self, name: &str, now: DateTime<Utc>) -> &Participant {
        match self.by_name.get(name).copied() {
            Some(id) => {
                let idx = id as usize;
                if !self.participants[idx].is_active {
                    self.participants[idx].is_active = true;
                    info!("participant reactivated: {name}");
                }
                &self.participants[idx]
            }
            None => self.insert(name, now),
        }
    }

    /// Explicit add. Unlike [`Roster::resolve_or_create`] this rejects a name
    /// that is already active.
    pub fn add(&mut self, name: &str, now: DateTime<Utc>) -> Result<&Participant, RosterError> {
        if self.find_active_by_name(name).is_some() {
            return Err(RosterError::DuplicateName {
                name: name.to_string(),
            });
        }
        Ok(self.resolve_or_create(name, now))
    }

    /// Soft delete: clears the active flag, leaving identity, weight, and
    /// counters in place for a later reactivation.
    pub fn deactivate(&mut self, name: &str) -> Result<ParticipantId, RosterError> {
        let id = self
            .find_active_by_name(name)
            .map(|p| p.id)
            .ok_or_else(|| RosterError::NotFound {
                name: name.to_string(),
            })?;
        self.participants[id as usize].is_active = false;
        info!("participant deactivated: {name}");
        Ok(id)
    }

    pub fn record_win(
        &mut self,
        id: ParticipantId,
        now: DateTime<Utc>,
    ) -> Result<(), RosterError> {
        let participant = self
            .participants
            .get_mut(id as usize)
            .ok_or(RosterError::UnknownId { id })?;
        participant.times_selected += 1;
        participant.last_selected_at = Some(now);
        Ok(())
    }

    pub fn set_weight(&mut self, id: ParticipantId, weight: f64) -> Result<(), RosterError> {
        let participant = self
            .participants
            .get_mut(id as usize)
            .ok_or(RosterError::UnknownId { id })?;
        participant.weight = weight;
        Ok(())
    }

    /// Restores every active participant to the default weight with zeroed
    /// counters. Returns how many were touched.
    pub fn reset_stats(&mut self) -> usize {
        let mut touched = 0;
        for participant in self.participants.iter_mut().filter(|p| p.is_active) {
            participant.weight = DEFAULT_WEIGHT;
            participant.times_selected = 0;
            participant.last_selected_at = None;
            touched += 1;
        }
        touched
    }

    pub fn list_active(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.is_active)
    }

    pub fn count_active(&self) -> usize {
        self.list_active().count()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn insert(&mut self, name: &str, now: DateTime<Utc>) -> &Participant {
        let id = self.participants.len() as ParticipantId;
        self.by_name.insert(name.to_string(), id);
        self.participants
            .push(Participant::new(id, name.to_string(), now));
        info!("participant created: {name}");
        &self.participants[id as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn add_rejects_active_duplicate() {
        let dir = tempdir().unwrap();
        let mut roster = Roster::load_or_init(dir.path().join("p.json")).unwrap();

        roster.add("Ana", now()).unwrap();
        let err = roster.add("Ana", now()).unwrap_err();
        assert!(matches!(err, RosterError::DuplicateName { .. }));
    }

    #[test]
    fn deactivate_then_add_reactivates_same_identity() {
        let dir = tempdir().unwrap();
        let mut roster = Roster::load_or_init(dir.path().join("p.json")).unwrap();

        let id = roster.add("Ana", now()).unwrap().id;
        roster.record_win(id, now()).unwrap();
        roster.deactivate("Ana").unwrap();
        assert!(roster.find_active_by_name("Ana").is_none());
        assert!(roster.find_by_name("Ana").is_some());

        let revived = roster.add("Ana", now()).unwrap();
        assert_eq!(revived.id, id);
        assert_eq!(revived.times_selected, 1);
        assert!(revived.is_active);
    }

    #[test]
    fn deactivate_unknown_name_fails() {
        let dir = tempdir().unwrap();
        let mut roster = Roster::load_or_init(dir.path().join("p.json")).unwrap();
        let err = roster.deactivate("Nadie").unwrap_err();
        assert!(matches!(err, RosterError::NotFound { .. }));
    }

    #[test]
    fn persist_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p.json");

        let mut roster = Roster::load_or_init(&path).unwrap();
        roster.add("Ana", now()).unwrap();
        roster.add("Bob", now()).unwrap();
        roster.set_weight(0, 0.5).unwrap();
        roster.deactivate("Bob").unwrap();
        roster.persist().unwrap();

        let reloaded = Roster::load_or_init(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.count_active(), 1);
        let ana = reloaded.find_active_by_name("Ana").unwrap();
        assert_eq!(ana.id, 0);
        assert!((ana.weight - 0.5).abs() < 1e-9);
        let bob = reloaded.find_by_name("Bob").unwrap();
        assert!(!bob.is_active);
    }

    #[test]
    fn reset_stats_touches_active_only() {
        let dir = tempdir().unwrap();
        let mut roster = Roster::load_or_init(dir.path().join("p.json")).unwrap();

        let ana = roster.add("Ana", now()).unwrap().id;
        let bob = roster.add("Bob", now()).unwrap().id;
        roster.record_win(ana, now()).unwrap();
        roster.record_win(bob, now()).unwrap();
        roster.set_weight(ana, 2.0).unwrap();
        roster.deactivate("Bob").unwrap();

        assert_eq!(roster.reset_stats(), 1);
        let ana = roster.get(ana).unwrap();
        assert_eq!(ana.times_selected, 0);
        assert!((ana.weight - DEFAULT_WEIGHT).abs() < 1e-9);
        assert!(ana.last_selected_at.is_none());
        // soft-deleted rows keep their history
        assert_eq!(roster.get(bob).unwrap().times_selected, 1);
    }
}
