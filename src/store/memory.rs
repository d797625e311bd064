//! In-memory bracket store.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::bracket::models::{
    BracketMatch, MatchId, Participant, PlayerId, Tournament, TournamentId,
};

use super::{BracketStore, ChangeSet, StoreError, StoreResult};

#[derive(Debug, Default)]
struct TournamentRecords {
    tournament: Option<Tournament>,
    matches: BTreeMap<MatchId, BracketMatch>,
    participants: BTreeMap<PlayerId, Participant>,
}

#[derive(Debug, Default)]
struct Inner {
    tournaments: HashMap<TournamentId, TournamentRecords>,
    next_id: TournamentId,
}

/// Reference [`BracketStore`] keeping everything behind one mutex, so a
/// committed [`ChangeSet`] is applied as a unit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl BracketStore for MemoryStore {
    async fn insert_tournament(&self, tournament: &Tournament) -> StoreResult<TournamentId> {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        let mut record = tournament.clone();
        record.id = id;
        inner.tournaments.entry(id).or_default().tournament = Some(record);
        Ok(id)
    }

    async fn insert_participants(&self, participants: &[Participant]) -> StoreResult<()> {
        let mut inner = self.lock();
        for p in participants {
            let records = inner
                .tournaments
                .get_mut(&p.tournament_id)
                .ok_or_else(|| StoreError::NotFound(format!("tournament {}", p.tournament_id)))?;
            records.participants.insert(p.player_id, p.clone());
        }
        Ok(())
    }

    async fn insert_matches(&self, matches: &[BracketMatch]) -> StoreResult<()> {
        let mut inner = self.lock();
        for m in matches {
            let records = inner
                .tournaments
                .get_mut(&m.tournament_id)
                .ok_or_else(|| StoreError::NotFound(format!("tournament {}", m.tournament_id)))?;
            records.matches.insert(m.id, m.clone());
        }
        Ok(())
    }

    async fn tournament(&self, id: TournamentId) -> StoreResult<Option<Tournament>> {
        let inner = self.lock();
        Ok(inner
            .tournaments
            .get(&id)
            .and_then(|r| r.tournament.clone()))
    }

    async fn matches_for_tournament(&self, id: TournamentId) -> StoreResult<Vec<BracketMatch>> {
        let inner = self.lock();
        Ok(inner
            .tournaments
            .get(&id)
            .map(|r| r.matches.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn participants_for_tournament(
        &self,
        id: TournamentId,
    ) -> StoreResult<Vec<Participant>> {
        let inner = self.lock();
        Ok(inner
            .tournaments
            .get(&id)
            .map(|r| r.participants.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn commit(&self, changes: ChangeSet) -> StoreResult<()> {
        // One lock scope: the whole change set lands or none of it does.
        let mut inner = self.lock();
        if let Some(tournament) = changes.tournament {
            let records = inner
                .tournaments
                .get_mut(&tournament.id)
                .ok_or_else(|| StoreError::NotFound(format!("tournament {}", tournament.id)))?;
            records.tournament = Some(tournament);
        }
        for m in changes.matches {
            let records = inner
                .tournaments
                .get_mut(&m.tournament_id)
                .ok_or_else(|| StoreError::NotFound(format!("tournament {}", m.tournament_id)))?;
            records.matches.insert(m.id, m);
        }
        for p in changes.participants {
            let records = inner
                .tournaments
                .get_mut(&p.tournament_id)
                .ok_or_else(|| StoreError::NotFound(format!("tournament {}", p.tournament_id)))?;
            records.participants.insert(p.player_id, p);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::models::{BracketFormat, TournamentStatus};
    use chrono::Utc;

    fn tournament() -> Tournament {
        Tournament {
            id: 0,
            format: BracketFormat::SingleElimination,
            participant_count: 4,
            status: TournamentStatus::InProgress,
            champion: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_ascending_ids() {
        let store = MemoryStore::new();
        let first = store.insert_tournament(&tournament()).await.unwrap();
        let second = store.insert_tournament(&tournament()).await.unwrap();
        assert!(second > first);

        let fetched = store.tournament(first).await.unwrap().unwrap();
        assert_eq!(fetched.id, first);
    }

    #[tokio::test]
    async fn test_missing_tournament_reads_empty() {
        let store = MemoryStore::new();
        assert!(store.tournament(42).await.unwrap().is_none());
        assert!(store.matches_for_tournament(42).await.unwrap().is_empty());
        assert!(
            store
                .participants_for_tournament(42)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_commit_updates_tournament() {
        let store = MemoryStore::new();
        let id = store.insert_tournament(&tournament()).await.unwrap();

        let mut updated = store.tournament(id).await.unwrap().unwrap();
        updated.status = TournamentStatus::Completed;
        updated.champion = Some(7);
        store
            .commit(ChangeSet {
                tournament: Some(updated),
                ..ChangeSet::default()
            })
            .await
            .unwrap();

        let fetched = store.tournament(id).await.unwrap().unwrap();
        assert_eq!(fetched.status, TournamentStatus::Completed);
        assert_eq!(fetched.champion, Some(7));
    }

    #[tokio::test]
    async fn test_commit_against_unknown_tournament_fails() {
        let store = MemoryStore::new();
        let mut t = tournament();
        t.id = 999;
        let err = store
            .commit(ChangeSet {
                tournament: Some(t),
                ..ChangeSet::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
