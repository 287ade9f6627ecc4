//! In-memory preview sessions.
//!
//! Each session owns the resume being edited and a [`Paginator`] holding the
//! last good page sequence. Every data edit bumps the session revision and
//! triggers an estimated pass on a blocking thread. Client-measured snapshots
//! (`layout_stable`) replace whatever the last pass produced. Both advance the
//! session's pass sequence, and an estimated pass is installed only if the
//! sequence has not moved while it ran.
//!
//! Sessions that see no edits or layout signals for the idle TTL are swept,
//! and the store never holds more than `max_sessions` at once.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, Level};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{ResumeData, Template};
use crate::pagination::{LayoutSnapshot, PageGeometry, Paginator, PassOutcome};
use crate::preview::builder::build_preview;

/// Where the heights behind the current pages came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightSource {
    Estimated,
    Measured,
}

#[derive(Debug, Clone)]
pub struct PreviewSession {
    pub id: Uuid,
    pub template: Template,
    pub resume: ResumeData,
    pub paginator: Paginator,
    pub height_source: HeightSource,
    /// Bumped on every data edit.
    pub revision: u64,
    /// Bumped on every data edit and every layout signal.
    pass_seq: u64,
    /// Eviction clock. Runtime time, so paused-clock tests can drive it.
    last_active: Instant,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PreviewSession {
    fn touch(&mut self) {
        self.last_active = Instant::now();
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
    pub idle_ttl: Duration,
    pub max_sessions: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            idle_ttl: Duration::from_secs(60 * 60),
            max_sessions: 1000,
        }
    }
}

#[derive(Clone, Default)]
pub struct PreviewStore {
    sessions: Arc<RwLock<HashMap<Uuid, PreviewSession>>>,
    geometry: PageGeometry,
    limits: SessionLimits,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Preview session {id} not found"))
}

impl PreviewStore {
    pub fn new(geometry: PageGeometry, limits: SessionLimits) -> Self {
        Self {
            sessions: Arc::default(),
            geometry,
            limits,
        }
    }

    /// Opens a session and runs its first pass. Evicts the least recently
    /// active sessions first when the store is full.
    pub async fn create(&self, resume: ResumeData, template: Template) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let session = PreviewSession {
            id,
            template,
            resume,
            paginator: Paginator::new(self.geometry),
            height_source: HeightSource::Estimated,
            revision: 0,
            pass_seq: 0,
            last_active: Instant::now(),
            created_at: now,
            updated_at: now,
        };
        {
            let mut sessions = self.sessions.write().await;
            let max = self.limits.max_sessions.max(1);
            while sessions.len() >= max {
                let Some(oldest) = sessions
                    .values()
                    .min_by_key(|s| s.last_active)
                    .map(|s| s.id)
                else {
                    break;
                };
                sessions.remove(&oldest);
                info!(session = %oldest, "Preview session evicted, store full");
            }
            sessions.insert(id, session);
        }
        info!(session = %id, ?template, "Preview session created");

        self.repaginate(id).await?;
        Ok(id)
    }

    pub async fn get(&self, id: Uuid) -> Result<PreviewSession, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| info!(session = %id, "Preview session closed"))
            .ok_or_else(|| not_found(id))
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every session idle for at least the TTL. Returns how many went.
    pub async fn evict_idle(&self) -> usize {
        let ttl = self.limits.idle_ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.last_active.elapsed() < ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "Idle preview sessions swept");
        }
        evicted
    }

    /// Runs [`Self::evict_idle`] every `period` until the runtime shuts down.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                store.evict_idle().await;
            }
        })
    }

    /// Applies `edit` to the session's resume, then re-paginates.
    ///
    /// A failed edit leaves the resume and pages untouched.
    pub async fn edit<R>(
        &self,
        id: Uuid,
        edit: impl FnOnce(&mut ResumeData) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let result = {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
            let mut resume = session.resume.clone();
            let result = edit(&mut resume)?;
            session.resume = resume;
            session.revision += 1;
            session.pass_seq += 1;
            session.touch();
            result
        };

        self.repaginate(id).await?;
        Ok(result)
    }

    /// Runs an estimated pass over the session's current resume.
    pub async fn repaginate(&self, id: Uuid) -> Result<PassOutcome, AppError> {
        let (resume, mut paginator, seq) = {
            let sessions = self.sessions.read().await;
            let session = sessions.get(&id).ok_or_else(|| not_found(id))?;
            (
                session.resume.clone(),
                session.paginator.clone(),
                session.pass_seq,
            )
        };

        // Estimation is CPU-bound.
        let (paginator, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = paginator.layout_stable(build_preview(&resume));
            (paginator, outcome)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in pagination: {e}")))?;

        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        if session.pass_seq == seq {
            session.paginator = paginator;
            session.height_source = HeightSource::Estimated;
        } else {
            debug!(session = %id, seq, current = session.pass_seq, "Discarding superseded pass");
        }
        Ok(outcome)
    }

    /// The renderer's "layout is stable, measure now" signal.
    ///
    /// The snapshot's markup becomes the paginated document as-is; it is the
    /// renderer's view of the session's resume.
    pub async fn layout_stable(
        &self,
        id: Uuid,
        snapshot: LayoutSnapshot,
    ) -> Result<PassOutcome, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;

        let reported = snapshot.main.as_ref().map(|m| m.blocks.len());
        if let Some(reported) = reported.filter(|_| tracing::enabled!(Level::DEBUG)) {
            let expected = build_preview(&session.resume)
                .main
                .map_or(0, |m| m.blocks.len());
            if reported != expected {
                debug!(
                    session = %id,
                    reported,
                    expected,
                    "Layout snapshot block count differs from the stored resume"
                );
            }
        }

        let outcome = session.paginator.layout_stable(snapshot);
        if matches!(outcome, PassOutcome::Paginated { .. }) {
            session.height_source = HeightSource::Measured;
        }
        session.pass_seq += 1;
        session.touch();
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_resume, SectionKey};
    use crate::pagination::session::Anchor;

    #[tokio::test]
    async fn test_create_runs_first_pass() {
        let store = PreviewStore::default();
        let id = store.create(sample_resume(), Template::OnCampus).await.unwrap();
        let session = store.get(id).await.unwrap();
        assert_eq!(session.paginator.generation(), 1);
        assert!(session.paginator.view().unwrap().pages.len() >= 2);
        assert_eq!(session.height_source, HeightSource::Estimated);
    }

    #[tokio::test]
    async fn test_empty_resume_yields_zero_pages() {
        let store = PreviewStore::default();
        let id = store.create(ResumeData::default(), Template::OnCampus).await.unwrap();
        let session = store.get(id).await.unwrap();
        assert!(session.paginator.view().unwrap().pages.is_empty());
    }

    #[tokio::test]
    async fn test_edit_bumps_revision_and_repaginates() {
        let store = PreviewStore::default();
        let id = store.create(sample_resume(), Template::OnCampus).await.unwrap();
        let before = store.get(id).await.unwrap();

        store
            .edit(id, |resume| {
                resume.projects.clear();
                resume.internships.clear();
                Ok(())
            })
            .await
            .unwrap();

        let after = store.get(id).await.unwrap();
        assert_eq!(after.revision, before.revision + 1);
        assert_eq!(after.paginator.generation(), 2);
        assert!(
            after.paginator.view().unwrap().pages.len()
                <= before.paginator.view().unwrap().pages.len()
        );
    }

    #[tokio::test]
    async fn test_failed_edit_leaves_session_untouched() {
        let store = PreviewStore::default();
        let id = store.create(sample_resume(), Template::OnCampus).await.unwrap();

        let err = store
            .edit(id, |resume| {
                resume.projects.clear();
                resume.remove_entry(SectionKey::Projects, "missing")?;
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let session = store.get(id).await.unwrap();
        assert_eq!(session.resume.projects.len(), 3);
        assert_eq!(session.revision, 0);
    }

    #[tokio::test]
    async fn test_measured_snapshot_replaces_estimate() {
        let store = PreviewStore::default();
        let id = store.create(sample_resume(), Template::OnCampus).await.unwrap();

        let snapshot = build_preview(&sample_resume());
        let outcome = store.layout_stable(id, snapshot).await.unwrap();
        assert!(matches!(outcome, PassOutcome::Paginated { .. }));
        assert_eq!(store.get(id).await.unwrap().height_source, HeightSource::Measured);
    }

    #[tokio::test]
    async fn test_incomplete_snapshot_marks_pages_stale() {
        let store = PreviewStore::default();
        let id = store.create(sample_resume(), Template::OnCampus).await.unwrap();

        let mut snapshot = build_preview(&sample_resume());
        snapshot.header = None;
        let outcome = store.layout_stable(id, snapshot).await.unwrap();
        assert_eq!(
            outcome,
            PassOutcome::Skipped {
                missing: Anchor::Header
            }
        );

        let session = store.get(id).await.unwrap();
        assert!(session.paginator.is_stale());
        assert!(session.paginator.view().is_some());
        assert_eq!(session.height_source, HeightSource::Estimated);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let store = PreviewStore::default();
        assert!(matches!(
            store.get(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(store.remove(Uuid::new_v4()).await.is_err());
    }

    #[tokio::test]
    async fn test_measured_pass_survives_in_flight_estimate() {
        let store = PreviewStore::default();
        let id = store.create(sample_resume(), Template::OnCampus).await.unwrap();

        let estimate = tokio::spawn({
            let store = store.clone();
            async move { store.repaginate(id).await }
        });
        // Let the estimate reach its blocking section.
        tokio::task::yield_now().await;

        store
            .layout_stable(id, build_preview(&sample_resume()))
            .await
            .unwrap();
        let measured_generation = store.get(id).await.unwrap().paginator.generation();

        estimate.await.unwrap().unwrap();
        let session = store.get(id).await.unwrap();
        assert_eq!(session.height_source, HeightSource::Measured);
        assert_eq!(session.paginator.generation(), measured_generation);
    }

    #[tokio::test]
    async fn test_edit_after_measured_pass_reestimates() {
        let store = PreviewStore::default();
        let id = store.create(sample_resume(), Template::OnCampus).await.unwrap();
        store
            .layout_stable(id, build_preview(&sample_resume()))
            .await
            .unwrap();

        store
            .edit(id, |resume| {
                resume.achievements.clear();
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(store.get(id).await.unwrap().height_source, HeightSource::Estimated);
    }

    #[tokio::test]
    async fn test_snapshot_of_other_content_is_paginated_as_reported() {
        let store = PreviewStore::default();
        let id = store.create(sample_resume(), Template::OnCampus).await.unwrap();

        let mut other = sample_resume();
        other.projects.clear();
        other.internships.clear();
        let snapshot = build_preview(&other);
        let reported = snapshot.main.as_ref().unwrap().blocks.len();

        let outcome = store.layout_stable(id, snapshot).await.unwrap();
        assert!(matches!(outcome, PassOutcome::Paginated { .. }));
        let session = store.get(id).await.unwrap();
        assert_eq!(session.paginator.view().unwrap().document.blocks.len(), reported);
        assert_eq!(session.resume.projects.len(), 3);
    }

    fn limited(idle_ttl: Duration, max_sessions: usize) -> PreviewStore {
        PreviewStore::new(
            PageGeometry::a4(),
            SessionLimits {
                idle_ttl,
                max_sessions,
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_evicted() {
        let store = limited(Duration::from_secs(60), 10);
        let idle = store.create(sample_resume(), Template::OnCampus).await.unwrap();
        tokio::time::advance(Duration::from_secs(45)).await;
        let busy = store.create(sample_resume(), Template::OnCampus).await.unwrap();
        tokio::time::advance(Duration::from_secs(20)).await;

        assert_eq!(store.evict_idle().await, 1);
        assert!(matches!(store.get(idle).await, Err(AppError::NotFound(_))));
        assert!(store.get(busy).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_keep_a_session_alive() {
        let store = limited(Duration::from_secs(60), 10);
        let id = store.create(sample_resume(), Template::OnCampus).await.unwrap();
        tokio::time::advance(Duration::from_secs(50)).await;
        store
            .edit(id, |resume| Ok(resume.set_personal_field("name", "JANE DOE".to_string())?))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(50)).await;

        assert_eq!(store.evict_idle().await, 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_drops_idle_sessions() {
        let store = limited(Duration::from_secs(60), 10);
        store.create(sample_resume(), Template::OnCampus).await.unwrap();
        let sweeper = store.spawn_sweeper(Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(75)).await;
        assert_eq!(store.len().await, 0);
        sweeper.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_store_evicts_least_recently_active() {
        let store = limited(Duration::from_secs(3600), 2);
        let first = store.create(sample_resume(), Template::OnCampus).await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        let second = store.create(sample_resume(), Template::OnCampus).await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        store
            .layout_stable(first, build_preview(&sample_resume()))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;

        let third = store.create(sample_resume(), Template::OnCampus).await.unwrap();
        assert_eq!(store.len().await, 2);
        assert!(store.get(first).await.is_ok());
        assert!(matches!(store.get(second).await, Err(AppError::NotFound(_))));
        assert!(store.get(third).await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_drops_session() {
        let store = PreviewStore::default();
        let id = store.create(sample_resume(), Template::OnCampus).await.unwrap();
        assert_eq!(store.len().await, 1);
        store.remove(id).await.unwrap();
        assert_eq!(store.len().await, 0);
    }
}
