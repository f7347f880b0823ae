//! In-memory catalog for testing
//!
//! Implements both repository traits over plain maps so handlers can be tested
//! without a database. Filtering, ordering and paging follow the Postgres queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use vidcat_core::models::{
    FormatCode, NewVideo, Page, PageRequest, UserSummary, Video, VideoChanges, VideoDetails,
    VideoFilter, VideoFormat,
};
use vidcat_core::AppError;

use crate::traits::{UserDirectory, VideoRepository};

#[derive(Default)]
struct State {
    users: HashMap<i64, UserSummary>,
    videos: BTreeMap<i64, Video>,
    formats: HashMap<i64, Vec<VideoFormat>>,
    next_video_id: i64,
    next_format_id: i64,
    fail_writes: bool,
}

/// Mock catalog for testing without database
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<Mutex<State>>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn term(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn matches(filter: &VideoFilter, video: &Video, owner: &UserSummary) -> bool {
    if let Some(duration) = term(&filter.duration) {
        if !video.duration.to_string().contains(duration) {
            return false;
        }
    }
    if let Some(name) = term(&filter.name) {
        if !contains_ci(&video.name, name) {
            return false;
        }
    }
    if let Some(user) = term(&filter.user) {
        if !(contains_ci(&owner.username, user) || owner.id.to_string().contains(user)) {
            return false;
        }
    }
    if let Some(user_id) = filter.user_id {
        if video.user_id != user_id {
            return false;
        }
    }
    true
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a user as the identity provider would
    pub fn add_user(&self, id: i64, username: &str) -> UserSummary {
        let user = UserSummary {
            id,
            username: username.to_string(),
            pseudo: Some(format!("{} pseudo", username)),
            created_at: Utc::now(),
        };
        self.lock().users.insert(id, user.clone());
        user
    }

    /// Make every subsequent write fail with a database error
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    pub fn video_count(&self) -> usize {
        self.lock().videos.len()
    }

    pub fn format_rows(&self, video_id: i64) -> Vec<VideoFormat> {
        self.lock()
            .formats
            .get(&video_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn raw_video(&self, id: i64) -> Option<Video> {
        self.lock().videos.get(&id).cloned()
    }

    fn check_writable(state: &State) -> Result<(), AppError> {
        if state.fail_writes {
            return Err(AppError::Internal("simulated database failure".to_string()));
        }
        Ok(())
    }

    fn details(state: &State, id: i64) -> Result<Option<VideoDetails>, AppError> {
        let Some(video) = state.videos.get(&id) else {
            return Ok(None);
        };
        let owner = state.users.get(&video.user_id).cloned().ok_or_else(|| {
            AppError::Internal(format!("owner {} of video {} missing", video.user_id, id))
        })?;
        Ok(Some(VideoDetails {
            video: video.clone(),
            owner,
            formats: state.formats.get(&id).cloned().unwrap_or_default(),
        }))
    }

    fn touch(now: DateTime<Utc>, video: &mut Video) {
        video.updated_at = now;
    }
}

#[async_trait]
impl VideoRepository for InMemoryCatalog {
    async fn create(&self, new: NewVideo) -> Result<VideoDetails, AppError> {
        let mut state = self.lock();
        Self::check_writable(&state)?;

        if !state.users.contains_key(&new.user_id) {
            return Err(AppError::Internal(format!(
                "foreign key violation: user {} does not exist",
                new.user_id
            )));
        }
        if state.videos.values().any(|v| v.source == new.source) {
            return Err(AppError::Internal(format!(
                "unique violation: source {} already recorded",
                new.source
            )));
        }

        state.next_video_id += 1;
        let id = state.next_video_id;
        let now = Utc::now();

        let video = Video {
            id,
            name: new.name,
            duration: new.duration,
            source: new.source,
            user_id: new.user_id,
            enabled: false,
            created_at: now,
            updated_at: now,
        };

        let mut formats = Vec::with_capacity(FormatCode::ALL.len());
        for code in FormatCode::ALL {
            state.next_format_id += 1;
            formats.push(VideoFormat {
                id: state.next_format_id,
                code,
                uri: None,
                video_id: id,
            });
        }

        state.videos.insert(id, video);
        state.formats.insert(id, formats);

        Self::details(&state, id)?
            .ok_or_else(|| AppError::Internal(format!("video {} vanished after insert", id)))
    }

    async fn get(&self, id: i64) -> Result<Option<VideoDetails>, AppError> {
        let state = self.lock();
        Self::details(&state, id)
    }

    async fn list(
        &self,
        filter: &VideoFilter,
        page: PageRequest,
    ) -> Result<Page<VideoDetails>, AppError> {
        let state = self.lock();

        let mut matching = Vec::new();
        for id in state.videos.keys() {
            if let Some(details) = Self::details(&state, *id)? {
                if matches(filter, &details.video, &details.owner) {
                    matching.push(details);
                }
            }
        }

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page() as usize)
            .collect();

        Ok(Page::new(items, page, total))
    }

    async fn record_encoding(
        &self,
        id: i64,
        code: FormatCode,
        uri: &str,
    ) -> Result<Option<VideoDetails>, AppError> {
        let mut state = self.lock();
        Self::check_writable(&state)?;

        let now = Utc::now();
        let Some(video) = state.videos.get_mut(&id) else {
            return Ok(None);
        };
        video.enabled = true;
        Self::touch(now, video);

        if let Some(format) = state
            .formats
            .get_mut(&id)
            .and_then(|formats| formats.iter_mut().find(|f| f.code == code))
        {
            format.uri = Some(uri.to_string());
        }

        Self::details(&state, id)
    }

    async fn update(
        &self,
        id: i64,
        changes: VideoChanges,
    ) -> Result<Option<VideoDetails>, AppError> {
        let mut state = self.lock();
        Self::check_writable(&state)?;

        if !state.users.contains_key(&changes.user_id) {
            return Err(AppError::Internal(format!(
                "foreign key violation: user {} does not exist",
                changes.user_id
            )));
        }

        let now = Utc::now();
        let Some(video) = state.videos.get_mut(&id) else {
            return Ok(None);
        };
        video.name = changes.name;
        video.source = changes.source;
        video.user_id = changes.user_id;
        Self::touch(now, video);

        Self::details(&state, id)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut state = self.lock();
        Self::check_writable(&state)?;

        let removed = state.videos.remove(&id).is_some();
        state.formats.remove(&id);
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryCatalog {
    async fn get_user(&self, id: i64) -> Result<Option<UserSummary>, AppError> {
        Ok(self.lock().users.get(&id).cloned())
    }
}
