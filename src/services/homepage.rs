//! Homepage service — named widget sets and the default-homepage rule.
//!
//! DESIGN
//! ======
//! Exactly one homepage is the default while any exist. Every operation that
//! could break that (create with `is_default`, set default, delete) fixes it
//! up inside the same storage transaction.

use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::homepage::{Homepage, NewHomepage};
use crate::state::AppState;
use crate::storage::{StorageData, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum HomepageError {
    #[error("homepage not found: {0}")]
    NotFound(Uuid),
    #[error("cannot delete the last homepage")]
    LastHomepage,
    #[error("homepage name must not be empty")]
    EmptyName,
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// List homepages in creation order.
///
/// # Errors
///
/// Infallible today; kept fallible to match the other service calls.
pub async fn list_homepages(state: &AppState) -> Result<Vec<Homepage>, HomepageError> {
    let store = state.store.read().await;
    let mut homepages = store.data().homepages.clone();
    homepages.sort_by_key(|hp| hp.created_at);
    Ok(homepages)
}

/// Fetch one homepage by id.
///
/// # Errors
///
/// Returns `NotFound` if no homepage has that id.
pub async fn get_homepage(state: &AppState, homepage_id: Uuid) -> Result<Homepage, HomepageError> {
    let store = state.store.read().await;
    store
        .data()
        .homepages
        .iter()
        .find(|hp| hp.id == homepage_id)
        .cloned()
        .ok_or(HomepageError::NotFound(homepage_id))
}

/// Create a homepage. The first homepage is always the default; otherwise
/// `is_default` demotes the current default.
///
/// # Errors
///
/// Returns `EmptyName` or a storage error.
pub async fn create_homepage(state: &AppState, request: NewHomepage) -> Result<Homepage, HomepageError> {
    let name = normalize_name(&request.name)?;
    let mut store = state.store.write().await;
    let homepage = store.transact(|data| {
        let is_default = request.is_default || data.homepages.is_empty();
        let homepage = Homepage::new(&name, is_default);
        if is_default {
            demote_all(data);
        }
        data.homepages.push(homepage.clone());
        Ok::<_, HomepageError>(homepage)
    })?;

    info!(homepage_id = %homepage.id, name = %homepage.name, is_default = homepage.is_default, "created homepage");
    Ok(homepage)
}

/// Rename a homepage.
///
/// # Errors
///
/// Returns `NotFound`, `EmptyName`, or a storage error.
pub async fn rename_homepage(state: &AppState, homepage_id: Uuid, name: &str) -> Result<Homepage, HomepageError> {
    let name = normalize_name(name)?;
    let mut store = state.store.write().await;
    let homepage = store.transact(|data| {
        let homepage = find_mut(data, homepage_id)?;
        homepage.name = name;
        homepage.updated_at = OffsetDateTime::now_utc();
        Ok::<_, HomepageError>(homepage.clone())
    })?;

    info!(%homepage_id, name = %homepage.name, "renamed homepage");
    Ok(homepage)
}

/// Make a homepage the default, demoting the previous one.
///
/// # Errors
///
/// Returns `NotFound` or a storage error.
pub async fn set_default_homepage(state: &AppState, homepage_id: Uuid) -> Result<Homepage, HomepageError> {
    let mut store = state.store.write().await;
    let homepage = store.transact(|data| {
        find_mut(data, homepage_id)?;
        let now = OffsetDateTime::now_utc();
        for hp in &mut data.homepages {
            let is_default = hp.id == homepage_id;
            if hp.is_default != is_default {
                hp.is_default = is_default;
                hp.updated_at = now;
            }
        }
        Ok::<_, HomepageError>(find_mut(data, homepage_id)?.clone())
    })?;

    info!(%homepage_id, "set default homepage");
    Ok(homepage)
}

/// Delete a homepage and its widgets. Deleting the default promotes the
/// oldest remaining homepage.
///
/// # Errors
///
/// Returns `NotFound`, `LastHomepage`, or a storage error.
pub async fn delete_homepage(state: &AppState, homepage_id: Uuid) -> Result<(), HomepageError> {
    let mut store = state.store.write().await;
    let removed_widgets = store.transact(|data| {
        let index = data
            .homepages
            .iter()
            .position(|hp| hp.id == homepage_id)
            .ok_or(HomepageError::NotFound(homepage_id))?;
        if data.homepages.len() == 1 {
            return Err(HomepageError::LastHomepage);
        }

        let removed = data.homepages.remove(index);
        let before = data.widgets.len();
        data.widgets.retain(|w| w.homepage_id != homepage_id);

        if removed.is_default
            && let Some(oldest) = data.homepages.iter_mut().min_by_key(|hp| hp.created_at)
        {
            oldest.is_default = true;
            oldest.updated_at = OffsetDateTime::now_utc();
        }
        Ok(before - data.widgets.len())
    })?;

    info!(%homepage_id, removed_widgets, "deleted homepage");
    Ok(())
}

fn normalize_name(name: &str) -> Result<String, HomepageError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(HomepageError::EmptyName);
    }
    Ok(trimmed.to_owned())
}

fn find_mut(data: &mut StorageData, homepage_id: Uuid) -> Result<&mut Homepage, HomepageError> {
    data.homepages
        .iter_mut()
        .find(|hp| hp.id == homepage_id)
        .ok_or(HomepageError::NotFound(homepage_id))
}

fn demote_all(data: &mut StorageData) {
    let now = OffsetDateTime::now_utc();
    for hp in data.homepages.iter_mut().filter(|hp| hp.is_default) {
        hp.is_default = false;
        hp.updated_at = now;
    }
}

#[cfg(test)]
#[path = "homepage_test.rs"]
mod tests;
