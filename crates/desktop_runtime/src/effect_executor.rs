//! Executor for reducer-emitted runtime effects.
//!
//! Persistence effects become fire-and-forget writes on a single-threaded pool; everything else
//! is handed back to the host in order.

use std::{future::Future, rc::Rc};

use futures::{
    executor::LocalPool,
    task::{LocalSpawnExt, SpawnError},
};
use platform_host::{KeyValueStore, StorageError};
use tracing::warn;

use crate::{
    persistence::{load_desktop, persist_desktop_icons, persist_recycle_bin, persist_wallpaper},
    reducer::{reduce_desktop, DesktopAction, DesktopState, ReducerError, RuntimeEffect},
};

pub struct EffectExecutor<S: KeyValueStore + 'static> {
    store: Rc<S>,
    pool: LocalPool,
}

impl<S: KeyValueStore + 'static> EffectExecutor<S> {
    pub fn new(store: Rc<S>) -> Self {
        Self {
            store,
            pool: LocalPool::new(),
        }
    }

    pub fn store(&self) -> &Rc<S> {
        &self.store
    }

    /// Loads persisted desktop state and applies it to `state`.
    pub fn hydrate(&mut self, state: &mut DesktopState) {
        let persisted = self.pool.run_until(load_desktop(self.store.as_ref()));
        if let Err(err) = reduce_desktop(state, DesktopAction::Hydrate(persisted)) {
            warn!(error = %err, "hydration rejected");
        }
    }

    /// Runs `action` through the reducer and executes what it emits.
    ///
    /// # Errors
    ///
    /// Propagates the reducer's error; no effects run in that case.
    pub fn dispatch(
        &mut self,
        state: &mut DesktopState,
        action: DesktopAction,
    ) -> Result<Vec<RuntimeEffect>, ReducerError> {
        let effects = reduce_desktop(state, action)?;
        Ok(self.execute(state, effects))
    }

    /// Spawns a write for each persistence effect and returns the effects the host must run.
    ///
    /// Each persisted value is snapshotted once per batch, so repeated effects collapse.
    pub fn execute(
        &mut self,
        state: &DesktopState,
        effects: Vec<RuntimeEffect>,
    ) -> Vec<RuntimeEffect> {
        let mut host_effects = Vec::new();
        let mut persisted = Vec::new();
        for effect in effects {
            match effect {
                RuntimeEffect::PersistWallpaper
                | RuntimeEffect::PersistDesktopIcons
                | RuntimeEffect::PersistRecycleBin => {
                    if persisted.contains(&effect) {
                        continue;
                    }
                    self.spawn_persist(state, &effect);
                    persisted.push(effect);
                }
                RuntimeEffect::FocusWindowInput(_) => host_effects.push(effect),
            }
        }
        host_effects
    }

    /// Drives pending writes until none can make progress. Hosts call this when idle.
    pub fn run_until_stalled(&mut self) {
        self.pool.run_until_stalled();
    }

    fn spawn_persist(&self, state: &DesktopState, effect: &RuntimeEffect) {
        let store = Rc::clone(&self.store);
        let spawned = match effect {
            RuntimeEffect::PersistWallpaper => {
                let wallpaper = state.wallpaper.clone();
                self.spawn_write("wallpaper", async move {
                    persist_wallpaper(store.as_ref(), &wallpaper).await
                })
            }
            RuntimeEffect::PersistDesktopIcons => {
                let icons = state.icons.icons().to_vec();
                self.spawn_write("desktop icons", async move {
                    persist_desktop_icons(store.as_ref(), &icons).await
                })
            }
            RuntimeEffect::PersistRecycleBin => {
                let recycle_bin = state.recycle_bin.clone();
                self.spawn_write("recycle bin", async move {
                    persist_recycle_bin(store.as_ref(), &recycle_bin).await
                })
            }
            RuntimeEffect::FocusWindowInput(_) => Ok(()),
        };
        if let Err(err) = spawned {
            warn!(?effect, error = %err, "persistence task could not be spawned");
        }
    }

    fn spawn_write<F>(&self, what: &'static str, write: F) -> Result<(), SpawnError>
    where
        F: Future<Output = Result<(), StorageError>> + 'static,
    {
        self.pool.spawner().spawn_local(async move {
            if let Err(err) = write.await {
                warn!(what, error = %err, "persisting desktop state failed");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use platform_host::{FailingKeyValueStore, MemoryKeyValueStore, WallpaperConfig};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        model::{AppType, OpenWindowRequest, WindowId},
        persistence::{DESKTOP_ICONS_KEY, RECYCLE_BIN_KEY, WALLPAPER_KEY},
    };

    #[test]
    fn writes_land_only_after_the_pool_runs() {
        let store = Rc::new(MemoryKeyValueStore::default());
        let mut executor = EffectExecutor::new(Rc::clone(&store));
        let mut state = DesktopState::default();

        executor
            .dispatch(
                &mut state,
                DesktopAction::SetWallpaper {
                    wallpaper: WallpaperConfig::preset("solid-blue"),
                },
            )
            .expect("dispatch");
        assert_eq!(store.raw(WALLPAPER_KEY), None);

        executor.run_until_stalled();
        let saved: WallpaperConfig =
            serde_json::from_str(&store.raw(WALLPAPER_KEY).expect("saved")).expect("decode");
        assert_eq!(saved, WallpaperConfig::preset("solid-blue"));
    }

    #[test]
    fn host_effects_are_returned_in_order() {
        let store = Rc::new(MemoryKeyValueStore::default());
        let mut executor = EffectExecutor::new(store);
        let mut state = DesktopState::default();

        let host = executor
            .dispatch(
                &mut state,
                DesktopAction::OpenWindow(OpenWindowRequest::for_app(AppType::Clock)),
            )
            .expect("dispatch");

        assert_eq!(
            host,
            vec![RuntimeEffect::FocusWindowInput(WindowId::new("clock"))]
        );
    }

    #[test]
    fn delete_persists_icons_and_bin() {
        let store = Rc::new(MemoryKeyValueStore::default());
        let mut executor = EffectExecutor::new(Rc::clone(&store));
        let mut state = DesktopState::default();

        executor
            .dispatch(
                &mut state,
                DesktopAction::DeleteIcon {
                    icon_id: "calculator".to_string(),
                },
            )
            .expect("dispatch");
        executor.run_until_stalled();

        let icons = store.raw(DESKTOP_ICONS_KEY).expect("icons saved");
        assert!(!icons.contains("\"calculator\""));
        let bin = store.raw(RECYCLE_BIN_KEY).expect("bin saved");
        assert!(bin.contains("\"calculator\""));
    }

    #[test]
    fn failed_writes_leave_state_untouched() {
        let mut executor = EffectExecutor::new(Rc::new(FailingKeyValueStore));
        let mut state = DesktopState::default();

        executor
            .dispatch(
                &mut state,
                DesktopAction::SetWallpaper {
                    wallpaper: WallpaperConfig::preset("solid-dark"),
                },
            )
            .expect("dispatch");
        executor.run_until_stalled();

        assert_eq!(state.wallpaper, WallpaperConfig::preset("solid-dark"));
    }

    #[test]
    fn hydrate_reads_back_what_was_written() {
        let store = Rc::new(MemoryKeyValueStore::default());
        let mut executor = EffectExecutor::new(Rc::clone(&store));
        let mut state = DesktopState::default();
        executor
            .dispatch(
                &mut state,
                DesktopAction::DeleteIcon {
                    icon_id: "notepad".to_string(),
                },
            )
            .expect("dispatch");
        executor.run_until_stalled();

        let mut fresh = DesktopState::default();
        executor.hydrate(&mut fresh);

        assert!(fresh.icons.icon("notepad").is_none());
        assert!(fresh.recycle_bin.contains("notepad"));
    }
}
