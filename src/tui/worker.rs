use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

use crate::cache::{CacheGateway, Collection};
use crate::platform;
use crate::service::TaskService;

use super::message::{Command, Message, Operation, Source};

/// Channel carrying background results back to the interaction thread.
pub type MessageSender = UnboundedSender<Message>;

/// Runs controller commands as independent units of work on the tokio
/// blocking pool. Each unit reports back through the message channel.
#[derive(Clone)]
pub struct Worker {
    runtime: Handle,
    service: Arc<dyn TaskService>,
    cache: CacheGateway,
    cache_max_age: Duration,
    sender: MessageSender,
}

impl Worker {
    pub fn new(
        runtime: Handle,
        service: Arc<dyn TaskService>,
        cache: CacheGateway,
        cache_max_age: Duration,
        sender: MessageSender,
    ) -> Self {
        Self {
            runtime,
            service,
            cache,
            cache_max_age,
            sender,
        }
    }

    pub fn dispatch(&self, command: Command) {
        tracing::debug!(?command, "dispatching command");
        match command {
            Command::SeedFromCache { force_remote } => {
                for collection in [Collection::Tasks, Collection::Projects] {
                    self.spawn_seed(collection, force_remote);
                }
            }
            Command::FetchTasks => self.spawn_fetch(Collection::Tasks),
            Command::FetchProjects => self.spawn_fetch(Collection::Projects),
            Command::CreateTask(new_task) => {
                let service = Arc::clone(&self.service);
                self.spawn_unit(move || match service.create_task(&new_task) {
                    Ok(task) => Message::TaskCreated(task),
                    Err(e) => failed(Operation::CreateTask, e),
                });
            }
            Command::CompleteTask(task_id) => {
                let service = Arc::clone(&self.service);
                self.spawn_unit(move || match service.complete_task(&task_id) {
                    Ok(()) => Message::TaskCompleted(task_id),
                    Err(e) => failed(Operation::CompleteTask, e),
                });
            }
            Command::DeleteTask(task_id) => {
                let service = Arc::clone(&self.service);
                self.spawn_unit(move || match service.delete_task(&task_id) {
                    Ok(()) => Message::TaskDeleted(task_id),
                    Err(e) => failed(Operation::DeleteTask, e),
                });
            }
            Command::OpenUrl(url) => {
                self.runtime.spawn_blocking(move || platform::open_url(&url));
            }
        }
    }

    fn spawn_unit<F>(&self, work: F)
    where
        F: FnOnce() -> Message + Send + 'static,
    {
        let sender = self.sender.clone();
        self.runtime.spawn_blocking(move || {
            let message = work();
            if sender.send(message).is_err() {
                tracing::debug!("result dropped, interface already closed");
            }
        });
    }

    fn spawn_fetch(&self, collection: Collection) {
        let service = Arc::clone(&self.service);
        let cache = self.cache.clone();
        self.spawn_unit(move || fetch_and_store(service.as_ref(), &cache, collection));
    }

    /// Read the cached snapshot off-thread, publish it, and follow up with a
    /// remote fetch when the snapshot is stale.
    fn spawn_seed(&self, collection: Collection, force_remote: bool) {
        let worker = self.clone();
        self.runtime.spawn_blocking(move || {
            let seed = seed_from_cache(&worker.cache, collection, worker.cache_max_age, force_remote);
            if let Some(message) = seed.cached {
                if worker.sender.send(message).is_err() {
                    tracing::debug!(%collection, "cached snapshot dropped, interface already closed");
                }
            }
            if seed.needs_fetch {
                worker.spawn_fetch(collection);
            }
        });
    }
}

fn failed(operation: Operation, error: impl std::fmt::Display) -> Message {
    Message::OperationFailed {
        operation,
        error: error.to_string(),
    }
}

/// Outcome of consulting the cache for one collection at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    /// Cached snapshot to show right away, if worth showing.
    pub cached: Option<Message>,
    pub needs_fetch: bool,
}

/// Decide what the cache can contribute for `collection`.
///
/// A fresh snapshot is trusted as is, even when empty. A stale one is still
/// shown while the remote fetch runs, unless it is empty. Cache errors are
/// logged and treated as an empty, stale cache.
pub fn seed_from_cache(
    cache: &CacheGateway,
    collection: Collection,
    max_age: Duration,
    force_remote: bool,
) -> Seed {
    let stale = force_remote || cache.is_stale(collection, max_age);

    let cached = match collection {
        Collection::Tasks => cache.load_tasks().map(|tasks| {
            (!tasks.is_empty() || !stale).then_some(Message::TasksLoaded {
                tasks,
                source: Source::Cache,
            })
        }),
        Collection::Projects => cache.load_projects().map(|projects| {
            (!projects.is_empty() || !stale).then_some(Message::ProjectsLoaded {
                projects,
                source: Source::Cache,
            })
        }),
    };

    match cached {
        Ok(cached) => {
            tracing::debug!(%collection, stale, has_snapshot = cached.is_some(), "seeded from cache");
            Seed {
                cached,
                needs_fetch: stale,
            }
        }
        Err(e) => {
            tracing::warn!(%collection, error = %e, "failed to read cache, fetching remotely");
            Seed {
                cached: None,
                needs_fetch: true,
            }
        }
    }
}

/// Fetch a collection from the service and, on success, replace the cached
/// snapshot before reporting. A failed cache write is logged only.
pub fn fetch_and_store(service: &dyn TaskService, cache: &CacheGateway, collection: Collection) -> Message {
    match collection {
        Collection::Tasks => match service.fetch_todays_tasks() {
            Ok(tasks) => {
                if let Err(e) = cache.save_tasks(&tasks) {
                    tracing::warn!(error = %e, "failed to save tasks to cache");
                }
                Message::TasksLoaded {
                    tasks,
                    source: Source::Remote,
                }
            }
            Err(e) => failed(Operation::FetchTasks, e),
        },
        Collection::Projects => match service.fetch_projects() {
            Ok(projects) => {
                if let Err(e) = cache.save_projects(&projects) {
                    tracing::warn!(error = %e, "failed to save projects to cache");
                }
                Message::ProjectsLoaded {
                    projects,
                    source: Source::Remote,
                }
            }
            Err(e) => failed(Operation::FetchProjects, e),
        },
    }
}
