use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::trace;

/// Networking errors for provider communication
#[derive(Debug, Error)]
pub enum NetworkingError {
    #[error("HTTP client construction failed: {source}")]
    ClientBuildFailed {
        #[from]
        source: reqwest::Error,
    },

    #[error("Task join error: {source}")]
    TaskJoinError {
        #[from]
        source: tokio::task::JoinError,
    },

    #[error("Invalid job count: {count} (must be > 0)")]
    InvalidJobCount { count: u32 },
}

/// Shared client configuration
#[derive(Debug, Clone)]
pub struct NetworkingConfig {
    /// Maximum number of concurrent provider calls (from `--jobs`)
    pub max_jobs: Option<u32>,
    /// HTTP client timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for NetworkingConfig {
    fn default() -> Self {
        Self {
            max_jobs: None,
            timeout_seconds: 15,
        }
    }
}

/// Upper bound on the detected default; providers rate-limit well before this
const MAX_DEFAULT_JOBS: u32 = 4;

/// HTTP client plus the concurrency budget for provider fan-out
pub struct NetworkingManager {
    client: Client,
    jobs: u32,
}

impl NetworkingManager {
    pub fn new(config: NetworkingConfig) -> Result<Self, NetworkingError> {
        trace!("Initializing networking manager");

        let jobs = match config.max_jobs {
            Some(count) => count,
            None => std::thread::available_parallelism()
                .map(|n| n.get() as u32)
                .unwrap_or(1)
                .min(MAX_DEFAULT_JOBS),
        };

        if jobs == 0 {
            return Err(NetworkingError::InvalidJobCount { count: jobs });
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("mediashelf/", env!("CARGO_PKG_VERSION")))
            .build()?;

        trace!("Networking manager initialized with {} concurrent jobs", jobs);

        Ok(Self { client, jobs })
    }

    pub fn jobs(&self) -> u32 {
        self.jobs
    }

    /// Get HTTP client for provider requests
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Run `task` over `inputs` with at most `jobs` in flight
///
/// Results come back in input order regardless of completion order.
pub async fn run_bounded<T, R, F, Fut>(
    jobs: usize,
    inputs: Vec<T>,
    task: F,
) -> Result<Vec<R>, NetworkingError>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let task = Arc::new(task);
    let mut set = JoinSet::new();
    let total = inputs.len();

    for (index, input) in inputs.into_iter().enumerate() {
        let semaphore = semaphore.clone();
        let task = task.clone();

        set.spawn(async move {
            // never closed
            let _permit = semaphore.acquire_owned().await;
            (index, task(input).await)
        });
    }

    let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(total).collect();
    while let Some(joined) = set.join_next().await {
        let (index, output) = joined?;
        slots[index] = Some(output);
    }

    trace!("Completed {} bounded tasks", total);
    Ok(slots.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
