//! The spawn chain: a task that asks for a new star, waits a random amount of time, and then does
//! it all again, forever, until it's cancelled.

use color_eyre::eyre::Result;
use tokio::sync::{broadcast, mpsc};

use crate::config::stars::SimulatorConfig;
use crate::random::RandomSource;
use crate::run::Protocol;

/// A request from the spawn chain for one new particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct SpawnEvent {
    /// Counts up from 0 for every request the chain makes.
    pub sequence: u64,
}

/// Draw the time to wait before the next spawn. Delays too long to represent wait forever.
pub fn next_delay(
    config: &SimulatorConfig,
    random: &mut impl RandomSource,
) -> std::time::Duration {
    let milliseconds = random.between(config.min_delay(), config.max_delay());
    std::time::Duration::try_from_secs_f64(milliseconds / 1000.0)
        .unwrap_or(std::time::Duration::MAX)
}

/// A handle to the running spawn chain.
///
/// The chain stops by itself when `Protocol::End` is broadcast or when nothing is listening for
/// spawns anymore. Otherwise it can be stopped with `stop()`, and it's aborted if the handle is
/// dropped, so there's no way for it to outlive its owner.
#[derive(Debug)]
pub struct SpawnChain {
    /// The task running the chain.
    handle: Option<tokio::task::JoinHandle<Result<()>>>,
}

impl SpawnChain {
    /// Start the chain. The first spawn is requested immediately.
    pub fn start<R: RandomSource + Send + 'static>(
        config: SimulatorConfig,
        random: R,
        spawns: mpsc::Sender<SpawnEvent>,
        protocol_tx: &broadcast::Sender<Protocol>,
    ) -> Self {
        let protocol = protocol_tx.subscribe();
        let handle = tokio::spawn(Self::run(config, random, spawns, protocol));
        Self {
            handle: Some(handle),
        }
    }

    /// Cancel the chain and wait for it to finish. No more spawns are requested after this
    /// returns.
    pub async fn stop(mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        handle.abort();
        match handle.await {
            Ok(result) => result,
            Err(error) if error.is_cancelled() => {
                tracing::debug!("Spawn chain cancelled");
                Ok(())
            }
            Err(error) => Err(error.into()),
        }
    }

    /// The chain itself.
    async fn run<R: RandomSource>(
        config: SimulatorConfig,
        mut random: R,
        spawns: mpsc::Sender<SpawnEvent>,
        mut protocol: broadcast::Receiver<Protocol>,
    ) -> Result<()> {
        tracing::debug!("Starting spawn chain...");
        let mut sequence = 0;

        loop {
            if spawns.send(SpawnEvent { sequence }).await.is_err() {
                tracing::debug!("Nothing is listening for spawns, leaving spawn chain");
                break;
            }
            sequence += 1;

            let delay = next_delay(&config, &mut random);
            tracing::trace!("Next spawn in {delay:?}");
            if !Self::wait(delay, &mut protocol).await {
                break;
            }
        }

        tracing::debug!("Spawn chain finished after {sequence} spawns");
        Ok(())
    }

    /// Sleep for the delay. Returns `false` if the chain should end instead.
    async fn wait(
        delay: std::time::Duration,
        protocol: &mut broadcast::Receiver<Protocol>,
    ) -> bool {
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);

        #[expect(
            clippy::integer_division_remainder_used,
            reason = "This is caused by the `tokio::select!`"
        )]
        loop {
            tokio::select! {
                () = &mut sleep => return true,
                result = protocol.recv() => match result {
                    Ok(Protocol::End) | Err(broadcast::error::RecvError::Closed) => return false,
                    Ok(_) => (),
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        tracing::warn!("Spawn chain missed {count} protocol messages");
                    }
                }
            }
        }
    }
}

impl Drop for SpawnChain {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}
