//! The frame loop. It owns the simulation, adds particles when the spawn chain asks for them,
//! and ticks and renders the whole live set once per frame.

use color_eyre::eyre::Result;
use starfield_protocol::Frame;
use tokio::sync::{broadcast, mpsc};

use crate::config::stars::SimulatorConfig;
use crate::particle::Viewport;
use crate::random::RandomSource;
use crate::run::Protocol;
use crate::simulation::Simulation;
use crate::spawner::{SpawnChain, SpawnEvent};

/// The number of microseconds in a second.
pub const ONE_MICROSECOND: u64 = 1_000_000;

/// How many spawn requests can queue up before the spawn chain has to wait.
const SPAWN_CHANNEL_SIZE: usize = 16;

/// Everything needed to start a field.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Settings {
    /// Validated star settings.
    pub simulator: SimulatorConfig,
    /// The starting size of the viewport. It can be changed later with `Protocol::Resize`.
    pub viewport: Viewport,
    /// Target frames per second.
    pub frame_rate: u32,
}

impl Settings {
    /// Instantiate
    pub const fn new(simulator: SimulatorConfig, viewport: Viewport, frame_rate: u32) -> Self {
        Self {
            simulator,
            viewport,
            frame_rate,
        }
    }
}

/// The frame loop's state: the simulation it owns and where its frames go.
pub struct Field<R> {
    /// All the shooting stars
    simulation: Simulation,
    /// The current size of the viewport
    viewport: Viewport,
    /// Randomness for spawn points and speeds
    random: R,
    /// The target frame rate.
    frame_rate: u32,
    /// The time at which the previous frame was rendererd.
    last_frame_tick: tokio::time::Instant,
    /// The sequence number of the next frame.
    sequence: u64,
    /// A channel to send rendered frames.
    output_channel: mpsc::Sender<Frame>,
}

impl<R: RandomSource + Send + 'static> Field<R> {
    /// Instantiate
    fn new(settings: Settings, random: R, output_channel: mpsc::Sender<Frame>) -> Self {
        Self {
            simulation: Simulation::new(settings.simulator),
            viewport: settings.viewport,
            random,
            frame_rate: settings.frame_rate.max(1),
            last_frame_tick: tokio::time::Instant::now(),
            sequence: 0,
            output_channel,
        }
    }

    /// Start the field and its spawn chain in the background. They run until `Protocol::End` is
    /// broadcast, or until nothing is listening for frames anymore.
    ///
    /// `random` decides where particles spawn and how fast they go, `spawn_random` decides when
    /// they spawn.
    pub fn start<S: RandomSource + Send + 'static>(
        settings: Settings,
        random: R,
        spawn_random: S,
        protocol_tx: &broadcast::Sender<Protocol>,
        output_channel: mpsc::Sender<Frame>,
    ) -> tokio::task::JoinHandle<Result<()>> {
        let protocol = protocol_tx.subscribe();
        let (spawns_tx, spawns_rx) = mpsc::channel(SPAWN_CHANNEL_SIZE);
        let spawn_chain = SpawnChain::start(
            settings.simulator.clone(),
            spawn_random,
            spawns_tx,
            protocol_tx,
        );
        let field = Self::new(settings, random, output_channel);

        tokio::spawn(async move { field.run(protocol, spawns_rx, spawn_chain).await })
    }

    /// Our main loop.
    async fn run(
        mut self,
        mut protocol: broadcast::Receiver<Protocol>,
        mut spawns: mpsc::Receiver<SpawnEvent>,
        spawn_chain: SpawnChain,
    ) -> Result<()> {
        tracing::debug!("Starting field loop with viewport {:?}", self.viewport);

        #[expect(
            clippy::integer_division_remainder_used,
            reason = "This is caused by the `tokio::select!`"
        )]
        loop {
            tokio::select! {
                () = self.sleep_until_next_frame_tick() => {
                    if !self.render().await {
                        break;
                    }
                },
                Some(event) = spawns.recv() => {
                    self.spawn(event);
                },
                result = protocol.recv() => match result {
                    Ok(Protocol::End) | Err(broadcast::error::RecvError::Closed) => break,
                    Ok(message) => self.handle_protocol_message(message),
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        tracing::warn!("Field missed {count} protocol messages");
                    }
                }
            }
        }

        spawn_chain.stop().await?;
        self.simulation.clear();
        tracing::debug!("Field loop finished after {} frames", self.sequence);
        Ok(())
    }

    /// Handle control messages, like resizing.
    fn handle_protocol_message(&mut self, message: Protocol) {
        tracing::trace!("Field received protocol message: {message:?}");

        #[expect(
            clippy::wildcard_enum_match_arm,
            reason = "We're only interested in some messages"
        )]
        match message {
            Protocol::Resize { width, height } => {
                self.viewport = Viewport::new(width.into(), height.into());
            }
            _ => (),
        }
    }

    /// Add a particle somewhere on the edge of the current viewport.
    fn spawn(&mut self, event: SpawnEvent) {
        let particle = self.simulation.spawn(self.viewport, &mut self.random);
        tracing::trace!("Spawn #{} became particle {}", event.sequence, particle.id());
    }

    /// Sleep until the next frame render is due.
    pub async fn sleep_until_next_frame_tick(&mut self) {
        let target = ONE_MICROSECOND.wrapping_div(self.frame_rate.into());
        let target_frame_rate_micro = std::time::Duration::from_micros(target);
        if let Some(wait) = target_frame_rate_micro.checked_sub(self.last_frame_tick.elapsed()) {
            tokio::time::sleep(wait).await;
        }
        self.last_frame_tick = tokio::time::Instant::now();
    }

    /// One frame of the field. Returns `false` when there's nowhere to send frames anymore.
    async fn render(&mut self) -> bool {
        let culled = self.simulation.tick(self.viewport);
        let scene = crate::scene::render(&self.simulation, self.viewport);
        tracing::trace!(
            "Frame {}: {} live, {culled} culled",
            self.sequence,
            scene.stars.len()
        );

        let frame = Frame::builder()
            .sequence(self.sequence)
            .scene(scene)
            .build();
        self.sequence += 1;

        if let Err(error) = self.output_channel.send(frame).await {
            tracing::debug!("Frame receiver has gone, stopping the field: {error}");
            return false;
        }
        true
    }
}
