//! Write rendered frames somewhere useful: SVG files in a directory, or JSON lines on a stream.

use color_eyre::eyre::Result;
use starfield_protocol::{Frame, OutputMessages};
use tokio::sync::{broadcast, mpsc};

use crate::run::Protocol;

/// The ways frames can be written.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// One SVG document per frame, written to a directory.
    #[default]
    Svg,
    /// One JSON message per line.
    Json,
}

/// Where the frames end up.
enum Sink {
    /// Numbered SVG files in a directory
    Svg {
        /// The directory the files are written to
        directory: std::path::PathBuf,
    },
    /// A JSON message per line
    Json {
        /// Usually STDOUT
        writer: Box<dyn std::io::Write + Send>,
    },
}

/// Consumes rendered frames and writes them to a sink until told to stop.
pub struct Output {
    /// Where the frames end up.
    sink: Sink,
    /// Stop after this many frames.
    max_frames: Option<u64>,
    /// How many frames have been written so far.
    written: u64,
}

impl Output {
    /// Write frames as SVG files into the given directory, creating it if needed.
    pub fn svg(directory: &std::path::Path, max_frames: Option<u64>) -> Result<Self> {
        std::fs::create_dir_all(directory)?;
        Ok(Self {
            sink: Sink::Svg {
                directory: directory.to_path_buf(),
            },
            max_frames,
            written: 0,
        })
    }

    /// Write frames as JSON lines.
    pub fn json(writer: Box<dyn std::io::Write + Send>, max_frames: Option<u64>) -> Self {
        Self {
            sink: Sink::Json { writer },
            max_frames,
            written: 0,
        }
    }

    /// Instantiate and run. The task resolves to the number of frames that were written.
    pub fn start(
        self,
        frames: mpsc::Receiver<Frame>,
        protocol_tx: &broadcast::Sender<Protocol>,
    ) -> tokio::task::JoinHandle<Result<u64>> {
        let protocol = protocol_tx.subscribe();
        let protocol_tx = protocol_tx.clone();
        tokio::spawn(async move { self.run(frames, protocol, &protocol_tx).await })
    }

    /// Our main loop.
    async fn run(
        mut self,
        mut frames: mpsc::Receiver<Frame>,
        mut protocol: broadcast::Receiver<Protocol>,
        protocol_tx: &broadcast::Sender<Protocol>,
    ) -> Result<u64> {
        tracing::debug!("Starting output loop...");

        #[expect(
            clippy::integer_division_remainder_used,
            reason = "This is caused by the `tokio::select!`"
        )]
        loop {
            tokio::select! {
                maybe_frame = frames.recv() => {
                    let Some(frame) = maybe_frame else {
                        tracing::debug!("Frame sender has gone, leaving output loop");
                        crate::run::broadcast_protocol_end(protocol_tx);
                        break;
                    };
                    self.write_frame(&frame)?;
                    if self.is_complete() {
                        tracing::debug!("Written all {} requested frames", self.written);
                        crate::run::broadcast_protocol_end(protocol_tx);
                        break;
                    }
                },
                result = protocol.recv() => {
                    if matches!(
                        result,
                        Ok(Protocol::End) | Err(broadcast::error::RecvError::Closed)
                    ) {
                        break;
                    }
                }
            }
        }

        self.finish()?;
        Ok(self.written)
    }

    /// Have we written as many frames as were asked for?
    fn is_complete(&self) -> bool {
        self.max_frames.is_some_and(|max| self.written >= max)
    }

    /// Write a single frame.
    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        match &mut self.sink {
            Sink::Svg { directory } => {
                let path = directory.join(frame_file_name(frame.sequence));
                std::fs::write(&path, crate::svg::render(&frame.scene)?)?;
                tracing::trace!("Wrote frame to {path:?}");
            }
            Sink::Json { writer } => {
                write_message(writer, &OutputMessages::Frame(frame.clone()))?;
            }
        }

        self.written += 1;
        Ok(())
    }

    /// Let JSON consumers know that there are no more frames.
    fn finish(&mut self) -> Result<()> {
        if let Sink::Json { writer } = &mut self.sink {
            write_message(
                writer,
                &OutputMessages::Finished {
                    frames: self.written,
                },
            )?;
        }
        Ok(())
    }
}

/// The file name for a frame, padded so that the files sort in order.
pub fn frame_file_name(sequence: u64) -> String {
    format!("frame-{sequence:06}.svg")
}

/// Write one JSON message on its own line.
fn write_message(writer: &mut impl std::io::Write, message: &OutputMessages) -> Result<()> {
    let json = serde_json::to_string(message)?;
    writeln!(writer, "{json}")?;
    writer.flush()?;
    Ok(())
}
