use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant as TokioInstant;
use tracing::{debug, info, warn};
use web_time::Instant;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::{GameController, MoveOutcome};
use crate::types::{GameSnapshot, Position};
use crate::view::{EventSink, GameView, ViewEvent};

/// Forwards view notifications over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelView {
    tx: mpsc::UnboundedSender<ViewEvent>,
}

impl ChannelView {
    pub fn new(tx: mpsc::UnboundedSender<ViewEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelView {
    fn emit(&mut self, event: ViewEvent) {
        // A dropped receiver means nobody renders; play goes on.
        if self.tx.send(event).is_err() {
            debug!("view channel closed, dropping notification");
        }
    }
}

enum Command {
    Submit {
        target: Position,
        reply: oneshot::Sender<Result<MoveOutcome, GameError>>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
    Snapshot {
        reply: oneshot::Sender<GameSnapshot>,
    },
    Shutdown,
}

/// Client side of a running session.
pub struct GameSession<V: GameView> {
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<GameController<V>>,
}

impl GameSession<ChannelView> {
    /// Builds a controller from `config`, starts the game and returns the
    /// session with the stream of view events.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn start(
        config: &GameConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ViewEvent>), GameError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = GameController::new(config, ChannelView::new(tx))?;
        Ok((Self::spawn(controller), rx))
    }
}

impl<V: GameView + Send + 'static> GameSession<V> {
    /// Starts the game on `controller` and moves it into a driver task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn(mut controller: GameController<V>) -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        controller.start_game(now());
        let task = tokio::spawn(run(controller, rx));
        Self { commands, task }
    }

    pub async fn submit_target(&self, target: Position) -> Result<MoveOutcome, GameError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Submit { target, reply })?;
        rx.await.map_err(|_| GameError::SessionClosed)?
    }

    pub async fn reset(&self) -> Result<(), GameError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Reset { reply })?;
        rx.await.map_err(|_| GameError::SessionClosed)
    }

    pub async fn snapshot(&self) -> Result<GameSnapshot, GameError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply })?;
        rx.await.map_err(|_| GameError::SessionClosed)
    }

    /// Stops the driver and hands the controller back.
    pub async fn shutdown(self) -> Result<GameController<V>, GameError> {
        // The task may already be gone; joining reports that.
        let _ = self.commands.send(Command::Shutdown);
        self.task.await.map_err(|_| GameError::SessionClosed)
    }

    fn send(&self, command: Command) -> Result<(), GameError> {
        self.commands
            .send(command)
            .map_err(|_| GameError::SessionClosed)
    }
}

/// Handles each command and each due autoplay move to completion before the
/// next round, so a click that lands during an automated move is checked
/// against the fresh legal set.
async fn run<V: GameView>(
    mut controller: GameController<V>,
    mut commands: mpsc::UnboundedReceiver<Command>,
) -> GameController<V> {
    info!("game session running");

    loop {
        // Re-read every round: a reset or a move drops the old deadline.
        let deadline = controller.next_deadline();

        tokio::select! {
            biased;

            command = commands.recv() => match command {
                Some(Command::Submit { target, reply }) => {
                    let outcome = controller.submit_target(target, now());
                    let _ = reply.send(outcome);
                }
                Some(Command::Reset { reply }) => {
                    controller.reset_game(now());
                    let _ = reply.send(());
                }
                Some(Command::Snapshot { reply }) => {
                    let _ = reply.send(controller.snapshot());
                }
                Some(Command::Shutdown) | None => break,
            },
            _ = sleep_until(deadline) => {
                if let Err(err) = controller.poll(now()) {
                    warn!(%err, "automated move failed");
                }
            }
        }
    }

    info!("game session stopped");
    controller
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(TokioInstant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

/// Current time on tokio's clock, so paused-time tests drive the controller
/// too.
fn now() -> Instant {
    TokioInstant::now().into_std()
}
