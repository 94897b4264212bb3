/// The AI commander: panel state plus the dispatcher that fetches its lines.
///
/// The frame loop never waits on the advice service.  Each forwarded event
/// gets its own async task which reports back through a channel; the frame
/// driver drains that channel once per frame and applies the updates to the
/// panel.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::advisor::{get_advice, Advisor};
use crate::entities::{CommanderStatus, GameEvent};

/// How long a delivered line stays in the `Talking` state.
pub const TALK_DURATION: Duration = Duration::from_secs(4);

pub const STANDBY_MESSAGE: &str = "Standing by. Press ENTER when ready for combat.";
pub const LAUNCH_MESSAGE: &str = "Systems green. Good hunting, pilot.";

/// Identifies which forwarded event a commander update belongs to.
pub type Ticket = u64;

#[derive(Clone, Debug, PartialEq)]
pub enum CommanderUpdate {
    /// The advice for `ticket` arrived.
    Spoke { ticket: Ticket, text: String },
    /// The talk interval for `ticket` elapsed.
    Expired { ticket: Ticket },
}

/// What the commander panel shows.
#[derive(Clone, Debug, PartialEq)]
pub struct CommanderPanel {
    pub message: String,
    pub status: CommanderStatus,
    latest: Ticket,
}

impl Default for CommanderPanel {
    fn default() -> Self {
        Self {
            message: STANDBY_MESSAGE.to_string(),
            status: CommanderStatus::Idle,
            latest: 0,
        }
    }
}

impl CommanderPanel {
    /// An event was forwarded to the advice service.
    pub fn begin(&mut self) -> Ticket {
        self.latest += 1;
        self.status = CommanderStatus::Thinking;
        self.latest
    }

    /// Show a line directly without consulting the service.
    pub fn announce(&mut self, text: &str) {
        self.message = text.to_string();
        self.status = CommanderStatus::Talking;
    }

    pub fn apply(&mut self, update: CommanderUpdate) {
        match update {
            // Last completion wins, regardless of ticket order.
            CommanderUpdate::Spoke { text, .. } => {
                self.message = text;
                self.status = CommanderStatus::Talking;
            }
            CommanderUpdate::Expired { ticket } => {
                if ticket == self.latest && self.status == CommanderStatus::Talking {
                    self.status = CommanderStatus::Idle;
                }
            }
        }
    }
}

/// Runs one advice task per event on a Tokio runtime.
pub struct Dispatcher<A> {
    advisor: Arc<A>,
    runtime: Handle,
    tx: UnboundedSender<CommanderUpdate>,
    talk_duration: Duration,
}

impl<A: Advisor> Dispatcher<A> {
    /// Returns the dispatcher and the receiving end the frame driver drains.
    pub fn new(advisor: A, runtime: Handle) -> (Self, UnboundedReceiver<CommanderUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            advisor: Arc::new(advisor),
            runtime,
            tx,
            talk_duration: TALK_DURATION,
        };
        (dispatcher, rx)
    }

    pub fn with_talk_duration(mut self, talk_duration: Duration) -> Self {
        self.talk_duration = talk_duration;
        self
    }

    /// Fire-and-forget: fetch advice for `event`, then schedule the status
    /// reset.  In-flight tasks are never cancelled.
    pub fn dispatch(&self, ticket: Ticket, event: &GameEvent) {
        let advisor = Arc::clone(&self.advisor);
        let tx = self.tx.clone();
        let talk_duration = self.talk_duration;
        let description = event.description();
        let (score, health) = (event.score(), event.health());

        info!(ticket, event = %description, score, health, "forwarding event to commander");
        self.runtime.spawn(async move {
            let text = get_advice(advisor.as_ref(), &description, score, health).await;
            if tx.send(CommanderUpdate::Spoke { ticket, text }).is_err() {
                return; // frame driver gone
            }
            tokio::time::sleep(talk_duration).await;
            if tx.send(CommanderUpdate::Expired { ticket }).is_err() {
                debug!(ticket, "commander channel closed before expiry");
            }
        });
    }
}
