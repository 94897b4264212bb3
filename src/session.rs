/// Session controller: menu → playing → game-over, plus the commander panel.

use rand::Rng;
use tracing::info;

use crate::commander::{CommanderPanel, CommanderUpdate, Ticket, LAUNCH_MESSAGE};
use crate::compute::{init_state, tick};
use crate::entities::{GameEvent, GameState, GameStatus};
use crate::input::HeldKeys;

#[derive(Debug)]
pub struct Session {
    pub game: GameState,
    pub commander: CommanderPanel,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            game: init_state(GameStatus::Menu),
            commander: CommanderPanel::default(),
        }
    }

    pub fn status(&self) -> GameStatus {
        self.game.status
    }

    pub fn level(&self) -> u32 {
        self.game.level
    }

    /// Menu → playing.  Ignored in any other state.
    pub fn start(&mut self) -> bool {
        if self.game.status != GameStatus::Menu {
            return false;
        }
        self.launch();
        true
    }

    /// Game-over → playing with every entity and counter reset.  Ignored
    /// in any other state.
    pub fn restart(&mut self) -> bool {
        if self.game.status != GameStatus::GameOver {
            return false;
        }
        self.launch();
        true
    }

    fn launch(&mut self) {
        self.game = init_state(GameStatus::Playing);
        self.commander.announce(LAUNCH_MESSAGE);
        info!("mission launched");
    }

    /// Run one simulation tick.  Returns the events to forward to the
    /// commander, each paired with its ticket; the panel is already in
    /// `Thinking` for them.
    pub fn advance(
        &mut self,
        held: &HeldKeys,
        now_ms: u64,
        rng: &mut impl Rng,
    ) -> Vec<(Ticket, GameEvent)> {
        tick(&mut self.game, held, now_ms, rng)
            .into_iter()
            .map(|event| (self.commander.begin(), event))
            .collect()
    }

    pub fn apply(&mut self, update: CommanderUpdate) {
        self.commander.apply(update);
    }
}
