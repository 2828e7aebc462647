pub mod controller;
pub mod interactive;
pub mod simulate;

pub use controller::{AppController, AppState, PlayMode};
pub use interactive::InteractiveMode;
pub use simulate::{GameOutcome, GameRecord, SimulateConfig, SimulateMode, SimulationReport};
