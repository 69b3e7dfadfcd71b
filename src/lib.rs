pub mod agent;
pub mod cards;
pub mod error;
pub mod evaluator;
pub mod game;
pub mod policy;
pub mod preflop;
pub mod web;

pub use agent::{Agent, AgentConfig, DecisionRequest};
pub use error::EngineError;
pub use evaluator::{HandCategory, HandStrength, KickerMode};
pub use game::{ActionKind, Decision};
