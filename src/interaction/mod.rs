//! Client-side move interaction.

mod controller;
mod machine;

pub use controller::GameController;
pub use machine::{
    Command, EngineReply, Highlights, InteractionMachine, Notice, Phase, RetryTarget, Ticket,
};
