pub mod save_ctx;
pub mod save_flow;

pub use save_ctx::SaveCtx;
pub use save_flow::{QuestionStore, SaveFlow, SaveOutcome, SaveState, SaveTarget};
