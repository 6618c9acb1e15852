pub mod catalog;
pub mod context;
pub mod preset;
pub mod validation;

pub use catalog::NamedPreset;
pub use context::{PostContext, PriorReply, PromptInput, PromptRequest};
pub use preset::{Intent, ReplyLength, ReplyPreset, Tone};
pub use validation::ValidationError;
