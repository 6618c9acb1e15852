pub mod config;
pub mod draft;
pub mod presets;
pub mod prompt;

// Re-export handler functions for convenience
pub use config::handle_config_command;
pub use draft::handle_draft_command;
pub use presets::handle_presets_command;
pub use prompt::handle_prompt_command;
