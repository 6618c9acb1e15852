//! LinkedIn reply drafting.
//!
//! [`llm::build_prompt`] turns a post and a reply preset into a deterministic
//! prompt; [`llm::LlmClient`] sends it to the provider selected from
//! configuration and normalises the outcome into an [`llm::LlmResult`].

pub mod cli;
pub mod llm;
pub mod reply;
