// Resume tailoring: input validation, prompt templates, completion calls.
// All LLM calls go through llm_client, no direct HTTP calls here.

pub mod form;
pub mod generator;
pub mod handlers;
pub mod prompts;
