// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments appended to those prompts.

/// Output is diffed word by word against the user's resume and shown in a
/// text area, so any wrapper text shows up as a change.
pub const PLAIN_TEXT_ONLY: &str = "Respond with the document text only. \
    Do NOT use markdown code fences. \
    Do NOT add a preamble, commentary or closing remarks.";

/// Guard against invented experience.
pub const FACTS_ONLY: &str = "Never invent employers, titles, dates, degrees, \
    metrics or skills that are not present in the resume.";
