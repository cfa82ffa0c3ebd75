// Cross-cutting prompt fragments shared by every agent.
// Agent-specific wording lives in agents/prompts.rs.

/// Appended to the system prompt of tasks whose answer must be machine-readable.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every system prompt so agents stay on the supplied material.
pub const GROUNDING_INSTRUCTION: &str = "\
    Base your answer only on the resume text, the job title, the research notes \
    and the search results you are given. If something is not supported by them, \
    leave it out instead of guessing.";
