// Prompt templates for the analysis agents.
// Placeholders in braces are filled with str::replace before sending.

/// Agent persona. Replace: {role}, {backstory}, {goal}
pub const AGENT_SYSTEM_TEMPLATE: &str = "You are {role}. {backstory}\nYour personal goal is: {goal}";

/// Added for agents allowed to lean on coworkers. Replace: {coworkers}
pub const COWORKERS_TEMPLATE: &str = "You work in a team with: {coworkers}. \
    Their finished work is included below when it is relevant to your task.";

/// Research task. Replace: {position}
pub const RESEARCH_DESCRIPTION: &str = "For the job position of desire: {position}, research the \
    current market requirements for a person in this job, including the relevant skills, some \
    unique research projects or common projects, and the experience that would be required.";

pub const RESEARCH_EXPECTED_OUTPUT: &str = "A report on the skills required and some unique \
    real-world projects that would enhance a person's chance of getting this job.";

/// SWOT task. Replace: {resume_text}
pub const SWOT_DESCRIPTION: &str = "Resume Content: {resume_text}\n\nAnalyse the resume provided \
    and the report of the Market Research Analyst to provide a detailed SWOT analysis of the \
    resume, along with the resume match percentage and suggestions to improve it.";

pub const SWOT_EXPECTED_OUTPUT: &str = r#"A JSON formatted report as follows: {"candidate": "<candidate full name>", "strengths": ["..."], "weaknesses": ["..."], "opportunities": ["..."], "threats": ["..."], "resume_match_percentage": <integer 0-100>, "suggestions": ["..."]}. List at least 5 points in each SWOT category."#;

/// Dashboard task. Replace: {position}, {resume_text}
pub const DASHBOARD_DESCRIPTION: &str = "Evaluate the resume for the position {position} with \
    content: {resume_text}\n\nGenerate dashboard metrics for it.";

pub const DASHBOARD_EXPECTED_OUTPUT: &str = r#"JSON: {"grammar_score": <int 0-100>, "hiring_probability": <int 0-100>, "skill_coverage": <int 0-100>, "ats_compatibility": <int 0-100>}"#;

/// Search queries issued on behalf of tool-using agents. Replace: {position}
pub const RESEARCH_SEARCH_QUERY: &str = "{position} job requirements skills projects experience";
pub const DASHBOARD_SEARCH_QUERY: &str = "{position} resume ATS keywords";

/// Closing instruction of every task prompt. Replace: {expected_output}
pub const TASK_FOOTER_TEMPLATE: &str = "This is the expected criteria for your final answer: \
    {expected_output}\nYou MUST return the actual complete content as the final answer, not a \
    summary.";

pub const NAME_EXTRACTION_SYSTEM: &str = "You extract personal names from resumes. \
    Reply with the name only, no punctuation or explanation.";

/// Replace: {resume_text}
pub const NAME_EXTRACTION_PROMPT: &str = "Extract the candidate's full name from this resume \
    text, or return 'User' if no name is found: {resume_text}";
