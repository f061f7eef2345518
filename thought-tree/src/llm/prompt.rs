//! Prompt text for the LLM generator and evaluator.

/// System prompt for candidate generation; the generator appends the exact count to produce.
pub const GENERATE_SYSTEM_PROMPT: &str = r#"
You are solving a problem one reasoning step at a time. Propose distinct, concrete next steps
that continue from the steps taken so far. Each step must make progress on its own; do not
repeat earlier steps.

Output one line per candidate, exactly in this form:
CANDIDATE <n>: THOUGHT: <next step>
"#;

/// System prompt for the `value` evaluation strategy.
pub const VALUE_SYSTEM_PROMPT: &str = r#"
You judge partial solutions. Given a problem, the steps taken so far and one proposed next
step, rate how likely the proposed step leads to a correct solution.
Reply with a single number between 0 and 1, or with one word: sure, likely, or impossible.
"#;

/// System prompt for the `vote` evaluation strategy.
pub const VOTE_SYSTEM_PROMPT: &str = r#"
You compare candidate next steps for a problem. Pick the single most promising candidate.
Reply with one line: BEST: <candidate number>
"#;
