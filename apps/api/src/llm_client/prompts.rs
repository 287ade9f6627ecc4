// Prompt fragments shared by every assistant feature.

/// System prompt for calls whose answer is parsed as JSON.
pub const JSON_ONLY_SYSTEM: &str = "You convert documents into structured data. \
    Reply with a single JSON object and nothing else: \
    no prose before or after it and no code fences.";

/// Guards against the model inventing achievements.
pub const NO_NEW_FACTS_INSTRUCTION: &str = "\
    Do NOT add any information that is not present in the input. \
    No new employers, numbers, tools, dates or outcomes.";
