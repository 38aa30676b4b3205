// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt templates for LLM-backed extraction.

const TOPIC_PROMPT: &str = r#"Extract the topic {count} topics from the following text:
{text}

Return a list of topics in JSON format, for example:
{
    "topics": ["topic1", "topic2", "topic3"]
}"#;

const DISCRETE_EXTRACTION_PROMPT: &str = r#"You are a long-memory manager. Your job is to analyze text and extract
information that might be useful in future conversations with users.

Extract two types of memories:
1. EPISODIC: Personal experiences specific to a user or agent.
   Example: "User prefers window seats" or "User had a bad experience in Paris"

2. SEMANTIC: User preferences and general knowledge outside of your training data.
   Example: "Trek discontinued the Trek 520 steel touring bike in 2023"

For each memory, return a JSON object with the following fields:
- type: str -- The memory type, either "episodic" or "semantic"
- text: str -- The actual information to store
- topics: list[str] -- The topics of the memory (top {top_k_topics})
- entities: list[str] -- The entities of the memory

Return a list of memories, for example:
{
    "memories": [
        {
            "type": "semantic",
            "text": "User prefers window seats",
            "topics": ["travel", "airline"],
            "entities": ["User", "window seat"]
        },
        {
            "type": "episodic",
            "text": "Trek discontinued the Trek 520 steel touring bike in 2023",
            "topics": ["travel", "bicycle"],
            "entities": ["Trek", "Trek 520 steel touring bike"]
        }
    ]
}

IMPORTANT RULES:
1. Only extract information that would be genuinely useful for future interactions.
2. Do not extract procedural knowledge - that is handled by the system's built-in tools and prompts.
3. You are a large language model - do not extract facts that you already know.

Message:
{message}

Extracted memories:"#;

/// Prompt asking for `count` topics as `{"topics": [...]}`.
pub fn topic_prompt(text: &str, count: usize) -> String {
    TOPIC_PROMPT
        .replace("{count}", &count.to_string())
        .replace("{text}", text)
}

/// Prompt asking for episodic and semantic memories in `message`.
pub fn discrete_extraction_prompt(message: &str, top_k_topics: usize) -> String {
    DISCRETE_EXTRACTION_PROMPT
        .replace("{top_k_topics}", &top_k_topics.to_string())
        .replace("{message}", message)
}
