//! LLM prompts for reference extraction.

/// System prompt: what counts as a reference and how to fill each field.
pub const REFERENCE_SYSTEM_PROMPT: &str = r#"You extract bibliographic references from podcast show notes.

Rules:
- Extract only references that are present in the given text. Never invent or complete references from memory.
- A reference is a cited work: a book, paper, article, report, dataset, talk, website or similar.
- title: the title of the work.
- author: the person or institution that authored it.
- publisher: the publisher of the work. If the reference is an online resource, use its domain name (for example "example.com") as the publisher.
- href: the link to the work, only when the text gives one for that reference. Otherwise null.
- Output only the references. If the text cites nothing, return an empty list."#;

/// User prompt template. `{text}` is replaced with the show notes verbatim.
pub const REFERENCE_PROMPT: &str = r#"Extract the bibliographic references from the following text and convert them into the given structure.

Text:
{text}"#;

/// Format the user prompt for one episode description.
pub fn format_reference_prompt(text: &str) -> String {
    REFERENCE_PROMPT.replace("{text}", text)
}
