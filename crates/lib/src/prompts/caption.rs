/// The default instruction sent alongside every image.
///
/// It asks for a bare JSON object with a fixed set of keys. Models still wrap
/// the answer in markdown fences often enough that the response is normalized
/// before parsing.
pub const ARCHIVAL_CAPTION_PROMPT: &str = r#"You are describing archival images for a museum collection.
Return ONLY valid JSON in this format:

{
  "filename": "<image filename>",
  "caption": "<a short, natural one-sentence caption>",
  "detailed_description": "<a polished paragraph that provides historical, cultural, or contextual significance without being too literal. Aim for elegant, museum-style writing>",
  "tags": ["keyword1", "keyword2", "keyword3"],
  "contextual_category": "<one broad category (e.g. 'Historical Business Document', 'Postal History', 'Industrial Photography')>",
  "entities": {
    "people": ["list of people if identifiable"],
    "organizations": ["list of organizations mentioned or visible"],
    "locations": ["relevant places mentioned or inferred"],
    "date_estimate": "<approx date in human-readable form>"
  }
}

Guidelines:
- Keep captions short (max 1 sentence).
- Detailed descriptions should enrich context, not just restate what is visible.
- Use neutral, historical, and professional tone (archival/museum style).
- If unsure about details, leave them blank instead of guessing.
- Ensure valid JSON only (no markdown, no comments)."#;
