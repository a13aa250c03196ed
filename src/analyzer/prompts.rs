pub const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are a professional image annotation expert. Analyze images for a searchable catalog and respond only with valid JSON."#;


pub const DEFAULT_ANALYSIS_PROMPT: &str = r#"Analyze this image in detail, focusing on:

1. **Subject features**: gender, age range, expression, hairstyle, clothing style
2. **Pose and action**: body posture (standing, sitting, lying, crouching), gestures, gaze direction
3. **Scene**: indoor/outdoor, specific location type, background elements
4. **Photographic traits**: camera angle (front, side, back), lighting conditions, composition
5. **Props and objects**: visible props, accessories, environmental items

Return the analysis as JSON:
{
    "description": "detailed description of the image (100-200 words)",
    "tags": {
        "pose": ["specific pose tags"],
        "gender": ["gender"],
        "age": ["age range"],
        "clothing": ["clothing style"],
        "scene": ["scene type"],
        "lighting": ["lighting type"],
        "angle": ["camera angle"],
        "emotion": ["expression"],
        "action": ["actions"],
        "props": ["props"]
    },
    "searchable_keywords": ["keywords suitable for search"],
    "mood": "overall mood",
    "style": "visual style",
    "confidence": 0.95
}

Make the tags precise and specific so they match well in search."#;


pub const QUERY_SYSTEM_PROMPT: &str = r#"You are a search query optimization expert for an image catalog. Always respond with valid JSON."#;


pub fn build_enhance_prompt(query: &str) -> String {
    format!(
        r#"Analyze and expand this image search query.

Query: "{query}"

Provide:
1. Extracted keywords
2. Synonym expansion
3. Related search suggestions
4. Tag category hints

Return JSON:
{{
    "keywords": ["extracted keywords"],
    "synonyms": ["synonym expansions"],
    "related_searches": ["related search suggestions"],
    "tag_categories": {{
        "pose": ["pose-related terms"],
        "scene": ["scene-related terms"],
        "style": ["style-related terms"]
    }}
}}"#
    )
}


pub fn build_ranking_prompt(query: &str, descriptions: &[String]) -> String {
    let numbered = descriptions
        .iter()
        .enumerate()
        .map(|(i, desc)| format!("{}. {}", i + 1, desc))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Score how well each image description matches the user's search query.

Query: "{query}"

Descriptions:
{numbered}

Score each description from 0 to 1 and return JSON:
{{
    "query_analysis": "interpretation of the query intent",
    "matches": [
        {{
            "index": 1,
            "similarity_score": 0.95,
            "reasoning": "why it matches"
        }}
    ]
}}

Indices are 1-based and refer to the numbered list above."#
    )
}
