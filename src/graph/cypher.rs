// Cleanup of model-generated Cypher

/// Remove markdown code fences around a generated query.
///
/// A leading fence line (such as "```cypher") is dropped, everything from the
/// next fence onward is cut, and the rest is trimmed.
pub fn strip_markdown_code_blocks(query: &str) -> &str {
    let mut query = query.trim_start();

    if let Some(rest) = query.strip_prefix("```") {
        if let Some(newline) = rest.find('\n') {
            query = &rest[newline + 1..];
        }
    }

    if let Some(fence) = query.find("```") {
        query = &query[..fence];
    }

    query.trim()
}
