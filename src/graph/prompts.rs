//! Prompt templates for the hotel-review knowledge graph.

/// Node labels of the hotel graph
pub const NODE_LABELS: &[&str] = &["Hotel", "Location", "Facilities", "CustomerType", "Reviewer"];

/// Relationship types, as `(from label, type, to label)`
pub const RELATIONSHIPS: &[(&str, &str, &str)] = &[
    ("Hotel", "is_located_in", "Location"),
    ("Hotel", "has_facilities", "Facilities"),
    ("Hotel", "has_customers", "CustomerType"),
    ("Hotel", "has_reviewer", "Reviewer"),
];

/// Creation query shown to the model when no better example is available
pub const EXAMPLE_CREATION_CYPHER: &str = "CREATE (ch:Hotel {name: 'Creek Hotel'})-[:is_located_in]->(d:Location {name: 'Dubai'}),
    (ch)-[:has_customers]->(b:CustomerType {name: 'businessmen'}),
    (ch)-[:has_customers]->(t:CustomerType {name: 'tourists'}),
    (ch)-[:has_reviewer]->(rs:Reviewer {name: 'Ryouta Sato'}),
    (ch)-[:has_facilities]->(sp:Facilities {name: 'swimming pool'})";

fn schema(heading: &str) -> String {
    let nodes: String = NODE_LABELS.iter().map(|l| format!("- {}\n", l)).collect();
    let relationships: String = RELATIONSHIPS
        .iter()
        .map(|(from, rel, to)| format!("- [{}],{},[{}]\n", from, rel, to))
        .collect();
    format!("{}:\n{}\nRelationships:\n{}", heading, nodes, relationships)
}

pub fn ontology_system_prompt() -> String {
    format!(
        "Assistant is a Named Entity Recognition (NER) expert. The assistant can identify named \
entities such as a person, place, or thing. The assistant can also identify entity relationships, \
which describe how entities relate to each other (eg: married to, located in, held by). Identify \
the named entities and the entity relationships present in the text by returning comma separated \
list of tuples representing the relationship between two entities in the format (entity, \
relationship, entity). Only generate tuples from the list of entities and the possible entity \
relationships listed below. Return only generated tuples in a comma separated tuple separated by \
a new line for each tuple.

{}
Example Output:
Creek Hotel,is_located_in,Dubai
Creek Hotel,has_facilities,swimming pool
Creek Hotel,has_customers,Businessmen
Creek Hotel,has_customers,senior citizens
Creek Hotel,has_reviewer,John Doe
",
        schema("Entities")
    )
}

pub fn ontology_user_prompt(review: &str) -> String {
    format!(
        "Identify the named entities and entity relationships in the hotel review text above. \
Return the entities and entity relationships in a tuple separated by commas. Return only \
generated tuples in a comma separated tuple separated by a new line for each tuple.

Text: {}",
        review
    )
}

pub const CREATION_SYSTEM_PROMPT: &str = "Assistant is an expert in Neo4j Cypher development. \
Create a cypher query to generate a graph using the data points provided. Make sure to only \
include the cypher query in your response so that it can be sent directly to the Neo4j database. \
The data is in the format of a comma separated tuple separated by a new line for each tuple.";

pub fn creation_user_prompt(ontology: &str) -> String {
    format!(
        "Generate a cypher query to create new nodes and their relationships given the data \
provided. Return only the cypher query.
Data is composed of relationships between entities that have been extracted using NER.
The data is in the format of a comma separated tuple separated by a new line for each tuple.

Example Input:
Creek Hotel,is_located_in,Dubai
Creek Hotel,has_customers,businessmen
Creek Hotel,has_customers,tourists
Creek Hotel,has_reviewer,Ryouta Sato
Creek Hotel,has_facilities,swimming pool

Example Output:
{}

strictly stick to the above output format

use distinct variable names for each node and relationship to avoid conflicts

the data is: {}
",
        EXAMPLE_CREATION_CYPHER, ontology
    )
}

pub fn retrieval_system_prompt(example_creation: &str) -> String {
    format!(
        "Assistant is an expert in Neo4j Cypher development. Only return a cypher query based on \
the user query.
The cypher graph has the following schema:

{}
Example of a node created through cypher query:
{}

Example Input:
what hotels are reviewed by Ryouta Sato?

Example Output:
MATCH (h:Hotel)-[:has_reviewer]-(r:Reviewer {{name: 'Ryouta Sato'}})
RETURN h

stick strictly to the above output format
",
        schema("Nodes"),
        example_creation
    )
}

pub fn retrieval_user_prompt(question: &str) -> String {
    format!(
        "Generate a cypher query to answer the user query.\nuser_query = {}",
        question
    )
}

pub const ANSWER_SYSTEM_PROMPT: &str = "You are an assistant that answers questions about hotels \
based on the provided information. Use only the information provided to answer the question. If \
you don't know the answer, say so.";

pub fn answer_user_prompt(question: &str, information: &str) -> String {
    format!(
        "Based on the following information about hotels, answer this question: {}\n\nInformation: {}",
        question, information
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_every_label_and_relationship() {
        let prompt = ontology_system_prompt();
        for label in NODE_LABELS {
            assert!(prompt.contains(&format!("- {}\n", label)));
        }
        assert!(prompt.contains("- [Hotel],has_reviewer,[Reviewer]"));
    }

    #[test]
    fn test_retrieval_prompt_embeds_example() {
        let prompt = retrieval_system_prompt("CREATE (x:Hotel {name: 'X'})");
        assert!(prompt.contains("CREATE (x:Hotel {name: 'X'})"));
        assert!(prompt.contains("(r:Reviewer {name: 'Ryouta Sato'})"));
    }

    #[test]
    fn test_user_prompts_embed_input() {
        assert!(ontology_user_prompt("Nice stay").ends_with("Text: Nice stay"));
        assert!(creation_user_prompt("A,has_reviewer,B").contains("the data is: A,has_reviewer,B"));
        assert!(retrieval_user_prompt("who?").ends_with("user_query = who?"));
        assert!(answer_user_prompt("q", "[]").ends_with("Information: []"));
    }
}
