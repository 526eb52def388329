// Network view of the hotel graph: one node per entity, one edge per relationship

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::store::GraphRow;

pub const HOTEL_NAMES_QUERY: &str = "MATCH (h:Hotel) RETURN h.name AS name";

pub const HOTEL_RELATIONS_QUERY: &str = "MATCH (h:Hotel)-[r]->(n) \
RETURN h.name AS hotel, type(r) AS relation, labels(n)[0] AS node_type, n.name AS related_entity";

const UNKNOWN_LABEL_COLOR: &str = "gray";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphOverview {
    pub nodes: Vec<OverviewNode>,
    pub edges: Vec<OverviewEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewNode {
    pub id: String,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewEdge {
    pub from: String,
    pub to: String,
    pub label: String,
}

pub fn label_color(label: &str) -> &'static str {
    match label {
        "Hotel" => "red",
        "Location" => "blue",
        "Facilities" => "green",
        "CustomerType" => "purple",
        "Reviewer" => "orange",
        _ => UNKNOWN_LABEL_COLOR,
    }
}

fn text(row: &GraphRow, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

impl GraphOverview {
    /// Assemble the network from the rows of [`HOTEL_NAMES_QUERY`] and
    /// [`HOTEL_RELATIONS_QUERY`]. A node appears once, colored by the label it
    /// was first seen with; rows missing a name are skipped.
    pub fn from_rows(hotels: &[GraphRow], relations: &[GraphRow]) -> Self {
        let mut overview = Self::default();

        for name in hotels.iter().filter_map(|row| text(row, "name")) {
            overview.add_node(name, "Hotel");
        }

        for row in relations {
            let (Some(hotel), Some(entity)) = (text(row, "hotel"), text(row, "related_entity"))
            else {
                continue;
            };
            let node_type = text(row, "node_type").unwrap_or_default();
            overview.add_node(hotel.clone(), "Hotel");
            overview.add_node(entity.clone(), &node_type);
            overview.edges.push(OverviewEdge {
                from: hotel,
                to: entity,
                label: text(row, "relation").unwrap_or_default(),
            });
        }

        overview
    }

    fn add_node(&mut self, id: String, node_type: &str) {
        if self.nodes.iter().any(|n| n.id == id) {
            return;
        }
        self.nodes.push(OverviewNode {
            label: id.clone(),
            id,
            color: label_color(node_type).to_string(),
        });
    }
}
