//! Neo4j graph backend
//!
//! Every value travels as a bound parameter. The relation type is the only
//! fragment spliced into statement text; it is validated as an identifier
//! and backtick-quoted first.

use std::fmt;

use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph, Query, Row};
use tracing::{debug, info};

use super::{
    EntityRecord, GraphBackend, GraphFilter, RawGraph, RelationRecord, ENTITY_LABEL,
    FULLTEXT_INDEX,
};
use crate::error::{StoreError, StoreResult};
use crate::search::names_query;
use crate::types::{Entity, Relation};
use crate::validation::is_valid_relation_type;

/// Connection settings for a Neo4j server
#[derive(Clone)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
}

impl fmt::Debug for Neo4jConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neo4jConfig")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// One-hop expansion shared by every read
const EXPANSION: &str = "
OPTIONAL MATCH (entity)-[r]-(other:Memory)
RETURN entity.name AS name, entity.type AS type, entity.observations AS observations, score,
       other.name AS otherName, other.type AS otherType, other.observations AS otherObservations,
       startNode(r).name AS source, endNode(r).name AS target, type(r) AS relationType";

/// Graph backend talking bolt to a Neo4j server through a shared connection pool
pub struct Neo4jBackend {
    graph: Graph,
    uri: String,
}

impl Neo4jBackend {
    /// Open the connection pool and verify the server answers
    pub async fn connect(config: &Neo4jConfig) -> StoreResult<Self> {
        info!(uri = %config.uri, user = %config.user, db = %config.database, "Connecting to Neo4j");

        let neo_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .max_connections(config.max_connections)
            .build()
            .map_err(|e| StoreError::unavailable(format!("invalid connection settings: {}", e)))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| StoreError::unavailable(format!("cannot reach {}: {}", config.uri, e)))?;

        let backend = Self {
            graph,
            uri: config.uri.clone(),
        };
        backend.run(query("RETURN 1")).await?;

        info!(uri = %backend.uri, "Connected to Neo4j");
        Ok(backend)
    }

    async fn run(&self, statement: Query) -> StoreResult<()> {
        self.graph.run(statement).await.map_err(map_neo4j_error)
    }

    async fn fetch(&self, statement: Query) -> StoreResult<Vec<Row>> {
        let mut stream = self.graph.execute(statement).await.map_err(map_neo4j_error)?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await.map_err(map_neo4j_error)? {
            rows.push(row);
        }
        Ok(rows)
    }
}

/// Connectivity failures surface as `StoreUnavailable`; everything else the
/// server or driver reports is a `BackendError`.
fn map_neo4j_error(err: neo4rs::Error) -> StoreError {
    match err {
        neo4rs::Error::IOError { .. } | neo4rs::Error::ConnectionError => {
            StoreError::unavailable(err.to_string())
        }
        other => StoreError::backend(other.to_string()),
    }
}

fn column<'r, T: serde::Deserialize<'r>>(row: &'r Row, key: &str) -> StoreResult<T> {
    row.get::<T>(key)
        .map_err(|e| StoreError::backend(format!("unexpected value in column '{}': {}", key, e)))
}

/// Backtick-quoted relationship type, rejected unless it is a plain identifier
fn relationship_type(relation_type: &str) -> StoreResult<String> {
    if !is_valid_relation_type(relation_type) {
        return Err(StoreError::validation(format!(
            "relationType '{}' is not a valid identifier",
            relation_type
        )));
    }
    Ok(format!("`{}`", relation_type))
}

#[async_trait]
impl GraphBackend for Neo4jBackend {
    fn name(&self) -> &'static str {
        "neo4j"
    }

    async fn ensure_fulltext_index(&self) -> StoreResult<()> {
        let statement = format!(
            "CREATE FULLTEXT INDEX {} IF NOT EXISTS FOR (m:{}) ON EACH [m.name, m.type, m.observations]",
            FULLTEXT_INDEX, ENTITY_LABEL
        );
        match self.run(query(&statement)).await {
            Ok(()) => {
                info!(index = FULLTEXT_INDEX, "Fulltext search index ready");
                Ok(())
            }
            Err(StoreError::Backend(message)) if message.contains("already exists") => {
                info!(index = FULLTEXT_INDEX, "Fulltext search index already exists");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn merge_entity(&self, entity: &Entity) -> StoreResult<()> {
        self.run(
            query(
                "MERGE (e:Memory {name: $name})
                 SET e.type = $type, e.observations = $observations",
            )
            .param("name", entity.name.as_str())
            .param("type", entity.entity_type.as_str())
            .param("observations", entity.observations.clone()),
        )
        .await
    }

    async fn merge_relation(&self, relation: &Relation) -> StoreResult<bool> {
        let statement = format!(
            "MATCH (source:Memory {{name: $source}}), (target:Memory {{name: $target}})
             MERGE (source)-[r:{}]->(target)
             RETURN count(r) AS linked",
            relationship_type(&relation.relation_type)?
        );
        let rows = self
            .fetch(
                query(&statement)
                    .param("source", relation.source.as_str())
                    .param("target", relation.target.as_str()),
            )
            .await?;

        match rows.first() {
            Some(row) => Ok(column::<i64>(row, "linked")? > 0),
            None => Ok(false),
        }
    }

    async fn add_observations(
        &self,
        entity_name: &str,
        contents: &[String],
    ) -> StoreResult<Option<Vec<String>>> {
        let rows = self
            .fetch(
                query(
                    "MATCH (e:Memory {name: $name})
                     WITH e, [o IN $contents WHERE NOT o IN coalesce(e.observations, [])] AS new
                     SET e.observations = coalesce(e.observations, []) + new
                     RETURN new",
                )
                .param("name", entity_name)
                .param("contents", contents.to_vec()),
            )
            .await?;

        match rows.first() {
            Some(row) => Ok(Some(column::<Vec<String>>(row, "new")?)),
            None => Ok(None),
        }
    }

    async fn delete_entity(&self, name: &str) -> StoreResult<()> {
        self.run(query("MATCH (e:Memory {name: $name}) DETACH DELETE e").param("name", name))
            .await
    }

    async fn delete_observations(
        &self,
        entity_name: &str,
        observations: &[String],
    ) -> StoreResult<()> {
        self.run(
            query(
                "MATCH (e:Memory {name: $name})
                 SET e.observations = [o IN coalesce(e.observations, []) WHERE NOT o IN $observations]",
            )
            .param("name", entity_name)
            .param("observations", observations.to_vec()),
        )
        .await
    }

    async fn delete_relation(&self, relation: &Relation) -> StoreResult<()> {
        let statement = format!(
            "MATCH (source:Memory {{name: $source}})-[r:{}]->(target:Memory {{name: $target}})
             DELETE r",
            relationship_type(&relation.relation_type)?
        );
        self.run(
            query(&statement)
                .param("source", relation.source.as_str())
                .param("target", relation.target.as_str()),
        )
        .await
    }

    async fn load_graph(&self, filter: &GraphFilter) -> StoreResult<RawGraph> {
        let statement = match filter {
            GraphFilter::All => {
                query(&format!("MATCH (entity:Memory) WITH entity, 1.0 AS score{}", EXPANSION))
            }
            GraphFilter::FullText(text) => query(&format!(
                "CALL db.index.fulltext.queryNodes('{}', $filter) YIELD node AS entity, score{}",
                FULLTEXT_INDEX, EXPANSION
            ))
            .param("filter", text.as_str()),
            // The name query narrows through the index; the IN filter makes it exact
            GraphFilter::Names(names) => query(&format!(
                "CALL db.index.fulltext.queryNodes('{}', $filter) YIELD node AS entity, score
                 WITH entity, score WHERE entity.name IN $names{}",
                FULLTEXT_INDEX, EXPANSION
            ))
            .param("filter", names_query(names))
            .param("names", names.clone()),
        };

        let rows = self.fetch(statement).await?;
        let mut raw = RawGraph::default();
        for row in &rows {
            raw.entities.push(EntityRecord {
                name: column(row, "name")?,
                entity_type: column(row, "type")?,
                observations: column(row, "observations")?,
                score: column(row, "score")?,
            });

            let other_name: Option<String> = column(row, "otherName")?;
            if other_name.is_some() {
                raw.entities.push(EntityRecord {
                    name: other_name,
                    entity_type: column(row, "otherType")?,
                    observations: column(row, "otherObservations")?,
                    score: None,
                });
            }

            raw.relations.push(RelationRecord {
                source: column(row, "source")?,
                target: column(row, "target")?,
                relation_type: column(row, "relationType")?,
            });
        }

        debug!(rows = rows.len(), "Loaded graph rows from Neo4j");
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_type_is_quoted() {
        assert_eq!(relationship_type("KNOWS").unwrap(), "`KNOWS`");
        assert_eq!(relationship_type("works_at").unwrap(), "`works_at`");
    }

    #[test]
    fn test_relationship_type_rejects_injection() {
        let err = relationship_type("KNOWS`]->() DETACH DELETE n //").unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
    }

    #[test]
    fn test_expansion_returns_every_column_read() {
        for column in [
            "AS name",
            "AS type",
            "AS observations",
            "score",
            "AS otherName",
            "AS otherType",
            "AS otherObservations",
            "AS source",
            "AS target",
            "AS relationType",
        ] {
            assert!(EXPANSION.contains(column), "missing {}", column);
        }
    }
}
