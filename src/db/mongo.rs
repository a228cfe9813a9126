//! MongoDB client and lodging collection

use async_trait::async_trait;
use bson::{doc, Document};
use futures_util::TryStreamExt;
use mongodb::{options::FindOptions, Client, Collection};
use tracing::info;

use crate::db::schemas::{id_to_string, Lodging, LODGING_COLLECTION};
use crate::db::store::LodgingStore;
use crate::types::{LodgingError, Result};
use crate::validation::Fields;

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Connect and ping the database.
    ///
    /// Fails fast when the server is unreachable so startup never reaches
    /// the listener without a working connection.
    pub async fn new(uri: &str, db_name: &str) -> Result<Self> {
        info!("Connecting to MongoDB database '{}'", db_name);

        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| LodgingError::Store(format!("Failed to connect to MongoDB: {}", e)))?;

        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| LodgingError::Store(format!("MongoDB ping failed: {}", e)))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    /// Lodging store over the `lodgings` collection
    pub fn lodgings(&self) -> MongoLodgingStore {
        MongoLodgingStore::new(
            self.client
                .database(&self.db_name)
                .collection::<Document>(LODGING_COLLECTION),
        )
    }
}

/// Lodging store backed by a MongoDB collection
#[derive(Debug, Clone)]
pub struct MongoLodgingStore {
    collection: Collection<Document>,
}

impl MongoLodgingStore {
    pub fn new(collection: Collection<Document>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl LodgingStore for MongoLodgingStore {
    async fn count(&self) -> Result<u64> {
        self.collection
            .count_documents(doc! {})
            .await
            .map_err(|e| LodgingError::Store(format!("Count failed: {}", e)))
    }

    async fn fetch(&self, offset: u64, limit: u64) -> Result<Vec<Lodging>> {
        let options = FindOptions::builder()
            .sort(doc! { "_id": 1 })
            .skip(offset)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();

        let cursor = self
            .collection
            .find(doc! {})
            .with_options(options)
            .await
            .map_err(|e| LodgingError::Store(format!("Find failed: {}", e)))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| LodgingError::Store(format!("Cursor failed: {}", e)))?;

        Ok(docs.into_iter().map(Lodging::from_document).collect())
    }

    async fn insert(&self, lodging: Fields) -> Result<String> {
        let document = Lodging::to_document(&lodging)?;

        let result = self
            .collection
            .insert_one(document)
            .await
            .map_err(|e| LodgingError::Store(format!("Insert failed: {}", e)))?;

        Ok(id_to_string(&result.inserted_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;
    use serde_json::json;

    /// Store over a throwaway database, or `None` when `MONGODB_URI` is unset
    async fn scratch_store() -> Option<(MongoClient, MongoLodgingStore)> {
        let uri = std::env::var("MONGODB_URI").ok()?;
        let db_name = format!("lodgings_test_{}", uuid::Uuid::new_v4().simple());
        let client = MongoClient::new(&uri, &db_name).await.unwrap();
        let store = client.lodgings();
        Some((client, store))
    }

    async fn drop_scratch(client: MongoClient) {
        client
            .client
            .database(&client.db_name)
            .drop()
            .await
            .unwrap();
    }

    fn lodging(n: usize) -> Fields {
        json!({
            "name": format!("Lodging {}", n),
            "address": format!("{} Main St", n),
            "price": 100 + n,
            "ownerid": "7"
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[tokio::test]
    #[ignore = "needs MONGODB_URI"]
    async fn test_insert_renders_object_id() {
        let Some((client, store)) = scratch_store().await else {
            return;
        };

        let id = store.insert(lodging(1)).await.unwrap();
        assert!(ObjectId::parse_str(&id).is_ok());
        assert_eq!(store.count().await.unwrap(), 1);

        let stored = store.fetch(0, 10).await.unwrap();
        assert_eq!(stored[0].id, id);
        assert_eq!(stored[0].fields["name"], json!("Lodging 1"));

        drop_scratch(client).await;
    }

    #[tokio::test]
    #[ignore = "needs MONGODB_URI"]
    async fn test_fetch_sorts_skips_and_limits() {
        let Some((client, store)) = scratch_store().await else {
            return;
        };

        let mut ids = Vec::new();
        for i in 0..12 {
            ids.push(store.insert(lodging(i)).await.unwrap());
        }
        ids.sort();

        let second: Vec<_> = store
            .fetch(10, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(second, ids[10..]);

        let page = store.list_page(9).await.unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.lodgings.len(), 2);

        drop_scratch(client).await;
    }
}
