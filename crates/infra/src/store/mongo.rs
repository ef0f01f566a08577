//! MongoDB backend (`mongodb` 2.x driver).

use async_trait::async_trait;
use bson::{Bson, Document as BsonDocument, doc};
use futures::stream::TryStreamExt;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{FindOptions as MongoFindOptions, IndexOptions};
use mongodb::{Client as MongoClient, Collection, Database, IndexModel};

use polaris_core::{DocumentId, collections};

use super::{
    Condition, Direction, Document, DocumentStore, Filter, FindOptions, ID_FIELD, StoreError, StoreResult,
    UNIQUE_KEYS, document_id, id_value,
};

const DUPLICATE_KEY: i32 = 11000;

/// Every collection that gets a `created_at` index at startup.
const INDEXED_COLLECTIONS: &[&str] = &[
    collections::PROJECT,
    collections::CUSTOMER,
    collections::SUPPLIER,
    collections::SALES_ORDER,
    collections::SALES_INVOICE,
    collections::DELIVERY_RECEIPT,
    collections::QUOTATION,
    collections::SUPPLIER_PO,
    collections::SUPPLIER_INVOICE,
    collections::SUPPLIER_DR,
    collections::INVENTORY,
    collections::RECEIVING_REPORT,
    collections::USER,
    collections::PENDING_USER,
    collections::ROLE,
];

#[derive(Clone)]
pub struct MongoDocumentStore {
    client: MongoClient,
    db: Database,
}

impl MongoDocumentStore {
    pub async fn connect(uri: &str, database: &str) -> StoreResult<Self> {
        tracing::info!(database = %database, "connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!(error = %e, "failed to connect to MongoDB");
            backend(e)
        })?;
        let store = Self { db: client.database(database), client };
        store.health_check().await?;
        tracing::info!(database = %database, "connected to MongoDB");
        Ok(store)
    }

    pub async fn health_check(&self) -> StoreResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "MongoDB ping failed");
                backend(e)
            })?;
        Ok(())
    }

    /// `created_at` index on every collection plus the unique business keys.
    pub async fn initialize_indexes(&self) -> StoreResult<()> {
        for name in INDEXED_COLLECTIONS {
            let model = IndexModel::builder()
                .keys(doc! { "created_at": -1 })
                .options(IndexOptions::builder().name(format!("{name}_created_at")).build())
                .build();
            self.collection(name).create_index(model, None).await.map_err(backend)?;
        }
        for (name, field) in UNIQUE_KEYS {
            let model = IndexModel::builder()
                .keys(doc! { *field: 1 })
                .options(
                    IndexOptions::builder()
                        .name(format!("{name}_{field}_unique"))
                        .unique(true)
                        .build(),
                )
                .build();
            self.collection(name).create_index(model, None).await.map_err(backend)?;
            tracing::info!(collection = %name, field = %field, "ensured unique index");
        }
        Ok(())
    }

    fn collection(&self, name: &str) -> Collection<BsonDocument> {
        self.db.collection(name)
    }
}

fn backend(e: mongodb::error::Error) -> StoreError {
    if let ErrorKind::Write(WriteFailure::WriteError(w)) = e.kind.as_ref() {
        if w.code == DUPLICATE_KEY {
            return StoreError::Duplicate(w.message.clone());
        }
    }
    StoreError::Backend(e.to_string())
}

fn to_bson(doc: &Document) -> StoreResult<BsonDocument> {
    bson::to_document(doc).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn from_bson(doc: BsonDocument) -> StoreResult<Document> {
    bson::from_document(doc).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn value_to_bson(value: &serde_json::Value) -> StoreResult<Bson> {
    bson::to_bson(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn id_query(id: &DocumentId) -> BsonDocument {
    doc! { ID_FIELD: id.to_string() }
}

/// The driver encodes skip and limit as BSON int64; larger values are clamped
/// so an out-of-range page reads as empty.
fn driver_count(n: u64) -> u64 {
    n.min(i64::MAX as u64)
}

/// Translate a [`Filter`] into a MongoDB query document.
pub fn filter_to_bson(filter: &Filter) -> StoreResult<BsonDocument> {
    let mut query = BsonDocument::new();
    for (field, cond) in filter.conditions() {
        let (op, value) = match cond {
            Condition::Eq(v) => ("$eq", value_to_bson(v)?),
            Condition::In(vs) => (
                "$in",
                Bson::Array(vs.iter().map(value_to_bson).collect::<StoreResult<Vec<_>>>()?),
            ),
            Condition::Gte(v) => ("$gte", value_to_bson(v)?),
            Condition::Lte(v) => ("$lte", value_to_bson(v)?),
        };
        match query.get_mut(field) {
            Some(Bson::Document(ops)) => {
                ops.insert(op, value);
            }
            _ => {
                query.insert(field.clone(), doc! { op: value });
            }
        }
    }
    Ok(query)
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn get(&self, collection: &str, id: &DocumentId) -> StoreResult<Document> {
        let found = self
            .collection(collection)
            .find_one(id_query(id), None)
            .await
            .map_err(backend)?;
        match found {
            Some(doc) => from_bson(doc),
            None => Err(StoreError::NotFound { collection: collection.to_string(), id: *id }),
        }
    }

    async fn find(&self, collection: &str, filter: &Filter, options: FindOptions) -> StoreResult<Vec<Document>> {
        let sort = options.sort.map(|s| {
            let dir = match s.direction {
                Direction::Asc => 1,
                Direction::Desc => -1,
            };
            doc! { s.field: dir, ID_FIELD: dir }
        });
        let find_options = MongoFindOptions::builder()
            .sort(sort)
            .skip(options.skip.map(driver_count))
            .limit(options.limit.map(|l| driver_count(l) as i64))
            .build();

        let mut cursor = self
            .collection(collection)
            .find(filter_to_bson(filter)?, find_options)
            .await
            .map_err(backend)?;

        let mut docs = Vec::new();
        while let Some(doc) = cursor.try_next().await.map_err(backend)? {
            docs.push(from_bson(doc)?);
        }
        Ok(docs)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        self.collection(collection)
            .count_documents(filter_to_bson(filter)?, None)
            .await
            .map_err(backend)
    }

    async fn insert(&self, collection: &str, mut doc: Document) -> StoreResult<DocumentId> {
        let id = match doc.get(ID_FIELD) {
            None => DocumentId::new(),
            Some(_) => document_id(&doc)
                .ok_or_else(|| StoreError::Serialization(format!("{collection}: malformed _id")))?,
        };
        doc.insert(ID_FIELD.to_string(), id_value(&id));
        self.collection(collection)
            .insert_one(to_bson(&doc)?, None)
            .await
            .map_err(backend)?;
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &DocumentId, mut patch: Document) -> StoreResult<u64> {
        patch.remove(ID_FIELD);
        if patch.is_empty() {
            return self.count(collection, &Filter::new().eq(ID_FIELD, id_value(id))).await;
        }
        let result = self
            .collection(collection)
            .update_one(id_query(id), doc! { "$set": to_bson(&patch)? }, None)
            .await
            .map_err(backend)?;
        Ok(result.matched_count)
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> StoreResult<u64> {
        let result = self
            .collection(collection)
            .delete_one(id_query(id), None)
            .await
            .map_err(backend)?;
        Ok(result.deleted_count)
    }
}
