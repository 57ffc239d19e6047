use std::path::PathBuf;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::error;

use crate::models::{comments::Comment, posts::Post, users::User};
use crate::{Error, Result};

/// The whole backing document, as read from and written to db.json.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// A row type living in one of the document's collections.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: &'static str;
    const NOT_FOUND: &'static str;

    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);
    fn collection(db: &Database) -> &Vec<Self>;
    fn collection_mut(db: &mut Database) -> &mut Vec<Self>;

    /// Strip fields that must never leave the API from a serialized row.
    fn sanitize(_row: &mut Value) {}

    fn not_found() -> Error {
        Error::NotFound(Self::NOT_FOUND)
    }
}

impl Entity for User {
    const COLLECTION: &'static str = "users";
    const NOT_FOUND: &'static str = "User not found";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn collection(db: &Database) -> &Vec<Self> {
        &db.users
    }

    fn collection_mut(db: &mut Database) -> &mut Vec<Self> {
        &mut db.users
    }

    fn sanitize(row: &mut Value) {
        if let Some(obj) = row.as_object_mut() {
            obj.remove("password");
        }
    }
}

impl Entity for Post {
    const COLLECTION: &'static str = "posts";
    const NOT_FOUND: &'static str = "Post not found";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn collection(db: &Database) -> &Vec<Self> {
        &db.posts
    }

    fn collection_mut(db: &mut Database) -> &mut Vec<Self> {
        &mut db.posts
    }
}

impl Entity for Comment {
    const COLLECTION: &'static str = "comments";
    const NOT_FOUND: &'static str = "Comment not found";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn collection(db: &Database) -> &Vec<Self> {
        &db.comments
    }

    fn collection_mut(db: &mut Database) -> &mut Vec<Self> {
        &mut db.comments
    }
}

/// In-memory document store loaded from a flat JSON file. Every mutation is
/// flushed back to disk best-effort; a failed flush is logged and the request
/// still succeeds (durability is explicitly not a goal here).
#[derive(Clone)]
pub struct JsonStore {
    path: PathBuf,
    db: Arc<RwLock<Database>>,
}

impl JsonStore {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let raw = std::fs::read_to_string(&path)?;
        let db: Database = serde_json::from_str(&raw)?;
        Ok(Self {
            path,
            db: Arc::new(RwLock::new(db)),
        })
    }

    pub fn from_database(db: Database, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            db: Arc::new(RwLock::new(db)),
        }
    }

    pub async fn all<T: Entity>(&self) -> Vec<T> {
        let db = self.db.read().await;
        T::collection(&db).to_vec()
    }

    pub async fn find<T: Entity>(&self, id: u64) -> Option<T> {
        let db = self.db.read().await;
        T::collection(&db).iter().find(|row| row.id() == id).cloned()
    }

    /// Insert a typed entity, assigning the next sequential id.
    pub async fn insert<T: Entity>(&self, mut entity: T) -> T {
        {
            let mut db = self.db.write().await;
            entity.set_id(next_id(T::collection(&db)));
            T::collection_mut(&mut db).push(entity.clone());
        }
        self.flush().await;
        entity
    }

    /// Insert a raw JSON body, assigning the next sequential id. A body that
    /// does not deserialize into the collection's entity shape is a 400.
    pub async fn insert_value<T: Entity>(&self, mut body: Value) -> Result<T> {
        let entity = {
            let mut db = self.db.write().await;
            let id = next_id(T::collection(&db));
            let obj = body
                .as_object_mut()
                .ok_or_else(|| Error::BadRequest("Expected a JSON object".to_string()))?;
            obj.insert("id".to_string(), id.into());
            let entity: T = serde_json::from_value(body)
                .map_err(|err| Error::BadRequest(err.to_string()))?;
            T::collection_mut(&mut db).push(entity.clone());
            entity
        };
        self.flush().await;
        Ok(entity)
    }

    /// Replace the entity at `id` with a full JSON body.
    pub async fn replace<T: Entity>(&self, id: u64, mut body: Value) -> Result<T> {
        let entity = {
            let mut db = self.db.write().await;
            let idx = position::<T>(&db, id).ok_or_else(T::not_found)?;
            let obj = body
                .as_object_mut()
                .ok_or_else(|| Error::BadRequest("Expected a JSON object".to_string()))?;
            obj.insert("id".to_string(), id.into());
            let entity: T = serde_json::from_value(body)
                .map_err(|err| Error::BadRequest(err.to_string()))?;
            T::collection_mut(&mut db)[idx] = entity.clone();
            entity
        };
        self.flush().await;
        Ok(entity)
    }

    /// Shallow-merge a JSON body into the entity at `id`. The id itself is
    /// not patchable.
    pub async fn patch<T: Entity>(&self, id: u64, body: Value) -> Result<T> {
        let entity = {
            let mut db = self.db.write().await;
            let idx = position::<T>(&db, id).ok_or_else(T::not_found)?;
            let mut row = serde_json::to_value(&T::collection(&db)[idx])?;
            merge(&mut row, body)?;
            row["id"] = id.into();
            let entity: T = serde_json::from_value(row)
                .map_err(|err| Error::BadRequest(err.to_string()))?;
            T::collection_mut(&mut db)[idx] = entity.clone();
            entity
        };
        self.flush().await;
        Ok(entity)
    }

    /// Write back a typed entity that already has its id.
    pub async fn update<T: Entity>(&self, entity: T) -> Result<T> {
        {
            let mut db = self.db.write().await;
            let idx = position::<T>(&db, entity.id()).ok_or_else(T::not_found)?;
            T::collection_mut(&mut db)[idx] = entity.clone();
        }
        self.flush().await;
        Ok(entity)
    }

    pub async fn remove<T: Entity>(&self, id: u64) -> Result<()> {
        {
            let mut db = self.db.write().await;
            let idx = position::<T>(&db, id).ok_or_else(T::not_found)?;
            T::collection_mut(&mut db).remove(idx);
        }
        self.flush().await;
        Ok(())
    }

    async fn flush(&self) {
        let json = {
            let db = self.db.read().await;
            match serde_json::to_string(&*db) {
                Ok(json) => json,
                Err(err) => {
                    error!("failed to serialize database: {:?}", err);
                    return;
                }
            }
        };
        if let Err(err) = tokio::fs::write(&self.path, json).await {
            error!("failed to write {}: {:?}", self.path.display(), err);
        }
    }
}

fn next_id<T: Entity>(collection: &[T]) -> u64 {
    collection.iter().map(Entity::id).max().unwrap_or(0) + 1
}

fn position<T: Entity>(db: &Database, id: u64) -> Option<usize> {
    T::collection(db).iter().position(|row| row.id() == id)
}

fn merge(row: &mut Value, body: Value) -> Result<()> {
    let patch = match body {
        Value::Object(patch) => patch,
        _ => return Err(Error::BadRequest("Expected a JSON object".to_string())),
    };
    if let Some(obj) = row.as_object_mut() {
        for (key, value) in patch {
            obj.insert(key, value);
        }
    }
    Ok(())
}
