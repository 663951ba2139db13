//! 数据对象
//!
//! 通过 API 保存的待评估样本数据，仅保存在内存中。

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::dto::CreateObjectRequest;

/// 数据对象实体
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataObject {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<serde_json::Number>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CreateObjectRequest> for DataObject {
    fn from(req: CreateObjectRequest) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            age: req.age,
            object_type: req.object_type,
            created_at: Utc::now(),
        }
    }
}

/// 数据对象存储，按创建顺序保存
#[derive(Debug, Default)]
pub struct ObjectStore {
    objects: RwLock<Vec<DataObject>>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, object: DataObject) -> DataObject {
        info!(object_id = %object.id, name = %object.name, "数据对象已保存");
        self.objects.write().push(object.clone());
        object
    }

    pub fn list(&self) -> Vec<DataObject> {
        self.objects.read().clone()
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(name: &str) -> CreateObjectRequest {
        serde_json::from_value(json!({ "name": name, "age": 30, "type": "user" })).unwrap()
    }

    #[test]
    fn test_insert_and_list_in_order() {
        let store = ObjectStore::new();
        store.insert(request("Alice").into());
        store.insert(request("Bob").into());

        let names: Vec<String> = store.list().into_iter().map(|o| o.name).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_serialization() {
        let object: DataObject = request("Alice").into();
        let value = serde_json::to_value(&object).unwrap();

        assert_eq!(value["name"], "Alice");
        assert_eq!(value["age"], 30);
        assert_eq!(value["type"], "user");
        assert!(value.get("createdAt").is_some());
    }
}
