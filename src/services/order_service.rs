use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;
use mongodb::Database;
use serde::Serialize;
use thiserror::Error;

use crate::models::{Order, OrderStatus, SellerOrder};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("db error: {0}")]
    Db(String),
    #[error("order {0} not found")]
    NotFound(String),
}

/// Persistence seam for orders and their per-seller shards. The Mongo
/// implementation backs the running service; tests drive the checkout flow
/// against an in-memory one.
pub trait OrderStore {
    /// Persists the global order and every shard. Logically atomic from the
    /// caller's perspective: on `Ok` all records are visible.
    async fn create_order(&self, order: &Order, shards: &[SellerOrder]) -> Result<(), StoreError>;

    /// Writes `status` to the addressed shard and to the global order in the
    /// same logical operation.
    async fn update_status(
        &self,
        order_id: &str,
        seller_store: &str,
        status: OrderStatus,
    ) -> Result<(), StoreError>;

    async fn find_order(&self, order_id: &str) -> Result<Option<Order>, StoreError>;
    async fn orders_for_user(&self, user_id: ObjectId) -> Result<Vec<Order>, StoreError>;
    async fn shards_for_seller(&self, seller_store: &str) -> Result<Vec<SellerOrder>, StoreError>;
    async fn shards_for_order(&self, order_id: &str) -> Result<Vec<SellerOrder>, StoreError>;
}

/// One divergence between the global order status and a shard's status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusDrift {
    pub seller_store: String,
    pub order_status: OrderStatus,
    pub shard_status: Option<OrderStatus>,
}

/// Reconciliation read path for the dual-write design: reports every shard
/// whose status disagrees with the global order so a caller can detect and
/// repair drift instead of discovering it one record at a time.
pub async fn status_drift<S: OrderStore>(
    store: &S,
    order_id: &str,
) -> Result<Vec<StatusDrift>, StoreError> {
    let order = store
        .find_order(order_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(order_id.to_string()))?;

    let shards = store.shards_for_order(order_id).await?;

    Ok(shards
        .into_iter()
        .filter(|s| s.status != Some(order.status))
        .map(|s| StatusDrift {
            seller_store: s.seller_store,
            order_status: order.status,
            shard_status: s.status,
        })
        .collect())
}

/// Buyer-facing status resolution, matching the original order-history view:
/// when every shard agrees on a status, the shard state wins (sellers update
/// shards first); otherwise the global record stands.
pub fn resolved_status(order: &Order, shards: &[SellerOrder]) -> OrderStatus {
    let mut it = shards.iter().filter_map(|s| s.status);
    match it.next() {
        Some(first) if it.all(|s| s == first) => first,
        _ => order.status,
    }
}

#[derive(Clone)]
pub struct MongoOrderStore {
    db: Database,
}

impl MongoOrderStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn orders(&self) -> mongodb::Collection<Order> {
        self.db.collection::<Order>("orders")
    }

    fn seller_orders(&self) -> mongodb::Collection<SellerOrder> {
        self.db.collection::<SellerOrder>("seller_orders")
    }
}

impl OrderStore for MongoOrderStore {
    // The global record and the shards are two write scopes, not one
    // transaction. A crash between them leaves observable drift; the
    // `status_drift` read path exists to detect exactly that.
    async fn create_order(&self, order: &Order, shards: &[SellerOrder]) -> Result<(), StoreError> {
        self.orders()
            .insert_one(order, None)
            .await
            .map_err(|e| StoreError::Db(e.to_string()))?;

        for shard in shards {
            self.seller_orders()
                .insert_one(shard, None)
                .await
                .map_err(|e| StoreError::Db(e.to_string()))?;
        }

        Ok(())
    }

    async fn update_status(
        &self,
        order_id: &str,
        seller_store: &str,
        status: OrderStatus,
    ) -> Result<(), StoreError> {
        // Shard first, then global, matching the source system's write order.
        let res = self
            .seller_orders()
            .update_one(
                doc! { "order_id": order_id, "seller_store": seller_store },
                doc! { "$set": { "status": status.as_str() } },
                None,
            )
            .await
            .map_err(|e| StoreError::Db(e.to_string()))?;

        if res.matched_count == 0 {
            return Err(StoreError::NotFound(order_id.to_string()));
        }

        let res = self
            .orders()
            .update_one(
                doc! { "_id": order_id },
                doc! { "$set": { "status": status.as_str() } },
                None,
            )
            .await
            .map_err(|e| StoreError::Db(e.to_string()))?;

        if res.matched_count == 0 {
            // Shard already updated: this is the drift hazard made visible.
            tracing::warn!(order_id, seller_store, "shard updated but global order missing");
            return Err(StoreError::NotFound(order_id.to_string()));
        }

        Ok(())
    }

    async fn find_order(&self, order_id: &str) -> Result<Option<Order>, StoreError> {
        self.orders()
            .find_one(doc! { "_id": order_id }, None)
            .await
            .map_err(|e| StoreError::Db(e.to_string()))
    }

    async fn orders_for_user(&self, user_id: ObjectId) -> Result<Vec<Order>, StoreError> {
        let find_opts = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let mut cursor = self
            .orders()
            .find(doc! { "user_id": user_id }, find_opts)
            .await
            .map_err(|e| StoreError::Db(e.to_string()))?;

        let mut out: Vec<Order> = vec![];
        while let Some(res) = cursor.next().await {
            out.push(res.map_err(|e| StoreError::Db(e.to_string()))?);
        }
        Ok(out)
    }

    async fn shards_for_seller(&self, seller_store: &str) -> Result<Vec<SellerOrder>, StoreError> {
        let find_opts = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let mut cursor = self
            .seller_orders()
            .find(doc! { "seller_store": seller_store }, find_opts)
            .await
            .map_err(|e| StoreError::Db(e.to_string()))?;

        let mut out: Vec<SellerOrder> = vec![];
        while let Some(res) = cursor.next().await {
            out.push(res.map_err(|e| StoreError::Db(e.to_string()))?);
        }
        Ok(out)
    }

    async fn shards_for_order(&self, order_id: &str) -> Result<Vec<SellerOrder>, StoreError> {
        let mut cursor = self
            .seller_orders()
            .find(doc! { "order_id": order_id }, None)
            .await
            .map_err(|e| StoreError::Db(e.to_string()))?;

        let mut out: Vec<SellerOrder> = vec![];
        while let Some(res) = cursor.next().await {
            out.push(res.map_err(|e| StoreError::Db(e.to_string()))?);
        }
        Ok(out)
    }
}
