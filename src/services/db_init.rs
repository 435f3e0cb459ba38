use mongodb::{
    bson::doc,
    options::IndexOptions,
    Database, IndexModel,
};

pub async fn ensure_indexes(db: &Database) -> Result<(), String> {
    // users: unique email (identity lookups)
    {
        let col = db.collection::<mongodb::bson::Document>("users");
        let model = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    // orders: user history sorted newest-first
    {
        let col = db.collection::<mongodb::bson::Document>("orders");
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    // seller_orders: one shard per (seller_store, order_id)
    {
        let col = db.collection::<mongodb::bson::Document>("seller_orders");
        let model = IndexModel::builder()
            .keys(doc! { "seller_store": 1, "order_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    // seller_orders: dashboard/analytics scans per seller
    {
        let col = db.collection::<mongodb::bson::Document>("seller_orders");
        let model = IndexModel::builder()
            .keys(doc! { "seller_store": 1, "created_at": -1 })
            .build();

        let _ = col.create_index(model, None).await;
    }

    Ok(())
}
