//! redb-based catalog store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `products` | `product_id` | `Product` (JSON) | 商品权威记录 |
//!
//! # Concurrency
//!
//! redb 写事务串行执行，`decrement_stock` 的检查-扣减-写入在
//! 单个写事务内完成并在返回前提交。两个并发扣减不可能都看到
//! 扣减前的库存，库存永不为负。

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::models::{Product, ProductCreate, ProductStats, ProductUpdate};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for products: key = product_id, value = JSON-serialized Product
const PRODUCTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("products");

/// Catalog store errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: u32,
        available: u32,
    },

    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for shared::AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(id) => {
                shared::AppError::not_found(format!("Product {}", id))
            }
            CatalogError::InsufficientStock { .. } => {
                shared::AppError::insufficient_stock(e.to_string())
            }
            other => shared::AppError::storage(other.to_string()),
        }
    }
}

/// Catalog store backed by redb
#[derive(Clone)]
pub struct CatalogStore {
    db: Arc<Database>,
}

impl CatalogStore {
    /// Open (or create) the catalog database at the given path
    pub fn open(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let db = Database::create(path)?;

        // Initialize tables
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory catalog database (tests)
    pub fn open_in_memory() -> CatalogResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ========== CRUD ==========

    /// Create a new product with a generated id
    pub fn create(&self, data: ProductCreate) -> CatalogResult<Product> {
        let product = Product {
            id: uuid::Uuid::new_v4().to_string(),
            name: data.name,
            description: data.description,
            price: data.price,
            stock_quantity: data.stock_quantity,
        };

        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PRODUCTS_TABLE)?;
            let value = serde_json::to_vec(&product)?;
            table.insert(product.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;

        Ok(product)
    }

    /// Find all products
    pub fn find_all(&self) -> CatalogResult<Vec<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;

        let mut products = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let product: Product = serde_json::from_slice(value.value())?;
            products.push(product);
        }
        Ok(products)
    }

    /// Find product by id
    pub fn find_by_id(&self, id: &str) -> CatalogResult<Option<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;

        match table.get(id)? {
            Some(value) => {
                let product: Product = serde_json::from_slice(value.value())?;
                Ok(Some(product))
            }
            None => Ok(None),
        }
    }

    /// Full update of an existing product
    pub fn update(&self, id: &str, data: ProductUpdate) -> CatalogResult<Product> {
        let txn = self.db.begin_write()?;
        let product = {
            let mut table = txn.open_table(PRODUCTS_TABLE)?;

            let mut product: Product = {
                let guard = table
                    .get(id)?
                    .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
                serde_json::from_slice(guard.value())?
            };

            product.name = data.name;
            product.description = data.description;
            product.price = data.price;
            product.stock_quantity = data.stock_quantity;

            let value = serde_json::to_vec(&product)?;
            table.insert(id, value.as_slice())?;
            product
        };
        txn.commit()?;

        Ok(product)
    }

    /// Delete a product
    ///
    /// 订单只保存快照，悬空的商品 ID 不影响已存在的订单。
    pub fn delete(&self, id: &str) -> CatalogResult<()> {
        let txn = self.db.begin_write()?;
        let existed = {
            let mut table = txn.open_table(PRODUCTS_TABLE)?;
            table.remove(id)?.is_some()
        };
        txn.commit()?;

        if existed {
            Ok(())
        } else {
            Err(CatalogError::NotFound(id.to_string()))
        }
    }

    // ========== Stock Operations ==========

    /// Atomic check-then-subtract stock decrement
    ///
    /// 成功时库存恰好减少 `quantity` 并在返回前落盘；
    /// `stock < quantity` 时失败，不产生任何变更。
    pub fn decrement_stock(&self, id: &str, quantity: u32) -> CatalogResult<Product> {
        let txn = self.db.begin_write()?;
        let product = {
            let mut table = txn.open_table(PRODUCTS_TABLE)?;

            let mut product: Product = {
                let guard = table
                    .get(id)?
                    .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
                serde_json::from_slice(guard.value())?
            };

            if product.stock_quantity < quantity {
                return Err(CatalogError::InsufficientStock {
                    product_id: id.to_string(),
                    requested: quantity,
                    available: product.stock_quantity,
                });
            }

            product.stock_quantity -= quantity;
            let value = serde_json::to_vec(&product)?;
            table.insert(id, value.as_slice())?;
            product
        };
        txn.commit()?;

        Ok(product)
    }

    /// Restore previously decremented stock (compensation path)
    pub fn restore_stock(&self, id: &str, quantity: u32) -> CatalogResult<Product> {
        let txn = self.db.begin_write()?;
        let product = {
            let mut table = txn.open_table(PRODUCTS_TABLE)?;

            let mut product: Product = {
                let guard = table
                    .get(id)?
                    .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
                serde_json::from_slice(guard.value())?
            };

            product.stock_quantity = product.stock_quantity.saturating_add(quantity);
            let value = serde_json::to_vec(&product)?;
            table.insert(id, value.as_slice())?;
            product
        };
        txn.commit()?;

        Ok(product)
    }

    // ========== Statistics ==========

    /// Catalog statistics: total count and low-stock count
    pub fn stats(&self, low_stock_threshold: u32) -> CatalogResult<ProductStats> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;

        let mut total_products = 0u64;
        let mut low_stock = 0u64;
        for result in table.iter()? {
            let (_key, value) = result?;
            let product: Product = serde_json::from_slice(value.value())?;
            total_products += 1;
            if product.stock_quantity < low_stock_threshold {
                low_stock += 1;
            }
        }

        Ok(ProductStats {
            total_products,
            low_stock,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> CatalogStore {
        CatalogStore::open_in_memory().unwrap()
    }

    fn widget(stock: u32) -> ProductCreate {
        ProductCreate {
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price: 100.0,
            stock_quantity: stock,
        }
    }

    #[test]
    fn test_create_and_find() {
        let store = create_test_store();
        let created = store.create(widget(10)).unwrap();

        let found = store.find_by_id(&created.id).unwrap().unwrap();
        assert_eq!(found.name, "Widget");
        assert_eq!(found.stock_quantity, 10);

        assert!(store.find_by_id("missing").unwrap().is_none());
        assert_eq!(store.find_all().unwrap().len(), 1);
    }

    #[test]
    fn test_update_replaces_all_fields() {
        let store = create_test_store();
        let created = store.create(widget(10)).unwrap();

        let updated = store
            .update(
                &created.id,
                ProductUpdate {
                    name: "Widget v2".to_string(),
                    description: "Improved".to_string(),
                    price: 150.0,
                    stock_quantity: 7,
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Widget v2");
        assert_eq!(updated.price, 150.0);
        assert_eq!(updated.stock_quantity, 7);
        // id 不变
        assert_eq!(updated.id, created.id);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let store = create_test_store();
        let result = store.update(
            "missing",
            ProductUpdate {
                name: "x".to_string(),
                description: String::new(),
                price: 1.0,
                stock_quantity: 1,
            },
        );
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[test]
    fn test_delete() {
        let store = create_test_store();
        let created = store.create(widget(10)).unwrap();

        store.delete(&created.id).unwrap();
        assert!(store.find_by_id(&created.id).unwrap().is_none());
        assert!(matches!(
            store.delete(&created.id),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_decrement_success() {
        let store = create_test_store();
        let created = store.create(widget(10)).unwrap();

        let updated = store.decrement_stock(&created.id, 3).unwrap();
        assert_eq!(updated.stock_quantity, 7);

        let found = store.find_by_id(&created.id).unwrap().unwrap();
        assert_eq!(found.stock_quantity, 7);
    }

    #[test]
    fn test_decrement_insufficient_leaves_stock_untouched() {
        let store = create_test_store();
        let created = store.create(widget(7)).unwrap();

        let result = store.decrement_stock(&created.id, 8);
        match result {
            Err(CatalogError::InsufficientStock {
                requested,
                available,
                ..
            }) => {
                assert_eq!(requested, 8);
                assert_eq!(available, 7);
            }
            other => panic!("expected InsufficientStock, got {:?}", other.err()),
        }

        let found = store.find_by_id(&created.id).unwrap().unwrap();
        assert_eq!(found.stock_quantity, 7);
    }

    #[test]
    fn test_decrement_missing_is_not_found() {
        let store = create_test_store();
        assert!(matches!(
            store.decrement_stock("missing", 1),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_decrement_exact_stock_succeeds() {
        let store = create_test_store();
        let created = store.create(widget(5)).unwrap();

        let updated = store.decrement_stock(&created.id, 5).unwrap();
        assert_eq!(updated.stock_quantity, 0);
    }

    #[test]
    fn test_restore_stock() {
        let store = create_test_store();
        let created = store.create(widget(10)).unwrap();

        store.decrement_stock(&created.id, 4).unwrap();
        let restored = store.restore_stock(&created.id, 4).unwrap();
        assert_eq!(restored.stock_quantity, 10);
    }

    #[test]
    fn test_stats_low_stock() {
        let store = create_test_store();
        store.create(widget(2)).unwrap();
        store.create(widget(50)).unwrap();
        store.create(widget(100)).unwrap();

        let stats = store.stats(10).unwrap();
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.low_stock, 1);
    }

    #[test]
    fn test_concurrent_decrements_never_oversell() {
        // 库存 5，10 个并发线程各扣 1：恰好 5 个成功，其余 InsufficientStock
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::open(dir.path().join("catalog.redb")).unwrap();
        let created = store.create(widget(5)).unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = store.clone();
            let id = created.id.clone();
            handles.push(std::thread::spawn(move || store.decrement_stock(&id, 1)));
        }

        let mut ok = 0;
        let mut insufficient = 0;
        for handle in handles {
            match handle.join().unwrap() {
                Ok(_) => ok += 1,
                Err(CatalogError::InsufficientStock { .. }) => insufficient += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(ok, 5);
        assert_eq!(insufficient, 5);

        let found = store.find_by_id(&created.id).unwrap().unwrap();
        assert_eq!(found.stock_quantity, 0);
    }

    #[test]
    fn test_concurrent_mixed_decrements_exhaust_exactly() {
        // 库存 5，并发扣 3 和 4：只有一个能成功
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::open(dir.path().join("catalog.redb")).unwrap();
        let created = store.create(widget(5)).unwrap();

        let mut handles = Vec::new();
        for qty in [3u32, 4u32] {
            let store = store.clone();
            let id = created.id.clone();
            handles.push(std::thread::spawn(move || store.decrement_stock(&id, qty)));
        }

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let ok_count = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(ok_count, 1);

        let found = store.find_by_id(&created.id).unwrap().unwrap();
        assert!(found.stock_quantity == 2 || found.stock_quantity == 1);
    }
}
