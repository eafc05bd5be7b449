//! Product Model

use serde::{Deserialize, Serialize};

/// 商品记录 - 库存/价格/名称的权威来源
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// 商品 ID (创建时生成，稳定不变)
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// 单价 (非负)
    pub price: f64,
    /// 库存数量 (无符号类型保证永不为负)
    pub stock_quantity: u32,
}

/// 创建商品载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub stock_quantity: u32,
}

/// 更新商品载荷 (全量更新)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub stock_quantity: u32,
}

/// 验证价格：必须有限且非负
pub fn validate_price(price: f64) -> Result<(), String> {
    if !price.is_finite() {
        return Err(format!("price must be a finite number, got {}", price));
    }
    if price < 0.0 {
        return Err(format!("price must be non-negative, got {}", price));
    }
    Ok(())
}

impl ProductCreate {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        validate_price(self.price)
    }
}

impl ProductUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        validate_price(self.price)
    }
}

/// 目录统计
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total_products: u64,
    /// 库存低于阈值的商品数
    pub low_stock: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let product = Product {
            id: "p1".to_string(),
            name: "Widget".to_string(),
            description: String::new(),
            price: 9.99,
            stock_quantity: 5,
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["stockQuantity"], 5);
        assert_eq!(json["price"], 9.99);
    }

    #[test]
    fn test_validate_rejects_bad_price() {
        assert!(validate_price(-1.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
        assert!(validate_price(0.0).is_ok());
    }
}
