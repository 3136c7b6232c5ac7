//! Catalog records: products, categories, store settings and banners.

use serde::{Deserialize, Serialize};

use super::{BannerId, CategoryId, Price, ProductId};

/// Kind of pack a product delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    Diamonds,
    Membership,
}

/// A catalog line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    /// Display name (`"100 Diamonds"`, `"7 Days"`).
    pub name: String,
    /// Units delivered per pack (diamond count, or 1 for memberships).
    pub amount: u32,
    /// Unit price.
    pub price: Price,
    /// Optional image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Kind of pack.
    #[serde(rename = "category")]
    pub kind: ProductKind,
    /// Visual category this product is listed under, if any.
    #[serde(
        default,
        rename = "parentCategoryId",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_category: Option<CategoryId>,
}

/// A browsable category on the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub image: String,
    /// Pre-rendered range shown on the tile (`"৳ 20 – ৳ 7,600"`).
    pub price_range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Bangla description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bn_description: Option<String>,
    /// When set, every product of this kind is listed here as well.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes_kind: Option<ProductKind>,
}

impl Category {
    /// Returns `true` if `product` is listed under this category.
    #[must_use]
    pub fn lists(&self, product: &Product) -> bool {
        product.parent_category.as_ref() == Some(&self.id)
            || self.includes_kind == Some(product.kind)
    }
}

/// Storefront-wide settings edited by the administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    /// Scrolling notice at the top of every page.
    pub notice_marquee: String,
    /// Buyers can only place orders while the store is open.
    pub is_store_open: bool,
    /// `WhatsApp` number for support links.
    #[serde(rename = "supportWhatsApp")]
    pub support_whatsapp: String,
}

/// A home-page banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: BannerId,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(kind: ProductKind, parent: Option<&str>) -> Product {
        Product {
            id: ProductId::new("p"),
            name: "p".to_owned(),
            amount: 1,
            price: Price::from_taka(10),
            image: None,
            kind,
            parent_category: parent.map(CategoryId::from),
        }
    }

    fn category(id: &str, includes_kind: Option<ProductKind>) -> Category {
        Category {
            id: CategoryId::new(id),
            name: id.to_owned(),
            image: String::new(),
            price_range: String::new(),
            description: None,
            bn_description: None,
            includes_kind,
        }
    }

    #[test]
    fn test_category_lists_by_parent() {
        let evo = category("ff-evo", None);
        assert!(evo.lists(&product(ProductKind::Membership, Some("ff-evo"))));
        assert!(!evo.lists(&product(ProductKind::Membership, Some("ff-weekly"))));
        assert!(!evo.lists(&product(ProductKind::Diamonds, None)));
    }

    #[test]
    fn test_category_lists_by_kind() {
        let diamonds = category("ff-bd", Some(ProductKind::Diamonds));
        assert!(diamonds.lists(&product(ProductKind::Diamonds, None)));
        assert!(!diamonds.lists(&product(ProductKind::Membership, None)));
    }

    #[test]
    fn test_product_json_shape() {
        let json = serde_json::to_value(product(ProductKind::Membership, Some("ff-evo")))
            .unwrap_or_default();
        assert_eq!(json["category"], "membership");
        assert_eq!(json["parentCategoryId"], "ff-evo");
        assert!(json.get("image").is_none());
    }
}
