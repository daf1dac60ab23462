//! Response shapes shared by the category and product endpoints.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::catalog::{CategorySubtype, ItemKind};
use crate::entities::{catalog_item, item_image};
use crate::errors::ServiceError;
use crate::i18n::Localizer;
use crate::services::catalog_service::CatalogService;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImageView {
    pub id: i64,
    /// Absolute media URL
    #[schema(example = "https://kitti.com.tr/media/item_images/cat-1.png")]
    pub image: String,
}

/// A category or product resolved for the request language
#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(example = json!({
    "id": 3,
    "kind": "category",
    "title": "Kediler",
    "description": null,
    "icon": "https://kitti.com.tr/media/item_icons/cat.png",
    "category_subtype": "type1",
    "parent_id": null,
    "level": 0,
    "lft": 1,
    "rght": 6,
    "images": [],
    "products_count": 1,
    "children": []
}))]
pub struct ItemView {
    pub id: i64,
    pub kind: ItemKind,
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_subtype: Option<CategorySubtype>,
    pub parent_id: Option<i64>,
    /// Tree depth, 0 for roots
    pub level: i64,
    pub lft: i64,
    pub rght: i64,
    pub images: Vec<ImageView>,
    /// Direct product children; categories only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products_count: Option<u64>,
    /// Sub-categories first, then products; tree responses only
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub children: Option<Vec<ItemView>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything needed to render a batch of items: their images and, for
/// categories, product counts
pub struct ItemViews<'a> {
    loc: &'a Localizer,
    images: HashMap<i64, Vec<item_image::Model>>,
    counts: HashMap<i64, u64>,
}

impl<'a> ItemViews<'a> {
    pub async fn load(
        catalog: &CatalogService,
        loc: &'a Localizer,
        items: &[catalog_item::Model],
    ) -> Result<ItemViews<'a>, ServiceError> {
        let ids: Vec<i64> = items.iter().map(|m| m.id).collect();
        let category_ids: Vec<i64> = items
            .iter()
            .filter(|m| m.kind.is_category())
            .map(|m| m.id)
            .collect();
        Ok(Self {
            loc,
            images: catalog.images_of(&ids).await?,
            counts: catalog.products_count(&category_ids).await?,
        })
    }

    pub fn view(&self, model: &catalog_item::Model) -> ItemView {
        let images = self
            .images
            .get(&model.id)
            .map(|images| {
                images
                    .iter()
                    .map(|img| ImageView {
                        id: img.id,
                        image: self.loc.media.resolve(&img.image),
                    })
                    .collect()
            })
            .unwrap_or_default();
        ItemView {
            id: model.id,
            kind: model.kind,
            title: self.loc.text(&model.title_tr, &model.title_en),
            description: self.loc.text(&model.description_tr, &model.description_en),
            icon: self.loc.file(&model.icon),
            category_subtype: model.category_subtype,
            parent_id: model.parent_id,
            level: model.depth,
            lft: model.lft,
            rght: model.rght,
            images,
            products_count: model
                .kind
                .is_category()
                .then(|| self.counts.get(&model.id).copied().unwrap_or(0)),
            children: None,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    pub fn views(&self, models: &[catalog_item::Model]) -> Vec<ItemView> {
        models.iter().map(|m| self.view(m)).collect()
    }

    /// Nests `subtree` (pre-order rows below `root`) under `root`
    pub fn tree(&self, root: &catalog_item::Model, subtree: &[catalog_item::Model]) -> ItemView {
        let mut by_parent: HashMap<i64, Vec<&catalog_item::Model>> = HashMap::new();
        for node in subtree {
            if let Some(parent) = node.parent_id {
                by_parent.entry(parent).or_default().push(node);
            }
        }
        self.nest(root, &by_parent)
    }

    fn nest(
        &self,
        node: &catalog_item::Model,
        by_parent: &HashMap<i64, Vec<&catalog_item::Model>>,
    ) -> ItemView {
        let mut view = self.view(node);
        if node.kind.is_category() {
            let children = by_parent.get(&node.id).map(Vec::as_slice).unwrap_or(&[]);
            let (categories, products): (Vec<&catalog_item::Model>, Vec<&catalog_item::Model>) =
                children.iter().copied().partition(|c| c.kind.is_category());
            view.children = Some(
                categories
                    .into_iter()
                    .chain(products)
                    .map(|child| self.nest(child, by_parent))
                    .collect(),
            );
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Language, MediaUrls};

    fn item(id: i64, kind: ItemKind, parent: Option<i64>, lft: i64, depth: i64) -> catalog_item::Model {
        catalog_item::Model {
            id,
            kind,
            title_tr: Some(format!("Öğe {}", id)),
            title_en: None,
            description_tr: None,
            description_en: None,
            icon: None,
            category_subtype: None,
            parent_id: parent,
            lft,
            rght: lft + 1,
            depth,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn views(loc: &Localizer) -> ItemViews<'_> {
        ItemViews {
            loc,
            images: HashMap::from([(
                3,
                vec![item_image::Model {
                    id: 10,
                    item_id: 3,
                    image: "item_images/a.png".into(),
                    position: 0,
                }],
            )]),
            counts: HashMap::from([(1, 1)]),
        }
    }

    #[test]
    fn tree_lists_sub_categories_before_products() {
        let loc = Localizer {
            lang: Language::En,
            media: MediaUrls::new("/media/", None),
        };
        let builder = views(&loc);
        let root = item(1, ItemKind::Category, None, 1, 0);
        // pre-order: product 3 sorts before sub-category 2
        let subtree = vec![
            item(3, ItemKind::Product, Some(1), 2, 1),
            item(2, ItemKind::Category, Some(1), 4, 1),
            item(4, ItemKind::Product, Some(2), 5, 2),
        ];

        let tree = builder.tree(&root, &subtree);
        let children = tree.children.unwrap();
        assert_eq!(children.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(children[0].children.as_ref().unwrap()[0].id, 4);
        assert!(children[1].children.is_none());
        assert_eq!(tree.products_count, Some(1));
        assert_eq!(children[0].products_count, Some(0));
        assert_eq!(children[1].images[0].image, "/media/item_images/a.png");
        // no English title stored: falls back to Turkish
        assert_eq!(tree.title.as_deref(), Some("Öğe 1"));
    }
}
