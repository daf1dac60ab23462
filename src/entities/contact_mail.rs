use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contact_mails")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub contact_section_id: i64,
    pub mail: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contact_section::Entity",
        from = "Column::ContactSectionId",
        to = "super::contact_section::Column::Id",
        on_delete = "Cascade"
    )]
    ContactSection,
}

impl Related<super::contact_section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContactSection.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
