use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_catalog_tables::Migration),
            Box::new(m20250101_000002_create_sliders_table::Migration),
            Box::new(m20250101_000003_create_site_settings_tables::Migration),
            Box::new(m20250101_000004_create_contact_form_entries_table::Migration),
        ]
    }
}

/// Column helpers shared by the migrations below
mod columns {
    use sea_orm_migration::prelude::*;

    pub fn id<T: IntoIden + 'static>(col: T) -> ColumnDef {
        ColumnDef::new(col)
            .big_integer()
            .not_null()
            .auto_increment()
            .primary_key()
            .to_owned()
    }

    pub fn owner<T: IntoIden + 'static>(col: T) -> ColumnDef {
        ColumnDef::new(col).big_integer().not_null().to_owned()
    }

    /// `<base>_tr` and `<base>_en` nullable columns
    pub fn bilingual(base: &str) -> [ColumnDef; 2] {
        ["tr", "en"].map(|lang| {
            ColumnDef::new(Alias::new(format!("{}_{}", base, lang)))
                .string()
                .null()
                .to_owned()
        })
    }

    pub fn bilingual_text(base: &str) -> [ColumnDef; 2] {
        ["tr", "en"].map(|lang| {
            ColumnDef::new(Alias::new(format!("{}_{}", base, lang)))
                .text()
                .null()
                .to_owned()
        })
    }

    pub fn optional_string(name: &str) -> ColumnDef {
        ColumnDef::new(Alias::new(name)).string().null().to_owned()
    }

    pub fn required_string(name: &str) -> ColumnDef {
        ColumnDef::new(Alias::new(name)).string().not_null().to_owned()
    }

    /// Nested-set coordinate columns of a tree table
    pub fn tree<T: IntoIden + 'static>(parent: T) -> [ColumnDef; 4] {
        [
            ColumnDef::new(parent).big_integer().null().to_owned(),
            ColumnDef::new(Alias::new("lft")).big_integer().not_null().to_owned(),
            ColumnDef::new(Alias::new("rght")).big_integer().not_null().to_owned(),
            ColumnDef::new(Alias::new("depth"))
                .big_integer()
                .not_null()
                .default(0)
                .to_owned(),
        ]
    }

    pub fn timestamp(name: &str) -> ColumnDef {
        ColumnDef::new(Alias::new(name))
            .timestamp_with_time_zone()
            .not_null()
            .to_owned()
    }

    pub fn with_columns<const N: usize>(
        table: &mut TableCreateStatement,
        columns: [ColumnDef; N],
    ) -> &mut TableCreateStatement {
        for mut column in columns {
            table.col(&mut column);
        }
        table
    }

    pub fn index<T, C>(name: &str, table: T, cols: C) -> IndexCreateStatement
    where
        T: IntoIden + 'static,
        C: IntoIterator<Item = &'static str>,
    {
        let mut index = Index::create();
        index.if_not_exists().name(name).table(table);
        for col in cols {
            index.col(Alias::new(col));
        }
        index.to_owned()
    }
}

mod m20250101_000001_create_catalog_tables {
    use super::columns::{self, with_columns};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut items = Table::create();
            items
                .table(CatalogItems::Table)
                .if_not_exists()
                .col(&mut columns::id(CatalogItems::Id))
                .col(ColumnDef::new(CatalogItems::Kind).string_len(20).not_null());
            with_columns(&mut items, columns::bilingual("title"));
            with_columns(&mut items, columns::bilingual_text("description"));
            items
                .col(&mut columns::optional_string("icon"))
                .col(ColumnDef::new(CatalogItems::CategorySubtype).string_len(20).null());
            with_columns(&mut items, columns::tree(CatalogItems::ParentId));
            items
                .col(&mut columns::timestamp("created_at"))
                .col(&mut columns::timestamp("updated_at"))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_catalog_items_parent_id")
                        .from(CatalogItems::Table, CatalogItems::ParentId)
                        .to(CatalogItems::Table, CatalogItems::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                );
            manager.create_table(items.to_owned()).await?;

            for (name, cols) in [
                ("idx_catalog_items_lft", ["lft"].as_slice()),
                ("idx_catalog_items_rght", ["rght"].as_slice()),
                ("idx_catalog_items_parent_id", ["parent_id"].as_slice()),
                ("idx_catalog_items_kind_depth", ["kind", "depth"].as_slice()),
            ] {
                manager
                    .create_index(columns::index(
                        name,
                        CatalogItems::Table,
                        cols.iter().copied(),
                    ))
                    .await?;
            }

            manager
                .create_table(
                    Table::create()
                        .table(ItemImages::Table)
                        .if_not_exists()
                        .col(&mut columns::id(ItemImages::Id))
                        .col(&mut columns::owner(ItemImages::ItemId))
                        .col(ColumnDef::new(ItemImages::Image).string().not_null())
                        .col(
                            ColumnDef::new(ItemImages::Position)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_item_images_item_id")
                                .from(ItemImages::Table, ItemImages::ItemId)
                                .to(CatalogItems::Table, CatalogItems::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(columns::index(
                    "idx_item_images_item_id",
                    ItemImages::Table,
                    ["item_id"],
                ))
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ItemImages::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(CatalogItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum CatalogItems {
        Table,
        Id,
        Kind,
        CategorySubtype,
        ParentId,
    }

    #[derive(DeriveIden)]
    enum ItemImages {
        Table,
        Id,
        ItemId,
        Image,
        Position,
    }
}

mod m20250101_000002_create_sliders_table {
    use super::columns::{self, with_columns};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_sliders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut sliders = Table::create();
            sliders
                .table(Sliders::Table)
                .if_not_exists()
                .col(&mut columns::id(Sliders::Id));
            with_columns(&mut sliders, columns::bilingual("title"));
            with_columns(&mut sliders, columns::bilingual("image"));
            with_columns(&mut sliders, columns::tree(Sliders::ParentId));
            sliders
                .col(&mut columns::timestamp("created_at"))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_sliders_parent_id")
                        .from(Sliders::Table, Sliders::ParentId)
                        .to(Sliders::Table, Sliders::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                );
            manager.create_table(sliders.to_owned()).await?;

            manager
                .create_index(columns::index("idx_sliders_lft", Sliders::Table, ["lft"]))
                .await?;
            manager
                .create_index(columns::index(
                    "idx_sliders_parent_id",
                    Sliders::Table,
                    ["parent_id"],
                ))
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Sliders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Sliders {
        Table,
        Id,
        ParentId,
    }
}

mod m20250101_000003_create_site_settings_tables {
    use super::columns::{self, with_columns};
    use super::m20250101_000001_create_catalog_tables::CatalogItems;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000003_create_site_settings_tables"
        }
    }

    /// A table owned by a site settings row (or by a contact section)
    fn owned_table<T: IntoIden + Copy + 'static>(
        table: T,
        owner_col: &'static str,
        owner_table: impl IntoIden + Copy + 'static,
    ) -> TableCreateStatement {
        let fk_name = format!("fk_{}_{}", table.into_iden().to_string(), owner_col);
        Table::create()
            .table(table)
            .if_not_exists()
            .col(&mut columns::id(Alias::new("id")))
            .col(&mut columns::owner(Alias::new(owner_col)))
            .foreign_key(
                ForeignKey::create()
                    .name(&fk_name)
                    .from(table, Alias::new(owner_col))
                    .to(owner_table, Alias::new("id"))
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned()
    }

    fn product_ref(table: Site, col: &'static str) -> ForeignKeyCreateStatement {
        ForeignKey::create()
            .name(&format!("fk_generic_sections_{}", col))
            .from(table, Alias::new(col))
            .to(CatalogItems::Table, CatalogItems::Id)
            .on_delete(ForeignKeyAction::SetNull)
            .to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut site = Table::create();
            site.table(Site::SiteSettings)
                .if_not_exists()
                .col(&mut columns::id(Alias::new("id")));
            with_columns(&mut site, columns::bilingual("site_title"));
            with_columns(&mut site, columns::bilingual_text("site_description"));
            site.col(&mut columns::optional_string("logo"))
                .col(&mut columns::optional_string("favicon"))
                .col(ColumnDef::new(Alias::new("head_tracking_code")).text().null())
                .col(ColumnDef::new(Alias::new("body_tracking_code")).text().null())
                .col(&mut columns::timestamp("created_at"))
                .col(&mut columns::timestamp("updated_at"));
            manager.create_table(site.to_owned()).await?;

            let mut menu = owned_table(Site::MenuItems, "site_id", Site::SiteSettings);
            menu.col(&mut columns::required_string("href"));
            with_columns(&mut menu, columns::bilingual("text"));

            let mut header = owned_table(Site::Headers, "site_id", Site::SiteSettings);
            with_columns(&mut header, columns::bilingual("title"));
            with_columns(&mut header, columns::bilingual_text("description"));
            header.col(&mut columns::optional_string("image"));

            let mut section = owned_table(Site::GenericSections, "site_id", Site::SiteSettings);
            section.col(
                ColumnDef::new(Alias::new("section_type"))
                    .string_len(50)
                    .not_null()
                    .default("generic"),
            );
            with_columns(&mut section, columns::bilingual("name"));
            with_columns(&mut section, columns::bilingual("subtitle"));
            with_columns(&mut section, columns::bilingual("title"));
            with_columns(&mut section, columns::bilingual_text("description"));
            section
                .col(&mut columns::optional_string("image"))
                .col(&mut columns::optional_string("mobile_image"));
            with_columns(&mut section, columns::bilingual("button_text_left"));
            section.col(&mut columns::optional_string("button_url_left"));
            with_columns(&mut section, columns::bilingual("button_text_right"));
            section.col(&mut columns::optional_string("button_url_right"));
            for col in ["product_1_id", "product_2_id", "product_3_id"] {
                section
                    .col(ColumnDef::new(Alias::new(col)).big_integer().null())
                    .foreign_key(&mut product_ref(Site::GenericSections, col));
            }

            let mut story = owned_table(Site::OurStorySections, "site_id", Site::SiteSettings);
            story.col(
                ColumnDef::new(Alias::new("section_type"))
                    .string_len(50)
                    .not_null(),
            );
            with_columns(&mut story, columns::bilingual("name"));
            with_columns(&mut story, columns::bilingual("subtitle"));
            with_columns(&mut story, columns::bilingual("title"));
            with_columns(&mut story, columns::bilingual_text("description"));
            story
                .col(&mut columns::optional_string("image"))
                .col(&mut columns::optional_string("mobile_image"))
                .col(&mut columns::optional_string("subimage"));
            with_columns(&mut story, columns::bilingual("button_text"));
            story.col(&mut columns::optional_string("button_url"));

            let mut contact = owned_table(Site::ContactSections, "site_id", Site::SiteSettings);
            with_columns(&mut contact, columns::bilingual("title"));
            with_columns(&mut contact, columns::bilingual_text("description"));

            let mut address =
                owned_table(Site::ContactAddresses, "contact_section_id", Site::ContactSections);
            with_columns(&mut address, columns::bilingual("title"));
            with_columns(&mut address, columns::bilingual_text("description"));
            address
                .col(&mut columns::required_string("tel"))
                .col(&mut columns::required_string("tel_wp"));

            let mut mail = owned_table(Site::ContactMails, "contact_section_id", Site::ContactSections);
            mail.col(&mut columns::required_string("mail"));

            let mut wholesale =
                owned_table(Site::WholesaleSections, "site_id", Site::SiteSettings);
            with_columns(&mut wholesale, columns::bilingual("title"));
            with_columns(&mut wholesale, columns::bilingual_text("description"));
            with_columns(&mut wholesale, columns::bilingual_text("info_text"));
            wholesale
                .col(&mut columns::optional_string("image"))
                .col(&mut columns::optional_string("button_top_title"));
            with_columns(&mut wholesale, columns::bilingual("button_top_text"));
            wholesale
                .col(&mut columns::optional_string("button_top_url"))
                .col(&mut columns::optional_string("button_bottom_title"));
            with_columns(&mut wholesale, columns::bilingual("button_bottom_text"));
            wholesale.col(&mut columns::optional_string("button_bottom_url"));

            let mut policy = owned_table(Site::FooterPolicies, "site_id", Site::SiteSettings);
            with_columns(&mut policy, columns::bilingual("title"));
            with_columns(&mut policy, columns::bilingual_text("description"));

            let mut social = owned_table(Site::SocialMediaLinks, "site_id", Site::SiteSettings);
            social
                .col(&mut columns::required_string("icon"))
                .col(&mut columns::required_string("url"));

            let mut footer = owned_table(Site::FooterInfos, "site_id", Site::SiteSettings);
            footer.col(&mut columns::optional_string("logo"));
            with_columns(&mut footer, columns::bilingual("footer_text"));
            with_columns(&mut footer, columns::bilingual("social_text"));

            let mut faq = owned_table(Site::FaqItems, "site_id", Site::SiteSettings);
            with_columns(&mut faq, columns::bilingual("question"));
            with_columns(&mut faq, columns::bilingual_text("answer"));
            faq.col(
                ColumnDef::new(Alias::new("sort_order"))
                    .integer()
                    .not_null()
                    .default(0),
            );

            let mut meta = owned_table(Site::PageMetas, "site_id", Site::SiteSettings);
            meta.col(&mut columns::required_string("page"));
            with_columns(&mut meta, columns::bilingual("meta_title"));
            with_columns(&mut meta, columns::bilingual_text("meta_description"));

            for table in [
                menu, header, section, story, contact, address, mail, wholesale, policy, social,
                footer, faq, meta,
            ] {
                manager.create_table(table).await?;
            }

            for (name, table, col) in [
                ("idx_menu_items_site_id", Site::MenuItems, "site_id"),
                ("idx_headers_site_id", Site::Headers, "site_id"),
                ("idx_generic_sections_site_id", Site::GenericSections, "site_id"),
                ("idx_our_story_sections_site_id", Site::OurStorySections, "site_id"),
                ("idx_contact_sections_site_id", Site::ContactSections, "site_id"),
                (
                    "idx_contact_addresses_section_id",
                    Site::ContactAddresses,
                    "contact_section_id",
                ),
                ("idx_contact_mails_section_id", Site::ContactMails, "contact_section_id"),
                ("idx_wholesale_sections_site_id", Site::WholesaleSections, "site_id"),
                ("idx_footer_policies_site_id", Site::FooterPolicies, "site_id"),
                ("idx_social_media_links_site_id", Site::SocialMediaLinks, "site_id"),
                ("idx_faq_items_site_id", Site::FaqItems, "site_id"),
                ("idx_page_metas_site_id", Site::PageMetas, "site_id"),
            ] {
                manager
                    .create_index(columns::index(name, table, [col]))
                    .await?;
            }

            manager
                .create_index(
                    columns::index("idx_footer_infos_site_id", Site::FooterInfos, ["site_id"])
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for table in [
                Site::PageMetas,
                Site::FaqItems,
                Site::FooterInfos,
                Site::SocialMediaLinks,
                Site::FooterPolicies,
                Site::WholesaleSections,
                Site::ContactMails,
                Site::ContactAddresses,
                Site::ContactSections,
                Site::OurStorySections,
                Site::GenericSections,
                Site::Headers,
                Site::MenuItems,
                Site::SiteSettings,
            ] {
                manager
                    .drop_table(Table::drop().table(table).if_exists().to_owned())
                    .await?;
            }
            Ok(())
        }
    }

    #[derive(DeriveIden, Clone, Copy)]
    enum Site {
        SiteSettings,
        MenuItems,
        Headers,
        GenericSections,
        OurStorySections,
        ContactSections,
        ContactAddresses,
        ContactMails,
        WholesaleSections,
        FooterPolicies,
        SocialMediaLinks,
        FooterInfos,
        FaqItems,
        PageMetas,
    }
}

mod m20250101_000004_create_contact_form_entries_table {
    use super::columns;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000004_create_contact_form_entries_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ContactFormEntries::Table)
                        .if_not_exists()
                        .col(&mut columns::id(ContactFormEntries::Id))
                        .col(ColumnDef::new(ContactFormEntries::Name).string().not_null())
                        .col(ColumnDef::new(ContactFormEntries::Email).string().not_null())
                        .col(ColumnDef::new(ContactFormEntries::Phone).string_len(20).null())
                        .col(ColumnDef::new(ContactFormEntries::Message).text().not_null())
                        .col(
                            ColumnDef::new(ContactFormEntries::AcceptTerms)
                                .boolean()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ContactFormEntries::SubscribeNewsletter)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ContactFormEntries::WasNotified)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(&mut columns::timestamp("created_at"))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(columns::index(
                    "idx_contact_form_entries_created_at",
                    ContactFormEntries::Table,
                    ["created_at"],
                ))
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ContactFormEntries::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ContactFormEntries {
        Table,
        Id,
        Name,
        Email,
        Phone,
        Message,
        AcceptTerms,
        SubscribeNewsletter,
        WasNotified,
    }
}
