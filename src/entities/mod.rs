//! Database entities.
//!
//! Bilingual fields are stored as `<field>_tr` / `<field>_en` column pairs;
//! file fields hold paths relative to the media root.

pub mod catalog_item;
pub mod contact_form_entry;
pub mod item_image;
pub mod slider;

// site configuration and its owned blocks
pub mod contact_address;
pub mod contact_mail;
pub mod contact_section;
pub mod faq_item;
pub mod footer_info;
pub mod footer_policy;
pub mod generic_section;
pub mod header;
pub mod menu_item;
pub mod our_story_section;
pub mod page_meta;
pub mod site_settings;
pub mod social_media_link;
pub mod wholesale_section;

pub use generic_section::SectionType;
pub use our_story_section::OurStorySectionType;
