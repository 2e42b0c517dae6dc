//! Feed construction and XML serialization.
//!
//! A [`Feed`] is built fresh per store per run from that store's catalog
//! items, never mutated afterwards, and serialized exactly once. Items
//! whose status is not the literal `active` are dropped silently (content
//! policy, not an error); surviving items keep their original relative
//! order. An empty item list still produces a syntactically valid,
//! empty-channel document.
//!
//! Output follows the Google Shopping RSS 2.0 schema (`g:` namespace).
//! Every externally supplied text field - titles, descriptions, links,
//! image links, brand, category - goes through [`xml::escape`].

pub mod xml;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CatalogItem, CurrencyCode, Price};

/// Immutable feed-generation settings injected into the builder.
///
/// This replaces module-level constants: base URL, currency, and the
/// default product category all arrive from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedProfile {
    /// Public storefront base URL used for channel and item links.
    pub base_url: String,
    /// Currency code appended to every rendered price.
    pub currency: CurrencyCode,
    /// Google product category emitted for every item.
    pub product_category: String,
}

impl Default for FeedProfile {
    fn default() -> Self {
        Self {
            base_url: "https://loja.vitrineonline.app.br".to_string(),
            currency: CurrencyCode::BRL,
            product_category: "Apparel & Accessories".to_string(),
        }
    }
}

impl FeedProfile {
    fn store_link(&self, store_id: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), store_id)
    }

    fn item_link(&self, store_id: &str, item_id: &str) -> String {
        format!("{}?id={}", self.store_link(store_id), item_id)
    }
}

/// Stock availability in Google Shopping vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    InStock,
    OutOfStock,
}

impl Availability {
    /// Unknown stock counts as in stock; only an explicit non-positive
    /// count marks an item out of stock.
    #[must_use]
    pub const fn from_stock(stock: Option<i64>) -> Self {
        match stock {
            Some(count) if count <= 0 => Self::OutOfStock,
            _ => Self::InStock,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "in stock",
            Self::OutOfStock => "out of stock",
        }
    }
}

/// One catalog item projected into Google Shopping feed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub image_link: String,
    pub availability: Availability,
    pub price: Price,
    /// Only present when the source document carried a promotional price
    /// field; rendered as `g:sale_price`.
    pub sale_price: Option<Price>,
    pub brand: String,
    pub google_product_category: String,
}

impl FeedEntry {
    fn from_item(
        profile: &FeedProfile,
        store_id: &str,
        store_name: &str,
        item: &CatalogItem,
    ) -> Self {
        let description = item
            .description
            .clone()
            .or_else(|| item.name.clone())
            .unwrap_or_default();

        Self {
            id: item.id.clone(),
            title: item.name.clone().unwrap_or_default(),
            description,
            link: profile.item_link(store_id, &item.id),
            image_link: item.images.first().cloned().unwrap_or_default(),
            availability: Availability::from_stock(item.stock),
            price: Price::new(item.price.unwrap_or_default(), profile.currency),
            sale_price: item
                .promo_price
                .map(|amount| Price::new(amount, profile.currency)),
            brand: store_name.to_string(),
            google_product_category: profile.product_category.clone(),
        }
    }
}

/// A complete per-store feed: channel metadata plus ordered entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feed {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Injected at build time so construction stays deterministic.
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<FeedEntry>,
}

impl Feed {
    /// Build a feed for one store from its catalog items.
    ///
    /// Non-active items are filtered out; surviving items keep their input
    /// order. An empty `items` slice yields a valid empty-channel feed.
    #[must_use]
    pub fn build(
        profile: &FeedProfile,
        store_id: &str,
        store_name: &str,
        items: &[CatalogItem],
        generated_at: DateTime<Utc>,
    ) -> Self {
        let entries = items
            .iter()
            .filter(|item| item.is_active())
            .map(|item| FeedEntry::from_item(profile, store_id, store_name, item))
            .collect();

        Self {
            title: format!("Catalog - {store_name}"),
            link: profile.store_link(store_id),
            description: format!("Product feed for {store_name}"),
            generated_at,
            entries,
        }
    }

    /// Serialize to the final XML document.
    #[must_use]
    pub fn to_xml(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            f,
            r#"<rss version="2.0" xmlns:g="http://base.google.com/ns/1.0">"#
        )?;
        writeln!(f, "<channel>")?;
        writeln!(f, "  <title>{}</title>", xml::escape(&self.title))?;
        writeln!(f, "  <link>{}</link>", xml::escape(&self.link))?;
        writeln!(
            f,
            "  <description>{}</description>",
            xml::escape(&self.description)
        )?;
        writeln!(
            f,
            "  <lastBuildDate>{}</lastBuildDate>",
            self.generated_at.to_rfc2822()
        )?;

        for entry in &self.entries {
            writeln!(f, "  <item>")?;
            writeln!(f, "    <g:id>{}</g:id>", xml::escape(&entry.id))?;
            writeln!(f, "    <g:title>{}</g:title>", xml::escape(&entry.title))?;
            writeln!(
                f,
                "    <g:description>{}</g:description>",
                xml::escape(&entry.description)
            )?;
            writeln!(f, "    <g:link>{}</g:link>", xml::escape(&entry.link))?;
            writeln!(
                f,
                "    <g:image_link>{}</g:image_link>",
                xml::escape(&entry.image_link)
            )?;
            writeln!(f, "    <g:condition>new</g:condition>")?;
            writeln!(
                f,
                "    <g:availability>{}</g:availability>",
                entry.availability.as_str()
            )?;
            writeln!(f, "    <g:price>{}</g:price>", entry.price.display())?;
            if let Some(sale_price) = &entry.sale_price {
                writeln!(f, "    <g:sale_price>{}</g:sale_price>", sale_price.display())?;
            }
            writeln!(f, "    <g:brand>{}</g:brand>", xml::escape(&entry.brand))?;
            writeln!(
                f,
                "    <g:google_product_category>{}</g:google_product_category>",
                xml::escape(&entry.google_product_category)
            )?;
            writeln!(f, "  </item>")?;
        }

        writeln!(f, "</channel>")?;
        write!(f, "</rss>")
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn test_time() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default()
    }

    fn active_item(id: &str) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: Some(format!("Item {id}")),
            status: Some("active".to_string()),
            price: Some(Decimal::from(10)),
            ..CatalogItem::default()
        }
    }

    #[test]
    fn test_non_active_items_filtered_silently() {
        let mut inactive = active_item("b");
        inactive.status = Some("draft".to_string());

        let items = vec![active_item("a"), inactive, active_item("c")];
        let feed = Feed::build(&FeedProfile::default(), "acme", "Acme", &items, test_time());

        let ids: Vec<&str> = feed.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn test_entry_order_preserved() {
        let items = vec![active_item("z"), active_item("a"), active_item("m")];
        let feed = Feed::build(&FeedProfile::default(), "acme", "Acme", &items, test_time());

        let ids: Vec<&str> = feed.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["z", "a", "m"]);
    }

    #[test]
    fn test_stock_zero_is_out_of_stock_and_positive_in_stock() {
        let mut first = active_item("a");
        first.stock = Some(0);
        let mut second = active_item("b");
        second.stock = Some(5);

        let feed = Feed::build(
            &FeedProfile::default(),
            "acme",
            "Acme",
            &[first, second],
            test_time(),
        );

        assert_eq!(feed.entries[0].availability, Availability::OutOfStock);
        assert_eq!(feed.entries[1].availability, Availability::InStock);

        // The rendered document keeps the same order.
        let doc = feed.to_xml();
        let out_pos = doc.find("out of stock").expect("out of stock present");
        let in_pos = doc.rfind(">in stock<").expect("in stock present");
        assert!(out_pos < in_pos);
    }

    #[test]
    fn test_unknown_stock_counts_as_in_stock() {
        assert_eq!(Availability::from_stock(None), Availability::InStock);
        assert_eq!(Availability::from_stock(Some(-1)), Availability::OutOfStock);
    }

    #[test]
    fn test_missing_price_renders_zero() {
        let mut item = active_item("a");
        item.price = None;

        let feed = Feed::build(&FeedProfile::default(), "acme", "Acme", &[item], test_time());
        assert!(feed.to_xml().contains("<g:price>0.00 BRL</g:price>"));
    }

    #[test]
    fn test_sale_price_emitted_only_when_promo_present() {
        let plain = active_item("a");
        let mut promo = active_item("b");
        promo.promo_price = Some(Decimal::new(85, 1));

        let feed = Feed::build(
            &FeedProfile::default(),
            "acme",
            "Acme",
            &[plain, promo],
            test_time(),
        );
        let doc = feed.to_xml();

        assert_eq!(doc.matches("<g:sale_price>").count(), 1);
        assert!(doc.contains("<g:sale_price>8.50 BRL</g:sale_price>"));
    }

    #[test]
    fn test_description_falls_back_to_name() {
        let mut item = active_item("a");
        item.name = Some("Blue Shirt".to_string());
        item.description = None;

        let feed = Feed::build(&FeedProfile::default(), "acme", "Acme", &[item], test_time());
        assert_eq!(feed.entries[0].description, "Blue Shirt");

        let mut bare = active_item("b");
        bare.name = None;
        bare.description = None;
        let feed = Feed::build(&FeedProfile::default(), "acme", "Acme", &[bare], test_time());
        assert_eq!(feed.entries[0].description, "");
    }

    #[test]
    fn test_first_image_wins() {
        let mut item = active_item("a");
        item.images = vec![
            "https://img.example/1.jpg".to_string(),
            "https://img.example/2.jpg".to_string(),
        ];

        let feed = Feed::build(&FeedProfile::default(), "acme", "Acme", &[item], test_time());
        assert_eq!(feed.entries[0].image_link, "https://img.example/1.jpg");
    }

    #[test]
    fn test_links_built_from_profile() {
        let profile = FeedProfile {
            base_url: "https://shop.example.com/".to_string(),
            ..FeedProfile::default()
        };
        let feed = Feed::build(&profile, "acme", "Acme", &[active_item("p1")], test_time());

        assert_eq!(feed.link, "https://shop.example.com/acme");
        assert_eq!(feed.entries[0].link, "https://shop.example.com/acme?id=p1");
    }

    #[test]
    fn test_reserved_characters_escaped_in_rendered_document() {
        let mut item = active_item("a");
        item.name = Some(r#"Tom & Jerry <XL> "limited""#.to_string());
        item.images = vec!["https://img.example/1.jpg?w=100&h=200".to_string()];

        let feed = Feed::build(
            &FeedProfile::default(),
            "acme",
            "R&D Store",
            &[item],
            test_time(),
        );
        let doc = feed.to_xml();

        assert!(doc.contains(
            "<g:title>Tom &amp; Jerry &lt;XL&gt; &quot;limited&quot;</g:title>"
        ));
        assert!(doc.contains("<g:image_link>https://img.example/1.jpg?w=100&amp;h=200</g:image_link>"));
        assert!(doc.contains("<g:brand>R&amp;D Store</g:brand>"));
        // Default category carries an ampersand and must be escaped too.
        assert!(doc.contains(
            "<g:google_product_category>Apparel &amp; Accessories</g:google_product_category>"
        ));
        // No CDATA anywhere: one escaping strategy for the whole document.
        assert!(!doc.contains("CDATA"));
    }

    #[test]
    fn test_item_link_ampersands_escaped() {
        // The item link embeds a query string; after escaping there must be
        // no raw ampersand left outside an entity.
        let feed = Feed::build(
            &FeedProfile::default(),
            "acme",
            "Acme",
            &[active_item("p1")],
            test_time(),
        );
        let doc = feed.to_xml();
        for (idx, _) in doc.match_indices('&') {
            let rest = doc.get(idx..).unwrap_or_default();
            assert!(
                rest.starts_with("&amp;")
                    || rest.starts_with("&lt;")
                    || rest.starts_with("&gt;")
                    || rest.starts_with("&quot;")
                    || rest.starts_with("&apos;"),
                "raw ampersand at byte {idx}"
            );
        }
    }

    #[test]
    fn test_empty_catalog_yields_valid_empty_channel() {
        let feed = Feed::build(&FeedProfile::default(), "acme", "Acme", &[], test_time());
        let doc = feed.to_xml();

        assert!(doc.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(doc.contains("<channel>"));
        assert!(doc.contains("<title>Catalog - Acme</title>"));
        assert!(doc.contains("<lastBuildDate>"));
        assert!(!doc.contains("<item>"));
        assert!(doc.ends_with("</rss>"));
    }

    #[test]
    fn test_condition_and_category_constant_fields() {
        let feed = Feed::build(
            &FeedProfile::default(),
            "acme",
            "Acme",
            &[active_item("a")],
            test_time(),
        );
        let doc = feed.to_xml();
        assert!(doc.contains("<g:condition>new</g:condition>"));
    }
}
