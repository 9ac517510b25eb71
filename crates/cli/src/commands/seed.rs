//! Seed the products table with the default catalog.
//!
//! The default catalog is the one the shop launched with: a handful of
//! products in each of the three categories, priced in EUR.

use rust_decimal::Decimal;
use tracing::info;

use ruche_admin::tablestore::AdminTableStoreClient;
use ruche_admin::tablestore::rows::ProductChangeset;

/// Insert the default catalog.
///
/// Refuses to run against a non-empty products table unless `force` is set.
///
/// # Errors
///
/// Returns an error if credentials are missing or the table store rejects
/// an insert.
pub async fn products(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::tablestore_config()?;
    let client = AdminTableStoreClient::new(&config)?;

    let existing = client.list_products().await?;
    if !existing.is_empty() && !force {
        return Err(format!(
            "products table already has {} rows; pass --force to seed anyway",
            existing.len()
        )
        .into());
    }

    let catalog = default_catalog();
    info!(count = catalog.len(), "Seeding default catalog");

    for changeset in &catalog {
        let product = client.create_product(changeset).await?;
        info!(id = %product.id, name = %product.name, "inserted");
    }

    info!("Seeding complete");
    Ok(())
}

fn changeset(
    name: &str,
    category: &str,
    price: i64,
    discount: Option<i64>,
    description: &str,
    rating: f32,
    featured: bool,
) -> ProductChangeset {
    ProductChangeset {
        name: name.to_string(),
        category: category.to_string(),
        price: Decimal::new(price, 2),
        discount_price: discount.map(|d| Decimal::new(d, 2)),
        description: description.to_string(),
        image_url: String::new(),
        rating,
        in_stock: true,
        featured,
    }
}

/// The launch catalog.
fn default_catalog() -> Vec<ProductChangeset> {
    vec![
        changeset(
            "Robe traditionnelle en wax",
            "mode",
            8999,
            Some(7499),
            "Robe longue cousue main dans un wax aux motifs ensoleilles.",
            4.8,
            true,
        ),
        changeset(
            "Chemise en pagne Ankara",
            "mode",
            4599,
            None,
            "Chemise homme coupe droite, pagne Ankara authentique.",
            4.5,
            true,
        ),
        changeset(
            "Boubou brode grand modele",
            "mode",
            12000,
            None,
            "Boubou trois pieces avec broderie artisanale.",
            4.9,
            false,
        ),
        changeset(
            "Pagne wax hollandais 6 yards",
            "tissus",
            3500,
            Some(2999),
            "Coupon de 6 yards, coton imprime double face.",
            4.7,
            true,
        ),
        changeset(
            "Tissu Kente tisse main",
            "tissus",
            6800,
            None,
            "Bande de Kente du Ghana, tissage traditionnel.",
            4.9,
            false,
        ),
        changeset(
            "Bazin riche teint",
            "tissus",
            5200,
            None,
            "Bazin damasse teint a la main, brillance durable.",
            4.6,
            false,
        ),
        changeset(
            "Sac a main en pagne",
            "accessoires",
            4999,
            Some(3999),
            "Sac bandouliere double en coton, fermeture eclair.",
            4.4,
            true,
        ),
        changeset(
            "Collier de perles artisanal",
            "accessoires",
            1899,
            None,
            "Perles de verre recycle enfilees a la main.",
            4.3,
            false,
        ),
        changeset(
            "Bracelet cauris et cuir",
            "accessoires",
            1299,
            None,
            "Bracelet ajustable, cauris naturels sur cuir tresse.",
            4.2,
            false,
        ),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ruche_core::CATEGORIES;

    #[test]
    fn test_default_catalog_uses_known_categories() {
        let catalog = default_catalog();
        assert!(!catalog.is_empty());
        for p in &catalog {
            assert!(CATEGORIES.contains(&p.category.as_str()), "{}", p.category);
            assert!(p.price > Decimal::ZERO);
            if let Some(d) = p.discount_price {
                assert!(d <= p.price, "{} discount above price", p.name);
            }
        }
    }

    #[test]
    fn test_default_catalog_has_featured_products() {
        assert!(default_catalog().iter().any(|p| p.featured));
    }
}
