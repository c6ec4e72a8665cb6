//! Text rendering of screens.

use std::fmt::Write;

use seller_panel_dashboard::api::{Category, DashboardSummary, Product, Seller};
use seller_panel_dashboard::forms::FieldErrors;
use seller_panel_dashboard::notify::Notification;

pub fn header(seller: &Seller) -> String {
    let avatar = seller
        .avatar
        .as_ref()
        .map_or("no avatar", |attachment| attachment.url.as_str());
    format!("== Seller Panel | {} <{}> ({avatar})", seller.name, seller.email)
}

pub fn dashboard(summary: &DashboardSummary) -> String {
    let mut out = String::from("Last 30 days\n");
    let _ = writeln!(out, "  Products sold:       {}", summary.sold);
    let _ = writeln!(out, "  Products for sale:   {}", summary.available);
    let _ = writeln!(out, "  Visitors:            {}", summary.views);

    match summary.range() {
        Some((first, last)) => {
            let _ = writeln!(
                out,
                "Visitors per day ({} - {})",
                first.format("%d %B"),
                last.format("%d %B")
            );
            let peak = summary
                .views_per_day
                .iter()
                .map(|day| day.amount)
                .max()
                .unwrap_or(0)
                .max(1);
            for day in &summary.views_per_day {
                let width = usize::try_from(day.amount * 30 / peak).unwrap_or(30);
                let _ = writeln!(out, "  {} {:>5} {}", day.label(), day.amount, "#".repeat(width));
            }
        }
        None => out.push_str("No visits recorded yet.\n"),
    }
    out
}

pub fn product_card(index: usize, product: &Product) -> String {
    format!(
        "{index:>3}. {} | {} | {} | {}",
        product.title,
        product.price_in_cents,
        product.category.slug,
        product.status.label()
    )
}

pub fn product_list(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products found.\n".to_string();
    }
    let mut out = String::new();
    for (i, product) in products.iter().enumerate() {
        let _ = writeln!(out, "{}", product_card(i + 1, product));
    }
    out
}

pub fn product_detail(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", product.title, product.status.label());
    let _ = writeln!(out, "  Price:       {}", product.price_in_cents);
    let _ = writeln!(out, "  Category:    {}", product.category.title);
    if !product.description.is_empty() {
        let _ = writeln!(out, "  Description: {}", product.description);
    }
    if let Some(cover) = product.cover() {
        let _ = writeln!(out, "  Image:       {}", cover.url);
    }
    out
}

pub fn category_choices(categories: &[Category]) -> String {
    let mut out = String::new();
    for (i, category) in categories.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}) {}", i + 1, category.title);
    }
    out
}

pub fn field_errors(errors: &FieldErrors) -> String {
    let mut out = String::new();
    for (field, message) in errors.iter() {
        let _ = writeln!(out, "  ! {field}: {message}");
    }
    out
}

pub fn notification(notification: &Notification) -> String {
    match notification {
        Notification::Success(message) => format!("[ok] {message}"),
        Notification::Error(message) => format!("[error] {message}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use seller_panel_core::{CategoryId, PriceInCents, ProductId, ProductStatus};
    use seller_panel_dashboard::api::DailyViews;

    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::random(),
            title: "Desk lamp".into(),
            description: String::new(),
            price_in_cents: PriceInCents::new(4990),
            status: ProductStatus::Sold,
            owner: None,
            category: Category {
                id: CategoryId::random(),
                title: "Furniture".into(),
                slug: "furniture".into(),
            },
            attachments: vec![],
        }
    }

    #[test]
    fn test_product_card() {
        assert_eq!(
            product_card(1, &product()),
            "  1. Desk lamp | 49.90 | furniture | Sold"
        );
    }

    #[test]
    fn test_dashboard_shows_range_and_labels() {
        let summary = DashboardSummary {
            sold: 2,
            available: 5,
            views: 9,
            views_per_day: vec![
                DailyViews {
                    date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                    amount: 4,
                },
                DailyViews {
                    date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                    amount: 5,
                },
            ],
        };
        let text = dashboard(&summary);
        assert!(text.contains("(01 March - 02 March)"));
        assert!(text.contains("01/03"));
        assert!(text.contains("Products sold:       2"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(product_list(&[]), "No products found.\n");
    }
}
