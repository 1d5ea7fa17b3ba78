//! HTML rendering for the admin page.
//!
//! Plain string templates. Every value that came from a user or the database
//! goes through [`escape_html`].

use crate::entities::tracked_product;
use std::fmt::Write;

/// Page title shown in the browser tab and header.
pub const PAGE_TITLE: &str = "Stock Tracker Admin";

/// Text of the single row shown when nothing is tracked.
pub const EMPTY_STATE: &str = "No products added yet.";

/// Question on the delete confirmation page.
pub const CONFIRM_DELETE: &str = "Are you sure you want to delete this?";

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;background:#0b0b0f;color:#e5e5e5;margin:0}\
main{max-width:48rem;margin:0 auto;padding:2rem 1rem}\
h1{text-align:center}\
form.add{display:flex;flex-wrap:wrap;gap:.5rem}\
form.add input{flex:1 1 12rem;padding:.5rem}\
.card{margin-top:2rem;border:1px solid #333;border-radius:.5rem;padding:1rem}\
table{width:100%;border-collapse:collapse}\
th,td{padding:.5rem;border-bottom:1px solid #222;text-align:left}\
.right{text-align:right}.muted{color:#888;text-align:center}\
.flash{padding:.75rem;border-radius:.5rem;margin-bottom:1rem}\
.flash.success{background:#123d22}.flash.error{background:#4a1616}\
.danger{color:#ef4444}";

/// Kind of flash banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    /// Green banner
    Success,
    /// Red banner
    Error,
}

/// Escapes text for use in HTML element content and quoted attributes.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn store_label(product: &tracked_product::Model) -> String {
    product.store().map_or_else(
        |_| product.store_type.clone(),
        |store| store.display_name().to_string(),
    )
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\" class=\"dark\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<main>\n{body}</main>\n</body>\n</html>\n",
        escape_html(title)
    )
}

/// Renders the "Tracked Products" card. This is the cached fragment.
#[must_use]
pub fn render_listing(products: &[tracked_product::Model]) -> String {
    let mut html = String::new();
    html.push_str("<section class=\"card\">\n<h2>Tracked Products</h2>\n");
    let _ = writeln!(
        html,
        "<p class=\"count\">{} products currently being tracked.</p>",
        products.len()
    );
    html.push_str(
        "<table>\n<thead><tr><th>Product</th><th>Store</th><th class=\"right\">Action</th></tr></thead>\n<tbody>\n",
    );

    if products.is_empty() {
        let _ = writeln!(
            html,
            "<tr><td colspan=\"3\" class=\"muted\">{EMPTY_STATE}</td></tr>"
        );
    }
    for product in products {
        let _ = writeln!(
            html,
            "<tr><td><a href=\"{url}\" rel=\"noopener noreferrer\">{name}</a></td><td>{store}</td>\
             <td class=\"right\"><a class=\"danger\" href=\"/products/{id}/delete\">Delete</a></td></tr>",
            url = escape_html(&product.url),
            name = escape_html(&product.name),
            store = escape_html(&store_label(product)),
            id = product.id,
        );
    }

    html.push_str("</tbody>\n</table>\n</section>\n");
    html
}

/// Renders the full admin page around a listing fragment.
#[must_use]
pub fn render_page(listing: &str, flash: Option<(FlashKind, &str)>) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{PAGE_TITLE}</h1>");

    if let Some((kind, message)) = flash {
        let class = match kind {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        };
        let _ = writeln!(
            body,
            "<div class=\"flash {class}\" role=\"status\">{}</div>",
            escape_html(message)
        );
    }

    body.push_str(
        "<form class=\"add\" method=\"post\" action=\"/products\">\n\
         <input type=\"text\" name=\"url\" placeholder=\"Paste a Flipkart, Amazon, Apple or Croma URL\" required>\n\
         <input type=\"text\" name=\"partNumber\" placeholder=\"Part Number (Apple only)\">\n\
         <input type=\"text\" name=\"affiliateLink\" placeholder=\"Affiliate link (optional)\">\n\
         <button type=\"submit\">Add Product</button>\n</form>\n",
    );
    body.push_str(listing);
    layout(PAGE_TITLE, &body)
}

/// Renders the confirmation step before a delete.
#[must_use]
pub fn render_confirm_delete(product: &tracked_product::Model) -> String {
    let body = format!(
        "<h1>{PAGE_TITLE}</h1>\n<section class=\"card\">\n<p>{CONFIRM_DELETE}</p>\n\
         <p><strong>{name}</strong> ({store})</p>\n\
         <form method=\"post\" action=\"/products/{id}/delete\">\n\
         <button type=\"submit\" class=\"danger\">Delete</button>\n<a href=\"/\">Cancel</a>\n</form>\n</section>\n",
        name = escape_html(&product.name),
        store = escape_html(&store_label(product)),
        id = product.id,
    );
    layout(PAGE_TITLE, &body)
}

/// Generic error page; never includes the underlying cause.
#[must_use]
pub fn render_error_page() -> String {
    layout(
        PAGE_TITLE,
        "<h1>Something went wrong</h1>\n<p>Please try again.</p>\n<p><a href=\"/\">Back</a></p>\n",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn model(id: i64, name: &str, store_type: &str) -> tracked_product::Model {
        tracked_product::Model {
            id,
            name: name.to_string(),
            url: format!("https://www.croma.com/x/p/{id}"),
            product_id: id.to_string(),
            store_type: store_type.to_string(),
            part_number: None,
            affiliate_link: None,
            created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_empty_listing() {
        let html = render_listing(&[]);
        assert!(html.contains("0 products currently being tracked."));
        assert!(html.contains(EMPTY_STATE));
    }

    #[test]
    fn test_listing_rows_capitalize_store_and_escape_name() {
        let html = render_listing(&[model(7, "(Croma) <b>tv</b>...", "croma")]);
        assert!(html.contains("1 products currently being tracked."));
        assert!(html.contains("<td>Croma</td>"));
        assert!(html.contains("(Croma) &lt;b&gt;tv&lt;/b&gt;..."));
        assert!(html.contains("/products/7/delete"));
        assert!(!html.contains(EMPTY_STATE));
    }

    #[test]
    fn test_unknown_store_tag_shown_raw() {
        let html = render_listing(&[model(1, "x", "ebay")]);
        assert!(html.contains("<td>ebay</td>"));
    }

    #[test]
    fn test_page_includes_flash_and_form() {
        let html = render_page("<section>listing</section>", Some((FlashKind::Error, "bad & wrong")));
        assert!(html.contains("<title>Stock Tracker Admin</title>"));
        assert!(html.contains("flash error"));
        assert!(html.contains("bad &amp; wrong"));
        assert!(html.contains("name=\"partNumber\""));
        assert!(html.contains("name=\"affiliateLink\""));
        assert!(html.contains("<section>listing</section>"));
    }

    #[test]
    fn test_confirm_delete_page() {
        let html = render_confirm_delete(&model(3, "(Croma) tv...", "croma"));
        assert!(html.contains(CONFIRM_DELETE));
        assert!(html.contains("action=\"/products/3/delete\""));
    }
}
