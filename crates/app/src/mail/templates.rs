//! Message templates.

use crate::mail::Email;

/// One purchased line in a confirmation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationLine {
    pub title: String,

    /// Unit price in minor units.
    pub unit_price: u64,
    pub quantity: u32,
}

/// Order confirmation sent after a payment is verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub product_name: String,
    pub username: String,
    pub currency: String,
    pub lines: Vec<ConfirmationLine>,

    /// Order total in minor units.
    pub total: u64,
}

/// Format minor units as `"INR 499.00"`.
#[must_use]
pub fn format_money(currency: &str, amount: u64) -> String {
    format!("{currency} {}.{:02}", amount / 100, amount % 100)
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }

    escaped
}

impl OrderConfirmation {
    fn subject(&self) -> String {
        format!("{}: your order has been placed", self.product_name)
    }

    fn text(&self) -> String {
        let mut text = format!(
            "Hi {},\n\nYour order has been processed successfully.\n\n",
            self.username
        );

        for line in &self.lines {
            text.push_str(&format!(
                "- {} x{} @ {}\n",
                line.title,
                line.quantity,
                format_money(&self.currency, line.unit_price)
            ));
        }

        text.push_str(&format!(
            "\nTotal order cost: {}\n\
             You can check the status of your order and more in your order history.\n\n\
             {}\n",
            format_money(&self.currency, self.total),
            self.product_name
        ));

        text
    }

    fn html(&self) -> String {
        let mut rows = String::new();

        for line in &self.lines {
            rows.push_str(&format!(
                "<tr><td>{}</td><td align=\"right\">{}</td><td align=\"right\">{}</td></tr>",
                escape_html(&line.title),
                escape_html(&format_money(&self.currency, line.unit_price)),
                line.quantity
            ));
        }

        format!(
            "<html><body>\
             <p>Hi {name},</p>\
             <p>Your order has been processed successfully.</p>\
             <table><thead><tr><th>Item</th><th>Price</th><th>Quantity</th></tr></thead>\
             <tbody>{rows}</tbody></table>\
             <p>Total order cost: {total}</p>\
             <p>You can check the status of your order and more in your order history.</p>\
             <p>{product}</p>\
             </body></html>",
            name = escape_html(&self.username),
            total = escape_html(&format_money(&self.currency, self.total)),
            product = escape_html(&self.product_name),
        )
    }

    /// Render into a message addressed to `to`.
    #[must_use]
    pub fn to_email(&self, to: &str) -> Email {
        Email {
            to: to.to_string(),
            subject: self.subject(),
            text: self.text(),
            html: self.html(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confirmation() -> OrderConfirmation {
        OrderConfirmation {
            product_name: "Bookshelf".to_string(),
            username: "Ada <3".to_string(),
            currency: "INR".to_string(),
            lines: vec![
                ConfirmationLine {
                    title: "Rust & You".to_string(),
                    unit_price: 49_900,
                    quantity: 2,
                },
                ConfirmationLine {
                    title: "Sqlx".to_string(),
                    unit_price: 5,
                    quantity: 1,
                },
            ],
            total: 99_805,
        }
    }

    #[test]
    fn format_money_pads_minor_units() {
        assert_eq!(format_money("INR", 49_900), "INR 499.00");
        assert_eq!(format_money("INR", 5), "INR 0.05");
        assert_eq!(format_money("USD", 0), "USD 0.00");
    }

    #[test]
    fn text_lists_every_line_and_total() {
        let email = confirmation().to_email("ada@example.com");

        assert_eq!(email.to, "ada@example.com");
        assert!(email.text.contains("Rust & You x2 @ INR 499.00"), "{}", email.text);
        assert!(email.text.contains("Sqlx x1 @ INR 0.05"), "{}", email.text);
        assert!(email.text.contains("Total order cost: INR 998.05"), "{}", email.text);
    }

    #[test]
    fn html_escapes_user_content() {
        let email = confirmation().to_email("ada@example.com");

        assert!(email.html.contains("Hi Ada &lt;3,"), "{}", email.html);
        assert!(email.html.contains("Rust &amp; You"), "{}", email.html);
        assert!(!email.html.contains("Ada <3"), "{}", email.html);
    }
}
