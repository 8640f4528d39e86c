//! Shop listing: purchasable items with discountable prices.

use dotma_dispatch::{Action, Command, MessageState};

/// A purchasable item.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Display name.
    pub name: String,
    /// Currency the item is priced in.
    pub currency: String,
    /// Undiscounted price.
    pub value: i64,
    /// Active discount, in whole percent.
    pub discount_percent: u8,
}

impl Item {
    /// Creates an item with no active discount.
    pub fn new(name: impl Into<String>, value: i64, currency: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            currency: currency.into(),
            value,
            discount_percent: 0,
        }
    }

    /// Applies a discount, in whole percent.
    #[must_use]
    pub const fn with_discount(mut self, percent: u8) -> Self {
        self.discount_percent = percent;
        self
    }

    /// The price after the active discount, rounded to the nearest coin.
    pub fn price(&self) -> i64 {
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        {
            let value = self.value as f64;
            (value - value * (f64::from(self.discount_percent) / 100.0)).round() as i64
        }
    }
}

/// The stock carried by the shop.
pub fn default_items() -> Vec<Item> {
    vec![
        Item::new("Extra ping", 5, "DotmaCoin"),
        Item::new("Custom ping message", 50, "DotmaCoin"),
        Item::new("Target immunity (1 day)", 200, "DotmaCoin").with_discount(10),
    ]
}

/// `shop`: lists the items for sale with their discounted prices.
pub fn shop() -> Command {
    Command::executable(
        "shop",
        0,
        Action::new(move |state: MessageState, _args| async move {
            let mut listing = String::from("```Shop:\n");
            for item in default_items() {
                listing.push_str(&format!(
                    "{} - {} {}",
                    item.name,
                    item.price(),
                    item.currency
                ));
                if item.discount_percent > 0 {
                    listing.push_str(&format!(" ({}% off)", item.discount_percent));
                }
                listing.push('\n');
            }
            listing.push_str("```");
            state.send(&listing).await?;
            Ok(())
        }),
    )
}
