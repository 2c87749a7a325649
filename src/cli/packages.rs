use super::ui;
use crate::core::config::AppConfig;
use crate::core::pricing::{AddOn, Package, PriceBook};
use anyhow::Result;
use comfy_table::Cell;

/// Table of the four packages and the services each one bills.
pub fn packages_table(book: &PriceBook, currency_symbol: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Package"),
        ui::header_cell("Key"),
        ui::header_cell("Included Services"),
    ]);

    for package in Package::ALL {
        let services = package
            .services()
            .iter()
            .map(|service| {
                format!(
                    "{service} ({})",
                    book.rate_for(*service).describe(currency_symbol)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            Cell::new(package.name()),
            Cell::new(package.key()),
            Cell::new(services),
        ]);
    }
    table.to_string()
}

/// Table of the add-ons, labelled from the current price table.
pub fn add_ons_table(book: &PriceBook, currency_symbol: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Add-on"), ui::header_cell("Key")]);

    for add_on in AddOn::ALL {
        table.add_row(vec![
            Cell::new(book.add_on_label(add_on, currency_symbol)),
            Cell::new(add_on.key()),
        ]);
    }
    table.to_string()
}

pub fn run(config: &AppConfig) -> Result<()> {
    let book = config.price_book()?;

    println!(
        "{}\n",
        ui::style_text("Select a Package", ui::StyleType::Title)
    );
    println!("{}", packages_table(&book, &config.currency_symbol));
    ui::print_separator();
    println!(
        "{}\n",
        ui::style_text("Additional Services (If Requested)", ui::StyleType::Title)
    );
    println!("{}", add_ons_table(&book, &config.currency_symbol));
    Ok(())
}
