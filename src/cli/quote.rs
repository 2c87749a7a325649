use super::ui;
use crate::core::config::AppConfig;
use crate::core::money::{format_acres, format_currency};
use crate::core::pricing::{LineSource, PriceBook, QuoteResult};
use crate::core::request::QuoteRequest;
use anyhow::Result;
use comfy_table::{Attribute, Cell};
use tracing::info;

impl QuoteResult {
    /// Line-item breakdown followed by the total and retainer.
    pub fn display_as_table(&self, book: &PriceBook, currency_symbol: &str) -> String {
        let money = |amount| format_currency(amount, currency_symbol);

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Service"),
            ui::header_cell("Basis"),
            ui::header_cell("Amount"),
        ]);

        for item in &self.line_items {
            let name = match item.source {
                LineSource::Package => Cell::new(item.service.name()),
                LineSource::AddOn => Cell::new(format!("+ {}", item.service.name())),
            };
            table.add_row(vec![
                name,
                Cell::new(book.rate_for(item.service).describe(currency_symbol)),
                ui::amount_cell(money(item.amount)),
            ]);
        }

        table.add_row(vec![
            Cell::new("Total Cost").add_attribute(Attribute::Bold),
            Cell::new(""),
            ui::total_cell(money(self.total_cost)),
        ]);

        let mut output = format!(
            "Package: {}\n{}\n\n",
            ui::style_text(self.package.name(), ui::StyleType::Title),
            ui::style_text(
                &format!("Approx. Developable Area: {} acres", format_acres(self.acreage)),
                ui::StyleType::Subtle
            )
        );

        output.push_str(&table.to_string());

        output.push_str(&format!(
            "\n\nTotal Cost: {}\n{}: {}",
            ui::style_text(&money(self.total_cost), ui::StyleType::TotalValue),
            ui::style_text("Retainer Fee (50% of Total)", ui::StyleType::TotalLabel),
            ui::style_text(&money(self.retainer_fee), ui::StyleType::TotalValue)
        ));

        output
    }
}

/// Prices the request and prints the cost breakdown.
pub fn run(request: &QuoteRequest, config: &AppConfig) -> Result<QuoteResult> {
    let book = config.price_book()?;
    let result = book.compute_quote(&request.quote_input())?;
    info!(
        package = %result.package,
        total = %result.total_cost,
        "Quote computed"
    );

    println!(
        "{}\n",
        ui::style_text(
            &format!("{} - Land Planning Fee Calculator", config.company_name),
            ui::StyleType::Title
        )
    );
    println!("{}", result.display_as_table(&book, &config.currency_symbol));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pricing::{AddOn, Package};
    use rust_decimal_macros::dec;

    fn request(add_ons: Vec<AddOn>) -> QuoteRequest {
        QuoteRequest {
            acres: dec!(50),
            package: Some(Package::ComprehensiveMasterPlanWithCad),
            add_ons,
            client: Default::default(),
        }
    }

    #[test]
    fn test_display_as_table_lists_every_line() {
        console::set_colors_enabled(false);
        let book = PriceBook::default();
        let result = book
            .compute_quote(&request(vec![AddOn::SiteVisits]).quote_input())
            .unwrap();

        let output = result.display_as_table(&book, "$");
        assert!(output.contains("Comprehensive Master Plan & CAD Package"));
        assert!(output.contains("50.0 acres"));
        assert!(output.contains("$3,850.00"));
        assert!(output.contains("$24,500.00"));
        assert!(output.contains("$2,000.00"));
        assert!(output.contains("Total Cost: $45,300.00"));
        assert!(output.contains("Retainer Fee (50% of Total): $22,650.00"));
    }

    #[test]
    fn test_run_rejects_missing_package() {
        let mut req = request(vec![]);
        req.package = None;

        let err = run(&req, &AppConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "no package selected");
    }

    #[test]
    fn test_run_returns_quote() -> Result<()> {
        let result = run(&request(vec![]), &AppConfig::default())?;
        assert_eq!(result.total_cost, dec!(43300));
        assert_eq!(result.retainer_fee, dec!(21650));
        Ok(())
    }
}
