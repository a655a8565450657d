//! # Terminal Shell
//!
//! A line-oriented front end over the commands.
//!
//! ```text
//! kantan> seed
//! Added 4 demo products.
//! kantan> add coffee
//! kantan> add 1
//! kantan> pay 1000
//! Sale id ... recorded. Total ¥... Change ¥...
//! ```
//!
//! Products can be named by id, by their number in the `products` list, or
//! by name (case-insensitive). Arguments with spaces take double quotes:
//! `add-product "Iced Tea" 380 Drinks`.

use chrono::Local;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use crate::commands::cart::CartResponse;
use crate::commands::product::{ProductDto, UpsertProductRequest};
use crate::commands::{backup, cart, product, sale, settings};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::state::RegisterState;

const HELP: &str = "\
Catalog
  products                          list products (numbered)
  search <text>                     filter by name or category
  add-product <name> <price> [cat]  create a product
  edit-product <product> <name> <price> [cat]
  delete-product <product>          delete (also removes it from the cart)
  seed                              add demo products
Cart
  add <product>...                  add one of each
  qty <product> <delta>             e.g. qty 1 -1
  remove <product>                  drop the line
  clear                             empty the cart and cash input
  cart                              show cart and totals
Payment
  cash <amount>                     type the tendered cash
  exact                             tender exactly the total
  pay [amount]                      complete the sale
History and settings
  history                           list sales, newest first
  clear-history                     delete all sales
  tax [rate]                        show or set the tax rate (0.1, 10, 10%)
  export-csv [file]                 write sales CSV
  backup [file]                     write JSON backup
  restore <file>                    import JSON backup
Other
  help
  quit";

/// Result of one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text to print (possibly empty); keep reading.
    Continue(String),
    Quit,
}

/// The shell.
pub struct Shell {
    state: RegisterState,
    config: AppConfig,
}

impl Shell {
    pub fn new(state: RegisterState, config: AppConfig) -> Self {
        Shell { state, config }
    }

    /// Reads commands from stdin until `quit` or end of input.
    pub async fn run(&self) -> std::io::Result<()> {
        let mut stdout = tokio::io::stdout();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        stdout
            .write_all(format!("{} - type 'help' for commands\n", self.config.store_name).as_bytes())
            .await?;

        loop {
            stdout.write_all(b"kantan> ").await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match self.execute(&line).await {
                Outcome::Quit => break,
                Outcome::Continue(text) if text.is_empty() => {}
                Outcome::Continue(text) => {
                    stdout.write_all(text.as_bytes()).await?;
                    stdout.write_all(b"\n").await?;
                }
            }
        }

        stdout.flush().await
    }

    /// Runs one input line.
    pub async fn execute(&self, line: &str) -> Outcome {
        let args = tokenize(line);
        let Some((command, rest)) = args.split_first() else {
            return Outcome::Continue(String::new());
        };
        debug!(command = %command, "Shell command");

        let result = match command.as_str() {
            "quit" | "exit" => return Outcome::Quit,
            "help" | "?" => Ok(HELP.to_string()),
            "products" => Ok(self.products().await),
            "search" => Ok(self.search(&rest.join(" ")).await),
            "add-product" => self.add_product(rest).await,
            "edit-product" => self.edit_product(rest).await,
            "delete-product" => self.delete_product(rest).await,
            "seed" => product::seed_demo_products(&self.state)
                .await
                .map(|n| format!("Added {} demo products.", n))
                .map_err(render_error),
            "add" => self.add(rest).await,
            "qty" => self.qty(rest).await,
            "remove" => self.remove(rest).await,
            "clear" => cart::clear_cart(&self.state)
                .await
                .map(|c| render_cart(&c))
                .map_err(render_error),
            "cart" => Ok(render_cart(&cart::get_cart(&self.state).await)),
            "cash" => Ok(render_cart(
                &cart::set_cash_input(&self.state, rest.join(" ")).await,
            )),
            "exact" => Ok(render_cart(&cart::fill_exact(&self.state).await)),
            "pay" => self.pay(rest).await,
            "history" => Ok(self.history().await),
            "clear-history" => sale::clear_history(&self.state)
                .await
                .map(|n| format!("Deleted {} sales.", n))
                .map_err(render_error),
            "tax" => self.tax(rest).await,
            "export-csv" => self.export_csv(rest).await,
            "backup" => self.backup(rest).await,
            "restore" => self.restore(rest).await,
            other => Err(format!("Unknown command '{}'. Type 'help'.", other)),
        };

        Outcome::Continue(result.unwrap_or_else(|e| e))
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    async fn products(&self) -> String {
        let list = product::search_products(&self.state, String::new()).await;
        if list.is_empty() {
            return "No products. Use 'add-product' or 'seed'.".to_string();
        }
        list.iter()
            .enumerate()
            .map(|(i, p)| render_product(i + 1, p))
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn search(&self, query: &str) -> String {
        let all = product::search_products(&self.state, String::new()).await;
        let found = product::search_products(&self.state, query.to_string()).await;
        if found.is_empty() {
            return format!("No products match '{}'.", query);
        }
        found
            .iter()
            .map(|p| {
                let number = all.iter().position(|q| q.id == p.id).map_or(0, |i| i + 1);
                render_product(number, p)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn add_product(&self, args: &[String]) -> Result<String, String> {
        let [name, price, category @ ..] = args else {
            return Err("usage: add-product <name> <price> [category]".to_string());
        };
        let request = UpsertProductRequest {
            id: None,
            name: name.clone(),
            price: price.clone(),
            category: category.join(" "),
        };
        let dto = product::upsert_product(&self.state, request)
            .await
            .map_err(render_error)?;
        Ok(format!("Created {} ({}).", dto.name, AppConfig::format_currency(dto.price)))
    }

    async fn edit_product(&self, args: &[String]) -> Result<String, String> {
        let [target, name, price, category @ ..] = args else {
            return Err("usage: edit-product <product> <name> <price> [category]".to_string());
        };
        let existing = self.resolve(target).await?;
        let request = UpsertProductRequest {
            id: Some(existing.id),
            name: name.clone(),
            price: price.clone(),
            category: category.join(" "),
        };
        let dto = product::upsert_product(&self.state, request)
            .await
            .map_err(render_error)?;
        Ok(format!("Updated {} ({}).", dto.name, AppConfig::format_currency(dto.price)))
    }

    async fn delete_product(&self, args: &[String]) -> Result<String, String> {
        let [target] = args else {
            return Err("usage: delete-product <product>".to_string());
        };
        let existing = self.resolve(target).await?;
        product::delete_product(&self.state, existing.id)
            .await
            .map_err(render_error)?;
        Ok(format!("Deleted {}.", existing.name))
    }

    /// Finds a product by id, list number, or name.
    async fn resolve(&self, token: &str) -> Result<ProductDto, String> {
        let list = product::search_products(&self.state, String::new()).await;

        if let Some(p) = list.iter().find(|p| p.id == token) {
            return Ok(p.clone());
        }
        if let Ok(n) = token.parse::<usize>() {
            if let Some(p) = n.checked_sub(1).and_then(|i| list.get(i)) {
                return Ok(p.clone());
            }
        }
        let lowered = token.to_lowercase();
        let matches: Vec<&ProductDto> = list
            .iter()
            .filter(|p| p.name.to_lowercase() == lowered)
            .collect();
        match matches.as_slice() {
            [one] => Ok((*one).clone()),
            [] => Err(format!("No product '{}'.", token)),
            _ => Err(format!("'{}' is ambiguous; use the number or id.", token)),
        }
    }

    // =========================================================================
    // Cart
    // =========================================================================

    async fn add(&self, args: &[String]) -> Result<String, String> {
        if args.is_empty() {
            return Err("usage: add <product>...".to_string());
        }
        let mut last = None;
        for token in args {
            let target = self.resolve(token).await?;
            last = Some(
                cart::add_to_cart(&self.state, target.id)
                    .await
                    .map_err(render_error)?,
            );
        }
        Ok(last.map(|c| render_cart(&c)).unwrap_or_default())
    }

    async fn qty(&self, args: &[String]) -> Result<String, String> {
        let [target, delta] = args else {
            return Err("usage: qty <product> <delta>".to_string());
        };
        let delta: i64 = delta
            .trim_start_matches('+')
            .parse()
            .map_err(|_| format!("'{}' is not a whole number.", delta))?;
        let id = self.cart_target(target).await?;
        cart::change_qty(&self.state, id, delta)
            .await
            .map(|c| render_cart(&c))
            .map_err(render_error)
    }

    async fn remove(&self, args: &[String]) -> Result<String, String> {
        let [target] = args else {
            return Err("usage: remove <product>".to_string());
        };
        let id = self.cart_target(target).await?;
        cart::remove_from_cart(&self.state, id)
            .await
            .map(|c| render_cart(&c))
            .map_err(render_error)
    }

    /// Catalog lookup, falling back to the raw token so dangling cart
    /// entries can still be removed.
    async fn cart_target(&self, token: &str) -> Result<String, String> {
        match self.resolve(token).await {
            Ok(p) => Ok(p.id),
            Err(_) => Ok(token.to_string()),
        }
    }

    // =========================================================================
    // Payment / History
    // =========================================================================

    async fn pay(&self, args: &[String]) -> Result<String, String> {
        let cash = if args.is_empty() {
            None
        } else {
            Some(args.join(""))
        };
        let sale = sale::complete_sale(&self.state, cash)
            .await
            .map_err(render_error)?;
        Ok(format!(
            "Sale {} recorded. Total {}  Cash {}  Change {}",
            sale.id,
            AppConfig::format_currency(sale.total.yen()),
            AppConfig::format_currency(sale.cash.yen()),
            AppConfig::format_currency(sale.change.yen()),
        ))
    }

    async fn history(&self) -> String {
        let history = sale::get_history(&self.state).await;
        let mut out = vec![format!(
            "{} sales, {} total",
            history.summary.count,
            AppConfig::format_currency(history.summary.total.yen())
        )];
        for s in &history.sales {
            let local = s.timestamp.with_timezone(&Local);
            out.push(format!(
                "{}  {}  total {}  cash {}  change {}",
                local.format("%Y-%m-%d %H:%M:%S"),
                s.id,
                AppConfig::format_currency(s.total.yen()),
                AppConfig::format_currency(s.cash.yen()),
                AppConfig::format_currency(s.change.yen()),
            ));
            for item in &s.items {
                out.push(format!(
                    "    {} x{} @ {} = {}",
                    item.name,
                    item.qty,
                    AppConfig::format_currency(item.price.yen()),
                    AppConfig::format_currency(item.line_total().yen()),
                ));
            }
        }
        out.join("\n")
    }

    async fn tax(&self, args: &[String]) -> Result<String, String> {
        let dto = if args.is_empty() {
            settings::get_settings(&self.state).await
        } else {
            settings::set_tax_rate(&self.state, args.join(""))
                .await
                .map_err(render_error)?
        };
        Ok(format!("Tax rate {}%", dto.tax_percent))
    }

    // =========================================================================
    // Files
    // =========================================================================

    async fn export_csv(&self, args: &[String]) -> Result<String, String> {
        let file = backup::export_sales_csv(&self.state, Local::now().date_naive())
            .await
            .map_err(render_error)?;
        let path = args.first().cloned().unwrap_or(file.file_name);
        write_file(&path, &file.contents).await?;
        Ok(format!("Wrote {}.", path))
    }

    async fn backup(&self, args: &[String]) -> Result<String, String> {
        let file = backup::export_backup(&self.state, Local::now().date_naive())
            .await
            .map_err(render_error)?;
        let path = args.first().cloned().unwrap_or(file.file_name);
        write_file(&path, &file.contents).await?;
        Ok(format!("Wrote {}.", path))
    }

    async fn restore(&self, args: &[String]) -> Result<String, String> {
        let [path] = args else {
            return Err("usage: restore <file>".to_string());
        };
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            warn!(path = %path, error = %e, "Failed to read backup file");
            format!("Cannot read {}: {}", path, e)
        })?;
        let counts = backup::import_backup(&self.state, text)
            .await
            .map_err(render_error)?;
        Ok(format!(
            "Restored {} products and {} sales.",
            counts.products, counts.sales
        ))
    }
}

async fn write_file(path: &str, contents: &str) -> Result<(), String> {
    tokio::fs::write(path, contents).await.map_err(|e| {
        warn!(path = %path, error = %e, "Failed to write export file");
        format!("Cannot write {}: {}", path, e)
    })
}

// =============================================================================
// Rendering
// =============================================================================

fn render_error(err: ApiError) -> String {
    format!("error {}: {}", err.code.as_str(), err.message)
}

fn render_product(number: usize, p: &ProductDto) -> String {
    let category = if p.category.is_empty() {
        String::new()
    } else {
        format!("  [{}]", p.category)
    };
    format!(
        "{:>3}. {}  {}{}  ({})",
        number,
        p.name,
        AppConfig::format_currency(p.price),
        category,
        p.id
    )
}

fn render_cart(c: &CartResponse) -> String {
    if c.lines.is_empty() {
        return "Cart is empty.".to_string();
    }
    let mut out: Vec<String> = c
        .lines
        .iter()
        .map(|line| {
            format!(
                "  {} x{} @ {} = {}",
                line.product.name,
                line.qty,
                line.product.price,
                line.line_total
            )
        })
        .collect();
    out.push(format!("  Subtotal {}", c.totals.subtotal));
    out.push(format!("  Tax      {}", c.totals.tax));
    out.push(format!("  Total    {}", c.totals.total));
    if !c.cash_input.is_empty() {
        out.push(format!(
            "  Cash     {}  Change {}",
            c.cash_input,
            AppConfig::format_currency(c.change_preview)
        ));
    }
    out.join("\n")
}

/// Splits on whitespace; double quotes group words.
fn tokenize(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    args.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        args.push(current);
    }
    args
}
