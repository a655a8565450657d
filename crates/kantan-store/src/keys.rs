//! Storage keys.
//!
//! The `_v1` suffix versions the JSON shape stored under each key. A shape
//! change gets a new key rather than an in-place rewrite.

/// Product catalog (`Vec<Product>`).
pub const PRODUCTS: &str = "cashier_products_v1";

/// Sale history, newest first (`Vec<Sale>`).
pub const SALES: &str = "cashier_sales_v1";

/// Register settings (`Settings`).
pub const SETTINGS: &str = "cashier_settings_v1";

/// In-progress cart (`Vec<CartEntry>`).
pub const CART: &str = "cashier_cart_v1";
