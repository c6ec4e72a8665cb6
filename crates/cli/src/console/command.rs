//! Console commands.

use seller_panel_core::ProductStatus;

/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Help,
    Quit,
    Back,
    Refresh,
    /// Open a path directly.
    Go(String),
    Login,
    SignUp,
    Register,
    Logout,
    Dashboard,
    Products,
    New,
    Filter,
    Clear,
    /// Open a product by list number or id.
    Open(String),
    Create,
    Edit,
    Status(ProductStatus),
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match word.to_ascii_lowercase().as_str() {
            "" => Self::Empty,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            "back" => Self::Back,
            "refresh" | "r" => Self::Refresh,
            "go" if !rest.is_empty() => Self::Go(rest.to_string()),
            "login" | "signin" => Self::Login,
            "signup" => Self::SignUp,
            "register" => Self::Register,
            "logout" | "signout" => Self::Logout,
            "dashboard" | "home" => Self::Dashboard,
            "products" | "list" => Self::Products,
            "new" => Self::New,
            "filter" => Self::Filter,
            "clear" => Self::Clear,
            "open" if !rest.is_empty() => Self::Open(rest.to_string()),
            "create" => Self::Create,
            "edit" | "save" => Self::Edit,
            "sold" | "sell" => Self::Status(ProductStatus::Sold),
            "cancel" | "deactivate" => Self::Status(ProductStatus::Cancelled),
            "available" | "relist" => Self::Status(ProductStatus::Available),
            _ => Self::Unknown(line.to_string()),
        }
    }
}

pub const HELP_ALWAYS: &str = "\
  go <path>    open a path (/, /products, /products/new, /sign-in, /sign-up)
  back         previous screen
  refresh      reload the current screen
  help         this text
  quit         leave";

pub const HELP_SIGN_IN: &str = "\
  login        sign in
  signup       create an account";

pub const HELP_SIGN_UP: &str = "\
  register     fill in the registration form
  login        back to sign-in";

pub const HELP_APP: &str = "\
  dashboard    metrics for the last 30 days
  products     your products
  new          add a product
  logout       sign out";

pub const HELP_PRODUCTS: &str = "\
  filter       filter by name and status
  clear        remove filters
  open <n|id>  open a product";

pub const HELP_NEW_PRODUCT: &str = "\
  create       fill in the product form";

pub const HELP_PRODUCT: &str = "\
  edit         change the product's details
  sold         mark as sold
  cancel       deactivate the listing
  available    list it for sale again";
