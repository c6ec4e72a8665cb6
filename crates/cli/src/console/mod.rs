//! Interactive console.
//!
//! The console plays the part of a browser front-end: it owns the history,
//! renders the current route, and reads commands. Entering a protected
//! route attaches the session guard (once, like a layout wrapping every
//! protected screen); leaving the protected area detaches it. Every screen
//! change gets a fresh [`ViewScope`], so requests belonging to the previous
//! screen are cancelled.

mod command;
mod prompt;
mod screens;

use std::sync::Arc;

use secrecy::SecretString;
use seller_panel_core::ProductId;
use seller_panel_dashboard::ApiError;
use seller_panel_dashboard::api::{Category, MarketplaceApi, Product};
use seller_panel_dashboard::config::DashboardConfig;
use seller_panel_dashboard::forms::filter::{ProductFilterForm, route_query};
use seller_panel_dashboard::forms::product::{ProductForm, ProductImage, change_product_status};
use seller_panel_dashboard::forms::session::{SignInForm, sign_out};
use seller_panel_dashboard::forms::sign_up::SignUpForm;
use seller_panel_dashboard::forms::{FormContext, SubmitResult, Submitted};
use seller_panel_dashboard::http::HttpClient;
use seller_panel_dashboard::navigation::{History, NavigationMode, Navigator, Route};
use seller_panel_dashboard::notify::NotificationLog;
use seller_panel_dashboard::scope::ViewScope;
use seller_panel_dashboard::session::SessionGuard;
use seller_panel_dashboard::upload::ImageUpload;
use tokio::io::{AsyncBufRead, BufReader, Stdin};
use tracing::{debug, error};

use command::Command;
use prompt::Prompter;

type Flow = std::io::Result<bool>;

/// Console state.
pub struct Console<R> {
    ctx: FormContext,
    history: Arc<History>,
    log: Arc<NotificationLog>,
    prompter: Prompter<R>,
    guard: Option<SessionGuard>,
    scope: ViewScope,
    shown: Option<Route>,
    listed: Vec<Product>,
    categories: Vec<Category>,
}

impl Console<BufReader<Stdin>> {
    /// Console reading from stdin.
    pub fn new(config: &DashboardConfig, start: Route) -> Result<Self, ApiError> {
        Self::with_input(config, start, BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Console<R> {
    pub fn with_input(config: &DashboardConfig, start: Route, input: R) -> Result<Self, ApiError> {
        let api = MarketplaceApi::new(HttpClient::new(config)?, config.cache_ttl);
        let history = Arc::new(History::starting_at(start));
        let log = Arc::new(NotificationLog::new());
        let ctx = FormContext::new(api, history.clone(), log.clone());

        Ok(Self {
            ctx,
            history,
            log,
            prompter: Prompter::new(input),
            guard: None,
            scope: ViewScope::new(),
            shown: None,
            listed: Vec::new(),
            categories: Vec::new(),
        })
    }

    /// Read and run commands until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the terminal cannot be read or written.
    pub async fn run(&mut self) -> std::io::Result<()> {
        println!("Seller Panel. Type `help` for commands.");

        loop {
            let route = self.history.current();
            if self.shown.as_ref() != Some(&route) {
                self.enter(route.clone()).await;
                self.flush_notifications();
                // Rendering may have been redirected (expired session).
                if self.history.current() != route {
                    continue;
                }
            }
            self.flush_notifications();

            let Some(line) = self.prompter.line(&format!("{route} > ")).await? else {
                break;
            };
            if !self.dispatch(Command::parse(&line)).await? {
                break;
            }
            self.flush_notifications();
        }

        println!("Bye.");
        Ok(())
    }

    async fn enter(&mut self, route: Route) {
        debug!(route = %route, "Entering screen");
        // Replacing the scope cancels whatever the previous screen started.
        self.scope = ViewScope::new();

        if route.requires_auth() {
            if self.guard.is_none() {
                self.guard = Some(SessionGuard::attach(
                    self.ctx.api.http(),
                    self.history.clone(),
                ));
            }
        } else {
            self.guard = None;
        }

        self.shown = Some(route.clone());
        self.render(&route).await;
    }

    async fn render(&mut self, route: &Route) {
        if route.requires_auth() {
            match self.scope.run(self.ctx.api.seller_profile()).await {
                Ok(seller) => println!("{}", screens::header(&seller)),
                Err(err) => return report(&err),
            }
        }

        match route {
            Route::SignIn { .. } => println!("Sign in to your account (`login`, or `signup`)."),
            Route::SignUp => println!("Create your account (`register`)."),
            Route::Dashboard => match self.scope.run(self.ctx.api.dashboard_summary()).await {
                Ok(summary) => print!("{}", screens::dashboard(&summary)),
                Err(err) => report(&err),
            },
            Route::Products { .. } => {
                let query = route_query(route);
                match self.scope.run(self.ctx.api.seller_products(&query)).await {
                    Ok(products) => {
                        print!("{}", screens::product_list(&products));
                        self.listed = products;
                    }
                    Err(err) => report(&err),
                }
            }
            Route::NewProduct => {
                println!("New product (`create`).");
                self.load_categories().await;
            }
            Route::Product(id) => match self.scope.run(self.ctx.api.product(*id)).await {
                Ok(product) => print!("{}", screens::product_detail(&product)),
                Err(err) => report(&err),
            },
            Route::NotFound => println!("Page not found."),
        }
    }

    async fn load_categories(&mut self) {
        match self.scope.run(self.ctx.api.categories()).await {
            Ok(categories) => self.categories = categories,
            Err(err) => report(&err),
        }
    }

    fn flush_notifications(&self) {
        for notification in self.log.drain() {
            println!("{}", screens::notification(&notification));
        }
    }

    fn go(&self, route: Route) {
        self.history.navigate(route, NavigationMode::Push);
    }

    async fn dispatch(&mut self, command: Command) -> Flow {
        let route = self.history.current();

        match command {
            Command::Empty => {}
            Command::Quit => return Ok(false),
            Command::Help => print_help(&route),
            Command::Back => {
                if self.history.back().is_none() {
                    println!("Nothing to go back to.");
                }
            }
            Command::Refresh => {
                self.ctx.api.cache().invalidate_all().await;
                self.shown = None;
            }
            Command::Go(path) => self.go(Route::from_path(&path)),
            Command::Login if matches!(route, Route::SignIn { .. }) => return self.sign_in(&route).await,
            Command::Login => self.go(Route::sign_in()),
            Command::SignUp => self.go(Route::SignUp),
            Command::Register if route == Route::SignUp => return self.sign_up().await,
            Command::Dashboard => self.go(Route::Dashboard),
            Command::Products => self.go(Route::products()),
            Command::New => self.go(Route::NewProduct),
            Command::Logout if route.requires_auth() => {
                let outcome = self.scope.run(sign_out(&self.ctx)).await;
                show_outcome(outcome);
            }
            Command::Filter if matches!(route, Route::Products { .. }) => return self.filter(&route).await,
            Command::Clear if matches!(route, Route::Products { .. }) => {
                ProductFilterForm::from_route(&route).clear(self.history.as_ref());
            }
            Command::Open(target) if matches!(route, Route::Products { .. }) => match self.resolve(&target) {
                Some(id) => self.go(Route::Product(id)),
                None => println!("No product {target}."),
            },
            Command::Create if route == Route::NewProduct => return self.create_product().await,
            Command::Edit => {
                if let Route::Product(id) = route {
                    return self.edit_product(id).await;
                }
                unavailable();
            }
            Command::Status(status) => {
                if let Route::Product(id) = route {
                    let outcome = self.scope.run(change_product_status(&self.ctx, id, status)).await;
                    if matches!(outcome, Ok(Submitted::Completed(()))) {
                        // Show the product again with its new status.
                        self.shown = None;
                    }
                    show_outcome(outcome);
                } else {
                    unavailable();
                }
            }
            Command::Unknown(line) => println!("Unknown command `{line}`. Type `help`."),
            Command::Register
            | Command::Logout
            | Command::Filter
            | Command::Clear
            | Command::Open(_)
            | Command::Create => unavailable(),
        }
        Ok(true)
    }

    fn resolve(&self, target: &str) -> Option<ProductId> {
        if let Ok(n) = target.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|i| self.listed.get(i))
                .map(|product| product.id);
        }
        target.parse().ok()
    }

    async fn ask(&mut self, label: &str, default: Option<&str>) -> std::io::Result<Option<String>> {
        self.prompter.ask(label, default).await
    }

    async fn sign_in(&mut self, route: &Route) -> Flow {
        let mut form = SignInForm::for_route(route);
        let prefill = form.email.clone();
        let Some(email) = self.ask("Email", Some(&prefill)).await? else {
            return Ok(true);
        };
        let Some(password) = self.ask("Password", None).await? else {
            return Ok(true);
        };
        form.email = email;
        form.password = SecretString::from(password);

        let outcome = self.scope.run(form.submit(&self.ctx)).await;
        show_outcome(outcome);
        Ok(true)
    }

    async fn sign_up(&mut self) -> Flow {
        let mut form = SignUpForm::default();
        for (label, slot) in [
            ("Name", &mut form.name),
            ("Phone", &mut form.phone),
            ("Email", &mut form.email),
        ] {
            let Some(answer) = self.prompter.ask(label, None).await? else {
                return Ok(true);
            };
            *slot = answer;
        }
        let Some(password) = self.ask("Password", None).await? else {
            return Ok(true);
        };
        let Some(confirmation) = self.ask("Confirm password", None).await? else {
            return Ok(true);
        };
        let Some(avatar) = self.ask("Profile image (path)", None).await? else {
            return Ok(true);
        };
        form.password = SecretString::from(password);
        form.password_confirmation = SecretString::from(confirmation);
        form.avatar = read_image(&avatar).await;

        let outcome = self.scope.run(form.submit(&self.ctx)).await;
        show_outcome(outcome);
        Ok(true)
    }

    async fn filter(&mut self, route: &Route) -> Flow {
        let mut form = ProductFilterForm::from_route(route);
        let search = form.search.clone();
        let Some(search) = self.ask("Search", Some(&search)).await? else {
            return Ok(true);
        };
        let status = form.status.clone();
        let Some(status) = self
            .ask("Status (available, sold, cancelled, none)", Some(&status))
            .await?
        else {
            return Ok(true);
        };
        form.search = search;
        form.status = status;
        form.apply(self.history.as_ref());
        Ok(true)
    }

    async fn create_product(&mut self) -> Flow {
        let Some(form) = self.fill_product_form(ProductForm::default()).await? else {
            return Ok(true);
        };
        let outcome = self.scope.run(form.submit_create(&self.ctx)).await;
        show_outcome(outcome);
        Ok(true)
    }

    async fn edit_product(&mut self, id: ProductId) -> Flow {
        let product = match self.scope.run(self.ctx.api.product(id)).await {
            Ok(product) => product,
            Err(err) => {
                report(&err);
                return Ok(true);
            }
        };
        let Some(form) = self.fill_product_form(ProductForm::from_product(&product)).await? else {
            return Ok(true);
        };
        let outcome = self.scope.run(form.submit_edit(&self.ctx, id)).await;
        show_outcome(outcome);
        Ok(true)
    }

    /// Prompt for every product field, offering the current values.
    async fn fill_product_form(&mut self, mut form: ProductForm) -> std::io::Result<Option<ProductForm>> {
        if self.categories.is_empty() {
            self.load_categories().await;
        }
        print!("{}", screens::category_choices(&self.categories));

        let title = form.title.clone();
        let Some(title) = self.ask("Title", Some(&title)).await? else {
            return Ok(None);
        };
        let description = form.description.clone();
        let Some(description) = self.ask("Description", Some(&description)).await? else {
            return Ok(None);
        };
        let current_category = category_number(&self.categories, &form.category_id);
        let Some(category) = self
            .ask("Category (number)", current_category.as_deref())
            .await?
        else {
            return Ok(None);
        };
        let price = form.price.clone();
        let Some(price) = self.ask("Price", Some(&price)).await? else {
            return Ok(None);
        };
        let image_hint = if form.image.is_some() {
            "Image (path, blank keeps current)"
        } else {
            "Image (path)"
        };
        let Some(image) = self.ask(image_hint, None).await? else {
            return Ok(None);
        };

        form.title = title;
        form.description = description;
        form.category_id = choose_category(&self.categories, &category);
        form.price = price;
        if !image.is_empty() {
            form.image = read_image(&image).await.map(ProductImage::Upload);
        }
        Ok(Some(form))
    }
}

async fn read_image(path: &str) -> Option<ImageUpload> {
    if path.trim().is_empty() {
        return None;
    }
    match ImageUpload::from_path(path.trim()).await {
        Ok(upload) => Some(upload),
        Err(err) => {
            println!("[error] {err}");
            None
        }
    }
}

/// Map a list number to a category id; anything else is passed through.
fn choose_category(categories: &[Category], answer: &str) -> String {
    answer
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| categories.get(i))
        .map_or_else(|| answer.trim().to_string(), |category| category.id.to_string())
}

fn category_number(categories: &[Category], id: &str) -> Option<String> {
    categories
        .iter()
        .position(|category| category.id.to_string() == id)
        .map(|i| (i + 1).to_string())
}

fn show_outcome<T>(outcome: SubmitResult<T>) {
    match outcome {
        Ok(Submitted::Invalid(errors)) => print!("{}", screens::field_errors(&errors)),
        // Rejections were already queued as notifications.
        Ok(Submitted::Rejected(_) | Submitted::Completed(_)) => {}
        Err(err) => report(&err),
    }
}

fn report(err: &ApiError) {
    match err {
        ApiError::Http { message, .. } => println!("[error] {message}"),
        // The guard already redirected; the screen is gone.
        ApiError::Intercepted | ApiError::Cancelled => {}
        ApiError::Validation(errors) => print!("{}", screens::field_errors(errors)),
        ApiError::Unknown(detail) => {
            error!(error = %detail, "Unexpected failure");
            println!("[error] Something went wrong, please try again.");
        }
    }
}

fn unavailable() {
    println!("Not available on this screen. Type `help`.");
}

fn print_help(route: &Route) {
    println!("Commands:");
    match route {
        Route::SignIn { .. } => println!("{}", command::HELP_SIGN_IN),
        Route::SignUp => println!("{}", command::HELP_SIGN_UP),
        Route::Products { .. } => println!("{}\n{}", command::HELP_PRODUCTS, command::HELP_APP),
        Route::NewProduct => println!("{}\n{}", command::HELP_NEW_PRODUCT, command::HELP_APP),
        Route::Product(_) => println!("{}\n{}", command::HELP_PRODUCT, command::HELP_APP),
        Route::Dashboard => println!("{}", command::HELP_APP),
        Route::NotFound => {}
    }
    println!("{}", command::HELP_ALWAYS);
}
