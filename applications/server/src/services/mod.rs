/// Service layer modules
pub mod auth;
pub mod mailer;
pub mod orders;
pub mod payment;

pub use auth::AuthService;
pub use mailer::Mailer;
pub use orders::OrderService;
pub use payment::PaymentClient;
