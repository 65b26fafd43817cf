//! Domain layer of the expense tracker.
//!
//! The [`Engine`] owns the database handle and exposes the ownership-scoped
//! expense operations; the surrounding modules hold the expense entity, the
//! fixed [`Category`] set, the currency resolver, and the forecast model.

pub use category::{CATEGORIES, Category};
pub use error::EngineError;
pub use expense::Expense;
pub use forecast::MonthlyForecast;
pub use ops::{CategoryTotal, Engine, EngineBuilder, UpdateExpenseCmd};

mod category;
pub mod currency;
mod error;
pub mod expense;
mod forecast;
mod ops;

type ResultEngine<T> = Result<T, EngineError>;
