//! Investments module - share purchases, their valuation and services.

mod investments_model;
mod investments_service;
mod investments_traits;
pub mod valuation;


pub use investments_model::{Investment, InvestmentUpdate, NewInvestment, PortfolioSummary};
pub use investments_service::InvestmentService;
pub use investments_traits::{InvestmentRepositoryTrait, InvestmentServiceTrait};
pub use valuation::{derive, derive_with_lookup, Valuation, ValuationInputs};
