use std::collections::HashMap;

use super::service_traits::FinancialDataSource;
use crate::plan::{index_quotes, Holding, Liability, PlanParameters, Quote};

#[derive(Debug, Clone, Default)]
struct UserRecords {
    plan: Option<PlanParameters>,
    holdings: Vec<Holding>,
    liabilities: Vec<Liability>,
}

/// Data source backed by plain in-process collections
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    users: HashMap<String, UserRecords>,
    quotes: HashMap<String, Quote>,
    usd_to_local_rate: Option<f64>,
}

impl InMemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plan(mut self, user_id: &str, plan: PlanParameters) -> Self {
        self.user_mut(user_id).plan = Some(plan);
        self
    }

    pub fn with_holdings(mut self, user_id: &str, holdings: Vec<Holding>) -> Self {
        self.user_mut(user_id).holdings = holdings;
        self
    }

    pub fn with_liabilities(mut self, user_id: &str, liabilities: Vec<Liability>) -> Self {
        self.user_mut(user_id).liabilities = liabilities;
        self
    }

    pub fn with_quotes(mut self, quotes: Vec<Quote>) -> Self {
        self.quotes = index_quotes(quotes);
        self
    }

    pub fn with_usd_rate(mut self, rate: f64) -> Self {
        self.usd_to_local_rate = Some(rate);
        self
    }

    fn user_mut(&mut self, user_id: &str) -> &mut UserRecords {
        self.users.entry(user_id.to_string()).or_default()
    }
}

impl FinancialDataSource for InMemoryDataSource {
    fn plan_parameters(&self, user_id: &str) -> Option<PlanParameters> {
        self.users.get(user_id).and_then(|u| u.plan.clone())
    }

    fn holdings(&self, user_id: &str) -> Vec<Holding> {
        self.users
            .get(user_id)
            .map(|u| u.holdings.clone())
            .unwrap_or_default()
    }

    fn liabilities(&self, user_id: &str) -> Vec<Liability> {
        self.users
            .get(user_id)
            .map(|u| u.liabilities.clone())
            .unwrap_or_default()
    }

    fn quotes(&self) -> HashMap<String, Quote> {
        self.quotes.clone()
    }

    fn usd_to_local_rate(&self) -> Option<f64> {
        self.usd_to_local_rate
    }
}
