//! Shared fixtures for repository tests: a migrated database in a temp
//! directory with all three repositories wired to one writer.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

use investledger_core::rates::{HoldingPeriod, NewRateEntry, RateEntry, RateRepositoryTrait};
use investledger_core::service_groups::{NewServiceGroup, ServiceGroup, ServiceGroupRepositoryTrait};

use crate::db::{create_pool, run_migrations, spawn_writer};
use crate::investments::InvestmentRepository;
use crate::rates::RateRepository;
use crate::service_groups::ServiceGroupRepository;

pub(crate) struct TestLedger {
    pub groups: ServiceGroupRepository,
    pub rates: RateRepository,
    pub investments: InvestmentRepository,
    _temp_dir: TempDir,
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

impl TestLedger {
    pub async fn new() -> Self {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());

        TestLedger {
            groups: ServiceGroupRepository::new(Arc::clone(&pool), writer.clone()),
            rates: RateRepository::new(Arc::clone(&pool), writer.clone()),
            investments: InvestmentRepository::new(pool, writer),
            _temp_dir: temp_dir,
        }
    }

    pub async fn group(&self, name: &str, share_value: Decimal) -> ServiceGroup {
        self.groups
            .create(NewServiceGroup {
                id: None,
                name: name.to_string(),
                description: None,
                share_value,
                is_active: true,
            })
            .await
            .expect("Failed to create service group")
    }

    pub async fn rate(&self, group_id: &str, period: HoldingPeriod, percentage: Decimal) -> RateEntry {
        self.rates
            .create(NewRateEntry {
                id: None,
                service_group_id: group_id.to_string(),
                holding_period: period,
                interest_percentage: percentage,
                is_active: true,
            })
            .await
            .expect("Failed to create rate entry")
    }
}
