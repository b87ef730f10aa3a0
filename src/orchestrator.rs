use std::fmt;
use std::path::PathBuf;
use tracing::{error, info};

use crate::analyzer::ProductAnalyzer;
use crate::collector::Collector;
use crate::config::AppConfig;
use crate::export::write_csv;
use crate::models::ApprovedProduct;
use crate::notifiers::Notifier;
use crate::Result;

pub const FOUND_PRODUCTS_FILE: &str = "found_products.csv";
pub const APPROVED_PRODUCTS_FILE: &str = "approved_products.csv";

/// Terminal state of one search-and-analysis cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    NoProducts,
    NoApproved,
    Completed { approved: usize },
    Failed(String),
}

impl fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleOutcome::NoProducts => write!(f, "No se encontraron productos"),
            CycleOutcome::NoApproved => write!(f, "No se encontraron productos aprobados."),
            CycleOutcome::Completed { approved } => {
                write!(f, "Proceso completado. Productos aprobados: {}", approved)
            }
            CycleOutcome::Failed(reason) => write!(f, "Error: {}", reason),
        }
    }
}

/// Wires the collector, analyzer, exporter and notifier into one
/// collect-analyze-export-notify cycle.
pub struct Orchestrator {
    collector: Collector,
    analyzer: ProductAnalyzer,
    notifier: Notifier,
    data_dir: PathBuf,
}

impl Orchestrator {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Orchestrator {
            collector: Collector::new(&config.scraper, &config.search)?,
            analyzer: ProductAnalyzer::new(&config.analyzer),
            notifier: Notifier::new(&config.notifications),
            data_dir: config.output.data_dir.clone(),
        })
    }

    /// Assembles an orchestrator from prebuilt parts, for tests.
    pub fn with_parts(
        collector: Collector,
        analyzer: ProductAnalyzer,
        notifier: Notifier,
        data_dir: PathBuf,
    ) -> Self {
        Orchestrator {
            collector,
            analyzer,
            notifier,
            data_dir,
        }
    }

    /// Runs one cycle to completion. Errors never escape; they fold into
    /// the `Failed` outcome so the scheduler can keep its cadence.
    pub async fn run_cycle(&self) -> CycleOutcome {
        match self.try_run_cycle().await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Cycle aborted: {}", e);
                CycleOutcome::Failed(e.to_string())
            }
        }
    }

    async fn try_run_cycle(&self) -> Result<CycleOutcome> {
        info!("{}", "=".repeat(80));
        info!("INICIANDO CICLO DE BÚSQUEDA Y ANÁLISIS");
        info!("{}", "=".repeat(80));

        let products = self.collector.collect().await;
        if products.is_empty() {
            return Ok(CycleOutcome::NoProducts);
        }
        info!("Collected {} products", products.len());

        write_csv(&products, self.data_dir.join(FOUND_PRODUCTS_FILE))?;

        let mut approved = Vec::new();
        for product in &products {
            if let Some(analysis) = self.analyzer.evaluate(product) {
                if analysis.approved {
                    approved.push(ApprovedProduct::new(product, &analysis));
                }
            }
        }

        if approved.is_empty() {
            return Ok(CycleOutcome::NoApproved);
        }
        info!("{} of {} products approved", approved.len(), products.len());

        write_csv(&approved, self.data_dir.join(APPROVED_PRODUCTS_FILE))?;

        let report = self.notifier.dispatch(&approved).await;
        info!(
            "Notifications delivered on {} of {} channels",
            report.delivered(),
            report.outcomes.len()
        );

        Ok(CycleOutcome::Completed {
            approved: approved.len(),
        })
    }
}
