pub mod batch_report;
pub mod daybook;
pub mod ledger;
pub mod window;

pub use batch_report::BatchReportService;
pub use daybook::{DaybookParams, DaybookService};
pub use ledger::GapPolicy;
pub use window::ReportWindow;
