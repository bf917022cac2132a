mod dashboard;
mod dispatch;
mod doctor;
mod report;
mod run;
mod run_all;

pub use dispatch::dispatch;
