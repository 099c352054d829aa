// Analysis pipeline: prompt building, response interpretation, and the views
// derived from recorded results (stats, dashboard, report).
pub mod handlers;
pub mod interpreter;
pub mod prompts;
pub mod report;
pub mod score;
pub mod stats;
pub mod views;
